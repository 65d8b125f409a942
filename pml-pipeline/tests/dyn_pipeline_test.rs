use pml_pipeline::{DynPipeline, ErasedStage, PipelineError, TypeMismatch, TypeTag, Value};

fn double() -> ErasedStage {
    ErasedStage::new("double", |x: f64| x * 2.0)
}

fn positive() -> ErasedStage {
    ErasedStage::new("positive", |x: f64| x > 0.0)
}

#[test]
fn test_append_checks_adjacency() {
    let pipeline = DynPipeline::of(double()).append(positive()).unwrap();
    assert_eq!(pipeline.input_tag(), TypeTag::of::<f64>());
    assert_eq!(pipeline.output_tag(), TypeTag::of::<bool>());
    assert_eq!(pipeline.stage_names(), ["double", "positive"]);
    assert_eq!(pipeline.run_typed::<f64, bool>(0.5), Ok(true));
}

#[test]
fn test_mismatched_append_is_rejected() {
    let pipeline = DynPipeline::of(positive());
    let error = pipeline.append(double()).unwrap_err();
    assert_eq!(
        error,
        TypeMismatch {
            stage: "double".to_string(),
            expected: TypeTag::of::<bool>(),
            found: TypeTag::of::<f64>(),
        }
    );
    assert!(error.to_string().contains("stage 'double' takes f64"));
}

#[test]
fn test_failed_append_leaves_pipeline_usable() {
    let pipeline = DynPipeline::of(double());
    assert!(pipeline.append(ErasedStage::new("len", |s: String| s.len())).is_err());
    assert_eq!(pipeline.run_typed::<f64, f64>(2.0), Ok(4.0));
}

#[test]
fn test_identity() {
    let pipeline = DynPipeline::identity::<String>();
    assert!(pipeline.is_empty());
    assert_eq!(
        pipeline.run_typed::<String, String>("same".into()),
        Ok("same".to_string())
    );
}

#[test]
fn test_shared_prefix() {
    let base = DynPipeline::of(double());
    let left = base.append(double()).unwrap();
    let right = base.append(positive()).unwrap();
    assert_eq!(base.len(), 1);
    assert_eq!(left.run_typed::<f64, f64>(1.0), Ok(4.0));
    assert_eq!(right.run_typed::<f64, bool>(-1.0), Ok(false));
}

#[test]
fn test_run_rejects_wrong_input() {
    let pipeline = DynPipeline::of(double());
    let error = pipeline.run(Value::new(3_i32)).unwrap_err();
    assert_eq!(
        error,
        PipelineError::InputType {
            expected: TypeTag::of::<f64>(),
            found: TypeTag::of::<i32>(),
        }
    );
}

#[test]
fn test_run_typed_rejects_wrong_output() {
    let pipeline = DynPipeline::of(double());
    assert!(matches!(
        pipeline.run_typed::<f64, bool>(1.0),
        Err(PipelineError::OutputType { .. })
    ));
}
