use pml_parser::{parse, parse_with, ParameterizedIdentifier, ParseOptions, PipelineSpecification};

fn pident(name: &str, params: &[&str]) -> ParameterizedIdentifier {
    ParameterizedIdentifier::new(name, params.iter().copied())
}

#[test]
fn test_single_stage_with_filter() {
    let specs = parse("gamepad1.left_joystick_x :: always |-> deadband(0.5) ->| strafe;").unwrap();
    assert_eq!(
        specs,
        vec![PipelineSpecification::new(
            "gamepad1",
            "left_joystick_x",
            pident("always", &[]),
            vec![pident("deadband", &["0.5"])],
            "strafe",
        )]
    );
    assert_eq!(specs[0].filter().to_string(), "always()");
}

#[test]
fn test_identity_uses_default_filter() {
    let specs = parse("gamepad1.left_joystick_x :: |->| logging;").unwrap();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].filter().to_string(), "changed()");
    assert!(specs[0].stages().is_empty());
    assert!(specs[0].is_identity());
    assert_eq!(specs[0].callback(), "logging");
}

#[test]
fn test_process_set_with_chained_stages() {
    let specs = parse(
        "navx.heading :: sometimes |-> smoothing -> scaling(5,6,7,8) ->| value,\n\
         :: always |->| log;",
    )
    .unwrap();
    assert_eq!(specs.len(), 2);

    assert_eq!(specs[0].device(), "navx");
    assert_eq!(specs[0].input(), "heading");
    assert_eq!(specs[0].filter().to_string(), "sometimes()");
    assert_eq!(
        specs[0].stages(),
        &[pident("smoothing", &[]), pident("scaling", &["5", "6", "7", "8"])]
    );
    assert_eq!(specs[0].callback(), "value");

    assert_eq!(specs[1].device(), "navx");
    assert_eq!(specs[1].input(), "heading");
    assert_eq!(specs[1].filter().to_string(), "always()");
    assert!(specs[1].stages().is_empty());
    assert_eq!(specs[1].callback(), "log");
}

#[test]
fn test_trailing_comment_is_ignored() {
    let with_comment = parse("gp.x :: always |->| y # trailing comment\n").unwrap();
    let without = parse("gp.x :: always |->| y").unwrap();
    assert_eq!(with_comment, without);
}

#[test]
fn test_stage_operator_may_repeat() {
    let specs = parse("gp.x :: |-> a |-> b -> c ->| out").unwrap();
    let names: Vec<_> = specs[0].stages().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn test_filter_inherited_within_process_set() {
    let specs = parse(
        "gp.x :: always |->| a, :: |->| b, :: sometimes(3) |->| c, :: |->| d;",
    )
    .unwrap();
    let filters: Vec<_> = specs.iter().map(|s| s.filter().to_string()).collect();
    assert_eq!(filters, ["always()", "always()", "sometimes(3)", "sometimes(3)"]);
}

#[test]
fn test_new_input_restarts_inheritance() {
    let specs = parse("gp.x :: always |->| a, .y :: |->| b").unwrap();
    assert_eq!(specs[0].filter().name(), "always");
    assert_eq!(specs[1].input(), "y");
    assert_eq!(specs[1].filter().name(), "changed");
}

#[test]
fn test_new_statement_restarts_inheritance() {
    let specs = parse("gp.x :: always |->| a; gp.x :: |->| b;").unwrap();
    assert_eq!(specs[1].filter().name(), "changed");
}

#[test]
fn test_input_set_and_process_set_mix() {
    let specs = parse(
        "gamepad1 .left_x :: always |-> deadband(0.05) ->| drive_x, :: |->| log_x,\n\
                  .left_y :: |-> invert ->| drive_y;\n\
         navx.yaw :: sometimes(10) |->| log_yaw",
    )
    .unwrap();
    let summary: Vec<_> = specs
        .iter()
        .map(|s| format!("{}.{}>{}", s.device(), s.input(), s.callback()))
        .collect();
    assert_eq!(
        summary,
        [
            "gamepad1.left_x>drive_x",
            "gamepad1.left_x>log_x",
            "gamepad1.left_y>drive_y",
            "navx.yaw>log_yaw",
        ]
    );
}

#[test]
fn test_semicolon_is_optional() {
    let specs = parse("a.b :: |->| c\nd.e :: |->| f").unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[1].device(), "d");
}

#[test]
fn test_empty_and_comment_only_documents() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("  \n# nothing to see\n\t# here\n").unwrap().is_empty());
}

#[test]
fn test_whitespace_is_insignificant() {
    let tight = parse("gp.x::always|->deadband(0.5)->scaling(2)->|out").unwrap();
    let loose = parse("gp . x :: always |-> deadband ( 0.5 ) -> scaling( 2 ) ->| out").unwrap();
    assert_eq!(tight, loose);
}

#[test]
fn test_numeric_and_identifier_parameters() {
    let specs = parse("gp.x :: |-> f(-0.01, +3, .5, fast, low-pass) ->| y").unwrap();
    assert_eq!(
        specs[0].stages()[0].parameters(),
        ["-0.01", "+3", ".5", "fast", "low-pass"]
    );
}

#[test]
fn test_hyphenated_names() {
    let specs = parse("drive-base.left-x :: |-> foc-offset->|left-out").unwrap();
    assert_eq!(specs[0].device(), "drive-base");
    assert_eq!(specs[0].input(), "left-x");
    assert_eq!(specs[0].stages()[0].name(), "foc-offset");
    assert_eq!(specs[0].callback(), "left-out");
}

#[test]
fn test_configured_default_filter() {
    let options = ParseOptions::default().with_default_filter("sometimes(4)");
    let specs = parse_with("gp.x :: |->| a, :: always |->| b", &options).unwrap();
    assert_eq!(specs[0].filter(), &pident("sometimes", &["4"]));
    assert_eq!(specs[1].filter().name(), "always");
}

#[test]
fn test_invalid_default_filter() {
    let options = ParseOptions::default().with_default_filter("not a filter");
    let error = parse_with("gp.x :: |->| a", &options).unwrap_err();
    assert_eq!(error.production, "default_filter");
}

#[test]
fn test_identifier_only_parameters() {
    let options = ParseOptions::default().with_numeric_parameters(false);
    assert!(parse_with("gp.x :: |-> f(slow, 10) ->| y", &options).is_ok());
    let error = parse_with("gp.x :: |-> f(0.5) ->| y", &options).unwrap_err();
    assert_eq!(error.production, "parameter_set");
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: ParseOptions = serde_json::from_str(r#"{"default_filter":"always"}"#).unwrap();
    assert_eq!(options.default_filter, "always");
    assert!(options.numeric_parameters);
}

#[test]
fn test_parses_are_independent_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("dev{i}.x :: |->| cb{i}");
                parse(&text).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let specs = handle.join().unwrap();
        assert_eq!(specs[0].device(), format!("dev{i}"));
    }
}

#[test]
fn test_specifications_serialize_to_json() {
    let specs = parse("gp.x :: always |-> deadband(0.5) ->| y").unwrap();
    let json = serde_json::to_value(&specs).unwrap();
    assert_eq!(json[0]["device"], "gp");
    assert_eq!(json[0]["filter"]["name"], "always");
    assert_eq!(json[0]["stages"][0]["parameters"][0], "0.5");
}
