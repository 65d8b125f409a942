use crate::error::{PipelineError, TypeMismatch};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Runtime identity of a Rust type: its `TypeId` plus a printable name.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A value of any `Send` type, tagged with that type.
pub struct Value {
    tag: TypeTag,
    inner: Box<dyn Any + Send>,
}

impl Value {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            inner: Box::new(value),
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Takes the value out, or hands `self` back if it is not a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        let tag = self.tag;
        self.inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|inner| Value { tag, inner })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.tag)
    }
}

type ApplyFn = dyn Fn(Value) -> Result<Value, PipelineError> + Send + Sync;

/// A named stage with its input and output types recorded as tags, so that
/// chains of stages looked up by name can be checked before they run.
#[derive(Clone)]
pub struct ErasedStage {
    name: String,
    input: TypeTag,
    output: TypeTag,
    apply: Arc<ApplyFn>,
}

impl ErasedStage {
    pub fn new<I, O, F>(name: impl Into<String>, f: F) -> Self
    where
        I: Any + Send,
        O: Any + Send,
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        let name = name.into();
        let stage = name.clone();
        let apply = move |value: Value| {
            let input = value
                .downcast::<I>()
                .map_err(|value| PipelineError::StageInput {
                    stage: stage.clone(),
                    expected: TypeTag::of::<I>(),
                    found: value.tag(),
                })?;
            Ok(Value::new(f(input)))
        };
        Self {
            name,
            input: TypeTag::of::<I>(),
            output: TypeTag::of::<O>(),
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> TypeTag {
        self.input
    }

    pub fn output(&self) -> TypeTag {
        self.output
    }

    pub fn apply(&self, value: Value) -> Result<Value, PipelineError> {
        (self.apply)(value)
    }
}

impl fmt::Debug for ErasedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedStage")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish()
    }
}

struct Link {
    stage: ErasedStage,
    previous: Option<Arc<Link>>,
}

impl Link {
    fn run(&self, value: Value) -> Result<Value, PipelineError> {
        let value = match &self.previous {
            Some(previous) => previous.run(value)?,
            None => value,
        };
        self.stage.apply(value)
    }
}

/// A pipeline of [`ErasedStage`]s whose adjacency is checked when each stage
/// is appended.
///
/// Like [`Pipeline`](crate::Pipeline), appending leaves the receiver alone
/// and shares its chain with the result.
#[derive(Clone)]
pub struct DynPipeline {
    input: TypeTag,
    output: TypeTag,
    last: Option<Arc<Link>>,
    len: usize,
}

impl DynPipeline {
    pub fn of(stage: ErasedStage) -> Self {
        Self {
            input: stage.input(),
            output: stage.output(),
            last: Some(Arc::new(Link {
                stage,
                previous: None,
            })),
            len: 1,
        }
    }

    /// A pipeline with no stages that passes `T` through.
    pub fn identity<T: Any>() -> Self {
        Self::identity_for(TypeTag::of::<T>())
    }

    /// A pipeline with no stages over a type known only by its tag.
    pub fn identity_for(tag: TypeTag) -> Self {
        Self {
            input: tag,
            output: tag,
            last: None,
            len: 0,
        }
    }

    /// Returns a pipeline running `stage` after this one, or
    /// [`TypeMismatch`] if `stage` does not take this pipeline's output.
    pub fn append(&self, stage: ErasedStage) -> Result<DynPipeline, TypeMismatch> {
        if stage.input() != self.output {
            return Err(TypeMismatch {
                stage: stage.name().to_string(),
                expected: self.output,
                found: stage.input(),
            });
        }
        Ok(Self {
            input: self.input,
            output: stage.output(),
            last: Some(Arc::new(Link {
                stage,
                previous: self.last.clone(),
            })),
            len: self.len + 1,
        })
    }

    pub fn run(&self, value: Value) -> Result<Value, PipelineError> {
        if value.tag() != self.input {
            return Err(PipelineError::InputType {
                expected: self.input,
                found: value.tag(),
            });
        }
        match &self.last {
            Some(last) => last.run(value),
            None => Ok(value),
        }
    }

    pub fn run_typed<I, O>(&self, input: I) -> Result<O, PipelineError>
    where
        I: Any + Send,
        O: Any,
    {
        self.run(Value::new(input))?
            .downcast::<O>()
            .map_err(|value| PipelineError::OutputType {
                expected: TypeTag::of::<O>(),
                found: value.tag(),
            })
    }

    pub fn input_tag(&self) -> TypeTag {
        self.input
    }

    pub fn output_tag(&self) -> TypeTag {
        self.output
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stage names, first to last.
    pub fn stage_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.len);
        let mut link = self.last.as_deref();
        while let Some(current) = link {
            names.push(current.stage.name());
            link = current.previous.as_deref();
        }
        names.reverse();
        names
    }
}

impl fmt::Debug for DynPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynPipeline")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("stages", &self.stage_names())
            .finish()
    }
}
