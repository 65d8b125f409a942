use crate::erased::{TypeTag, Value};
use crate::error::PipelineError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type ConsumeFn = dyn Fn(Value) -> Result<(), PipelineError> + Send + Sync;

/// The consumer a callback name resolves to: receives each pipeline result.
#[derive(Clone)]
pub struct Sink {
    accepts: Option<TypeTag>,
    consume: Arc<ConsumeFn>,
}

impl Sink {
    /// A sink for values of type `T`. Binding it behind a pipeline that
    /// produces anything else fails.
    pub fn new<T, F>(consume: F) -> Self
    where
        T: Any + Send,
        F: Fn(T) + Send + Sync + 'static,
    {
        let consume = move |value: Value| {
            let value = value
                .downcast::<T>()
                .map_err(|value| PipelineError::SinkInput {
                    expected: TypeTag::of::<T>(),
                    found: value.tag(),
                })?;
            consume(value);
            Ok(())
        };
        Self {
            accepts: Some(TypeTag::of::<T>()),
            consume: Arc::new(consume),
        }
    }

    /// A sink that takes values of any type.
    pub fn untyped<F>(consume: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        Self {
            accepts: None,
            consume: Arc::new(move |value| {
                consume(value);
                Ok(())
            }),
        }
    }

    pub fn accepts(&self, tag: TypeTag) -> bool {
        self.accepts.map_or(true, |accepted| accepted == tag)
    }

    /// The accepted type, `None` for an untyped sink.
    pub fn tag(&self) -> Option<TypeTag> {
        self.accepts
    }

    pub fn deliver(&self, value: Value) -> Result<(), PipelineError> {
        (self.consume)(value)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accepts {
            Some(tag) => write!(f, "Sink({tag})"),
            None => f.write_str("Sink(any)"),
        }
    }
}
