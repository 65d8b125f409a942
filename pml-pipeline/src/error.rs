//! Errors raised while building and running pipelines.
//!
//! - [`TypeMismatch`]: a stage was appended whose input type differs from
//!   what the chain produces.
//! - [`PipelineError`]: a value of the wrong type reached a pipeline, stage
//!   or sink at run time.
//! - [`RegistryError`]: a key was rejected or not found.
//! - [`BindError`]: a parsed specification could not be turned into a
//!   running binding. Unresolved names arrive as
//!   [`RegistryError::UnknownKey`], unchanged.

use crate::erased::TypeTag;
use thiserror::Error;

/// Appending a stage whose input type does not match the chain's output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stage '{stage}' takes {found}, but the chain before it produces {expected}")]
pub struct TypeMismatch {
    /// Name of the rejected stage.
    pub stage: String,
    /// Output type of the chain so far.
    pub expected: TypeTag,
    /// Input type of the rejected stage.
    pub found: TypeTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("pipeline takes {expected}, got {found}")]
    InputType { expected: TypeTag, found: TypeTag },

    #[error("pipeline produces {found}, requested {expected}")]
    OutputType { expected: TypeTag, found: TypeTag },

    #[error("stage '{stage}' takes {expected}, got {found}")]
    StageInput {
        stage: String,
        expected: TypeTag,
        found: TypeTag,
    },

    #[error("sink takes {expected}, got {found}")]
    SinkInput { expected: TypeTag, found: TypeTag },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("empty key")]
    EmptyKey,

    #[error("key '{key}' contains {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),

    #[error("unknown {kind} '{key}'")]
    UnknownKey { kind: &'static str, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("invalid parameters for '{name}': {reason}")]
    InvalidParameters { name: String, reason: String },

    #[error("callback '{callback}' takes {expected}, but the pipeline produces {found}")]
    CallbackType {
        callback: String,
        expected: TypeTag,
        found: TypeTag,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Type(#[from] TypeMismatch),
}

impl BindError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        BindError::InvalidParameters {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
