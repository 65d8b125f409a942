//! Typed processing pipelines, and the runtime that binds parsed PML
//! specifications to them.
//!
//! [`Pipeline`] is the compile-time form: a chain whose stage types are
//! checked by the compiler. [`DynPipeline`] is the form used when stages are
//! looked up by name: each [`ErasedStage`] carries [`TypeTag`]s and the chain
//! is checked as it is appended to.
//!
//! The rest of the crate is what a PML document is bound against:
//! [`InputGroup`]s of [`Input`]s, [`StageRegistry`] and [`FilterRegistry`]
//! catalogues, [`Sink`]s for callbacks, a [`Binder`] that resolves each
//! [`PipelineSpecification`](pml_parser::PipelineSpecification), and a
//! [`Poller`] that runs the results.

pub mod binder;
pub mod erased;
pub mod error;
pub mod filters;
pub mod input;
pub mod pipeline;
pub mod poller;
pub mod registry;
pub mod sink;
pub mod stages;

pub use binder::{Binder, Binding};
pub use erased::{DynPipeline, ErasedStage, TypeTag, Value};
pub use error::{BindError, PipelineError, RegistryError, TypeMismatch};
pub use filters::{Always, Changed, Filter, FilterRegistry, Sometimes};
pub use input::{DeviceRegistry, Input, InputGroup, Sample};
pub use pipeline::{Pipeline, PipelineStage};
pub use poller::Poller;
pub use registry::VerifiedRegistry;
pub use sink::Sink;
pub use stages::StageRegistry;
