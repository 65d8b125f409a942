//! Parser for PML, the pipeline markup language.
//!
//! A PML document binds device inputs to chains of processing stages:
//!
//! ```text
//! # heading, lightly smoothed
//! navx.heading :: sometimes |-> smoothing -> scaling(5,6,7,8) ->| value,
//!              :: always |->| log;
//! ```
//!
//! [`parse`] turns such text into a flat list of [`PipelineSpecification`]s,
//! one per `::` process, or fails with a [`ParseError`] that points at the
//! offending character. [`serialize`] writes a list back out in canonical
//! form.

pub mod error;
#[cfg(feature = "streaming")]
pub mod interpreter;
pub mod model;
pub mod options;
pub mod parser;
pub mod serialize;

pub use error::{ParseError, Result};
#[cfg(feature = "streaming")]
pub use interpreter::Interpreter;
pub use model::{ParameterizedIdentifier, PipelineSpecification};
pub use options::ParseOptions;
pub use parser::Parser;
pub use pml_common::Position;
pub use serialize::serialize;

/// Parses a PML document with default options.
pub fn parse(text: &str) -> Result<Vec<PipelineSpecification>> {
    parse_with(text, &ParseOptions::default())
}

/// Parses a PML document.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Vec<PipelineSpecification>> {
    Parser::new(text, options)?.parse_document()
}
