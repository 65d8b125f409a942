use pml_common::{Position, SourceExcerpt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A grammar error, located at the first non-trivia character where the
/// expected token was sought (or at end of input).
///
/// Rendered as the message line followed by the offending source line and a
/// caret under the column:
///
/// ```text
/// pipeline_callback: expected '->|' at line 1, column 27
/// this.causes :: an |-> error
///                            ^
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{production}: expected {expected} at line {line}, column {column}\n{source_line}\n{caret}")]
pub struct ParseError {
    /// Grammar production that failed, e.g. `pipeline_callback`.
    pub production: String,
    /// Description of the expected token, e.g. `'->|'`.
    pub expected: String,
    /// 1-based line.
    pub line: usize,
    /// 0-based column, counted in characters.
    pub column: usize,
    /// Byte offset into the source.
    pub offset: usize,
    /// Full text of the offending line.
    pub source_line: String,
    /// Spaces followed by `^` under `column`.
    pub caret: String,
}

impl ParseError {
    /// Builds an error for `production` at byte `offset` of `source`.
    pub fn at(
        source: &str,
        offset: usize,
        production: impl Into<String>,
        expected: impl ToString,
    ) -> Self {
        let excerpt = SourceExcerpt::locate(source, offset);
        Self {
            production: production.into(),
            expected: expected.to_string(),
            line: excerpt.line,
            column: excerpt.column,
            offset: excerpt.offset,
            source_line: excerpt.text,
            caret: excerpt.caret,
        }
    }

    /// The error location as a cursor position (1-based column).
    pub fn position(&self) -> Position {
        Position::at(self.line, self.column + 1, self.offset)
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
