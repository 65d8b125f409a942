use crate::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The source line around a byte offset, with a caret under the column.
///
/// Line numbers are 1-based, columns 0-based and counted in characters.
/// Works for input without any newline and for offsets at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceExcerpt {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    /// Full text of the line, without its terminator.
    pub text: String,
    /// Whitespace followed by `^`, aligned under `column`.
    pub caret: String,
}

impl SourceExcerpt {
    /// Locates `offset` in `source`. Offsets past the end are clamped to the
    /// end; offsets inside a multi-byte character snap back to its start.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[offset..]
            .find('\n')
            .map_or(source.len(), |i| offset + i);
        let line = source[..line_start].bytes().filter(|b| *b == b'\n').count() + 1;

        let prefix = &source[line_start..offset];
        let column = prefix.chars().count();
        // Tabs are kept so the caret lines up however the terminal renders them.
        let mut caret: String = prefix
            .chars()
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        caret.push('^');

        Self {
            line,
            column,
            offset,
            text: source[line_start..line_end]
                .trim_end_matches('\r')
                .to_string(),
            caret,
        }
    }

    /// The excerpt's location as a cursor-style position (1-based column).
    pub fn position(&self) -> Position {
        Position::at(self.line, self.column + 1, self.offset)
    }
}

impl fmt::Display for SourceExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.text, self.caret)
    }
}
