use crate::Position;

/// A saved cursor state.
///
/// The parser takes one before speculative lookahead (for example the token
/// after a `,`) and restores it when the lookahead does not pan out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    offset: usize,
    position: Position,
}

impl Checkpoint {
    /// Creates a new checkpoint with the given byte offset and position.
    pub fn new(offset: usize, position: Position) -> Self {
        Self { offset, position }
    }

    /// Returns the byte offset stored in this checkpoint.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the position stored in this checkpoint.
    pub fn position(&self) -> Position {
        self.position
    }
}
