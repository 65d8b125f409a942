use crate::token::TokenPattern;
use pml_common::{Checkpoint, Position, TextSlice};
use std::sync::Arc;

/// A cursor over PML source text.
///
/// The cursor is the only mutable state of a parse. Every `consume_*` method
/// first skips trivia (whitespace and `#` comments), then either matches at
/// the current position and advances past the match, or leaves the cursor
/// where the trivia ended.
#[derive(Debug, Clone)]
pub struct Cursor {
    buffer: Arc<str>,
    current: usize,
    position: Position,
}

impl Cursor {
    /// Creates a new cursor from the input string.
    pub fn new<S: Into<String>>(input: S) -> Self {
        let owned = input.into();
        Self::with_arc(Arc::<str>::from(owned))
    }

    /// Creates a cursor from an existing shared buffer.
    pub fn with_arc(buffer: Arc<str>) -> Self {
        Self {
            buffer,
            current: 0,
            position: Position::new(),
        }
    }

    /// Returns the full source text.
    pub fn source(&self) -> &str {
        &self.buffer
    }

    /// Returns the current position in the source.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the current offset in bytes.
    pub fn offset(&self) -> usize {
        self.current
    }

    /// Returns true if the cursor is at the end of the input.
    pub fn is_eof(&self) -> bool {
        self.current >= self.buffer.len()
    }

    /// Returns true if only trivia remains.
    pub fn at_end(&mut self) -> bool {
        self.skip_trivia();
        self.is_eof()
    }

    /// Returns the next character without advancing the cursor.
    pub fn peek(&self) -> Option<char> {
        self.buffer[self.current..].chars().next()
    }

    /// Advances the cursor by one character.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += ch.len_utf8();
        self.position = self.position.step(ch);
        Some(ch)
    }

    /// Advances until the byte offset `target` is reached.
    fn advance_to(&mut self, target: usize) {
        while self.current < target {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Skips whitespace and `#` comments running to the end of the line.
    ///
    /// Idempotent: calling it twice in a row is the same as calling it once.
    pub fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('#') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Consumes `expected` if it is the next non-trivia character.
    pub fn consume_char(&mut self, expected: char) -> bool {
        if self.looking_at_char(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks whether `expected` is the next non-trivia character without
    /// consuming it.
    pub fn looking_at_char(&mut self, expected: char) -> bool {
        self.skip_trivia();
        self.peek() == Some(expected)
    }

    /// Consumes `pattern` if it matches, anchored at the next non-trivia
    /// character, and returns the matched text.
    pub fn consume_pattern<P>(&mut self, pattern: &P) -> Option<TextSlice>
    where
        P: TokenPattern + ?Sized,
    {
        let len = self.match_at_current(pattern)?;
        Some(self.take(len))
    }

    /// Checks whether `pattern` matches at the next non-trivia character
    /// without consuming it.
    pub fn looking_at<P>(&mut self, pattern: &P) -> bool
    where
        P: TokenPattern + ?Sized,
    {
        self.match_at_current(pattern).is_some()
    }

    /// Tries every candidate and consumes the longest match. Ties go to the
    /// candidate listed first.
    ///
    /// This is how operators that share a prefix (`|->|` and `|->`, `->|`
    /// and `->`) are told apart.
    pub fn consume_longest<P>(&mut self, candidates: &[P]) -> Option<(P, TextSlice)>
    where
        P: TokenPattern + Copy,
    {
        self.skip_trivia();
        let mut best: Option<(P, usize)> = None;
        for candidate in candidates {
            if let Some(len) = self.match_here(candidate) {
                if best.map_or(true, |(_, longest)| len > longest) {
                    best = Some((*candidate, len));
                }
            }
        }
        let (token, len) = best?;
        Some((token, self.take(len)))
    }

    fn match_at_current<P>(&mut self, pattern: &P) -> Option<usize>
    where
        P: TokenPattern + ?Sized,
    {
        self.skip_trivia();
        self.match_here(pattern)
    }

    fn match_here<P>(&self, pattern: &P) -> Option<usize>
    where
        P: TokenPattern + ?Sized,
    {
        if let Some(false) = pattern.quick_check(self.peek()) {
            return None;
        }
        pattern
            .match_len(&self.buffer[self.current..])
            .filter(|len| *len > 0)
    }

    fn take(&mut self, len: usize) -> TextSlice {
        let start = self.current;
        self.advance_to(start + len);
        TextSlice::new(Arc::clone(&self.buffer), start, self.current)
    }

    /// Returns the remaining input from the current position.
    pub fn remaining(&self) -> TextSlice {
        TextSlice::new(Arc::clone(&self.buffer), self.current, self.buffer.len())
    }

    /// Creates a checkpoint that can be restored later.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.current, self.position)
    }

    /// Restores the cursor to a previous checkpoint.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.current = checkpoint.offset();
        self.position = checkpoint.position();
    }
}
