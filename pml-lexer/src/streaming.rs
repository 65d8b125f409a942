use crate::cursor::Cursor;

/// Accumulates PML text line by line until a complete document is ready.
///
/// Comments and whitespace are kept verbatim; they are trivia to the cursor,
/// so line and column numbers in parse errors still refer to the lines as
/// they were fed in.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    text: String,
    lines: usize,
}

impl LineBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line. A trailing `\n` or `\r\n` is normalised to `\n`.
    pub fn push_line(&mut self, line: &str) {
        self.text
            .push_str(line.trim_end_matches('\n').trim_end_matches('\r'));
        self.text.push('\n');
        self.lines += 1;
    }

    /// Number of lines fed since the last [`take`](Self::take).
    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// Returns a cursor over the text accumulated so far.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.text.as_str())
    }

    /// Hands out the accumulated text and leaves the buffer empty.
    pub fn take(&mut self) -> String {
        self.lines = 0;
        std::mem::take(&mut self.text)
    }
}

impl From<&str> for LineBuffer {
    fn from(value: &str) -> Self {
        let mut buffer = Self::new();
        for line in value.lines() {
            buffer.push_line(line);
        }
        buffer
    }
}
