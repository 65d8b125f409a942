use crate::error::Result;
use crate::model::PipelineSpecification;
use crate::options::ParseOptions;
use crate::parse_with;
use pml_lexer::LineBuffer;

/// Feeds a document to the parser one line at a time.
///
/// Lines accumulate in a buffer owned by this value until [`interpret`] is
/// called, which parses everything fed so far and empties the buffer whether
/// or not the parse succeeded.
///
/// [`interpret`]: Interpreter::interpret
#[derive(Debug, Default)]
pub struct Interpreter {
    buffer: LineBuffer,
    options: ParseOptions,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            buffer: LineBuffer::new(),
            options,
        }
    }

    /// Appends one line of PML text.
    pub fn read_next_line(&mut self, line: &str) {
        self.buffer.push_line(line);
    }

    /// Lines waiting to be interpreted.
    pub fn pending_lines(&self) -> usize {
        self.buffer.line_count()
    }

    /// Parses the buffered text and resets the buffer.
    pub fn interpret(&mut self) -> Result<Vec<PipelineSpecification>> {
        let text = self.buffer.take();
        parse_with(&text, &self.options)
    }
}
