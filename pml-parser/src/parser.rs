use crate::error::{ParseError, Result};
use crate::model::{ParameterizedIdentifier, PipelineSpecification};
use crate::options::ParseOptions;
use pml_lexer::{Cursor, Token};

/// Recursive-descent parser over one PML document.
///
/// Every non-terminal is a method returning `Result<Option<T>>`: `Ok(None)`
/// means the production did not start here and nothing was consumed beyond
/// trivia; `Err` means it started but a required piece is missing. Optional
/// (`[...]`) and repeated (`{...}`) constructs are the callers' `if let` and
/// `while let` over `Ok(None)`.
///
/// The cursor belongs to this value, so independent parses never share
/// state.
pub struct Parser {
    cursor: Cursor,
    default_filter: ParameterizedIdentifier,
    numeric_parameters: bool,
}

impl Parser {
    /// Creates a parser for `text`. Fails when `options.default_filter` is
    /// not a valid filter expression.
    pub fn new(text: &str, options: &ParseOptions) -> Result<Self> {
        let default_filter = Self::filter_expression(&options.default_filter, options)?;
        Ok(Self::with_filter(text, default_filter, options.numeric_parameters))
    }

    fn with_filter(
        text: &str,
        default_filter: ParameterizedIdentifier,
        numeric_parameters: bool,
    ) -> Self {
        Self {
            cursor: Cursor::new(text),
            default_filter,
            numeric_parameters,
        }
    }

    /// Parses a standalone `pident`, as used for the configured default
    /// filter.
    fn filter_expression(text: &str, options: &ParseOptions) -> Result<ParameterizedIdentifier> {
        let mut parser = Self::with_filter(
            text,
            ParameterizedIdentifier::bare("changed"),
            options.numeric_parameters,
        );
        let filter = parser
            .parameterized_identifier()?
            .ok_or_else(|| parser.error("default_filter", Token::Identifier))?;
        if !parser.cursor.at_end() {
            return Err(parser.error("default_filter", "end of filter"));
        }
        Ok(filter)
    }

    /// `document = {pipeline}`
    ///
    /// Anything left over that does not start a pipeline is an error rather
    /// than a silently shorter result.
    pub fn parse_document(mut self) -> Result<Vec<PipelineSpecification>> {
        let mut specifications = Vec::new();
        while let Some(pipeline) = self.pipeline()? {
            specifications.extend(pipeline);
        }
        if !self.cursor.at_end() {
            return Err(self.error("document", "device identifier"));
        }
        Ok(specifications)
    }

    /// `pipeline = ident input_set [";"]`
    fn pipeline(&mut self) -> Result<Option<Vec<PipelineSpecification>>> {
        let Some(device) = self.identifier() else {
            return Ok(None);
        };
        let specifications = self.input_set(&device)?;
        self.cursor.consume_char(';');
        Ok(Some(specifications))
    }

    /// `input_set = input {"," input}`
    fn input_set(&mut self, device: &str) -> Result<Vec<PipelineSpecification>> {
        let mut specifications = self
            .input(device)?
            .ok_or_else(|| self.error("input_set", "'.'"))?;

        loop {
            let checkpoint = self.cursor.checkpoint();
            if !self.cursor.consume_char(',') || !self.cursor.looking_at_char('.') {
                self.cursor.restore(checkpoint);
                break;
            }
            match self.input(device)? {
                Some(more) => specifications.extend(more),
                None => return Err(self.error("input_set", "'.'")),
            }
        }
        Ok(specifications)
    }

    /// `input = "." ident process_set`
    fn input(&mut self, device: &str) -> Result<Option<Vec<PipelineSpecification>>> {
        if !self.cursor.consume_char('.') {
            return Ok(None);
        }
        let input = self
            .identifier()
            .ok_or_else(|| self.error("input", Token::Identifier))?;
        self.process_set(device, &input).map(Some)
    }

    /// `process_set = process {"," process}`
    ///
    /// A process without a filter takes the filter of the process before it
    /// in the same set; the first one falls back to the default filter.
    fn process_set(&mut self, device: &str, input: &str) -> Result<Vec<PipelineSpecification>> {
        let mut inherited = self.default_filter.clone();
        let mut specifications = Vec::new();

        let first = self
            .process(device, input, &inherited)?
            .ok_or_else(|| self.error("process_set", Token::DoubleColon))?;
        inherited = first.filter().clone();
        specifications.push(first);

        loop {
            let checkpoint = self.cursor.checkpoint();
            if !self.cursor.consume_char(',') || !self.cursor.looking_at(&Token::DoubleColon) {
                self.cursor.restore(checkpoint);
                break;
            }
            let next = self
                .process(device, input, &inherited)?
                .ok_or_else(|| self.error("process_set", Token::DoubleColon))?;
            inherited = next.filter().clone();
            specifications.push(next);
        }
        Ok(specifications)
    }

    /// `process = "::" [pident] sequence`
    fn process(
        &mut self,
        device: &str,
        input: &str,
        inherited: &ParameterizedIdentifier,
    ) -> Result<Option<PipelineSpecification>> {
        if self.cursor.consume_pattern(&Token::DoubleColon).is_none() {
            return Ok(None);
        }
        let filter = match self.parameterized_identifier()? {
            Some(filter) => filter,
            None => inherited.clone(),
        };
        let (stages, callback) = self
            .sequence()?
            .ok_or_else(|| self.error("process", "'|->' or '|->|'"))?;

        Ok(Some(PipelineSpecification::new(
            device, input, filter, stages, callback,
        )))
    }

    /// ```text
    /// sequence = "|->|" ident
    ///          | stage {chained} callback
    /// ```
    ///
    /// `|->|` and `|->` share a prefix, as do `->|` and `->`; the longest
    /// operator wins.
    fn sequence(&mut self) -> Result<Option<(Vec<ParameterizedIdentifier>, String)>> {
        let Some((operator, _)) = self
            .cursor
            .consume_longest(&[Token::Identity, Token::StageBegin])
        else {
            return Ok(None);
        };

        if operator == Token::Identity {
            let callback = self
                .identifier()
                .ok_or_else(|| self.error("identity_callback", Token::Identifier))?;
            return Ok(Some((Vec::new(), callback)));
        }

        let mut stages = vec![self.stage()?];
        loop {
            let next = self.cursor.consume_longest(&[
                Token::CallbackEnd,
                Token::Chain,
                Token::StageBegin,
            ]);
            match next {
                Some((Token::CallbackEnd, _)) => {
                    let callback = self
                        .identifier()
                        .ok_or_else(|| self.error("pipeline_callback", Token::Identifier))?;
                    return Ok(Some((stages, callback)));
                }
                Some(_) => stages.push(self.stage()?),
                None => return Err(self.error("pipeline_callback", Token::CallbackEnd)),
            }
        }
    }

    /// The `pident` after a stage operator.
    fn stage(&mut self) -> Result<ParameterizedIdentifier> {
        self.parameterized_identifier()?
            .ok_or_else(|| self.error("stage", Token::Identifier))
    }

    /// `pident = ident [param_set]`
    fn parameterized_identifier(&mut self) -> Result<Option<ParameterizedIdentifier>> {
        let Some(name) = self.identifier() else {
            return Ok(None);
        };
        let parameters = self.parameter_set()?.unwrap_or_default();
        Ok(Some(ParameterizedIdentifier::new(name, parameters)))
    }

    /// `param_set = "(" param {"," param} ")"`
    fn parameter_set(&mut self) -> Result<Option<Vec<String>>> {
        if !self.cursor.consume_char('(') {
            return Ok(None);
        }
        let mut parameters = vec![self.parameter()?];
        while self.cursor.consume_char(',') {
            parameters.push(self.parameter()?);
        }
        if !self.cursor.consume_char(')') {
            return Err(self.error("parameter_set", "')'"));
        }
        Ok(Some(parameters))
    }

    fn parameter(&mut self) -> Result<String> {
        let token = if self.numeric_parameters {
            Token::Parameter
        } else {
            Token::Identifier
        };
        self.cursor
            .consume_pattern(&token)
            .map(String::from)
            .ok_or_else(|| self.error("parameter_set", token))
    }

    fn identifier(&mut self) -> Option<String> {
        self.cursor
            .consume_pattern(&Token::Identifier)
            .map(String::from)
    }

    /// An error at the next non-trivia character.
    fn error(&mut self, production: &str, expected: impl ToString) -> ParseError {
        self.cursor.skip_trivia();
        ParseError::at(
            self.cursor.source(),
            self.cursor.offset(),
            production,
            expected,
        )
    }
}
