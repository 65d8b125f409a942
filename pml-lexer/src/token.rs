use std::fmt;

/// Something the cursor can match anchored at its current position.
pub trait TokenPattern {
    /// Returns the length in bytes of the match at the start of `input`, or
    /// `None` if the pattern does not match there. Must not search ahead.
    fn match_len(&self, input: &str) -> Option<usize>;

    /// Quick check: returns whether this pattern might match based on the
    /// first character.
    ///
    /// - `Some(true)`  - The pattern might match
    /// - `Some(false)` - The pattern definitely won't match
    /// - `None`        - Unknown, run `match_len`
    #[inline]
    fn quick_check(&self, first_char: Option<char>) -> Option<bool> {
        let _ = first_char;
        None
    }
}

impl TokenPattern for char {
    fn match_len(&self, input: &str) -> Option<usize> {
        input.starts_with(*self).then(|| self.len_utf8())
    }

    fn quick_check(&self, first_char: Option<char>) -> Option<bool> {
        Some(first_char == Some(*self))
    }
}

impl TokenPattern for str {
    fn match_len(&self, input: &str) -> Option<usize> {
        input.starts_with(self).then_some(self.len())
    }
}

/// The multi-character PML tokens. Single-character punctuation
/// (`.` `,` `;` `(` `)`) is matched with plain `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `[A-Za-z0-9_-]+`, never swallowing the `-` that begins `->`.
    Identifier,
    /// An identifier or a signed decimal literal, whichever is longer.
    Parameter,
    /// `|->|`, the identity pipeline.
    Identity,
    /// `|->`, introduces a stage.
    StageBegin,
    /// `->`, introduces a further stage after the first.
    Chain,
    /// `->|`, introduces the callback.
    CallbackEnd,
    /// `::`, introduces a process.
    DoubleColon,
}

impl Token {
    /// The literal text of an operator token, `None` for identifier-like ones.
    pub fn literal(self) -> Option<&'static str> {
        match self {
            Token::Identifier | Token::Parameter => None,
            Token::Identity => Some("|->|"),
            Token::StageBegin => Some("|->"),
            Token::Chain => Some("->"),
            Token::CallbackEnd => Some("->|"),
            Token::DoubleColon => Some("::"),
        }
    }
}

impl TokenPattern for Token {
    fn match_len(&self, input: &str) -> Option<usize> {
        match self {
            Token::Identifier => identifier_len(input),
            Token::Parameter => match (identifier_len(input), decimal_len(input)) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
            literal => literal.literal().and_then(|text| text.match_len(input)),
        }
    }

    fn quick_check(&self, first_char: Option<char>) -> Option<bool> {
        let ch = first_char?;
        Some(match self {
            Token::Identifier => is_identifier_char(ch),
            Token::Parameter => is_identifier_char(ch) || matches!(ch, '+' | '.'),
            Token::Identity | Token::StageBegin => ch == '|',
            Token::Chain | Token::CallbackEnd => ch == '-',
            Token::DoubleColon => ch == ':',
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier => f.write_str("identifier"),
            Token::Parameter => f.write_str("parameter"),
            literal => write!(f, "'{}'", literal.literal().unwrap_or_default()),
        }
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

fn identifier_len(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut len = 0;
    while let Some(&byte) = bytes.get(len) {
        let arrow = byte == b'-' && bytes.get(len + 1) == Some(&b'>');
        if !is_identifier_char(byte as char) || arrow {
            break;
        }
        len += 1;
    }
    (len > 0).then_some(len)
}

/// `[+-]?(digits(.digits)?|.digits)`
fn decimal_len(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(len);
    len += integer;

    let mut fraction = 0;
    if bytes.get(len) == Some(&b'.') {
        fraction = digits_from(len + 1);
        if fraction > 0 {
            len += 1 + fraction;
        }
    }

    (integer + fraction > 0).then_some(len)
}
