use std::fmt;

use serde::Serialize;

use crate::span::LineSpan;
use crate::token::TokenKind;

/// A parse error with location information.
///
/// All three kinds are fatal for the current file (§7 of the
/// specification): there is no local retry, the caller must start a new
/// parser on a fresh token stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Where in the file the problem was detected.
    pub span: LineSpan,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: LineSpan) -> Self {
        Self { kind, span }
    }

    pub fn unexpected_token(expected: TokenKind, found: TokenKind, span: LineSpan) -> Self {
        Self::new(ParseErrorKind::UnexpectedToken { expected, found }, span)
    }

    pub fn token_stream_end(while_parsing: impl Into<String>, span: LineSpan) -> Self {
        Self::new(
            ParseErrorKind::TokenStreamEnd {
                while_parsing: while_parsing.into(),
            },
            span,
        )
    }

    pub fn missing_value(span: LineSpan) -> Self {
        Self::new(ParseErrorKind::MissingValue, span)
    }
}

/// The specific kind of parse error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParseErrorKind {
    /// The cursor expected a specific token kind and found a different one.
    UnexpectedToken { expected: TokenKind, found: TokenKind },
    /// The stream ended before an open construct (class/interface/callable
    /// body, default value) was closed.
    TokenStreamEnd { while_parsing: String },
    /// A default-value position reached a terminator without producing a
    /// value.
    MissingValue,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected:?}, found {found:?}")
            }
            Self::TokenStreamEnd { while_parsing } => {
                write!(f, "unexpected end of token stream while parsing {while_parsing}")
            }
            Self::MissingValue => write!(f, "expected a default value but none was produced"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}..{})",
            self.kind, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_token_display() {
        let err = ParseError::unexpected_token(TokenKind::Class, TokenKind::Function, LineSpan::single(4));
        assert_eq!(
            err.to_string(),
            "expected Class, found Function (line 4..4)"
        );
    }

    #[test]
    fn token_stream_end_display() {
        let err = ParseError::token_stream_end("class body", LineSpan::new(1, 10));
        assert_eq!(
            err.to_string(),
            "unexpected end of token stream while parsing class body (line 1..10)"
        );
    }

    #[test]
    fn missing_value_display() {
        let err = ParseError::missing_value(LineSpan::single(7));
        assert_eq!(
            err.to_string(),
            "expected a default value but none was produced (line 7..7)"
        );
    }
}
