//! The default-value mini-grammar (§4.5 "Default value") and constant
//! declarations, which reuse it.

use declscan_common::{LineSpan, ParseError, Token, TokenKind, Tokenizer, Value, ValuePayload};

use crate::cursor::TokenCursor;

/// Parse a default value up to (but not including) its terminator
/// (`,`, `;`, or `)`). Consumes sign prefixes, literals, `array(...)`
/// (contents acknowledged but not evaluated, §9 open question (a)), and
/// `::`-qualified identifiers / magic constants (recorded as
/// "unresolved present").
///
/// Reaching a terminator without ever raising `value_available` is a
/// `MissingValue` error.
pub fn parse_default_value<T: Tokenizer>(
    cursor: &mut TokenCursor<T>,
    sink: &mut Vec<Token>,
) -> Result<Value, ParseError> {
    let mut value: Option<Value> = None;
    let mut sign: i64 = 1;

    loop {
        match cursor.peek() {
            TokenKind::Comma | TokenKind::Semicolon | TokenKind::ParenClose => break,
            TokenKind::Eof => {
                return Err(ParseError::token_stream_end(
                    "default value",
                    last_span(sink),
                ));
            }
            TokenKind::Plus => {
                cursor.consume(TokenKind::Plus, sink)?;
                sign = 1;
            }
            TokenKind::Minus => {
                cursor.consume(TokenKind::Minus, sink)?;
                sign = -1;
            }
            TokenKind::Null => {
                cursor.consume(TokenKind::Null, sink)?;
                value = Some(Value::new(ValuePayload::Null));
            }
            TokenKind::True => {
                cursor.consume(TokenKind::True, sink)?;
                value = Some(Value::new(ValuePayload::Bool(true)));
            }
            TokenKind::False => {
                cursor.consume(TokenKind::False, sink)?;
                value = Some(Value::new(ValuePayload::Bool(false)));
            }
            TokenKind::LNumber => {
                let t = cursor.consume(TokenKind::LNumber, sink)?;
                let n: i64 = t.image.trim().parse().unwrap_or(0);
                value = Some(Value::new(ValuePayload::Int(n * sign)));
                sign = 1;
            }
            TokenKind::DNumber => {
                let t = cursor.consume(TokenKind::DNumber, sink)?;
                let n: f64 = t.image.trim().parse().unwrap_or(0.0);
                value = Some(Value::new(ValuePayload::Double(n * sign as f64)));
                sign = 1;
            }
            TokenKind::ConstantEncapsedString => {
                let t = cursor.consume(TokenKind::ConstantEncapsedString, sink)?;
                value = Some(Value::new(ValuePayload::String(strip_quotes(&t.image))));
            }
            TokenKind::Array => {
                cursor.consume(TokenKind::Array, sink)?;
                consume_array_contents(cursor, sink)?;
                value = Some(Value::new(ValuePayload::Array));
            }
            TokenKind::DoubleColon => {
                cursor.consume(TokenKind::DoubleColon, sink)?;
                // The member name: identifier or nothing recognizable;
                // consume whatever follows opaquely.
                if !matches!(cursor.peek(), TokenKind::Comma | TokenKind::Semicolon | TokenKind::ParenClose | TokenKind::Eof) {
                    cursor.next();
                }
                value = Some(Value::new(ValuePayload::Unresolved));
            }
            kind if kind.is_magic_constant() => {
                cursor.next();
                value = Some(Value::new(ValuePayload::Unresolved));
            }
            TokenKind::String => {
                // Either a bare constant reference or the left-hand side
                // of a `::`-qualified one; either way this token alone
                // does not terminate the grammar, so fall through to the
                // catch-all below after marking a value present — a bare
                // constant name is still "unresolved present" (the
                // parser does not evaluate constant expressions, a
                // stated non-goal).
                cursor.next();
                value = Some(Value::new(ValuePayload::Unresolved));
            }
            _ => {
                // Anything else: consume and continue (defensive; keeps
                // the grammar total over tokens this mini-grammar was
                // never meant to see).
                cursor.next();
            }
        }
    }

    value.ok_or_else(|| ParseError::missing_value(last_span(sink)))
}

fn last_span(sink: &[Token]) -> LineSpan {
    sink.last().map(|t| t.span()).unwrap_or(LineSpan::single(1))
}

fn strip_quotes(image: &str) -> String {
    let trimmed = image.trim();
    if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

/// Consume `(...)` contents after the `array` keyword, tracking nested
/// parens so a nested array literal's own parens don't prematurely close
/// the outer one. Contents are discarded — only presence is recorded by
/// the caller (§9 open question (a)).
fn consume_array_contents<T: Tokenizer>(
    cursor: &mut TokenCursor<T>,
    sink: &mut Vec<Token>,
) -> Result<(), ParseError> {
    cursor.consume(TokenKind::ParenOpen, sink)?;
    let mut depth = 1u32;
    loop {
        match cursor.peek() {
            TokenKind::Eof => {
                return Err(ParseError::token_stream_end("array(...) literal", last_span(sink)));
            }
            TokenKind::ParenOpen => {
                depth += 1;
                sink.push(cursor.next());
            }
            TokenKind::ParenClose => {
                depth -= 1;
                sink.push(cursor.next());
                if depth == 0 {
                    return Ok(());
                }
            }
            _ => {
                sink.push(cursor.next());
            }
        }
    }
}
