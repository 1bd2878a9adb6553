//! Token Cursor (C1): a thin adapter over the tokenizer contract.

use declscan_common::{ParseError, Token, TokenKind, Tokenizer};

/// Adapts a [`Tokenizer`] with typed consumption and mismatch errors.
///
/// Tokens are returned in lexer order; `prev`/`peek`/`next` never reorder
/// or rewind (§4.1 ordering guarantee).
pub struct TokenCursor<T: Tokenizer> {
    tokenizer: T,
    last: Option<Token>,
}

impl<T: Tokenizer> TokenCursor<T> {
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            last: None,
        }
    }

    pub fn source_file(&self) -> &str {
        self.tokenizer.source_file()
    }

    /// Next token kind, `Eof` at end.
    pub fn peek(&self) -> TokenKind {
        self.tokenizer.peek()
    }

    /// Kind of the most recently consumed token.
    pub fn prev(&self) -> TokenKind {
        self.tokenizer.prev()
    }

    /// Advance the stream unconditionally.
    pub fn next(&mut self) -> Token {
        let token = self.tokenizer.next();
        self.last = Some(token.clone());
        token
    }

    /// Asserts `peek() == expected`. On success, advances and appends the
    /// token to `sink`. On mismatch, returns `UnexpectedToken`; at end of
    /// stream, `TokenStreamEnd`.
    pub fn consume(
        &mut self,
        expected: TokenKind,
        sink: &mut Vec<Token>,
    ) -> Result<Token, ParseError> {
        let found = self.peek();
        if found == TokenKind::Eof && expected != TokenKind::Eof {
            // Capture a span before consuming so the error points at the
            // last real token rather than a synthetic Eof line.
            let span = self.current_span_hint();
            return Err(ParseError::token_stream_end(
                format!("expecting {expected:?}"),
                span,
            ));
        }
        if found != expected {
            let span = self.current_span_hint();
            return Err(ParseError::unexpected_token(expected, found, span));
        }
        let token = self.tokenizer.next();
        self.last = Some(token.clone());
        sink.push(token.clone());
        Ok(token)
    }

    /// Advance unconditionally, appending the token to `sink`. Used by
    /// the body-scan loops that accept (almost) any token.
    pub fn advance(&mut self, sink: &mut Vec<Token>) -> Token {
        let token = self.next();
        sink.push(token.clone());
        token
    }

    /// Consumes any run of `Comment`/`DocComment` tokens. Returns the
    /// count appended to `sink`.
    pub fn consume_comments(&mut self, sink: &mut Vec<Token>) -> usize {
        let mut count = 0;
        while matches!(self.peek(), TokenKind::Comment | TokenKind::DocComment) {
            let token = self.tokenizer.next();
            self.last = Some(token.clone());
            sink.push(token);
            count += 1;
        }
        count
    }

    /// Best-effort span for diagnostics: the cursor can only name the
    /// *kind* of the next token without consuming it (§4.1), so an error
    /// raised on a mismatch is stamped with the end line of the last
    /// token actually consumed, falling back to line 1 before any token
    /// has been read.
    fn current_span_hint(&self) -> declscan_common::LineSpan {
        match &self.last {
            Some(t) => declscan_common::LineSpan::single(t.end_line),
            None => declscan_common::LineSpan::single(1),
        }
    }
}
