use serde::Serialize;

use crate::span::LineSpan;

/// A token produced by the external tokenizer.
///
/// The tokenizer is an out-of-scope collaborator (see the crate's top
/// level documentation): this crate only describes the shape of what it
/// hands over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub image: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, image: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            kind,
            image: image.into(),
            start_line,
            end_line,
        }
    }

    /// Convenience constructor for a token that starts and ends on the same line.
    pub fn on_line(kind: TokenKind, image: impl Into<String>, line: u32) -> Self {
        Self::new(kind, image, line, line)
    }

    pub fn span(&self) -> LineSpan {
        LineSpan::new(self.start_line, self.end_line)
    }
}

/// The closed vocabulary of token kinds the declaration grammar matches on.
///
/// This is deliberately not exhaustive of every token the real tokenizer
/// can emit (string interpolation internals, every operator, every cast
/// keyword); it is exhaustive of every kind the declaration parser itself
/// needs to recognize by name. Anything else arrives as `Other` and is
/// consumed opaquely wherever the grammar says "anything else: consume
/// and continue".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Eof,
    OpenTag,
    Comment,
    DocComment,
    /// A bare identifier fragment (class/function/constant name piece).
    String,
    /// A `$name` variable token; `image` carries the `$`-prefixed text.
    Variable,
    Class,
    Interface,
    Function,
    Abstract,
    Final,
    Static,
    Public,
    Protected,
    Private,
    Const,
    Extends,
    Implements,
    Namespace,
    Use,
    As,
    New,
    Instanceof,
    Catch,
    Array,
    Null,
    True,
    False,
    LNumber,
    DNumber,
    ConstantEncapsedString,
    NumString,
    Plus,
    Minus,
    Equal,
    Comma,
    Semicolon,
    ParenOpen,
    ParenClose,
    CurlyOpen,
    CurlyClose,
    Backslash,
    BitwiseAnd,
    DoubleArrow,
    DoubleColon,
    DoubleQuote,
    Backtick,
    /// `__DIR__`
    MagicDir,
    /// `__FILE__`
    MagicFile,
    /// `__LINE__`
    MagicLine,
    /// `self`
    MagicSelf,
    /// `__NAMESPACE__`
    MagicNsC,
    /// `__FUNCTION__`
    MagicFuncC,
    /// `__CLASS__`
    MagicClassC,
    /// `__METHOD__`
    MagicMethodC,
    /// Any token kind outside the closed set above (operators, casts,
    /// control-flow keywords inside bodies, etc). Carried opaquely.
    Other,
}

impl TokenKind {
    /// Whether this kind is one of the magic constants (`__DIR__`, `self`, ...).
    pub fn is_magic_constant(&self) -> bool {
        matches!(
            self,
            TokenKind::MagicDir
                | TokenKind::MagicFile
                | TokenKind::MagicLine
                | TokenKind::MagicSelf
                | TokenKind::MagicNsC
                | TokenKind::MagicFuncC
                | TokenKind::MagicClassC
                | TokenKind::MagicMethodC
        )
    }
}

/// The tokenizer contract this crate consumes.
///
/// An out-of-scope collaborator: a real implementation turns source bytes
/// into a token stream. This crate only needs four operations from it.
pub trait Tokenizer {
    /// The kind of the next token without consuming it. `TokenKind::Eof`
    /// at end of stream.
    fn peek(&self) -> TokenKind;

    /// The kind of the most recently consumed token. Undefined (kinds may
    /// return `TokenKind::Eof`) before the first call to `next`.
    fn prev(&self) -> TokenKind;

    /// Advance and return the next token. `Eof` is idempotent: calling
    /// `next` again after the stream is exhausted keeps returning an
    /// `Eof` token without erroring.
    fn next(&mut self) -> Token;

    /// The path (or other identifying handle) of the file this stream was
    /// produced from.
    fn source_file(&self) -> &str;
}

/// An in-memory [`Tokenizer`] over a pre-built `Vec<Token>`.
///
/// Ships with this crate purely for tests: it lets a unit test construct
/// a token stream by hand instead of depending on a real lexer crate for
/// every fixture.
pub struct VecTokenizer {
    tokens: Vec<Token>,
    pos: usize,
    prev_kind: TokenKind,
    source_file: String,
}

impl VecTokenizer {
    pub fn new(tokens: Vec<Token>, source_file: impl Into<String>) -> Self {
        Self {
            tokens,
            pos: 0,
            prev_kind: TokenKind::Eof,
            source_file: source_file.into(),
        }
    }

    fn eof_token(&self) -> Token {
        let line = self.tokens.last().map(|t| t.end_line).unwrap_or(1);
        Token::on_line(TokenKind::Eof, "", line)
    }
}

impl Tokenizer for VecTokenizer {
    fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::Eof)
    }

    fn prev(&self) -> TokenKind {
        self.prev_kind.clone()
    }

    fn next(&mut self) -> Token {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| self.eof_token());
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.prev_kind = token.kind.clone();
        token
    }

    fn source_file(&self) -> &str {
        &self.source_file
    }
}
