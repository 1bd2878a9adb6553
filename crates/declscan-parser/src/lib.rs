//! Recursive-descent declaration parser for a C-style, dynamic,
//! object-oriented scripting language (§1).
//!
//! This crate turns a token stream into calls against an externally
//! provided [`Builder`], which owns the actual semantic model (classes,
//! interfaces, functions, properties, ...). The parser itself holds no
//! model storage — only the bookkeeping needed to drive the grammar: a
//! [`TokenCursor`](cursor::TokenCursor) over the stream, a
//! [`ScopedSymbolTable`](symbols::ScopedSymbolTable) for `use`-aliases,
//! and a [`ParserState`](parser::ParserState) that resets at declaration
//! boundaries.
//!
//! Out of scope (§1): tokenizing source text into [`Token`]s, building or
//! storing the semantic model, file discovery, and any analysis that
//! runs after parsing.

pub mod annotations;
pub mod builder;
pub mod cursor;
pub mod diagnostics;
pub mod parser;
pub mod resolve;
pub mod symbols;

/// A reference [`Builder`] implementation (§4.6) used by this crate's own
/// tests and by integration tests in `tests/`. Shipped as a normal public
/// module rather than behind a `#[cfg(test)]` gate so the latter can see
/// it — `tests/*.rs` files are separate crates that only see the public
/// API.
pub mod testutil;

pub use builder::Builder;
pub use parser::{Parser, ParserState};

pub use declscan_common::{
    LineSpan, Modifiers, ParseError, ParseErrorKind, Token, TokenKind, Tokenizer, Value,
    ValuePayload, DEFAULT_PACKAGE, NAMESPACE_SEPARATOR, PACKAGE_SEPARATOR,
};
