//! Parser entry point and top-level dispatch (C5, C7).
//!
//! The grammar is driven entirely off [`TokenCursor::peek`]: every
//! production looks at one token kind, decides what it is, and either
//! recurses into a sub-production or falls through to the catch-all
//! "consume and continue" case that keeps the loop total over input the
//! declaration grammar was never meant to model (expression statements,
//! control flow, anything inside a callable body that isn't itself a
//! declaration-relevant shape).

mod items;
mod state;
mod value;

pub use state::ParserState;

use declscan_common::{Modifiers, TokenKind, Tokenizer};

use crate::builder::Builder;
use crate::cursor::TokenCursor;
use crate::symbols::ScopedSymbolTable;

/// Drives the declaration grammar over a token stream, calling into a
/// [`Builder`] to materialise what it finds.
pub struct Parser<T: Tokenizer, B: Builder> {
    pub(crate) cursor: TokenCursor<T>,
    pub(crate) builder: B,
    pub(crate) symbols: ScopedSymbolTable,
    pub(crate) state: ParserState,
    pub(crate) ignore_annotations: bool,
    pub(crate) source_file: String,
}

impl<T: Tokenizer, B: Builder> Parser<T, B> {
    pub fn new(tokenizer: T, builder: B) -> Self {
        let source_file = tokenizer.source_file().to_string();
        Self {
            cursor: TokenCursor::new(tokenizer),
            builder,
            symbols: ScopedSymbolTable::new(),
            state: ParserState::new(),
            ignore_annotations: false,
            source_file,
        }
    }

    /// Suppress `@package`/`@var`/`@return`/`@throws`/inline-`@var`
    /// annotation processing (§6 external interface).
    pub fn set_ignore_annotations(&mut self) {
        self.ignore_annotations = true;
    }

    /// Hand back the builder, e.g. to read out whatever semantic model it
    /// accumulated.
    pub fn into_builder(self) -> B {
        self.builder
    }

    /// Parse the whole token stream (§4.2): push the file scope, dispatch
    /// top-level constructs until `Eof`, pop the file scope.
    pub fn parse(&mut self) -> Result<(), declscan_common::ParseError> {
        self.symbols.push_scope();
        let result = self.parse_top_level();
        self.symbols.pop_scope();
        result
    }

    fn parse_top_level(&mut self) -> Result<(), declscan_common::ParseError> {
        while self.dispatch_one()? {}
        Ok(())
    }

    /// One top-level dispatch step. Returns `Ok(false)` at `Eof`.
    ///
    /// Shared between the true top level and the body of a `namespace { }`
    /// block (§4.5 "Namespace declaration"), which dispatches the same way
    /// but stops at a matching `}` instead of `Eof`.
    pub(crate) fn dispatch_one(&mut self) -> Result<bool, declscan_common::ParseError> {
        match self.cursor.peek() {
            TokenKind::Eof => return Ok(false),
            TokenKind::Comment => {
                let mut sink = Vec::new();
                self.cursor.consume(TokenKind::Comment, &mut sink)?;
            }
            TokenKind::DocComment => self.handle_top_level_doc_comment()?,
            TokenKind::Interface => self.parse_interface_declaration()?,
            TokenKind::Class | TokenKind::Final | TokenKind::Abstract => {
                self.parse_class_declaration()?
            }
            TokenKind::Function => self.parse_function_or_closure_top_level()?,
            TokenKind::Use => self.parse_use_declaration()?,
            TokenKind::Namespace => self.parse_namespace_declaration()?,
            _ => {
                let mut sink = Vec::new();
                self.cursor.advance(&mut sink);
                self.state.reset(Modifiers::empty());
            }
        }
        Ok(true)
    }

    /// A top-level doc comment sets `@package` for whatever follows it and,
    /// when it is the very first thing after the open tag, is also the
    /// file-wide doc comment (§3 invariant 4, scenario S1).
    ///
    /// The file-comment test is `prev() == OpenTag` alone: a doc comment
    /// can immediately precede the declaration it documents (S1's
    /// `<open> /** @package Foo */ function f(){}`) and still be the file
    /// comment, so a lookahead veto on the following keyword would reject
    /// exactly the case the scenario requires. Positional precedence wins.
    fn handle_top_level_doc_comment(&mut self) -> Result<(), declscan_common::ParseError> {
        let preceded_by_open_tag = self.cursor.prev() == TokenKind::OpenTag;
        let mut sink = Vec::new();
        let token = self.cursor.consume(TokenKind::DocComment, &mut sink)?;
        let text = token.image;
        let package = crate::annotations::package(&text);
        self.state.package_name = package.clone();
        self.state.doc_comment = Some(text.clone());
        if preceded_by_open_tag {
            self.state.global_package_name = package;
            self.builder.set_file_doc_comment(&self.source_file, Some(&text));
        }
        Ok(())
    }

    fn parse_use_declaration(&mut self) -> Result<(), declscan_common::ParseError> {
        let mut sink = Vec::new();
        self.cursor.consume(TokenKind::Use, &mut sink)?;
        loop {
            // A `use` target is always an absolute path, never relative to
            // the active namespace (unlike an ordinary qualified-name
            // reference) — so the raw fragments are taken as-is rather than
            // run through `resolve_qualified_name`'s namespace-prepending.
            let raw = crate::resolve::parse_qualified_name_raw(&mut self.cursor, "", &mut sink)?;
            let fq = raw.fragments.concat();
            let alias = if self.cursor.peek() == TokenKind::As {
                self.cursor.consume(TokenKind::As, &mut sink)?;
                self.cursor.consume(TokenKind::String, &mut sink)?.image
            } else {
                last_fragment(&raw.fragments)
            };
            self.symbols.add(alias, fq);
            if self.cursor.peek() == TokenKind::Comma {
                self.cursor.consume(TokenKind::Comma, &mut sink)?;
                continue;
            }
            break;
        }
        self.cursor.consume(TokenKind::Semicolon, &mut sink)?;
        self.state.reset(Modifiers::empty());
        Ok(())
    }

    fn parse_namespace_declaration(&mut self) -> Result<(), declscan_common::ParseError> {
        let mut sink = Vec::new();
        self.cursor.consume(TokenKind::Namespace, &mut sink)?;
        if self.cursor.peek() == TokenKind::CurlyOpen {
            // `namespace { ... }`: the empty-namespace form (§9 open
            // question (c) — treated as package name `""`, distinct from
            // `DEFAULT_PACKAGE`).
            self.state.namespace_name = Some(String::new());
            self.state.namespace_prefix_replaced = false;
            self.builder.build_package("");
            self.cursor.consume(TokenKind::CurlyOpen, &mut sink)?;
            self.parse_namespace_body()?;
        } else {
            let raw = crate::resolve::parse_qualified_name_raw(&mut self.cursor, "", &mut sink)?;
            let name = raw.fragments.concat();
            self.state.namespace_name = Some(name.clone());
            self.state.namespace_prefix_replaced = false;
            self.builder.build_package(&name);
            if self.cursor.peek() == TokenKind::CurlyOpen {
                self.cursor.consume(TokenKind::CurlyOpen, &mut sink)?;
                self.parse_namespace_body()?;
            } else {
                self.cursor.consume(TokenKind::Semicolon, &mut sink)?;
            }
        }
        self.state.reset(Modifiers::empty());
        Ok(())
    }

    fn parse_namespace_body(&mut self) -> Result<(), declscan_common::ParseError> {
        loop {
            match self.cursor.peek() {
                TokenKind::CurlyClose => {
                    let mut sink = Vec::new();
                    self.cursor.consume(TokenKind::CurlyClose, &mut sink)?;
                    return Ok(());
                }
                TokenKind::Eof => {
                    return Err(declscan_common::ParseError::token_stream_end(
                        "namespace block",
                        declscan_common::LineSpan::single(1),
                    ));
                }
                _ => {
                    self.dispatch_one()?;
                }
            }
        }
    }
}

/// The last identifier fragment of a raw name, skipping `\` separators —
/// the implicit alias for an un-aliased `use Foo\Bar;` (§4.5 "Use
/// declaration").
fn last_fragment(fragments: &[String]) -> String {
    fragments
        .iter()
        .rev()
        .find(|f| f.as_str() != declscan_common::NAMESPACE_SEPARATOR)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingBuilder;
    use declscan_common::{Token, TokenKind, VecTokenizer};

    #[test]
    fn last_fragment_skips_separators() {
        assert_eq!(
            last_fragment(&["Y".to_string(), "\\".to_string(), "Z".to_string()]),
            "Z"
        );
    }

    #[test]
    fn last_fragment_empty_is_empty_string() {
        assert_eq!(last_fragment(&[]), "");
    }

    #[test]
    fn empty_namespace_form_uses_empty_string_package() {
        let tokens = vec![
            Token::on_line(TokenKind::OpenTag, "<open>", 1),
            Token::on_line(TokenKind::Namespace, "namespace", 1),
            Token::on_line(TokenKind::CurlyOpen, "{", 1),
            Token::on_line(TokenKind::Function, "function", 2),
            Token::on_line(TokenKind::String, "f", 2),
            Token::on_line(TokenKind::ParenOpen, "(", 2),
            Token::on_line(TokenKind::ParenClose, ")", 2),
            Token::on_line(TokenKind::CurlyOpen, "{", 2),
            Token::on_line(TokenKind::CurlyClose, "}", 2),
            Token::on_line(TokenKind::CurlyClose, "}", 3),
        ];
        let tokenizer = VecTokenizer::new(tokens, "t.src");
        let mut parser = Parser::new(tokenizer, RecordingBuilder::new());
        parser.parse().unwrap();
        let builder = parser.into_builder();
        let pkg = builder.packages.iter().find(|p| p.fqn.is_empty()).expect("empty-string package");
        assert_eq!(pkg.functions.len(), 1);
    }

    #[test]
    fn doc_comment_not_preceded_by_open_tag_is_not_the_file_comment() {
        let tokens = vec![
            Token::on_line(TokenKind::OpenTag, "<open>", 1),
            Token::on_line(TokenKind::Class, "class", 1),
            Token::on_line(TokenKind::String, "A", 1),
            Token::on_line(TokenKind::CurlyOpen, "{", 1),
            Token::on_line(TokenKind::CurlyClose, "}", 1),
            Token::on_line(TokenKind::DocComment, "/** @package Foo */", 2),
            Token::on_line(TokenKind::Function, "function", 3),
            Token::on_line(TokenKind::String, "f", 3),
            Token::on_line(TokenKind::ParenOpen, "(", 3),
            Token::on_line(TokenKind::ParenClose, ")", 3),
            Token::on_line(TokenKind::CurlyOpen, "{", 3),
            Token::on_line(TokenKind::CurlyClose, "}", 3),
        ];
        let tokenizer = VecTokenizer::new(tokens, "t.src");
        let mut parser = Parser::new(tokenizer, RecordingBuilder::new());
        parser.parse().unwrap();
        let builder = parser.into_builder();
        assert!(builder.file_doc_comments.get("t.src").is_none());
        let pkg = builder.packages.iter().find(|p| p.fqn == "Foo").expect("package Foo");
        assert_eq!(pkg.functions.len(), 1);
    }
}
