//! Class/interface declarations, type bodies, callables, parameter
//! lists, and the callable-body dependency scan (§4.5).

use declscan_common::{LineSpan, Modifiers, ParseError, Token, TokenKind, Tokenizer};

use crate::annotations;
use crate::builder::Builder;
use crate::resolve;

use super::Parser;

impl<T: Tokenizer, B: Builder> Parser<T, B> {
    pub(super) fn parse_interface_declaration(&mut self) -> Result<(), ParseError> {
        let doc = self.state.doc_comment.take();
        let mut sink = Vec::new();
        let start_line = self.cursor.consume(TokenKind::Interface, &mut sink)?.start_line;
        let local = self.cursor.consume(TokenKind::String, &mut sink)?.image;
        let fqn = resolve::create_qualified_type_name(
            &local,
            self.state.namespace_name.as_deref(),
            &self.state.package_name,
        );
        let type_id = self.builder.build_interface(&fqn);
        self.builder.set_type_doc_comment(type_id, doc.as_deref());
        self.builder.set_type_source_file(type_id, &self.source_file);

        if self.cursor.peek() == TokenKind::Extends {
            self.cursor.consume(TokenKind::Extends, &mut sink)?;
            self.parse_interface_reference_list(type_id, &mut sink)?;
        }

        self.cursor.consume(TokenKind::CurlyOpen, &mut sink)?;
        self.parse_type_body(type_id, true, start_line, sink)?;
        self.attach_type_to_package(type_id);
        self.state.reset(Modifiers::empty());
        Ok(())
    }

    pub(super) fn parse_class_declaration(&mut self) -> Result<(), ParseError> {
        let doc = self.state.doc_comment.take();
        let mut sink = Vec::new();
        let mut modifiers = Modifiers::empty();
        let mut start_line = None;

        loop {
            match self.cursor.peek() {
                TokenKind::Abstract => {
                    let t = self.cursor.consume(TokenKind::Abstract, &mut sink)?;
                    modifiers.set_explicit_abstract();
                    start_line.get_or_insert(t.start_line);
                }
                TokenKind::Final => {
                    let t = self.cursor.consume(TokenKind::Final, &mut sink)?;
                    modifiers.set_final();
                    start_line.get_or_insert(t.start_line);
                }
                _ => break,
            }
        }

        let class_tok = self.cursor.consume(TokenKind::Class, &mut sink)?;
        let start_line = start_line.unwrap_or(class_tok.start_line);
        let local = self.cursor.consume(TokenKind::String, &mut sink)?.image;
        let fqn = resolve::create_qualified_type_name(
            &local,
            self.state.namespace_name.as_deref(),
            &self.state.package_name,
        );
        let type_id = self.builder.build_class(&fqn);
        self.builder.set_type_doc_comment(type_id, doc.as_deref());
        self.builder.set_type_source_file(type_id, &self.source_file);
        self.builder.set_type_modifiers(type_id, modifiers);
        self.builder.set_user_defined(type_id, true);

        if self.cursor.peek() == TokenKind::Extends {
            self.cursor.consume(TokenKind::Extends, &mut sink)?;
            let raw = resolve::parse_qualified_name_raw(
                &mut self.cursor,
                self.state.namespace_name.as_deref().unwrap_or(""),
                &mut sink,
            )?;
            let parent_fqn =
                resolve::resolve_qualified_name(&raw, self.state.namespace_name.as_deref(), &self.symbols);
            let parent_ref = self.builder.build_class_reference(&parent_fqn);
            self.builder.set_parent_class_reference(type_id, parent_ref);
        }

        if self.cursor.peek() == TokenKind::Implements {
            self.cursor.consume(TokenKind::Implements, &mut sink)?;
            self.parse_interface_reference_list(type_id, &mut sink)?;
        }

        self.cursor.consume(TokenKind::CurlyOpen, &mut sink)?;
        self.parse_type_body(type_id, false, start_line, sink)?;
        self.attach_type_to_package(type_id);
        self.state.reset(Modifiers::empty());
        Ok(())
    }

    /// Shared by an interface's `extends` list and a class's `implements`
    /// list: comma-separated qualified names, each recorded as an
    /// interface reference, until a non-`,` token (the body's `{`) is hit.
    fn parse_interface_reference_list(
        &mut self,
        type_id: B::TypeId,
        sink: &mut Vec<Token>,
    ) -> Result<(), ParseError> {
        loop {
            let raw = resolve::parse_qualified_name_raw(
                &mut self.cursor,
                self.state.namespace_name.as_deref().unwrap_or(""),
                sink,
            )?;
            let fqn =
                resolve::resolve_qualified_name(&raw, self.state.namespace_name.as_deref(), &self.symbols);
            let iface_ref = self.builder.build_interface_reference(&fqn);
            self.builder.add_interface_reference(type_id, iface_ref);
            if self.cursor.peek() == TokenKind::Comma {
                self.cursor.consume(TokenKind::Comma, sink)?;
                continue;
            }
            break;
        }
        Ok(())
    }

    fn parse_type_body(
        &mut self,
        type_id: B::TypeId,
        is_interface: bool,
        start_line: u32,
        mut sink: Vec<Token>,
    ) -> Result<(), ParseError> {
        let body_default = |is_interface: bool| {
            if is_interface {
                Modifiers::interface_body_default()
            } else {
                Modifiers::class_body_default()
            }
        };
        let mut modifiers = body_default(is_interface);

        loop {
            match self.cursor.peek() {
                TokenKind::Function => {
                    self.parse_method(type_id, modifiers, &mut sink)?;
                    modifiers = body_default(is_interface);
                }
                TokenKind::Variable => {
                    self.parse_property(type_id, modifiers, &mut sink)?;
                }
                TokenKind::Const => {
                    self.parse_constant(type_id, &mut sink)?;
                }
                TokenKind::Public => {
                    self.cursor.advance(&mut sink);
                    modifiers.set_public();
                }
                TokenKind::Protected => {
                    self.cursor.advance(&mut sink);
                    modifiers.set_protected();
                }
                TokenKind::Private => {
                    self.cursor.advance(&mut sink);
                    modifiers.set_private();
                }
                TokenKind::Static => {
                    self.cursor.advance(&mut sink);
                    modifiers.set_static();
                }
                TokenKind::Abstract => {
                    self.cursor.advance(&mut sink);
                    modifiers.set_explicit_abstract();
                }
                TokenKind::Final => {
                    self.cursor.advance(&mut sink);
                    modifiers.set_final();
                }
                TokenKind::DocComment => {
                    let t = self.cursor.consume(TokenKind::DocComment, &mut sink)?;
                    self.state.doc_comment = Some(t.image);
                }
                TokenKind::Comment => {
                    self.cursor.consume(TokenKind::Comment, &mut sink)?;
                }
                TokenKind::CurlyClose => {
                    let t = self.cursor.consume(TokenKind::CurlyClose, &mut sink)?;
                    self.builder.set_type_span(type_id, LineSpan::new(start_line, t.start_line));
                    self.builder.set_type_tokens(type_id, sink);
                    return Ok(());
                }
                TokenKind::Eof => {
                    return Err(ParseError::token_stream_end("type body", LineSpan::single(start_line)));
                }
                _ => {
                    self.cursor.advance(&mut sink);
                    modifiers = body_default(is_interface);
                }
            }
        }
    }

    fn parse_property(
        &mut self,
        type_id: B::TypeId,
        modifiers: Modifiers,
        sink: &mut Vec<Token>,
    ) -> Result<(), ParseError> {
        let doc = self.state.doc_comment.take();
        let var_tok = self.cursor.consume(TokenKind::Variable, sink)?;
        let prop_id = self.builder.build_property(&var_tok.image);
        self.builder.set_property_doc_comment(prop_id, doc.as_deref());
        self.builder.set_property_span(prop_id, LineSpan::single(var_tok.start_line));
        self.builder.set_property_source_file(prop_id, &self.source_file);
        self.builder.set_property_modifiers(prop_id, modifiers);
        if !self.ignore_annotations {
            if let Some(doc) = &doc {
                if let Some(ty) = annotations::var_type(doc) {
                    let r = self.builder.build_class_or_interface_reference(&ty);
                    self.builder.set_property_reference(prop_id, r);
                }
            }
        }
        self.builder.add_property(type_id, prop_id);
        Ok(())
    }

    fn parse_constant(&mut self, type_id: B::TypeId, sink: &mut Vec<Token>) -> Result<(), ParseError> {
        let doc = self.state.doc_comment.take();
        let const_tok = self.cursor.consume(TokenKind::Const, sink)?;
        self.cursor.consume(TokenKind::String, sink)?;
        let const_id = self.builder.build_type_constant(&const_tok.image);
        self.builder.set_constant_doc_comment(const_id, doc.as_deref());
        self.builder.set_constant_source_file(const_id, &self.source_file);
        self.cursor.consume(TokenKind::Equal, sink)?;
        super::value::parse_default_value(&mut self.cursor, sink)?;
        self.builder.set_constant_span(const_id, LineSpan::single(const_tok.start_line));
        self.builder.add_constant(type_id, const_id);
        // A trailing `;` ends the statement; a `,` would start another
        // declarator in the same `const` list, which this grammar does
        // not special-case (§9) — it is left for the body loop's
        // catch-all to consume token by token.
        if matches!(self.cursor.peek(), TokenKind::Comma | TokenKind::Semicolon) {
            self.cursor.advance(sink);
        }
        Ok(())
    }

    fn parse_method(
        &mut self,
        type_id: B::TypeId,
        modifiers: Modifiers,
        sink: &mut Vec<Token>,
    ) -> Result<(), ParseError> {
        let doc = self.state.doc_comment.take();
        let fn_tok = self.cursor.consume(TokenKind::Function, sink)?;
        let start_line = fn_tok.start_line;
        self.cursor.consume_comments(sink);
        let by_ref = self.consume_optional_amp(sink)?;
        let name = self.cursor.consume(TokenKind::String, sink)?.image;

        let callable_id = self.builder.build_method(&name);
        self.builder.set_callable_doc_comment(callable_id, doc.as_deref());
        self.builder.set_callable_modifiers(callable_id, modifiers);
        self.builder.set_callable_source_file(callable_id, &self.source_file);
        self.builder.set_returns_by_reference(callable_id, by_ref);

        self.parse_parameter_list(callable_id, sink)?;
        let end_line = self.parse_callable_body_or_semicolon(sink, start_line, callable_id)?;
        self.builder.set_callable_span(callable_id, LineSpan::new(start_line, end_line));
        self.builder.set_callable_tokens(callable_id, sink.clone());
        self.finalize_callable_annotations(callable_id, doc.as_deref());
        self.builder.add_method(type_id, callable_id);
        Ok(())
    }

    /// Top-level (or nested, recursed into from a body scan) named
    /// function or anonymous closure (§4.5 "Function-or-closure").
    pub(super) fn parse_function_or_closure_top_level(&mut self) -> Result<(), ParseError> {
        let doc = self.state.doc_comment.take();
        let mut sink = Vec::new();
        let fn_tok = self.cursor.consume(TokenKind::Function, &mut sink)?;
        let start_line = fn_tok.start_line;
        self.cursor.consume_comments(&mut sink);

        if self.cursor.peek() == TokenKind::ParenOpen {
            let callable_id = self.builder.build_closure();
            self.builder.set_callable_doc_comment(callable_id, doc.as_deref());
            self.builder.set_callable_source_file(callable_id, &self.source_file);
            self.parse_parameter_list(callable_id, &mut sink)?;
            self.parse_optional_use_bindings(callable_id, &mut sink)?;
            let end_line =
                self.parse_callable_body_or_semicolon(&mut sink, start_line, callable_id)?;
            self.builder.set_callable_span(callable_id, LineSpan::new(start_line, end_line));
            self.builder.set_callable_tokens(callable_id, sink);
            self.finalize_callable_annotations(callable_id, doc.as_deref());
        } else {
            let by_ref = self.consume_optional_amp(&mut sink)?;
            let name = self.cursor.consume(TokenKind::String, &mut sink)?.image;
            let callable_id = self.builder.build_function(&name);
            self.builder.set_callable_doc_comment(callable_id, doc.as_deref());
            self.builder.set_callable_source_file(callable_id, &self.source_file);
            self.builder.set_returns_by_reference(callable_id, by_ref);
            self.parse_parameter_list(callable_id, &mut sink)?;
            let end_line =
                self.parse_callable_body_or_semicolon(&mut sink, start_line, callable_id)?;
            self.builder.set_callable_span(callable_id, LineSpan::new(start_line, end_line));
            self.builder.set_callable_tokens(callable_id, sink);
            self.finalize_callable_annotations(callable_id, doc.as_deref());
            self.attach_function_to_package(callable_id);
        }
        self.state.reset(Modifiers::empty());
        Ok(())
    }

    fn consume_optional_amp(&mut self, sink: &mut Vec<Token>) -> Result<bool, ParseError> {
        if self.cursor.peek() == TokenKind::BitwiseAnd {
            self.cursor.consume(TokenKind::BitwiseAnd, sink)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_optional_use_bindings(
        &mut self,
        callable_id: B::CallableId,
        sink: &mut Vec<Token>,
    ) -> Result<(), ParseError> {
        if self.cursor.peek() != TokenKind::Use {
            return Ok(());
        }
        self.cursor.consume(TokenKind::Use, sink)?;
        self.cursor.consume(TokenKind::ParenOpen, sink)?;
        loop {
            let by_ref = self.consume_optional_amp(sink)?;
            let var_tok = self.cursor.consume(TokenKind::Variable, sink)?;
            self.builder.add_bound_variable(callable_id, &var_tok.image, by_ref);
            if self.cursor.peek() == TokenKind::Comma {
                self.cursor.consume(TokenKind::Comma, sink)?;
                continue;
            }
            break;
        }
        self.cursor.consume(TokenKind::ParenClose, sink)?;
        Ok(())
    }

    fn parse_parameter_list(
        &mut self,
        callable_id: B::CallableId,
        sink: &mut Vec<Token>,
    ) -> Result<(), ParseError> {
        self.cursor.consume(TokenKind::ParenOpen, sink)?;
        let mut entries: Vec<(B::ParameterId, bool)> = Vec::new();
        if self.cursor.peek() != TokenKind::ParenClose {
            loop {
                let entry = self.parse_parameter(callable_id, entries.len(), sink)?;
                entries.push(entry);
                if self.cursor.peek() == TokenKind::Comma {
                    self.cursor.consume(TokenKind::Comma, sink)?;
                    continue;
                }
                break;
            }
        }
        self.cursor.consume(TokenKind::ParenClose, sink)?;

        // Trailing-optional rule (§3, scenario S5): walk from the last
        // parameter backward, a parameter is optional only if every
        // parameter after it has a default too.
        let mut optional = true;
        for (id, has_default) in entries.iter().rev() {
            if !has_default {
                optional = false;
            }
            self.builder.set_parameter_optional(*id, optional);
        }
        Ok(())
    }

    fn parse_parameter(
        &mut self,
        callable_id: B::CallableId,
        position: usize,
        sink: &mut Vec<Token>,
    ) -> Result<(B::ParameterId, bool), ParseError> {
        let mut array_hint = false;
        let mut type_ref = None;

        match self.cursor.peek() {
            TokenKind::Array => {
                self.cursor.consume(TokenKind::Array, sink)?;
                array_hint = true;
            }
            TokenKind::String | TokenKind::Backslash => {
                let raw = resolve::parse_qualified_name_raw(
                    &mut self.cursor,
                    self.state.namespace_name.as_deref().unwrap_or(""),
                    sink,
                )?;
                let fqn = resolve::resolve_qualified_name(
                    &raw,
                    self.state.namespace_name.as_deref(),
                    &self.symbols,
                );
                type_ref = Some(self.builder.build_class_or_interface_reference(&fqn));
            }
            _ => {}
        }

        let by_ref = self.consume_optional_amp(sink)?;
        let var_tok = self.cursor.consume(TokenKind::Variable, sink)?;
        let param_id = self.builder.build_parameter(&var_tok.image);
        self.builder.set_parameter_position(param_id, position);
        self.builder.set_parameter_by_reference(param_id, by_ref);
        self.builder.set_parameter_array_hint(param_id, array_hint);
        if let Some(r) = type_ref {
            self.builder.set_parameter_reference(param_id, r);
        }

        let has_default = if self.cursor.peek() == TokenKind::Equal {
            self.cursor.consume(TokenKind::Equal, sink)?;
            let value = super::value::parse_default_value(&mut self.cursor, sink)?;
            self.builder.set_parameter_default_value(param_id, value);
            true
        } else {
            false
        };

        self.builder.add_parameter(callable_id, param_id);
        Ok((param_id, has_default))
    }

    /// A callable body is either `;` (abstract/interface methods) or a
    /// `{ ... }` block scanned for class/interface dependencies (§4.5
    /// "Callable body"). Returns the end line and the accumulated token
    /// span.
    fn parse_callable_body_or_semicolon(
        &mut self,
        sink: &mut Vec<Token>,
        start_line: u32,
        callable_id: B::CallableId,
    ) -> Result<u32, ParseError> {
        match self.cursor.peek() {
            TokenKind::Semicolon => {
                let t = self.cursor.consume(TokenKind::Semicolon, sink)?;
                Ok(t.start_line)
            }
            TokenKind::CurlyOpen => {
                let mut body_tokens = Vec::new();
                let end_line = self.scan_callable_body(&mut body_tokens, callable_id)?;
                sink.append(&mut body_tokens);
                Ok(end_line)
            }
            TokenKind::Eof => Err(ParseError::token_stream_end(
                "callable body",
                LineSpan::single(start_line),
            )),
            found => Err(ParseError::unexpected_token(
                TokenKind::CurlyOpen,
                found,
                LineSpan::single(start_line),
            )),
        }
    }

    fn scan_callable_body(
        &mut self,
        sink: &mut Vec<Token>,
        callable_id: B::CallableId,
    ) -> Result<u32, ParseError> {
        self.cursor.consume(TokenKind::CurlyOpen, sink)?;
        self.symbols.push_scope();
        let result = self.scan_callable_body_inner(sink, callable_id);
        self.symbols.pop_scope();
        result
    }

    fn scan_callable_body_inner(
        &mut self,
        sink: &mut Vec<Token>,
        callable_id: B::CallableId,
    ) -> Result<u32, ParseError> {
        let mut depth: i32 = 1;
        loop {
            match self.cursor.peek() {
                TokenKind::Eof => {
                    return Err(ParseError::token_stream_end(
                        "callable body",
                        LineSpan::single(1),
                    ));
                }
                TokenKind::CurlyOpen => {
                    depth += 1;
                    self.cursor.advance(sink);
                }
                TokenKind::CurlyClose => {
                    let t = self.cursor.advance(sink);
                    depth -= 1;
                    if depth == 0 {
                        return Ok(t.start_line);
                    }
                }
                TokenKind::Catch => {
                    self.cursor.advance(sink);
                    if self.cursor.peek() == TokenKind::ParenOpen {
                        self.cursor.advance(sink);
                        if matches!(
                            self.cursor.peek(),
                            TokenKind::String | TokenKind::Backslash | TokenKind::Namespace
                        ) {
                            let raw = resolve::parse_qualified_name_raw(
                                &mut self.cursor,
                                self.state.namespace_name.as_deref().unwrap_or(""),
                                sink,
                            )?;
                            let fqn = resolve::resolve_qualified_name(
                                &raw,
                                self.state.namespace_name.as_deref(),
                                &self.symbols,
                            );
                            let r = self.builder.build_class_or_interface_reference(&fqn);
                            self.builder.add_class_or_interface_dependency(callable_id, r);
                        }
                    }
                }
                TokenKind::New => {
                    self.cursor.advance(sink);
                    if matches!(
                        self.cursor.peek(),
                        TokenKind::String | TokenKind::Backslash | TokenKind::Namespace
                    ) {
                        let raw = resolve::parse_qualified_name_raw(
                            &mut self.cursor,
                            self.state.namespace_name.as_deref().unwrap_or(""),
                            sink,
                        )?;
                        let fqn = resolve::resolve_qualified_name(
                            &raw,
                            self.state.namespace_name.as_deref(),
                            &self.symbols,
                        );
                        let r = self.builder.build_class_reference(&fqn);
                        self.builder.add_class_dependency(callable_id, r);
                    }
                }
                TokenKind::Instanceof => {
                    self.cursor.advance(sink);
                    if matches!(
                        self.cursor.peek(),
                        TokenKind::String | TokenKind::Backslash | TokenKind::Namespace
                    ) {
                        let raw = resolve::parse_qualified_name_raw(
                            &mut self.cursor,
                            self.state.namespace_name.as_deref().unwrap_or(""),
                            sink,
                        )?;
                        let fqn = resolve::resolve_qualified_name(
                            &raw,
                            self.state.namespace_name.as_deref(),
                            &self.symbols,
                        );
                        let r = self.builder.build_class_or_interface_reference(&fqn);
                        self.builder.add_class_or_interface_dependency(callable_id, r);
                    }
                }
                TokenKind::String | TokenKind::Backslash | TokenKind::Namespace => {
                    let raw = resolve::parse_qualified_name_raw(
                        &mut self.cursor,
                        self.state.namespace_name.as_deref().unwrap_or(""),
                        sink,
                    )?;
                    let fqn = resolve::resolve_qualified_name(
                        &raw,
                        self.state.namespace_name.as_deref(),
                        &self.symbols,
                    );
                    if self.cursor.peek() == TokenKind::DoubleColon {
                        self.cursor.advance(sink);
                        if matches!(self.cursor.peek(), TokenKind::String | TokenKind::Variable) {
                            self.cursor.advance(sink);
                            let r = self.builder.build_class_or_interface_reference(&fqn);
                            self.builder.add_class_or_interface_dependency(callable_id, r);
                        }
                    }
                }
                TokenKind::DoubleQuote | TokenKind::Backtick => {
                    let opener = self.cursor.peek();
                    self.cursor.advance(sink);
                    loop {
                        match self.cursor.peek() {
                            TokenKind::Eof => {
                                return Err(ParseError::token_stream_end(
                                    "string literal",
                                    LineSpan::single(1),
                                ));
                            }
                            k if k == opener => {
                                self.cursor.advance(sink);
                                break;
                            }
                            _ => {
                                self.cursor.advance(sink);
                            }
                        }
                    }
                }
                TokenKind::Function => {
                    // A nested named function becomes a top-level
                    // declaration in the effective package; a nested
                    // closure is just parsed through (§9 open question
                    // (b)). Either way the recursive call fully consumes
                    // its own `{...}`, so the outer `depth` counter is
                    // untouched.
                    self.parse_function_or_closure_top_level()?;
                }
                TokenKind::DocComment => {
                    let t = self.cursor.advance(sink);
                    self.state.doc_comment = Some(t.image);
                }
                TokenKind::Comment => {
                    let t = self.cursor.advance(sink);
                    if !self.ignore_annotations {
                        if let Some((_, ty)) = annotations::inline_var(&t.image) {
                            if !annotations::is_scalar(&ty) {
                                let r = self.builder.build_class_or_interface_reference(&ty);
                                self.builder.add_class_or_interface_dependency(callable_id, r);
                            }
                        }
                    }
                }
                _ => {
                    self.cursor.advance(sink);
                }
            }
        }
    }

    fn finalize_callable_annotations(&mut self, callable_id: B::CallableId, doc: Option<&str>) {
        if self.ignore_annotations {
            return;
        }
        let Some(doc) = doc else { return };
        for exception in annotations::throws(doc) {
            let r = self.builder.build_class_or_interface_reference(&exception);
            self.builder.add_exception_reference(callable_id, r);
        }
        if let Some(ret) = annotations::return_type(doc) {
            let r = self.builder.build_class_or_interface_reference(&ret);
            self.builder.set_return_reference(callable_id, r);
        }
    }

    fn attach_type_to_package(&mut self, type_id: B::TypeId) {
        let package_name = self.state.effective_package().to_string();
        let package_id = self.builder.build_package(&package_name);
        self.builder.add_type_to_package(package_id, type_id);
    }

    fn attach_function_to_package(&mut self, callable_id: B::CallableId) {
        let package_name = self.state.effective_package().to_string();
        let package_id = self.builder.build_package(&package_name);
        self.builder.add_function_to_package(package_id, callable_id);
    }
}
