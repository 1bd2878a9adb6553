//! Name Resolver (C4): converts a raw name fragment sequence into a
//! qualified name using the current namespace, alias map, and
//! leading-separator rules (§4.4).

use declscan_common::{ParseError, Token, TokenKind, Tokenizer, NAMESPACE_SEPARATOR, PACKAGE_SEPARATOR};

use crate::cursor::TokenCursor;
use crate::symbols::ScopedSymbolTable;

/// Raw fragments collected from the token stream, plus whether a
/// `namespace\` prefix produced the leading fragment (§4.4 step 1).
pub struct RawName {
    pub fragments: Vec<String>,
    pub namespace_prefix_replaced: bool,
}

impl RawName {
    fn concat(&self) -> String {
        self.fragments.concat()
    }
}

/// Collect a raw qualified-name fragment sequence from the cursor
/// (§4.4 step 1).
///
/// - A leading `\` marks the name fully qualified: pushed as a literal
///   `"\\"` fragment so step 2 can detect it positionally.
/// - A leading `namespace` keyword emits the current namespace as a
///   single pre-fragment and sets `namespace_prefix_replaced`.
/// - Thereafter, `Backslash String` pairs are consumed, each appending
///   the separator and the identifier as separate fragments.
pub fn parse_qualified_name_raw<T: Tokenizer>(
    cursor: &mut TokenCursor<T>,
    current_namespace: &str,
    sink: &mut Vec<Token>,
) -> Result<RawName, ParseError> {
    let mut fragments = Vec::new();
    let mut namespace_prefix_replaced = false;

    match cursor.peek() {
        TokenKind::Backslash => {
            cursor.consume(TokenKind::Backslash, sink)?;
            fragments.push(NAMESPACE_SEPARATOR.to_string());
        }
        TokenKind::Namespace => {
            cursor.consume(TokenKind::Namespace, sink)?;
            fragments.push(current_namespace.to_string());
            namespace_prefix_replaced = true;
        }
        _ => {}
    }

    if cursor.peek() == TokenKind::String {
        let first = cursor.consume(TokenKind::String, sink)?;
        fragments.push(first.image);
    }

    while cursor.peek() == TokenKind::Backslash {
        cursor.consume(TokenKind::Backslash, sink)?;
        fragments.push(NAMESPACE_SEPARATOR.to_string());
        let ident = cursor.consume(TokenKind::String, sink)?;
        fragments.push(ident.image);
    }

    Ok(RawName {
        fragments,
        namespace_prefix_replaced,
    })
}

/// Resolve a collected [`RawName`] into an absolute qualified name
/// (§4.4 step 2, §3 invariant 3).
pub fn resolve_qualified_name(
    raw: &RawName,
    current_namespace: Option<&str>,
    symbols: &ScopedSymbolTable,
) -> String {
    if raw.fragments.is_empty() {
        return String::new();
    }
    if raw.fragments[0] == NAMESPACE_SEPARATOR {
        return raw.concat();
    }
    if let Some(fq) = symbols.lookup(&raw.fragments[0]) {
        let mut fragments = raw.fragments.clone();
        fragments[0] = fq.to_string();
        return fragments.concat();
    }
    if let Some(ns) = current_namespace {
        if !raw.namespace_prefix_replaced {
            return format!("{ns}{NAMESPACE_SEPARATOR}{}", raw.concat());
        }
    }
    raw.concat()
}

/// Build the qualified name for a declaration site (`_createQualifiedTypeName`,
/// §4.4): prefixed with the active namespace when one is set, otherwise
/// with the legacy `@package` separator.
pub fn create_qualified_type_name(local: &str, namespace: Option<&str>, current_package: &str) -> String {
    match namespace {
        Some(ns) => format!("{ns}{NAMESPACE_SEPARATOR}{local}"),
        None => format!("{current_package}{PACKAGE_SEPARATOR}{local}"),
    }
}
