//! Annotation Reader (C3): regex-driven extraction of `@package`,
//! `@subpackage`, `@var`, `@return`, `@throws`, and inline
//! `/* @var $x T */` types from doc-comment text.
//!
//! The five regexes are the only string-level parsing in this crate —
//! everything else is token-level (§9 design note). They are precompiled
//! once via `once_cell::sync::Lazy`, the same approach
//! `creative-forest-lang-pt` reaches for when it needs regex-driven
//! free-text scanning alongside its token grammar.
//!
//! Annotations that fail to match simply yield empty results, never
//! errors (§7): a doc comment with no `@package` falls back to
//! [`DEFAULT_PACKAGE`], one with no `@throws` yields an empty vector, and
//! so on.

use once_cell::sync::Lazy;
use regex::Regex;

use declscan_common::DEFAULT_PACKAGE;

static PACKAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@package\s+(\S+)").unwrap());
static SUBPACKAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@subpackage\s+(\S+)").unwrap());
static VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@var\s+(\S+)").unwrap());
static RETURN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@return\s+(\S+)").unwrap());
static THROWS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@throws\s+(\S+)").unwrap());
static INLINE_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/\*\s*@var\s+(\$[A-Za-z_][A-Za-z0-9_]*)\s+([^\s*]+)\s*\*/$").unwrap()
});

/// Scalar type names (case-insensitive) that never produce a
/// class-or-interface reference (§4.3, testable property 4).
const SCALARS: &[&str] = &[
    "bool",
    "boolean",
    "int",
    "integer",
    "float",
    "double",
    "real",
    "string",
    "array",
    "resource",
    "object",
    "mixed",
    "void",
    "null",
    "number",
    "numeric",
    "callback",
    "unknown_type",
];

pub(crate) fn is_scalar(name: &str) -> bool {
    SCALARS.iter().any(|s| s.eq_ignore_ascii_case(name))
}

/// Strip an `array(...)`/`array(Key=>T)` wrapper down to its inner type,
/// if present. Returns the input unchanged otherwise.
fn unwrap_array_form(token: &str) -> &str {
    let lower = token.to_ascii_lowercase();
    if lower.starts_with("array(") && token.ends_with(')') {
        let inner = &token[6..token.len() - 1];
        if let Some(pos) = inner.find("=>") {
            &inner[pos + 2..]
        } else {
            inner
        }
    } else {
        token
    }
}

/// Resolve a `@var`/`@return` type token (possibly a pipe-separated
/// union, possibly an `array(...)` wrapper) to the first non-scalar
/// member, if any.
fn first_non_scalar(token: &str) -> Option<String> {
    let unwrapped = unwrap_array_form(token);
    if unwrapped.is_empty() {
        return None;
    }
    unwrapped
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .find(|s| !is_scalar(s))
        .map(str::to_string)
}

/// Extract the package name from `@package`/`@subpackage` annotations.
/// `X::Y` when both are present, `X` alone, else [`DEFAULT_PACKAGE`].
pub fn package(doc: &str) -> String {
    let Some(pkg) = PACKAGE_RE.captures(doc).map(|c| c[1].to_string()) else {
        return DEFAULT_PACKAGE.to_string();
    };
    match SUBPACKAGE_RE.captures(doc) {
        Some(sub) => format!("{pkg}::{}", &sub[1]),
        None => pkg,
    }
}

/// Extract the first non-scalar type from a `@var` annotation.
pub fn var_type(doc: &str) -> Option<String> {
    VAR_RE.captures(doc).and_then(|c| first_non_scalar(&c[1]))
}

/// Extract the first non-scalar type from a `@return` annotation.
pub fn return_type(doc: &str) -> Option<String> {
    RETURN_RE
        .captures(doc)
        .and_then(|c| first_non_scalar(&c[1]))
}

/// Extract every class name named by a `@throws` annotation, in order of
/// appearance, no scalar filter (§4.3 — any class name is a legitimate
/// exception type).
pub fn throws(doc: &str) -> Vec<String> {
    THROWS_RE
        .captures_iter(doc)
        .map(|c| c[1].to_string())
        .collect()
}

/// Match a whole-line inline `/* @var $name T */` comment. Returns
/// `(variable_name, type)` on match.
pub fn inline_var(comment_text: &str) -> Option<(String, String)> {
    let trimmed = comment_text.trim();
    let caps = INLINE_VAR_RE.captures(trimmed)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
