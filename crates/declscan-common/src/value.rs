use serde::Serialize;

/// A default-value holder, as produced by the default-value mini-grammar
/// (§4.5).
///
/// `value_available` is the flag the grammar raises the moment any
/// terminal (literal, `array(...)`, a `::`-qualified identifier, a magic
/// constant) is recognized; reaching a terminator (`,` `;` `)`) without it
/// set is a `MissingValue` error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub value_available: bool,
    pub payload: ValuePayload,
}

impl Value {
    pub fn new(payload: ValuePayload) -> Self {
        Self {
            value_available: true,
            payload,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            value_available: false,
            payload: ValuePayload::Null,
        }
    }
}

/// The tagged payload of a parsed default value.
///
/// `Array`'s contents are never populated (§9 open question (a)): the
/// grammar tokenizes `array(...)` / `[...]` to find its closing delimiter
/// but does not evaluate entries, so only presence is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValuePayload {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// An `array(...)` literal; contents are acknowledged but not evaluated.
    Array,
    /// A `::`-qualified identifier or magic constant: present, but this
    /// parser does not evaluate constant expressions (a stated non-goal).
    Unresolved,
}
