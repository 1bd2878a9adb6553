//! Parser State (C7): the reset-on-boundary mutable state threaded
//! through the declaration grammar.
//!
//! An explicit state record rather than scattered global mutable fields
//! (§9 design note "global mutable parser state → an explicit state
//! record"). `reset()` is the one state transition the grammar performs
//! at every top-level boundary, class/interface body boundary, and after
//! `use`/namespace declarations (§5).

use declscan_common::{Modifiers, DEFAULT_PACKAGE};

#[derive(Debug, Clone)]
pub struct ParserState {
    /// The most recently read doc comment not yet attached to a
    /// declaration.
    pub doc_comment: Option<String>,
    /// Modifier bitset accumulated since the last reset.
    pub modifiers: Modifiers,
    /// The `@package`/`@subpackage` name currently in effect (legacy
    /// scoping).
    pub package_name: String,
    /// The active namespace, if any. `None` means no `namespace`
    /// declaration has been seen; `Some("")` is the empty-namespace form
    /// (`namespace {}`, §9 open question (c)).
    pub namespace_name: Option<String>,
    /// Set when the most recently resolved name came from a `namespace\`
    /// prefix rather than lexical lookup (§4.4 step 1).
    pub namespace_prefix_replaced: bool,
    /// The file-wide package fallback, set once by the file's leading
    /// doc comment (§3 invariant 4) and restored into `package_name` by
    /// every `reset()`.
    pub global_package_name: String,
}

impl ParserState {
    pub fn new() -> Self {
        Self {
            doc_comment: None,
            modifiers: Modifiers::empty(),
            package_name: DEFAULT_PACKAGE.to_string(),
            namespace_name: None,
            namespace_prefix_replaced: false,
            global_package_name: DEFAULT_PACKAGE.to_string(),
        }
    }

    /// Clear the pending doc comment, reset `@package` to the file
    /// global, and set the modifier accumulator (§4.5).
    pub fn reset(&mut self, modifiers: Modifiers) {
        self.doc_comment = None;
        self.package_name = self.global_package_name.clone();
        self.modifiers = modifiers;
    }

    /// The package a freshly declared top-level function or type should
    /// be attached to: namespace dominates the file `@package`, which
    /// dominates the file-global package (§3, scenarios S1/S2).
    pub fn effective_package(&self) -> &str {
        match &self.namespace_name {
            Some(ns) => ns.as_str(),
            None => self.package_name.as_str(),
        }
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}
