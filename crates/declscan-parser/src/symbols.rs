//! Scoped Symbol Table (C2): a stack of frames mapping short names to
//! fully-qualified names for use-aliases.
//!
//! Two scopes are active during a file (§4.2): the file scope (opened on
//! `parse()` entry, destroyed on exit) and a nested per-callable-body
//! scope (opened at callable body entry, destroyed at close). Real
//! sources only ever declare `use` at file scope, but both levels are
//! retained to keep lookup uniform — a `use` inside a function body must
//! not leak out.

use rustc_hash::FxHashMap;

/// A stack of alias frames, searched top-down on lookup.
#[derive(Debug, Default)]
pub struct ScopedSymbolTable {
    frames: Vec<FxHashMap<String, String>>,
}

impl ScopedSymbolTable {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.frames.pop();
    }

    /// Depth of the scope stack. Exposed for tests asserting push/pop
    /// discipline around callable bodies.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Add `short -> fq` into the top (innermost) frame.
    pub fn add(&mut self, short: impl Into<String>, fq: impl Into<String>) {
        if let Some(top) = self.frames.last_mut() {
            top.insert(short.into(), fq.into());
        }
    }

    /// Search top-down for `short`, returning the first match.
    pub fn lookup(&self, short: &str) -> Option<&str> {
        for frame in self.frames.iter().rev() {
            if let Some(fq) = frame.get(short) {
                return Some(fq.as_str());
            }
        }
        None
    }
}
