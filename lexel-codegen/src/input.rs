use std::fmt;

use proc_macro2::{Ident, Span, TokenStream};

use crate::hir::Hir;

/// Index of a terminal in the graph's input table. Terminals are
/// appended monotonically and never renumbered, not even by `shake`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndsId(pub usize);

impl fmt::Display for EndsId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque callback handle: a path or inline expression captured as
/// tokens and emitted verbatim by codegen. The core never inspects it.
#[derive(Clone, Debug)]
pub struct Callback(pub TokenStream);

/// What reaching this terminal's leaf does at run time.
#[derive(Clone, Debug)]
pub enum InputKind {
    /// Record the unit variant as-is.
    Standalone,
    /// Drop the matched span and keep lexing.
    Skip,
    /// Build the variant's payload from the matched slice.
    Fill(Callback),
    /// Let the callback produce a whole token, or a skip sentinel.
    Create(Callback),
}

/// A user-declared token definition bound to its lowered pattern.
#[derive(Clone, Debug)]
pub struct GraphInput {
    pub token: Ident,
    pub span: Span,
    pub kind: InputKind,
    pub hir: Hir,
    pub priority: usize,
}

impl GraphInput {
    pub fn new(token: Ident, span: Span, kind: InputKind, hir: Hir) -> Self {
        let priority = hir.priority();

        GraphInput {
            token,
            span,
            kind,
            hir,
            priority,
        }
    }

    /// Override the pattern-derived priority with an explicit one.
    pub fn priority(mut self, priority: Option<usize>) -> Self {
        if let Some(priority) = priority {
            self.priority = priority;
        }

        self
    }
}
