//! Isolated constraint stores.
use std::collections::VecDeque;

use log::{debug, trace};

use crate::{
    array::SymbolicArray,
    backend::{Backend, ScopeKind, SolverContext},
    error::{Error, Result},
    expr::Expr,
    function::Function,
    model::Assignment,
    sort::Sort,
    symbol::Symbol,
};

/// Optimization objective accepted by [`crate::Session::concretize_with`].
pub enum Objective<B: Backend> {
    Minimize(Expr<B>),
    Maximize(Expr<B>),
}

impl<B: Backend> Objective<B> {
    pub fn minimize(expr: impl Into<Expr<B>>) -> Self {
        Objective::Minimize(expr.into())
    }

    pub fn maximize(expr: impl Into<Expr<B>>) -> Self {
        Objective::Maximize(expr.into())
    }
}

/// A symbolic value awaiting concretization.
pub(crate) enum Tracked<B: Backend> {
    Scalar(Symbol<B>),
    Array(SymbolicArray<B>),
    Function(Function<B>),
}

pub(crate) struct Scope<B: Backend> {
    kind: ScopeKind,
    solver: B::Solver,
    children: Vec<Tracked<B>>,
    /// Bound symbols whose pin has not reached the solver yet.
    unpinned: VecDeque<Symbol<B>>,
    sorts: Vec<Sort<B>>,
    checkpoints: usize,
}

impl<B: Backend> Scope<B> {
    pub(crate) fn new(backend: &mut B, kind: ScopeKind) -> Self {
        Self {
            kind,
            solver: backend.solver(kind),
            children: Vec::new(),
            unpinned: VecDeque::new(),
            sorts: Vec::new(),
            checkpoints: 0,
        }
    }

    pub(crate) fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub(crate) fn solver(&self) -> &B::Solver {
        &self.solver
    }

    pub(crate) fn solver_mut(&mut self) -> &mut B::Solver {
        &mut self.solver
    }

    pub(crate) fn children(&self) -> usize {
        self.children.len() + self.unpinned.len()
    }

    pub(crate) fn sorts(&self) -> &[Sort<B>] {
        &self.sorts
    }

    pub(crate) fn track(&mut self, child: Tracked<B>) {
        self.children.push(child);
    }

    pub(crate) fn declare(&mut self, sort: Sort<B>) {
        self.sorts.push(sort);
    }

    pub(crate) fn push(&mut self) {
        self.solver.push();
        self.checkpoints += 1;
    }

    pub(crate) fn pop(&mut self) -> Result<()> {
        if self.checkpoints == 0 {
            return Err(Error::NoCheckpoint);
        }
        self.solver.pop()?;
        self.checkpoints -= 1;
        Ok(())
    }

    /// Drop every assertion, checkpoint and tracked child. Declared sorts stay.
    pub(crate) fn reset(&mut self) {
        self.solver.reset();
        self.children.clear();
        self.unpinned.clear();
        self.checkpoints = 0;
    }

    /// Bind the tracked children to `model` and pin them with equalities.
    ///
    /// Children the model does not assign, including symbols that only occur
    /// under a quantifier, stay tracked for a later round. Functions stay
    /// tracked once bound; scalars and arrays leave the list. A symbol whose
    /// pin fails to reach the solver stays queued and is pinned first on the
    /// next call. Returns the number of pins added.
    pub(crate) fn concretize(&mut self, backend: &mut B, model: &Assignment<B>) -> Result<usize> {
        if !self.unpinned.is_empty() {
            trace!("retrying {} unpinned symbol(s)", self.unpinned.len());
        }

        let mut kept = Vec::with_capacity(self.children.len());
        for child in std::mem::take(&mut self.children) {
            match child {
                Tracked::Scalar(symbol) if symbol.is_bound() => {}
                Tracked::Scalar(symbol) => {
                    if symbol.bind(model) {
                        self.unpinned.push_back(symbol);
                    } else {
                        kept.push(Tracked::Scalar(symbol));
                    }
                }
                Tracked::Array(array) => match array.bind(model) {
                    Some(elements) => self.unpinned.extend(elements),
                    None => kept.push(Tracked::Array(array)),
                },
                Tracked::Function(function) => {
                    function.bind(model);
                    kept.push(Tracked::Function(function));
                }
            }
        }
        self.children = kept;

        let mut pinned = 0;
        while let Some(symbol) = self.unpinned.front() {
            let pin = symbol.pin(backend)?;
            self.solver.add(&pin)?;
            self.unpinned.pop_front();
            pinned += 1;
        }

        debug!(
            "concretized {pinned} symbol(s), {} child(ren) still tracked",
            self.children.len()
        );
        Ok(pinned)
    }
}
