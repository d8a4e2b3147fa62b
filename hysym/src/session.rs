//! Sessions: scope lifecycle, symbol factories and concretization.
//!
//! A [`Session`] owns a backend, a default scope that lives as long as the
//! session, and a stack of transient scopes. All operations act on the
//! *active* scope: the innermost transient scope, or the default one.
//! Transient scopes are entered with [`Session::scope`] or
//! [`Session::optimizer`] and exited when the returned [`ScopeGuard`] drops,
//! including on early returns and panics.
//!
//! ```
//! use hysym::prelude::*;
//!
//! # fn main() -> hysym::Result<()> {
//! let mut session = Session::new(BoundedBackend::new());
//! {
//!     let mut opt = session.optimizer();
//!     let x = opt.int("x")?;
//!     let y = opt.int("y")?;
//!     opt.require(y.gt(1))?;
//!     opt.require(x.gt(&y))?;
//!     opt.concretize_with(Objective::minimize(&x + &y))?;
//!     assert_eq!(x.value()?, Value::from(3));
//!     assert_eq!(y.value()?, Value::from(2));
//! }
//! assert_eq!(session.depth(), 0);
//! # Ok(())
//! # }
//! ```
use std::ops::{Deref, DerefMut};

use log::{debug, warn};

use crate::{
    array::SymbolicArray,
    backend::{Backend, SatResult, ScopeKind, SolverContext},
    config::SessionConfig,
    error::{Error, Result},
    evaluable::Evaluable,
    expr::Expr,
    function::Function,
    model::Assignment,
    scope::{Objective, Scope, Tracked},
    sort::Sort,
    symbol::{Origin, Symbol},
    value::{Kind, Value},
};

pub struct Session<B: Backend> {
    backend: B,
    default_scope: Scope<B>,
    transient: Vec<Scope<B>>,
    tracking: bool,
    config: SessionConfig,
    counter: usize,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SessionConfig::default())
    }

    pub fn with_config(mut backend: B, config: SessionConfig) -> Self {
        let default_scope = Scope::new(&mut backend, ScopeKind::Solver);
        Self {
            backend,
            default_scope,
            transient: Vec::new(),
            tracking: config.track_symbols,
            config,
            counter: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn active(&self) -> &Scope<B> {
        self.transient.last().unwrap_or(&self.default_scope)
    }

    fn active_mut(&mut self) -> &mut Scope<B> {
        self.transient.last_mut().unwrap_or(&mut self.default_scope)
    }

    fn parts(&mut self) -> (&mut B, &mut Scope<B>) {
        let scope = self.transient.last_mut().unwrap_or(&mut self.default_scope);
        (&mut self.backend, scope)
    }

    fn fresh_name(&mut self, basename: &str) -> String {
        let name = format!("{basename}:{}", self.counter);
        self.counter += 1;
        name
    }

    fn enter(&mut self, kind: ScopeKind) -> ScopeGuard<'_, B> {
        let scope = Scope::new(&mut self.backend, kind);
        self.transient.push(scope);
        let depth = self.transient.len();
        debug!("entered {kind} scope (depth {depth})");
        ScopeGuard {
            session: self,
            depth,
        }
    }

    /// Enter a transient solver scope.
    pub fn scope(&mut self) -> ScopeGuard<'_, B> {
        self.enter(ScopeKind::Solver)
    }

    /// Enter a transient optimizer scope, which accepts objectives.
    pub fn optimizer(&mut self) -> ScopeGuard<'_, B> {
        self.enter(ScopeKind::Optimizer)
    }

    /// Number of transient scopes currently entered.
    pub fn depth(&self) -> usize {
        self.transient.len()
    }

    /// Kind of the active scope.
    pub fn scope_kind(&self) -> ScopeKind {
        self.active().kind()
    }

    /// Record a checkpoint in the active scope.
    pub fn push(&mut self) {
        self.active_mut().push();
    }

    /// Roll the active scope back to its latest checkpoint.
    pub fn pop(&mut self) -> Result<()> {
        self.active_mut().pop()
    }

    /// Clear the assertions and tracked symbols of the active scope.
    pub fn reset(&mut self) {
        debug!("resetting scope at depth {}", self.depth());
        self.active_mut().reset();
    }

    /// Assertions currently in force in the active scope.
    pub fn assertions(&self) -> Vec<B::Term> {
        self.active().solver().assertions()
    }

    /// Number of children still awaiting concretization in the active scope.
    pub fn tracked(&self) -> usize {
        self.active().children()
    }

    /// Uninterpreted sorts declared in the active scope.
    pub fn sorts(&self) -> &[Sort<B>] {
        self.active().sorts()
    }

    pub fn enable_concretization(&mut self) {
        self.tracking = true;
    }

    /// Stop tracking new symbols. [`Session::concretize`] fails until
    /// re-enabled; [`Session::check_sat`] and [`Session::evaluate`] still work.
    pub fn disable_concretization(&mut self) {
        self.tracking = false;
    }

    pub fn concretization_enabled(&self) -> bool {
        self.tracking
    }

    /// Add a boolean constraint to the active scope.
    ///
    /// A concretely true constraint is accepted as a no-op. Non-boolean
    /// expressions and concretely false constraints are rejected with
    /// [`Error::InvalidConstraint`].
    pub fn require(&mut self, constraint: impl Into<Expr<B>>) -> Result<()> {
        let constraint = constraint.into();
        let kind = constraint.kind();
        let invalid = || Error::InvalidConstraint {
            found: constraint.to_string(),
            kind: kind.to_string(),
        };
        if !kind.is_bool() {
            return Err(invalid());
        }

        if constraint.has_concrete_value() {
            match constraint.concrete_value() {
                Ok(Value::Bool(true)) => return Ok(()),
                Ok(_) => return Err(invalid()),
                Err(_) => {}
            }
        }

        let (backend, scope) = self.parts();
        let term = constraint.value(backend)?;
        scope.solver_mut().add(&term)?;
        Ok(())
    }

    /// Check the active scope.
    pub fn check_sat(&mut self) -> Result<SatResult<Assignment<B>>> {
        let result = self.active_mut().solver_mut().check()?;
        debug!("check-sat answered {}", result.status());
        Ok(result.map(Assignment::new))
    }

    /// Check the active scope and return its assignment.
    pub fn model(&mut self) -> Result<Assignment<B>> {
        match self.check_sat()? {
            SatResult::Sat(model) => Ok(model),
            other => Err(Error::NoModel {
                status: other.status(),
            }),
        }
    }

    fn objective(&mut self, objective: Objective<B>) -> Result<()> {
        if self.active().kind() != ScopeKind::Optimizer {
            return Err(Error::OptimizationUnsupported);
        }
        let (backend, scope) = self.parts();
        match objective {
            Objective::Minimize(expr) => {
                let term = expr.value(backend)?;
                scope.solver_mut().minimize(&term)?;
            }
            Objective::Maximize(expr) => {
                let term = expr.value(backend)?;
                scope.solver_mut().maximize(&term)?;
            }
        }
        Ok(())
    }

    /// Register a minimization objective. Optimizer scopes only.
    pub fn minimize(&mut self, expr: impl Into<Expr<B>>) -> Result<()> {
        self.objective(Objective::minimize(expr))
    }

    /// Register a maximization objective. Optimizer scopes only.
    pub fn maximize(&mut self, expr: impl Into<Expr<B>>) -> Result<()> {
        self.objective(Objective::maximize(expr))
    }

    /// Solve the active scope and bind every tracked symbol to the result.
    ///
    /// Newly bound symbols are pinned to their value with equality
    /// constraints, so later checks in this scope keep them fixed.
    /// Concretizing again without new symbols adds nothing.
    pub fn concretize(&mut self) -> Result<Assignment<B>> {
        if !self.tracking {
            return Err(Error::ConcretizationDisabled);
        }
        let model = self.model()?;
        let (backend, scope) = self.parts();
        scope.concretize(backend, &model)?;
        Ok(model)
    }

    /// Register `objective`, then [`Session::concretize`].
    pub fn concretize_with(&mut self, objective: Objective<B>) -> Result<Assignment<B>> {
        if !self.tracking {
            return Err(Error::ConcretizationDisabled);
        }
        self.objective(objective)?;
        self.concretize()
    }

    /// Value of `expr` under `model`, or `None` when the model leaves it
    /// unassigned. Reals are rounded to the session precision.
    pub fn evaluate(&mut self, model: &Assignment<B>, expr: impl Into<Expr<B>>) -> Result<Option<Value>> {
        let expr = expr.into();
        if expr.has_concrete_value() {
            if let Ok(value) = expr.concrete_value() {
                return Ok(Some(value.rounded(self.config.real_precision)));
            }
        }
        let term = expr.value(&mut self.backend)?;
        Ok(model
            .eval(&term)
            .map(|value| value.rounded(self.config.real_precision)))
    }

    /// Wrap a host value as a literal expression.
    pub fn wrap_concrete(&self, value: impl Into<Value>) -> Expr<B> {
        Expr::literal(value)
    }

    fn track(&mut self, child: Tracked<B>) {
        if self.tracking {
            self.active_mut().track(child);
        }
    }

    fn scalar(&mut self, basename: &str, kind: Kind, sort: &B::Sort, precision: i64) -> Result<Symbol<B>> {
        let name = self.fresh_name(basename);
        let term = self.backend.constant(&name, sort)?;
        let symbol = Symbol::new(name, kind, Origin::Constant(term), precision);
        self.track(Tracked::Scalar(symbol.clone()));
        Ok(symbol)
    }

    pub fn int(&mut self, basename: &str) -> Result<Symbol<B>> {
        let sort = self.backend.int_sort();
        self.scalar(basename, Kind::Int, &sort, self.config.real_precision)
    }

    pub fn real(&mut self, basename: &str) -> Result<Symbol<B>> {
        self.real_with_precision(basename, self.config.real_precision)
    }

    /// Real symbol decoded with `precision` decimal places.
    pub fn real_with_precision(&mut self, basename: &str, precision: i64) -> Result<Symbol<B>> {
        let sort = self.backend.real_sort();
        self.scalar(basename, Kind::Real, &sort, precision)
    }

    pub fn bool(&mut self, basename: &str) -> Result<Symbol<B>> {
        let sort = self.backend.bool_sort();
        self.scalar(basename, Kind::Bool, &sort, self.config.real_precision)
    }

    /// Symbol of an arbitrary sort.
    pub fn symbolic(&mut self, basename: &str, sort: &Sort<B>) -> Result<Symbol<B>> {
        self.scalar(basename, sort.kind().clone(), sort.native(), self.config.real_precision)
    }

    /// Integer-indexed, integer-valued array.
    pub fn int_array(&mut self, basename: &str) -> Result<SymbolicArray<B>> {
        let name = self.fresh_name(basename);
        let term = self.backend.int_array(&name)?;
        let array = SymbolicArray::new(name, term, self.config.real_precision);
        self.track(Tracked::Array(array.clone()));
        Ok(array)
    }

    /// Declare an uninterpreted sort in the active scope.
    pub fn sort(&mut self, name: &str) -> Result<Sort<B>> {
        let native = self.backend.declare_sort(name)?;
        let sort = Sort::custom(name, native);
        self.active_mut().declare(sort.clone());
        Ok(sort)
    }

    pub fn int_sort(&mut self) -> Sort<B> {
        Sort::new(Kind::Int, self.backend.int_sort())
    }

    pub fn real_sort(&mut self) -> Sort<B> {
        Sort::new(Kind::Real, self.backend.real_sort())
    }

    pub fn bool_sort(&mut self) -> Sort<B> {
        Sort::new(Kind::Bool, self.backend.bool_sort())
    }

    /// Declare an uninterpreted function `domain -> range`.
    pub fn function(&mut self, name: &str, domain: &[&Sort<B>], range: &Sort<B>) -> Result<Function<B>> {
        let native_domain: Vec<B::Sort> = domain.iter().map(|s| s.native().clone()).collect();
        let native = self
            .backend
            .declare_function(name, &native_domain, range.native())?;
        let function = Function::new(
            name,
            native,
            domain.iter().map(|s| s.kind().clone()).collect(),
            range.kind().clone(),
        );
        self.track(Tracked::Function(function.clone()));
        Ok(function)
    }
}

/// Entered transient scope. Dereferences to the [`Session`]; dropping it exits
/// the scope.
pub struct ScopeGuard<'s, B: Backend> {
    session: &'s mut Session<B>,
    depth: usize,
}

impl<B: Backend> ScopeGuard<'_, B> {
    /// Depth of the guarded scope (1 for the outermost transient scope).
    pub fn scope_depth(&self) -> usize {
        self.depth
    }
}

impl<B: Backend> Deref for ScopeGuard<'_, B> {
    type Target = Session<B>;

    fn deref(&self) -> &Session<B> {
        &*self.session
    }
}

impl<B: Backend> DerefMut for ScopeGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut Session<B> {
        &mut *self.session
    }
}

impl<B: Backend> Drop for ScopeGuard<'_, B> {
    fn drop(&mut self) {
        let transient = &mut self.session.transient;
        if transient.len() >= self.depth {
            transient.truncate(self.depth - 1);
            debug!("exited scope (depth {})", self.depth);
        } else {
            warn!("scope at depth {} was already released", self.depth);
        }
    }
}
