//! Uninterpreted functions.
use std::{cell::OnceCell, fmt, rc::Rc};

use log::trace;

use crate::{
    backend::Backend,
    error::{Error, Result},
    expr::{Expr, ExprNode},
    model::Assignment,
    value::{Kind, Value},
};

struct FunctionState<B: Backend> {
    name: Rc<str>,
    native: B::Function,
    domain: Vec<Kind>,
    range: Kind,
    binding: OnceCell<Assignment<B>>,
}

/// Callable uninterpreted function symbol.
///
/// Applications are deferred until concretization binds the function to an
/// assignment; after that, applying it to concrete arguments reads the
/// interpretation straight from the assignment.
pub struct Function<B: Backend> {
    state: Rc<FunctionState<B>>,
}

impl<B: Backend> Clone for Function<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<B: Backend> Function<B> {
    pub(crate) fn new(name: &str, native: B::Function, domain: Vec<Kind>, range: Kind) -> Self {
        Self {
            state: Rc::new(FunctionState {
                name: name.into(),
                native,
                domain,
                range,
                binding: OnceCell::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn domain(&self) -> &[Kind] {
        &self.state.domain
    }

    pub fn range(&self) -> &Kind {
        &self.state.range
    }

    pub fn arity(&self) -> usize {
        self.state.domain.len()
    }

    pub fn is_bound(&self) -> bool {
        self.state.binding.get().is_some()
    }

    pub fn native(&self) -> &B::Function {
        &self.state.native
    }

    /// Apply the function.
    ///
    /// ```
    /// use hysym::prelude::*;
    ///
    /// let mut session = Session::new(BoundedBackend::new());
    /// let int = session.int_sort();
    /// let f = session.function("f", &[&int], &int).unwrap();
    /// let x = session.int("x").unwrap();
    /// let app = f.call([&x]).unwrap();
    /// assert!(!app.has_concrete_value());
    /// assert!(f.call([&x, &x]).is_err());
    /// ```
    pub fn call<I>(&self, args: I) -> Result<Expr<B>>
    where
        I: IntoIterator,
        I::Item: Into<Expr<B>>,
    {
        let args: Vec<Expr<B>> = args.into_iter().map(Into::into).collect();
        if args.len() != self.arity() {
            return Err(Error::ArityMismatch {
                name: self.name().to_string(),
                expected: self.arity(),
                found: args.len(),
            });
        }

        if let Some(value) = self.interpret(&args) {
            return Ok(Expr::literal(value));
        }
        Ok(Expr::from_node(ExprNode::Apply {
            func: self.clone(),
            args,
        }))
    }

    fn interpret(&self, args: &[Expr<B>]) -> Option<Value> {
        let model = self.state.binding.get()?;
        let values = args
            .iter()
            .map(|arg| arg.concrete_value().ok())
            .collect::<Option<Vec<_>>>()?;
        model.apply(self.native(), &values)
    }

    /// Bind to `model` if it interprets this function.
    pub(crate) fn bind(&self, model: &Assignment<B>) -> bool {
        if self.is_bound() || !model.interprets_function(self.native()) {
            return false;
        }
        trace!("binding function `{}`", self.name());
        self.state.binding.set(model.clone()).is_ok()
    }
}

impl<B: Backend> fmt::Debug for Function<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("domain", &self.domain())
            .field("range", self.range())
            .field("bound", &self.is_bound())
            .finish()
    }
}
