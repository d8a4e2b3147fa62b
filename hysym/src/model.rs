use std::{fmt, rc::Rc};

use crate::{
    backend::{Backend, NativeModel},
    symbol::Symbol,
    value::Value,
};

/// Solved assignment returned by [`crate::Session::model`] and friends.
///
/// Cheap to clone: symbols bound during concretization keep a handle on the
/// assignment they were bound to.
pub struct Assignment<B: Backend> {
    native: Rc<B::Model>,
}

impl<B: Backend> Clone for Assignment<B> {
    fn clone(&self) -> Self {
        Self {
            native: self.native.clone(),
        }
    }
}

impl<B: Backend> fmt::Debug for Assignment<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assignment").finish_non_exhaustive()
    }
}

impl<B: Backend> Assignment<B> {
    pub(crate) fn new(native: B::Model) -> Self {
        Self {
            native: Rc::new(native),
        }
    }

    /// The backend model behind this assignment.
    pub fn native(&self) -> &B::Model {
        &self.native
    }

    /// Decoded value of a native term, or `None` when unassigned.
    pub fn eval(&self, term: &B::Term) -> Option<Value> {
        self.native.eval(term)
    }

    /// Raw (unrounded) value the model gives to `symbol`.
    pub fn value_of(&self, symbol: &Symbol<B>) -> Option<Value> {
        symbol.project(self)
    }

    pub(crate) fn apply(&self, func: &B::Function, args: &[Value]) -> Option<Value> {
        self.native.apply(func, args)
    }

    pub(crate) fn select(&self, array: &B::Term, index: &Value) -> Option<Value> {
        self.native.select(array, index)
    }

    pub(crate) fn interprets_function(&self, func: &B::Function) -> bool {
        self.native.interprets_function(func)
    }

    pub(crate) fn interprets_array(&self, array: &B::Term) -> bool {
        self.native.interprets_array(array)
    }
}
