use std::{fmt, rc::Rc};

use crate::{backend::Backend, value::Kind};

/// Sort handle: names the kind of values a symbol or function ranges over.
///
/// Obtained from [`crate::Session::int_sort`], [`crate::Session::real_sort`],
/// [`crate::Session::bool_sort`] or [`crate::Session::sort`] for uninterpreted
/// sorts.
pub struct Sort<B: Backend> {
    kind: Kind,
    native: B::Sort,
}

impl<B: Backend> Clone for Sort<B> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            native: self.native.clone(),
        }
    }
}

impl<B: Backend> Sort<B> {
    pub(crate) fn new(kind: Kind, native: B::Sort) -> Self {
        Self { kind, native }
    }

    pub(crate) fn custom(name: &str, native: B::Sort) -> Self {
        Self::new(Kind::Custom(Rc::from(name)), native)
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn native(&self) -> &B::Sort {
        &self.native
    }
}

impl<B: Backend> fmt::Display for Sort<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl<B: Backend> fmt::Debug for Sort<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sort").field(&self.kind).field(&self.native).finish()
    }
}
