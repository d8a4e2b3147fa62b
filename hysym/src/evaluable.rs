use crate::{
    backend::Backend,
    error::Result,
    expr::Expr,
    symbol::Symbol,
    value::Value,
};

/// Anything that can be lowered to a backend term.
///
/// `has_concrete_value` reports whether the host already knows the value, in
/// which case lowering produces a literal.
pub trait Evaluable<B: Backend> {
    /// Lower to a native term.
    fn value(&self, backend: &mut B) -> Result<B::Term>;

    fn has_concrete_value(&self) -> bool;
}

impl<B: Backend> Evaluable<B> for Expr<B> {
    fn value(&self, backend: &mut B) -> Result<B::Term> {
        self.lower(backend)
    }

    fn has_concrete_value(&self) -> bool {
        Expr::has_concrete_value(self)
    }
}

impl<B: Backend> Evaluable<B> for Symbol<B> {
    fn value(&self, backend: &mut B) -> Result<B::Term> {
        if self.is_bound() {
            Ok(backend.literal(&self.raw_value()?)?)
        } else {
            self.native_term(backend)
        }
    }

    fn has_concrete_value(&self) -> bool {
        self.is_bound()
    }
}

impl<B: Backend> Evaluable<B> for Value {
    fn value(&self, backend: &mut B) -> Result<B::Term> {
        Ok(backend.literal(self)?)
    }

    fn has_concrete_value(&self) -> bool {
        true
    }
}
