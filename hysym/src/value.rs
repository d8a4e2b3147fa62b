//! Host-side concrete values.
//!
//! A [`Value`] is what a symbolic expression collapses to once every symbol it
//! mentions has been bound to a solved assignment. Integers are arbitrary
//! precision ([`BigInt`]), reals are decimal approximations ([`BigDecimal`]) and
//! values of caller-declared sorts are opaque [`ObjectHandle`]s.
use std::{fmt, rc::Rc};

use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use num_bigint::BigInt;
use strum::{EnumIs, EnumTryAs};

/// Static kind of a value or expression.
///
/// Kinds are used to recognize boolean-like constraints and to pick the
/// decoding applied to model values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs)]
pub enum Kind {
    Bool,
    Int,
    Real,
    /// A caller-declared (uninterpreted) sort, by name.
    Custom(Rc<str>),
}

impl Kind {
    /// Whether arithmetic and ordering operators apply to this kind.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Int | Kind::Real)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Bool => write!(f, "Bool"),
            Kind::Int => write!(f, "Int"),
            Kind::Real => write!(f, "Real"),
            Kind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Opaque value of a caller-declared sort.
///
/// Equality contract: two handles are equal iff they belong to the same sort
/// and the backend produced the same canonical model value for both. Backends
/// must therefore canonicalize custom-sort values (e.g. `S!val!0`). Handles
/// carry no ordering or arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectHandle {
    sort: Rc<str>,
    name: Rc<str>,
}

impl ObjectHandle {
    pub fn new(sort: impl Into<Rc<str>>, name: impl Into<Rc<str>>) -> Self {
        Self {
            sort: sort.into(),
            name: name.into(),
        }
    }

    /// Name of the sort this value belongs to.
    pub fn sort(&self) -> &str {
        &self.sort
    }

    /// Canonical backend name of the value.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A concrete host value.
///
/// The derived `Eq`/`Ord` are structural (an `Int(1)` differs from a
/// `Real(1)`); use [`crate::ops::values_equal`] for the numeric equality
/// applied by the `==` operator of the expression language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
pub enum Value {
    Bool(bool),
    Int(BigInt),
    Real(BigDecimal),
    Object(ObjectHandle),
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Real(_) => Kind::Real,
            Value::Object(handle) => Kind::Custom(handle.sort.clone()),
        }
    }

    /// Build a real value from a host float. Returns `None` for NaN and infinities.
    pub fn real(value: f64) -> Option<Self> {
        BigDecimal::from_f64(value).map(Value::Real)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; `None` for non-integers or integers outside `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => i.to_i64(),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Numeric view as a float (integers are converted).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => i.to_f64(),
            Value::Real(r) => r.to_f64(),
            _ => None,
        }
    }

    /// Numeric view as a decimal (integers are converted).
    pub fn as_decimal(&self) -> Option<BigDecimal> {
        match self {
            Value::Int(i) => Some(BigDecimal::from(i.clone())),
            Value::Real(r) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Value::Object(handle) => Some(handle),
            _ => None,
        }
    }

    /// Round reals to `precision` decimal places; other values are unchanged.
    pub fn rounded(self, precision: i64) -> Self {
        match self {
            Value::Real(r) => Value::Real(r.round(precision)),
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{}", r.normalized()),
            Value::Object(handle) => write!(f, "{handle}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Int(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Real(value)
    }
}

impl From<ObjectHandle> for Value {
    fn from(value: ObjectHandle) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(Value::from(3).kind(), Kind::Int);
        assert_eq!(Value::from(true).kind(), Kind::Bool);
        assert_eq!(Value::real(0.5).unwrap().kind(), Kind::Real);
        let handle = ObjectHandle::new("S", "S!val!0");
        assert_eq!(Value::from(handle).kind(), Kind::Custom("S".into()));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::from(-7).as_i64(), Some(-7));
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
        assert_eq!(Value::real(1.5).unwrap().as_f64(), Some(1.5));
        assert_eq!(Value::from(true).as_i64(), None);
        assert!(Value::real(f64::NAN).is_none());
    }

    #[test]
    fn rounding_only_touches_reals() {
        let third = Value::from(BigDecimal::from(1) / BigDecimal::from(3));
        assert_eq!(third.rounded(3).to_string(), "0.333");
        assert_eq!(Value::from(7).rounded(0), Value::from(7));
    }
}
