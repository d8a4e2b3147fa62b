//! Operator tags and their host-side (concrete) semantics.
//!
//! The same tables drive both arms of the evaluation protocol: deferred nodes
//! carry a [`UnaryOp`]/[`BinaryOp`] tag that backends lower natively, and the
//! concrete arm evaluates the tag with [`apply_unary`]/[`apply_binary`]. Keeping
//! a single definition is what makes the two arms agree.
//!
//! Integer division and remainder follow SMT-LIB: the remainder is always
//! non-negative and `a == b * (a / b) + a % b`.
use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use strum::{Display, EnumIs};

use crate::{
    error::{Error, Result},
    value::{Kind, Value},
};

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
pub enum UnaryOp {
    #[strum(to_string = "!")]
    Not,
    #[strum(to_string = "-")]
    Neg,
}

/// Binary operators: arithmetic, boolean connectives and comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
pub enum BinaryOp {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Sub,
    #[strum(to_string = "*")]
    Mul,
    #[strum(to_string = "/")]
    Div,
    #[strum(to_string = "%")]
    Mod,
    #[strum(to_string = "&")]
    And,
    #[strum(to_string = "|")]
    Or,
    #[strum(to_string = "^")]
    Xor,
    #[strum(to_string = "=>")]
    Implies,
    #[strum(to_string = "<=>")]
    Iff,
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "!=")]
    Ne,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    Le,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = ">=")]
    Ge,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn is_connective(self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Xor | BinaryOp::Implies | BinaryOp::Iff
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// Kind produced by this operator for operands of the given kinds.
    ///
    /// Mixed integer/real arithmetic promotes to real.
    pub fn result_kind(self, lhs: &Kind, rhs: &Kind) -> Kind {
        if self.is_arithmetic() {
            if lhs.is_int() && rhs.is_int() {
                Kind::Int
            } else {
                Kind::Real
            }
        } else {
            Kind::Bool
        }
    }

    /// Binding strength used by the printers (higher binds tighter).
    pub(crate) fn precedence(self) -> u8 {
        match self {
            BinaryOp::Implies | BinaryOp::Iff => 3,
            BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::And => 5,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 6,
            BinaryOp::Add | BinaryOp::Sub => 7,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 8,
        }
    }
}

/// Quantifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
pub enum Quantifier {
    #[strum(to_string = "forall")]
    ForAll,
    #[strum(to_string = "exists")]
    Exists,
}

fn mismatch(op: impl std::fmt::Display, operands: &[&Value]) -> Error {
    Error::TypeMismatch {
        op: op.to_string(),
        operands: operands
            .iter()
            .map(|v| format!("`{v}` ({})", v.kind()))
            .collect::<Vec<_>>()
            .join(" and "),
    }
}

/// Evaluate a unary operator on a concrete value.
pub fn apply_unary(op: UnaryOp, value: &Value) -> Result<Value> {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(i)) => Ok(Value::Int(-i)),
        (UnaryOp::Neg, Value::Real(r)) => Ok(Value::Real(-r)),
        _ => Err(mismatch(op, &[value])),
    }
}

/// Evaluate a binary operator on two concrete values.
pub fn apply_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    if op.is_arithmetic() {
        return arithmetic(op, lhs, rhs);
    }

    let result = match op {
        BinaryOp::Eq => values_equal(lhs, rhs)?,
        BinaryOp::Ne => !values_equal(lhs, rhs)?,
        BinaryOp::Lt => compare(op, lhs, rhs)? == Ordering::Less,
        BinaryOp::Le => compare(op, lhs, rhs)? != Ordering::Greater,
        BinaryOp::Gt => compare(op, lhs, rhs)? == Ordering::Greater,
        BinaryOp::Ge => compare(op, lhs, rhs)? != Ordering::Less,
        _ => {
            let (Value::Bool(a), Value::Bool(b)) = (lhs, rhs) else {
                return Err(mismatch(op, &[lhs, rhs]));
            };
            match op {
                BinaryOp::And => *a && *b,
                BinaryOp::Or => *a || *b,
                BinaryOp::Xor => a != b,
                BinaryOp::Implies => !*a || *b,
                BinaryOp::Iff => a == b,
                _ => unreachable!("arithmetic and comparisons are handled above"),
            }
        }
    };

    Ok(Value::Bool(result))
}

/// Equality as the expression language defines it.
///
/// Integers and reals compare numerically; custom-sort handles compare by
/// identity within their sort. Comparing values of unrelated kinds is an error.
pub fn values_equal(lhs: &Value, rhs: &Value) -> Result<bool> {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Object(a), Value::Object(b)) if a.sort() == b.sort() => Ok(a == b),
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        _ if lhs.kind().is_numeric() && rhs.kind().is_numeric() => {
            Ok(compare(BinaryOp::Eq, lhs, rhs)? == Ordering::Equal)
        }
        _ => Err(mismatch(BinaryOp::Eq, &[lhs, rhs])),
    }
}

/// Numeric ordering of two values.
pub fn compare(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Ordering> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        _ => match (lhs.as_decimal(), rhs.as_decimal()) {
            (Some(a), Some(b)) => Ok(a.cmp(&b)),
            _ => Err(mismatch(op, &[lhs, rhs])),
        },
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        return integer_arithmetic(op, a, b).map(Value::Int);
    }

    let (Some(a), Some(b)) = (lhs.as_decimal(), rhs.as_decimal()) else {
        return Err(mismatch(op, &[lhs, rhs]));
    };

    let zero = BigDecimal::from(0);
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div if b == zero => return Err(Error::DivisionByZero),
        BinaryOp::Div => a / b,
        _ => return Err(mismatch(op, &[lhs, rhs])),
    };
    Ok(Value::Real(result))
}

fn integer_arithmetic(op: BinaryOp, a: &BigInt, b: &BigInt) -> Result<BigInt> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        BinaryOp::Div | BinaryOp::Mod => {
            if b.sign() == Sign::NoSign {
                return Err(Error::DivisionByZero);
            }
            let (quotient, remainder) = euclidean_div_rem(a, b);
            Ok(if op == BinaryOp::Div {
                quotient
            } else {
                remainder
            })
        }
        _ => unreachable!("only arithmetic operators reach integer_arithmetic"),
    }
}

fn euclidean_div_rem(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    let mut quotient = a / b;
    let mut remainder = a % b;
    if remainder.sign() == Sign::Minus {
        if b.sign() == Sign::Plus {
            quotient -= BigInt::from(1);
            remainder += b;
        } else {
            quotient += BigInt::from(1);
            remainder -= b;
        }
    }
    (quotient, remainder)
}
