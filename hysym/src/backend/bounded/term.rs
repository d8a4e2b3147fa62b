//! Term representation of the bounded backend.
use std::{fmt, rc::Rc};

use crate::{
    ops::{BinaryOp, Quantifier, UnaryOp},
    value::Value,
};

/// Sorts understood by the bounded backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoundedSort {
    Bool,
    Int,
    Real,
    IntArray,
    Custom(Rc<str>),
}

impl fmt::Display for BoundedSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundedSort::Bool => write!(f, "Bool"),
            BoundedSort::Int => write!(f, "Int"),
            BoundedSort::Real => write!(f, "Real"),
            BoundedSort::IntArray => write!(f, "(Array Int Int)"),
            BoundedSort::Custom(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ConstDecl {
    pub(crate) id: usize,
    pub(crate) name: String,
    pub(crate) sort: BoundedSort,
}

#[derive(Debug)]
pub(crate) struct FuncDecl {
    pub(crate) id: usize,
    pub(crate) name: String,
    pub(crate) domain: Vec<BoundedSort>,
    pub(crate) range: BoundedSort,
}

/// Uninterpreted function declared in a [`super::BoundedBackend`].
#[derive(Debug, Clone)]
pub struct BoundedFunction(pub(crate) Rc<FuncDecl>);

impl BoundedFunction {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn arity(&self) -> usize {
        self.0.domain.len()
    }
}

#[derive(Debug)]
pub(crate) enum TermNode {
    Const(Rc<ConstDecl>),
    Literal(Value),
    Unary(UnaryOp, BoundedTerm),
    Binary(BinaryOp, BoundedTerm, BoundedTerm),
    Ite(BoundedTerm, BoundedTerm, BoundedTerm),
    Quantifier(Quantifier, Vec<Rc<ConstDecl>>, BoundedTerm),
    Apply(Rc<FuncDecl>, Vec<BoundedTerm>),
    Select(BoundedTerm, BoundedTerm),
}

/// Immutable, shared term. Prints as an SMT-LIB style s-expression.
#[derive(Debug, Clone)]
pub struct BoundedTerm(pub(crate) Rc<TermNode>);

impl BoundedTerm {
    pub(crate) fn new(node: TermNode) -> Self {
        Self(Rc::new(node))
    }

    pub(crate) fn node(&self) -> &TermNode {
        &self.0
    }

    /// The declaration behind this term, if it is a bare constant.
    pub(crate) fn as_const(&self) -> Option<&Rc<ConstDecl>> {
        match self.node() {
            TermNode::Const(decl) => Some(decl),
            _ => None,
        }
    }
}

fn smt_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "div",
        BinaryOp::Mod => "mod",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
        BinaryOp::Xor => "xor",
        BinaryOp::Implies => "=>",
        BinaryOp::Iff | BinaryOp::Eq => "=",
        BinaryOp::Ne => "distinct",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
    }
}

impl fmt::Display for BoundedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            TermNode::Const(decl) => write!(f, "{}", decl.name),
            TermNode::Literal(value) => write!(f, "{value}"),
            TermNode::Unary(UnaryOp::Not, t) => write!(f, "(not {t})"),
            TermNode::Unary(UnaryOp::Neg, t) => write!(f, "(- {t})"),
            TermNode::Binary(op, a, b) => write!(f, "({} {a} {b})", smt_op(*op)),
            TermNode::Ite(c, a, b) => write!(f, "(ite {c} {a} {b})"),
            TermNode::Quantifier(q, bound, body) => {
                write!(f, "({q} (")?;
                for (i, decl) in bound.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({} {})", decl.name, decl.sort)?;
                }
                write!(f, ") {body})")
            }
            TermNode::Apply(func, args) => {
                write!(f, "({}", func.name)?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
            TermNode::Select(array, index) => write!(f, "(select {array} {index})"),
        }
    }
}
