//! RcDoc-based pretty-printer with termcolor annotations for [`Expr`].
//!
//! Expressions render as infix text. Parentheses are inserted from operator
//! precedence, and colored by nesting depth on terminals so matching pairs
//! share a color.
use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{
    backend::Backend,
    expr::{Expr, ExprNode},
    ops::BinaryOp,
    value::Value,
};

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas, brackets, periods
    /// Parentheses are colored by nesting depth.
    Paren(u8),
    Keyword,  // if, then, else, forall, exists, true, false
    Operator, // +, *, &, |, =>, <=>, ==
    Ident,    // symbols and functions
    Literal,  // numbers and sort values
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    _ => Color::Magenta,
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Keyword => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Ident => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Literal => {
                s.set_fg(Some(Color::Magenta));
            }
        }
        s
    }
}

fn styled(style: Style, s: impl Into<String>) -> RcDoc<'static, Style> {
    RcDoc::text(s.into()).annotate(style)
}

fn punct(s: &'static str) -> RcDoc<'static, Style> {
    styled(Style::Punct, s)
}

#[inline]
fn lparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::text("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::text(")").annotate(Style::Paren(depth))
}

fn kw(s: &'static str) -> RcDoc<'static, Style> {
    styled(Style::Keyword, s)
}

fn literal(value: &Value) -> RcDoc<'static, Style> {
    match value {
        Value::Bool(true) => kw("true"),
        Value::Bool(false) => kw("false"),
        other => styled(Style::Literal, other.to_string()),
    }
}

const ATOM: u8 = 255;

fn precedence<B: Backend>(e: &Expr<B>) -> u8 {
    match e.node() {
        ExprNode::Ite { .. } => 1,
        ExprNode::Quantifier { .. } => 2,
        ExprNode::Binary { op, .. } => op.precedence(),
        ExprNode::Unary { .. } => 9,
        ExprNode::Apply { .. } | ExprNode::Select { .. } => 10,
        ExprNode::Literal(value) if is_negative(value) => 9,
        ExprNode::Literal(_) | ExprNode::Symbol(_) => ATOM,
    }
}

fn is_negative(value: &Value) -> bool {
    value.to_string().starts_with('-')
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Operand of a binary node: parenthesized when it binds looser than the
/// parent, or equally loose on the right or under a different operator.
fn operand_doc<B: Backend>(e: &Expr<B>, parent: BinaryOp, side: Side, depth: u8) -> RcDoc<'static, Style> {
    let current = precedence(e);
    let parent_prec = parent.precedence();
    let same_op = matches!(e.node(), ExprNode::Binary { op, .. } if *op == parent);
    let need = current < parent_prec || (current == parent_prec && !(same_op && side == Side::Left));
    parenthesize(e, need, depth)
}

fn parenthesize<B: Backend>(e: &Expr<B>, need: bool, depth: u8) -> RcDoc<'static, Style> {
    if need {
        lparen(depth)
            .append(to_doc_with_depth(e, depth + 1))
            .append(rparen(depth))
            .group()
    } else {
        to_doc_with_depth(e, depth)
    }
}

fn comma_separated<B: Backend>(items: &[Expr<B>], depth: u8) -> RcDoc<'static, Style> {
    RcDoc::intersperse(
        items.iter().map(|item| to_doc_with_depth(item, depth)),
        punct(",").append(RcDoc::line()),
    )
}

/// Depth-aware document builder that colors parentheses by nesting level.
fn to_doc_with_depth<B: Backend>(e: &Expr<B>, depth: u8) -> RcDoc<'static, Style> {
    match e.node() {
        ExprNode::Literal(value) => literal(value),
        ExprNode::Symbol(symbol) => styled(Style::Ident, symbol.name()),
        ExprNode::Unary { op, operand, .. } => styled(Style::Operator, op.to_string())
            .append(parenthesize(operand, precedence(operand) < 9, depth))
            .group(),
        ExprNode::Binary { op, lhs, rhs, .. } => operand_doc(lhs, *op, Side::Left, depth)
            .append(RcDoc::space())
            .append(styled(Style::Operator, op.to_string()))
            .append(RcDoc::line())
            .append(operand_doc(rhs, *op, Side::Right, depth))
            .group(),
        ExprNode::Ite {
            condition,
            then,
            otherwise,
            ..
        } => kw("if")
            .append(RcDoc::space())
            .append(parenthesize(condition, precedence(condition) <= 2, depth))
            .append(RcDoc::line())
            .append(kw("then"))
            .append(RcDoc::space())
            .append(parenthesize(then, precedence(then) <= 2, depth))
            .append(RcDoc::line())
            .append(kw("else"))
            .append(RcDoc::space())
            .append(parenthesize(otherwise, precedence(otherwise) <= 2, depth))
            .group()
            .nest(2),
        ExprNode::Quantifier {
            quantifier,
            bound,
            body,
        } => styled(Style::Keyword, quantifier.to_string())
            .append(RcDoc::space())
            .append(RcDoc::intersperse(
                bound.iter().map(|symbol| styled(Style::Ident, symbol.name())),
                punct(", "),
            ))
            .append(RcDoc::space())
            .append(punct("."))
            .append(RcDoc::line())
            .append(parenthesize(body, precedence(body) == 1, depth))
            .group()
            .nest(2),
        ExprNode::Apply { func, args } => styled(Style::Ident, func.name())
            .append(lparen(depth))
            .append(comma_separated(args, depth + 1))
            .append(rparen(depth))
            .group(),
        ExprNode::Select { array, index } => styled(Style::Ident, array.name())
            .append(punct("["))
            .append(to_doc_with_depth(index, depth + 1))
            .append(punct("]"))
            .group(),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

fn render_to<W: WriteColor + Write>(doc: &RcDoc<'_, Style>, width: usize, out: &mut W) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

/// Width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for expressions.
pub trait PrettyExpr {
    /// Annotated document, for composing or rendering manually.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Print to stdout with colors (TTY-aware), at the terminal width.
    fn pretty_print(&self) -> io::Result<()>;

    /// Plain string without colors, laid out for 80 columns.
    fn pretty_string(&self) -> String;
}

impl<B: Backend> PrettyExpr for Expr<B> {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self, 0)
    }

    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)?;
        writeln!(stdout)
    }

    fn pretty_string(&self) -> String {
        let mut buf = String::new();
        let _ = self.pretty_doc().render_fmt(80, &mut buf);
        buf
    }
}

impl<B: Backend> std::fmt::Display for Expr<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut w = FmtWrite::new(f);
        self.pretty_doc().render_raw(80, &mut w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::bounded::BoundedBackend,
        expr::{
            func::{forall, implies, ite},
            ops::Operand,
        },
        session::Session,
    };

    #[test]
    fn precedence_drives_parentheses() {
        let mut session = Session::new(BoundedBackend::new());
        let x = session.int("x").unwrap();
        let y = session.int("y").unwrap();

        assert_eq!((&x + &y * 2).to_string(), "x:0 + y:1 * 2");
        assert_eq!(((&x + &y) * 2).to_string(), "(x:0 + y:1) * 2");
        assert_eq!((&x - (&y - 1)).to_string(), "x:0 - (y:1 - 1)");
        assert_eq!((&x - &y - 1).to_string(), "x:0 - y:1 - 1");
        assert_eq!(
            (x.gt(1) & y.le(&x)).to_string(),
            "x:0 > 1 & y:1 <= x:0"
        );
        assert_eq!((-(&x + 1)).to_string(), "-(x:0 + 1)");
    }

    #[test]
    fn binders_and_conditionals() {
        let mut session = Session::new(BoundedBackend::new());
        let p = session.bool("p").unwrap();
        let q = session.bool("q").unwrap();
        let n = session.int("n").unwrap();

        assert_eq!(implies(&p, &q).to_string(), "p:0 => q:1");
        assert_eq!(
            ite(&p, 1, ite(&q, 2, 3)).pretty_string(),
            "if p:0 then 1 else (if q:1 then 2 else 3)"
        );
        assert_eq!(
            forall([&n], n.ge(0)).pretty_string(),
            "forall n:2 . n:2 >= 0"
        );
    }

    #[test]
    fn colored_rendering_writes_escape_codes() {
        let mut session = Session::new(BoundedBackend::new());
        let p = session.bool("p").unwrap();
        let mut out = termcolor::Buffer::ansi();
        (!&p).pretty_render_to(80, &mut out).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("p:0"));
        assert!(text.contains('\u{1b}'));
    }
}
