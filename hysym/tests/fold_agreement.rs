//! The eager arm of every operator must agree with what the backend computes
//! for the deferred node under the same assignment.
use hysym::{ops::BinaryOp, prelude::*};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

type E = Expr<BoundedBackend>;

const ARITHMETIC: [BinaryOp; 11] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Mod,
    BinaryOp::Eq,
    BinaryOp::Ne,
    BinaryOp::Lt,
    BinaryOp::Le,
    BinaryOp::Gt,
    BinaryOp::Ge,
];

const CONNECTIVES: [BinaryOp; 7] = [
    BinaryOp::And,
    BinaryOp::Or,
    BinaryOp::Xor,
    BinaryOp::Implies,
    BinaryOp::Iff,
    BinaryOp::Eq,
    BinaryOp::Ne,
];

#[test]
fn integer_operators_agree_with_the_backend() -> hysym::Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut session = Session::new(BoundedBackend::new());
    session.disable_concretization();
    let x = session.int("x")?;
    let y = session.int("y")?;

    for _ in 0..64 {
        let a: i64 = rng.random_range(-6..=6);
        let b: i64 = rng.random_range(-6..=6);
        let op = ARITHMETIC[rng.random_range(0..ARITHMETIC.len())];

        let eager = E::binary(op, a, b);
        if !eager.is_literal() {
            // Only division by zero refuses to fold.
            assert_eq!(b, 0);
            continue;
        }

        let mut scope = session.scope();
        scope.require(x.equals(a))?;
        scope.require(y.equals(b))?;
        let model = scope.model()?;
        let deferred = E::binary(op, &x, &y);
        assert_eq!(
            scope.evaluate(&model, &deferred)?,
            Some(eager.concrete_value()?),
            "{a} {op} {b}"
        );
    }
    Ok(())
}

#[test]
fn connectives_agree_with_the_backend() -> hysym::Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut session = Session::new(BoundedBackend::new());
    session.disable_concretization();
    let p = session.bool("p")?;
    let q = session.bool("q")?;

    for _ in 0..32 {
        let a = rng.random_bool(0.5);
        let b = rng.random_bool(0.5);
        let op = CONNECTIVES[rng.random_range(0..CONNECTIVES.len())];

        let eager = E::binary(op, a, b);
        let mut scope = session.scope();
        scope.require(p.equals(a))?;
        scope.require(q.equals(b))?;
        let model = scope.model()?;
        assert_eq!(
            scope.evaluate(&model, E::binary(op, &p, &q))?,
            Some(eager.concrete_value()?),
            "{a} {op} {b}"
        );
        assert_eq!(
            scope.evaluate(&model, !&p)?,
            Some(Value::from(!a)),
        );
    }
    Ok(())
}
