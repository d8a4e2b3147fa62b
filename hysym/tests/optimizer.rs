use hysym::prelude::*;

#[test]
fn minimizing_a_sum() -> hysym::Result<()> {
    let mut s = Session::new(BoundedBackend::new());
    let mut opt = s.optimizer();
    let x = opt.int("x")?;
    let y = opt.int("y")?;
    opt.require(y.gt(1))?;
    opt.require(x.gt(&y))?;
    opt.concretize_with(Objective::minimize(&x + &y))?;

    assert_eq!(y.as_i64()?, 2);
    assert_eq!(x.as_i64()?, 3);
    Ok(())
}

#[test]
fn maximizing_within_bounds() -> hysym::Result<()> {
    let mut s = Session::new(BoundedBackend::new());
    let mut opt = s.optimizer();
    let x = opt.int("x")?;
    opt.require(x.lt(10))?;
    opt.require((&x % 3).equals(1))?;
    opt.concretize_with(Objective::maximize(&x))?;
    assert_eq!(x.as_i64()?, 7);
    Ok(())
}

#[test]
fn objectives_are_lexicographic() -> hysym::Result<()> {
    let mut s = Session::new(BoundedBackend::new());
    let mut opt = s.optimizer();
    let x = opt.int("x")?;
    let y = opt.int("y")?;
    opt.require((&x + &y).le(4))?;
    opt.require(x.ge(0))?;
    opt.require(y.ge(0))?;
    // Every split of 4 ties on the first objective.
    opt.maximize(&x + &y)?;
    opt.minimize(&x)?;
    opt.concretize()?;

    assert_eq!(x.as_i64()?, 0);
    assert_eq!(y.as_i64()?, 4);
    Ok(())
}

#[test]
fn optimizing_an_unsatisfiable_scope() -> hysym::Result<()> {
    let mut s = Session::new(BoundedBackend::new());
    let mut opt = s.optimizer();
    let x = opt.int("x")?;
    opt.require(x.gt(&x))?;
    opt.minimize(&x)?;
    assert!(opt.check_sat()?.is_unsat());
    Ok(())
}
