use hysym::prelude::*;

type E = Expr<BoundedBackend>;

fn session() -> Session<BoundedBackend> {
    Session::new(BoundedBackend::new())
}

#[test]
fn linear_system_concretizes() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    let y = s.int("y")?;
    let sum = &x + &y;
    let diff = &x - &y;
    assert!(!sum.has_concrete_value());

    s.require(sum.equals(10))?;
    s.require(diff.equals(4))?;
    s.concretize()?;

    assert_eq!(x.value()?, Value::from(7));
    assert_eq!(y.value()?, Value::from(3));
    assert!(sum.has_concrete_value());
    assert_eq!(sum.as_i64()?, 10);
    assert_eq!((&x * &y).as_i64()?, 21);
    assert_eq!((&x / 2).as_i64()?, 3);
    assert_eq!((-&y % 5).as_i64()?, 2);
    Ok(())
}

#[test]
fn boolean_connectives_before_and_after_concretization() -> hysym::Result<()> {
    let mut s = session();
    let p = s.bool("p")?;
    let q = s.bool("q")?;

    let conj = &p & &q;
    let disj = &p | &q;
    let exclusive = &p ^ &q;
    assert!(!conj.has_concrete_value());
    assert!(conj.as_bool().unwrap_err().is_not_concrete());

    s.require(&p)?;
    s.require(!&q)?;
    s.concretize()?;

    assert!(p.value()?.as_bool().unwrap());
    assert!(!conj.as_bool()?);
    assert!(disj.as_bool()?);
    assert!(exclusive.as_bool()?);
    assert!(implies(&q, &p).as_bool()?);
    assert!(!iff(&p, &q).as_bool()?);

    // De Morgan on the concrete values.
    let lhs = !(&p & &q);
    let rhs = !&p | !&q;
    assert_eq!(lhs.as_bool()?, rhs.as_bool()?);
    assert!(lhs.is_literal());
    Ok(())
}

#[test]
fn implication_forces_the_consequent() -> hysym::Result<()> {
    let mut s = session();
    let p = s.bool("p")?;
    let q = s.bool("q")?;
    s.require(implies(&p, &q))?;
    s.require(&p)?;
    s.concretize()?;
    assert!(q.value()?.as_bool().unwrap());
    Ok(())
}

#[test]
fn conditional_choice_stays_deferred() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    let y = s.int("y")?;
    let p = s.bool("p")?;

    let choice = ite(x.gt(5), &y, 0);
    assert_eq!(choice.kind(), Kind::Int);
    s.require(choice.equals(3))?;
    s.require(ite(&p, ite(x.lt(0), 1, 2), 3).equals(2))?;
    s.concretize()?;

    assert!(x.as_i64()? > 5);
    assert_eq!(y.as_i64()?, 3);
    assert!(p.as_bool()?);
    // Never concrete, even once every operand is bound.
    assert!(!choice.has_concrete_value());
    Ok(())
}

#[test]
fn require_accepts_true_and_rejects_false() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    s.require(true)?;
    s.require(E::literal(2).lt(3))?;
    assert!(s.assertions().is_empty());

    let err = s.require(E::literal(2).gt(3)).unwrap_err();
    assert!(matches!(err, Error::InvalidConstraint { .. }));
    let err = s.require(&x).unwrap_err();
    assert!(matches!(err, Error::InvalidConstraint { ref kind, .. } if kind == "Int"));
    Ok(())
}

#[test]
fn unbound_symbols_refuse_value_access() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    let y = s.int("y")?;
    s.require(x.equals(1))?;
    s.concretize()?;

    assert!(x.is_bound());
    // The model never had to decide `y`.
    assert!(!y.is_bound());
    assert_eq!(
        y.value(),
        Err(Error::UnboundValueAccess {
            name: y.name().to_string()
        })
    );
    assert_eq!(s.tracked(), 1);
    Ok(())
}

#[test]
fn binding_is_idempotent() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    s.require(x.equals(3))?;
    s.concretize()?;
    let pinned = s.assertions().len();
    assert_eq!(pinned, 2);

    s.concretize()?;
    s.concretize()?;
    assert_eq!(s.assertions().len(), pinned);
    assert_eq!(x.value()?, Value::from(3));
    Ok(())
}

#[test]
fn concretization_can_be_disabled() -> hysym::Result<()> {
    let mut s = session();
    s.disable_concretization();
    assert!(!s.concretization_enabled());

    let x = s.int("x")?;
    s.require(x.equals(5))?;
    assert_eq!(s.tracked(), 0);
    assert_eq!(s.concretize().unwrap_err(), Error::ConcretizationDisabled);

    let model = s.model()?;
    assert_eq!(s.evaluate(&model, &x)?, Some(Value::from(5)));
    assert_eq!(model.value_of(&x), Some(Value::from(5)));
    assert!(!x.is_bound());

    s.enable_concretization();
    let z = s.int("z")?;
    s.require(z.equals(&x))?;
    s.concretize()?;
    assert_eq!(z.as_i64()?, 5);
    assert!(!x.is_bound());
    Ok(())
}

#[test]
fn reals_are_decoded_with_fixed_precision() -> hysym::Result<()> {
    let backend = BoundedBackend::with_config(BoundedConfig {
        real_denominator: 8,
        ..BoundedConfig::default()
    });
    let mut s = Session::new(backend);
    let coarse = s.real_with_precision("coarse", 2)?;
    let fine = s.real("fine")?;
    s.require((&coarse * 8).equals(3))?;
    s.require((&fine * 8).equals(-5))?;
    let model = s.concretize()?;

    let expected: bigdecimal::BigDecimal = "0.38".parse().unwrap();
    assert_eq!(coarse.precision(), 2);
    assert_eq!(coarse.as_decimal()?, expected);
    assert_eq!(fine.value()?, Value::Real("-0.625".parse().unwrap()));
    assert_eq!(model.value_of(&coarse), Some(Value::Real("0.375".parse().unwrap())));
    Ok(())
}

#[test]
fn folding_uses_unrounded_model_values() -> hysym::Result<()> {
    let config = SessionConfig {
        real_precision: 1,
        ..SessionConfig::default()
    };
    let backend = BoundedBackend::with_config(BoundedConfig {
        real_denominator: 4,
        ..BoundedConfig::default()
    });
    let mut s = Session::with_config(backend, config);
    let r = s.real("r")?;
    let three_quarters = (&r * 4).equals(3);
    s.require(&three_quarters)?;
    let model = s.concretize()?;

    // 0.75 reads as 0.8 on the host side only.
    assert_eq!(r.value()?, Value::Real("0.8".parse().unwrap()));
    assert_eq!(E::from(&r).as_f64()?, 0.8);
    assert_eq!(s.evaluate(&model, &r)?, Some(Value::Real("0.8".parse().unwrap())));
    assert!(three_quarters.has_concrete_value());
    assert!(three_quarters.as_bool()?);
    assert_eq!((&r * 4).as_f64()?, 3.0);
    s.require((&r * 4).equals(3))?;
    assert!(s.require((&r * 4).equals(1)).unwrap_err().is_invalid_constraint());
    assert!(s.check_sat()?.is_sat());
    Ok(())
}

#[test]
fn quantifiers_do_not_hide_free_symbols() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    s.require(x.equals(3))?;
    let reflexive = forall([&x], x.equals(&x));
    assert!(!reflexive.has_concrete_value());
    s.concretize()?;

    assert!(x.is_bound());
    assert_eq!(x.as_i64()?, 3);
    assert_eq!(s.tracked(), 0);
    Ok(())
}

#[test]
fn symbols_can_be_free_and_quantified() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    s.require(x.equals(3))?;
    s.require(exists([&x], x.gt(5)))?;
    s.concretize()?;
    assert_eq!(x.as_i64()?, 3);

    // The quantifier rebinds `x`, so its binding does not leak into the body.
    s.require(exists([&x], x.equals(5)))?;
    s.require(neg(forall([&x], x.equals(3))))?;
    assert!(s.check_sat()?.is_sat());
    Ok(())
}

#[test]
fn unsatisfiable_scopes_report_their_status() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    s.require(x.gt(3))?;
    s.require(x.lt(2))?;
    assert!(s.check_sat()?.is_unsat());
    assert_eq!(
        s.concretize().unwrap_err(),
        Error::NoModel {
            status: SatStatus::Unsat
        }
    );
    assert!(!x.is_bound());
    Ok(())
}

#[test]
fn expressions_render_as_infix_text() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    let p = s.bool("p")?;
    let e = implies(&p, (&x + 1).gt(2));
    assert_eq!(e.to_string(), "p:1 => x:0 + 1 > 2");
    assert_eq!(e.pretty_string(), e.to_string());
    Ok(())
}

#[test]
fn session_config_sets_tracking_and_precision() -> hysym::Result<()> {
    let config = SessionConfig {
        real_precision: 1,
        track_symbols: false,
    };
    let backend = BoundedBackend::with_config(BoundedConfig {
        real_denominator: 4,
        ..BoundedConfig::default()
    });
    let mut s = Session::with_config(backend, config);
    assert!(!s.concretization_enabled());

    let r = s.real("r")?;
    assert_eq!(r.precision(), 1);
    s.require((&r * 4).equals(3))?;
    let model = s.model()?;
    assert_eq!(s.evaluate(&model, &r)?, Some(Value::Real("0.8".parse().unwrap())));
    assert_eq!(model.value_of(&r), Some(Value::Real("0.75".parse().unwrap())));
    Ok(())
}
