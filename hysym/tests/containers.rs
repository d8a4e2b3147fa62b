use hysym::prelude::*;

fn session() -> Session<BoundedBackend> {
    Session::new(BoundedBackend::new())
}

#[test]
fn arrays_bind_and_pin_every_element() -> hysym::Result<()> {
    let mut s = session();
    let a = s.int_array("a")?;
    let first = a.at(0);
    let second = a.at(1);
    assert!(a.at(0).same(&first));
    assert_eq!(first.name(), "a:0[0]");
    assert_eq!(a.accessed(), 2);

    s.require(first.equals(5))?;
    s.require((&first + &second).equals(7))?;
    s.concretize()?;

    assert!(a.is_bound());
    assert_eq!(first.as_i64()?, 5);
    assert_eq!(second.as_i64()?, 2);
    // Two constraints plus one pin per element.
    assert_eq!(s.assertions().len(), 4);
    assert_eq!(s.tracked(), 0);
    Ok(())
}

#[test]
fn arrays_select_at_symbolic_indices() -> hysym::Result<()> {
    let mut s = session();
    let a = s.int_array("a")?;
    let i = s.int("i")?;

    let selected = a.select(&i);
    assert!(!selected.has_concrete_value());
    assert!(!a.select(2).has_concrete_value());

    s.require(selected.equals(9))?;
    s.require(i.equals(3))?;
    s.concretize()?;

    assert_eq!(i.as_i64()?, 3);
    // Accessors created after binding are bound on creation.
    assert_eq!(a.at(3).as_i64()?, 9);
    assert!(!selected.has_concrete_value());
    Ok(())
}

#[test]
fn functions_are_interpreted_once_bound() -> hysym::Result<()> {
    let mut s = session();
    let int = s.int_sort();
    let f = s.function("f", &[&int], &int)?;
    let x = s.int("x")?;
    assert_eq!(f.arity(), 1);
    assert_eq!(f.name(), "f");

    s.require(f.call([1])?.equals(5))?;
    s.require(f.call([&x])?.equals(6))?;
    s.concretize()?;

    assert!(f.is_bound());
    assert_ne!(x.as_i64()?, 1);
    let at_one = f.call([1])?;
    assert!(at_one.is_literal());
    assert_eq!(at_one.as_i64()?, 5);
    assert_eq!(f.call([&x])?.as_i64()?, 6);
    // Functions stay tracked after binding.
    assert_eq!(s.tracked(), 1);

    assert_eq!(
        f.call([1, 2]).unwrap_err(),
        Error::ArityMismatch {
            name: "f".to_string(),
            expected: 1,
            found: 2
        }
    );
    Ok(())
}

#[test]
fn custom_sorts_with_quantified_functions() -> hysym::Result<()> {
    let mut s = session();
    let node = s.sort("Node")?;
    let next = s.function("next", &[&node], &node)?;
    let a = s.symbolic("a", &node)?;
    let b = s.symbolic("b", &node)?;
    let n = s.symbolic("n", &node)?;

    // `next` swaps two distinct nodes.
    s.require(a.not_equals(&b))?;
    s.require(next.call([&a])?.equals(&b))?;
    s.require(forall([&n], next.call([next.call([&n])?])?.equals(&n)))?;
    assert_eq!(s.tracked(), 4);

    s.concretize()?;
    let a_value = a.as_object()?;
    let b_value = b.as_object()?;
    assert_ne!(a_value, b_value);
    assert_eq!(a_value.sort(), "Node");
    // `n` only occurs under the quantifier, so the model leaves it unassigned.
    assert!(!n.is_bound());
    assert_eq!(s.tracked(), 2);

    assert!(next.call([&b])?.equals(&a).as_bool()?);
    assert_eq!(next.call([&a])?.as_object()?, b_value);
    Ok(())
}

#[test]
fn existential_witnesses_stay_symbolic() -> hysym::Result<()> {
    let mut s = session();
    let x = s.int("x")?;
    let w = s.int("w")?;
    s.require(exists([&w], (&w * 2).equals(&x)))?;
    s.require(x.gt(2))?;
    s.concretize()?;

    assert_eq!(x.as_i64()? % 2, 0);
    assert!(!w.is_bound());
    assert!(w.value().unwrap_err().is_unbound_value_access());
    Ok(())
}

#[test]
fn folds_over_expressions() -> hysym::Result<()> {
    let mut s = session();
    let xs = (0..3)
        .map(|_| s.int("x"))
        .collect::<hysym::Result<Vec<_>>>()?;
    s.require(all(xs.iter().map(|x| x.gt(0))))?;
    s.require(any(xs.iter().map(|x| x.equals(2))))?;
    s.require(all(xs.windows(2).map(|w| w[0].lt(&w[1]))))?;
    s.concretize()?;

    let values = xs
        .iter()
        .map(Symbol::as_i64)
        .collect::<hysym::Result<Vec<_>>>()?;
    assert_eq!(values, vec![1, 2, 3]);
    Ok(())
}
