use narwhal_dygraph::{Evolution, Function, Interpolation, Interval, coords};

#[test]
fn default_value_outside_every_interval() {
    let mut e = Evolution::new(-1.0);
    e.insert(Function::constant(Interval::closed(0.0, 2.0), 4.0));
    e.insert(Function::constant(Interval::closed(5.0, 7.0), 6.0));

    for t in [-10.0, -0.001, 2.5, 4.999, 7.001, 100.0] {
        assert_eq!(e.value_at(t), -1.0, "t = {t}");
    }
}

#[test]
fn interior_points_take_the_function_value() {
    let mut e = Evolution::new(0.0);
    e.insert(Function::constant(Interval::closed(0.0, 2.0), 4.0));
    e.insert(Function::transition(
        Interval::closed(3.0, 5.0),
        10.0,
        20.0,
        Interpolation::Linear,
    ));

    assert_eq!(e.value_at(1.0), 4.0);
    assert_eq!(e.value_at(4.0), 15.0);
}

#[test]
fn open_right_bound_excludes_the_boundary() {
    let mut half_open = Evolution::new(false);
    half_open.insert(Function::constant(Interval::left_closed(1.0, 3.0), true));
    let mut closed = Evolution::new(false);
    closed.insert(Function::constant(Interval::closed(1.0, 3.0), true));

    assert!(!half_open.value_at(3.0));
    assert!(closed.value_at(3.0));
    assert!(half_open.value_at(1.0));
}

#[test]
fn merging_overlapping_presences_yields_one_interval() {
    let mut e = Evolution::new(false);
    e.insert(Function::constant(Interval::closed(0.0, 5.0), true));
    e.insert(Function::constant(Interval::closed(3.0, 8.0), true));

    let merged = narwhal_dygraph::evolution::merge_functions(&e);
    let intervals: Vec<Interval> = merged.iter().map(|f| *f.interval()).collect();
    assert_eq!(intervals, vec![Interval::closed(0.0, 8.0)]);
    // Read-only analysis leaves the source untouched.
    assert_eq!(e.len(), 2);

    e.merge();
    assert_eq!(e.len(), 1);
    assert!(e.is_disjoint());
    assert!(e.value_at(6.0));
}

#[test]
fn merge_coalesces_touching_but_not_separate_intervals() {
    let mut e = Evolution::new(false);
    e.insert(Function::constant(Interval::closed(6.0, 9.0), true));
    e.insert(Function::constant(Interval::left_closed(0.0, 2.0), true));
    e.insert(Function::constant(Interval::closed(2.0, 4.0), true));

    e.merge();
    let intervals: Vec<Interval> = e.iter().map(|f| *f.interval()).collect();
    assert_eq!(
        intervals,
        vec![Interval::closed(0.0, 4.0), Interval::closed(6.0, 9.0)]
    );
}

#[test]
fn zero_width_functions_are_legal() {
    let mut e = Evolution::new(0_i64);
    e.insert(Function::constant(Interval::point(3.0), 1));
    assert_eq!(e.value_at(3.0), 1);
    assert_eq!(e.value_at(3.0001), 0);
}

#[test]
fn position_transitions_interpolate_vectors() {
    let mut e = Evolution::new(coords(0.0, 0.0, 0.0));
    e.insert(Function::transition(
        Interval::closed(0.0, 4.0),
        coords(0.0, 0.0, 0.0),
        coords(4.0, 8.0, 0.0),
        Interpolation::Linear,
    ));
    assert_eq!(e.value_at(1.0), coords(1.0, 2.0, 0.0));
}

#[test]
fn iteration_is_ordered_and_restartable() {
    let mut e = Evolution::new(0.0);
    for left in [7.0, 1.0, 4.0] {
        e.insert(Function::constant(Interval::closed(left, left + 1.0), left));
    }
    let first: Vec<f64> = e.iter().map(|f| f.interval().left_bound()).collect();
    let second: Vec<f64> = e.iter().map(|f| f.interval().left_bound()).collect();
    assert_eq!(first, vec![1.0, 4.0, 7.0]);
    assert_eq!(first, second);
}
