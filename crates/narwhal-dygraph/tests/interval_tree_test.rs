use narwhal_dygraph::{Interval, IntervalTree};

fn sample() -> IntervalTree<&'static str> {
    [
        (Interval::closed(0.0, 10.0), "long"),
        (Interval::closed(2.0, 3.0), "short"),
        (Interval::left_closed(3.0, 5.0), "half-open"),
        (Interval::closed(8.0, 12.0), "late"),
        (Interval::point(6.0), "instant"),
    ]
    .into_iter()
    .collect()
}

fn names(hits: Vec<(&Interval, &&'static str)>) -> Vec<&'static str> {
    hits.into_iter().map(|(_, v)| *v).collect()
}

#[test]
fn stabbing_query_respects_bounds() {
    let tree = sample();
    assert_eq!(names(tree.stab(3.0)), vec!["long", "short", "half-open"]);
    assert_eq!(names(tree.stab(5.0)), vec!["long"]);
    assert_eq!(names(tree.stab(6.0)), vec!["long", "instant"]);
    assert_eq!(names(tree.stab(11.0)), vec!["late"]);
    assert!(tree.stab(13.0).is_empty());
}

#[test]
fn overlap_query_matches_linear_scan() {
    let tree = sample();
    let queries = [
        Interval::closed(-1.0, 0.0),
        Interval::open(5.0, 6.0),
        Interval::closed(5.0, 6.0),
        Interval::closed(10.5, 20.0),
        Interval::closed(4.0, 9.0),
    ];
    for q in queries {
        let expected: Vec<&str> = tree
            .iter()
            .filter(|(i, _)| i.overlaps(&q))
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(names(tree.overlapping(&q)), expected, "query {q}");
    }
}

#[test]
fn incremental_inserts_agree_with_bulk_build() {
    let mut tree = IntervalTree::new();
    for (i, v) in sample().iter() {
        tree.insert(*i, *v);
    }
    for t in [0.0, 2.5, 3.0, 6.0, 9.0, 12.0] {
        assert_eq!(names(tree.stab(t)), names(sample().stab(t)));
    }
    assert_eq!(tree.len(), 5);
}
