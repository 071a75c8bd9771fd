use narwhal_dygraph::{
    Color, DyEdge, DyGraph, DyNode, Function, Interpolation, Interval, PresenceMode, coords,
};

fn two_nodes() -> DyGraph {
    let mut g = DyGraph::new();
    let mut a = DyNode::present([Interval::closed(0.0, 10.0)]);
    a.position.insert(Function::transition(
        Interval::closed(0.0, 10.0),
        coords(0.0, 0.0, 0.0),
        coords(10.0, 0.0, 0.0),
        Interpolation::Linear,
    ));
    g.add_node("a", a).unwrap();
    g.add_node("b", DyNode::present([Interval::closed(5.0, 10.0)]))
        .unwrap();
    g.add_edge("ab", "a", "b", DyEdge::present([Interval::closed(6.0, 8.0)]))
        .unwrap();
    g
}

#[test]
fn snapshot_contains_only_present_elements() {
    let g = two_nodes();

    let early = g.snapshot_at(2.0);
    assert_eq!(early.graph.node_count(), 1);
    assert_eq!(early.graph.edge_count(), 0);
    let a = early.graph.node_ix("a").unwrap();
    assert_eq!(early.graph.node(a).position, coords(2.0, 0.0, 0.0));

    let middle = g.snapshot_at(7.0);
    assert_eq!(middle.graph.node_count(), 2);
    assert_eq!(middle.graph.edge_count(), 1);
    assert_eq!(middle.time, 7.0);
}

#[test]
fn time_extent_spans_all_presences() {
    let g = two_nodes();
    assert_eq!(g.time_extent(), Some(Interval::closed(0.0, 10.0)));
    assert_eq!(DyGraph::new().time_extent(), None);
}

#[test]
fn merge_and_color_fades_edges_in_and_out() {
    let mut g = two_nodes();
    g.merge_and_color(PresenceMode::Plain, 10.0, Color::BLACK, Color::GRAY, 0.5);

    let e = g.graph().edge_ix("ab").unwrap();
    let color = &g.edge(e).color;
    assert_eq!(color.value_at(7.0), Color::GRAY);
    assert_eq!(color.value_at(6.0).a, 0.0);
    assert!(color.value_at(6.25).a > 0.0);
}

#[test]
fn keep_appeared_edges_extends_edges_too() {
    let mut g = two_nodes();
    g.merge_presences(PresenceMode::KeepAppearedEdges, 20.0);
    let e = g.graph().edge_ix("ab").unwrap();
    assert_eq!(g.edge_presence(e), vec![Interval::closed(6.0, 20.0)]);

    let mut plain = two_nodes();
    plain.merge_presences(PresenceMode::KeepAppearedNodes, 20.0);
    assert_eq!(plain.edge_presence(e), vec![Interval::closed(6.0, 8.0)]);
}

#[test]
fn snapshot_resolves_cluster_colors() {
    let mut g = two_nodes();
    let cluster = g.add_cluster("a").unwrap();
    cluster
        .color
        .insert(Function::constant(Interval::closed(0.0, 10.0), Color::WHITE));
    g.add_cluster_member("a", "b").unwrap();

    let before_b = g.snapshot_at(1.0);
    assert_eq!(before_b.clusters.len(), 1);
    assert!(before_b.clusters[0].members.is_empty());

    let both = g.snapshot_at(6.0);
    assert_eq!(both.clusters[0].members.len(), 1);
    assert_eq!(both.clusters[0].color, Color::WHITE);
}

#[test]
fn overriding_absence_agrees_between_presence_and_snapshot() {
    let mut g = DyGraph::new();
    let mut a = DyNode::present([Interval::closed(0.0, 10.0)]);
    a.presence
        .insert(Function::constant(Interval::closed(3.0, 5.0), false));
    let a = g.add_node("a", a).unwrap();

    assert_eq!(
        g.node_presence(a),
        vec![Interval::left_closed(0.0, 3.0), Interval::right_closed(5.0, 10.0)]
    );
    assert!(g.snapshot_at(4.0).graph.node_ix("a").is_none());

    g.merge_presences(PresenceMode::Plain, 10.0);
    assert!(g.snapshot_at(4.0).graph.node_ix("a").is_none());
    assert!(g.snapshot_at(2.0).graph.node_ix("a").is_some());
}
