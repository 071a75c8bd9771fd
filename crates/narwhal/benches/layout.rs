use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal::placement::{DEFAULT_SEED, XorShift64Star, scatter_around_poles, scatter_nodes};
use narwhal::{Layout, LayoutOptions};
use narwhal_dygraph::{DyEdge, DyGraph, DyNode, Interval};
use std::hint::black_box;
use std::time::Duration;

/// A ring of `n` nodes with chords appearing and disappearing over `[0, 100]`.
fn contact_graph(n: usize, clustered: bool) -> DyGraph {
    let mut g = DyGraph::new();
    let mut rng = XorShift64Star::new(DEFAULT_SEED);
    for i in 0..n {
        let start = (rng.next_f64_unit() * 20.0).floor();
        let end = 80.0 + (rng.next_f64_unit() * 20.0).floor();
        g.add_node(format!("n{i}"), DyNode::present([Interval::closed(start, end)]))
            .unwrap();
    }
    for i in 0..n {
        let j = (i + 1) % n;
        let k = (i + 7) % n;
        for (id, other) in [(format!("r{i}"), j), (format!("c{i}"), k)] {
            if other == i {
                continue;
            }
            let l = 20.0 + (rng.next_f64_unit() * 30.0).floor();
            let r = l + 5.0 + (rng.next_f64_unit() * 25.0).floor();
            g.add_edge(
                id,
                &format!("n{i}"),
                &format!("n{other}"),
                DyEdge::present([Interval::closed(l, r)]),
            )
            .unwrap();
        }
    }
    if clustered {
        for i in (0..n).step_by(10) {
            for m in 1..4 {
                if i + m < n {
                    g.add_cluster_member(&format!("n{i}"), &format!("n{}", i + m))
                        .unwrap();
                }
            }
        }
        scatter_around_poles(&mut g, 50.0, 5.0, 100.0, DEFAULT_SEED);
    } else {
        scatter_nodes(&mut g, 100.0, DEFAULT_SEED);
    }
    g
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_iterations");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for &(n, clustered) in &[(20usize, false), (60, false), (60, true)] {
        let graph = contact_graph(n, clustered);
        let label = if clustered { "clustered" } else { "plain" };
        group.bench_with_input(BenchmarkId::new(label, n), &graph, |b, graph| {
            b.iter_batched(
                || Layout::new(graph.clone(), LayoutOptions::default()).unwrap(),
                |mut layout| black_box(layout.iterate(10)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
