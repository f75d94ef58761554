//! Criterion microbenches for the compatibility precalculation.
//!
//! - Standard vs simple measure on 100/400 random edges.
//! - Cost is quadratic in the edge count; the sweep makes that visible.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fdeb::api::{
    build_compatibility_lists, draw_flow_edges, BundlingParams, CancelToken, CompatCfg, Control,
    EdgeSet, FlowReplay, NoProgress, SamplerCfg,
};

fn bench_compat(c: &mut Criterion) {
    let mut group = c.benchmark_group("compat");
    for &n in &[100usize, 400] {
        let cfg = SamplerCfg {
            edge_count: n,
            ..Default::default()
        };
        let graph = draw_flow_edges(&cfg, FlowReplay { seed: 42, index: 0 });
        let edges = EdgeSet::capture(&graph, false).unwrap();
        for (label, simple) in [("standard", false), ("simple", true)] {
            let params = BundlingParams {
                use_simple_compatibility_measure: simple,
                ..Default::default()
            }
            .normalized();
            let compat = CompatCfg::from_params(&params);
            group.bench_with_input(BenchmarkId::new(label, n), &edges, |b, edges| {
                let token = CancelToken::new();
                b.iter(|| {
                    let mut sink = NoProgress;
                    let mut ctl = Control::new(&token, &mut sink);
                    let _ = build_compatibility_lists(edges, &compat, &mut ctl).unwrap();
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_compat);
criterion_main!(benches);
