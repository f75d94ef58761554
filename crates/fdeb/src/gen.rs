//! Random flow edges (seeded, replayable).
//!
//! Purpose
//! - Provide a small deterministic sampler of flow graphs for property tests and
//!   benchmarks: endpoints uniform in a box, an optional share of self-loops, and
//!   optional weights.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG, so
//!   draw `k` of a sweep can be reproduced on its own.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::edges::{FlowEdge, FlowEdges};
use crate::geom::Point;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct SamplerCfg {
    pub edge_count: usize,
    /// Lower-left and upper-right corner of the node box.
    pub min: Point,
    pub max: Point,
    /// Share of edges drawn as self-loops, clamped to [0, 1].
    pub self_loop_fraction: f64,
    /// Non-loop edges shorter than this are redrawn.
    pub min_length: f64,
    /// Uniform weight range; `None` leaves edges unweighted.
    pub weights: Option<(f64, f64)>,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            edge_count: 50,
            min: Vector2::new(0.0, 0.0),
            max: Vector2::new(1000.0, 600.0),
            self_loop_fraction: 0.0,
            min_length: 1.0,
            weights: None,
        }
    }
}

/// Draw a flow graph according to `cfg`.
pub fn draw_flow_edges(cfg: &SamplerCfg, tok: ReplayToken) -> FlowEdges {
    let mut rng = tok.to_std_rng();
    let loops = cfg.self_loop_fraction.clamp(0.0, 1.0);
    let min_len = cfg.min_length.max(0.0);
    let point = |rng: &mut StdRng| {
        Vector2::new(
            lerp(cfg.min.x, cfg.max.x, rng.gen::<f64>()),
            lerp(cfg.min.y, cfg.max.y, rng.gen::<f64>()),
        )
    };
    (0..cfg.edge_count)
        .map(|_| {
            let start = point(&mut rng);
            let end = if rng.gen::<f64>() < loops {
                start
            } else {
                // Bounded retries; a degenerate box still yields an edge.
                let mut end = point(&mut rng);
                for _ in 0..32 {
                    if (end - start).norm() >= min_len {
                        break;
                    }
                    end = point(&mut rng);
                }
                end
            };
            let mut edge = FlowEdge::new(start, end);
            if let Some((lo, hi)) = cfg.weights {
                edge = edge.with_weight(lerp(lo, hi, rng.gen::<f64>()));
            }
            edge
        })
        .collect()
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
