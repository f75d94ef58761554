//! One force-integration pass over all subdivision points.
//!
//! Each point of a non-loop edge feels
//! - a spring force toward its same-edge neighbours (endpoints fixed), and
//! - an electrostatic force toward the point with the same index on every
//!   compatible edge, scaled by the compatibility coefficient.
//!
//! Positions are read from one buffer and written to another, so every point
//! in a pass sees the same snapshot. Edges are independent within a pass.

use std::ops::ControlFlow;

use crate::compat::CompatibilityLists;
use crate::edges::EdgeSet;
use crate::geom::{Point, EPS};
use crate::params::BundlingParams;
use crate::progress::Control;

/// Force settings for one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceCfg {
    pub k: f64,
    /// Step size of the current cycle.
    pub s: f64,
    pub inverse_quadratic: bool,
    pub repulsion_amount: f64,
    pub value_affects_attraction: bool,
}

impl ForceCfg {
    pub fn new(params: &BundlingParams, s: f64) -> Self {
        Self {
            k: params.k,
            s,
            inverse_quadratic: params.use_inverse_quadratic_model,
            repulsion_amount: params.repulsion_amount,
            value_affects_attraction: params.edge_value_affects_attraction,
        }
    }
}

/// Per-segment spring constant `K / (length · (P + 1))`.
#[inline]
pub fn spring_constant(k: f64, length: f64, p: usize) -> f64 {
    k / (length * (p + 1) as f64)
}

/// `k_p · ((prev - p) + (next - p))`; the constant is only applied when `|k_p| < 1`.
#[inline]
pub fn spring_force(prev: Point, p: Point, next: Point, k_p: f64) -> Point {
    let f = (prev - p) + (next - p);
    if k_p.abs() < 1.0 {
        f * k_p
    } else {
        f
    }
}

/// Magnitude factor `m` of the electrostatic pull along `v` (so the force is `v·m`).
///
/// `m = C/d²` (or `C/d³`), scaled by the repulsion amount for `C < 0` and by
/// the value coefficient. A single step never moves farther than the attracting
/// point: if `|m·S| > 1` then `m = sign(m)/S`.
#[inline]
pub fn electrostatic_factor(c: f64, d: f64, value_coeff: f64, cfg: &ForceCfg) -> f64 {
    let mut m = if cfg.inverse_quadratic {
        (c / d) / (d * d)
    } else {
        (c / d) / d
    };
    if c < 0.0 {
        m *= cfg.repulsion_amount;
    }
    m *= value_coeff;
    // The force beyond the clamp is dropped rather than carried over.
    if (m * cfg.s).abs() > 1.0 {
        m = m.signum() / cfg.s;
    }
    m
}

/// New positions for edge `e`, read from `read`, written to `out` (same length).
pub fn integrate_edge(
    edges: &EdgeSet,
    compat: &CompatibilityLists,
    cfg: &ForceCfg,
    read: &[Vec<Point>],
    e: usize,
    out: &mut [Point],
) {
    let p = &read[e];
    let count = p.len();
    let k_p = spring_constant(cfg.k, edges.length(e), count);
    let compatible = compat.compatible(e);
    let values = if cfg.value_affects_attraction {
        edges.values()
    } else {
        None
    };

    for i in 0..count {
        let p_i = p[i];
        let prev = if i == 0 { edges.start(e) } else { p[i - 1] };
        let next = if i == count - 1 { edges.end(e) } else { p[i + 1] };
        let f_spring = spring_force(prev, p_i, next, k_p);

        let mut f_electro = Point::zeros();
        for ce in compatible {
            let v = read[ce.edge][i] - p_i;
            // Zero vector has no direction.
            if v.x.abs() > EPS || v.y.abs() > EPS {
                let d = v.norm();
                let coeff = values.map_or(1.0, |vals| vals.attraction_coefficient(e, ce.edge));
                f_electro += v * electrostatic_factor(ce.c, d, coeff, cfg);
            }
        }

        out[i] = p_i + (f_spring + f_electro) * cfg.s;
    }
}

/// One pass over all edges. Polls cancellation once per edge.
///
/// Pre: `read` and `write` have the same shape; self-loop entries are empty.
pub fn integrate_pass(
    edges: &EdgeSet,
    compat: &CompatibilityLists,
    cfg: &ForceCfg,
    read: &[Vec<Point>],
    write: &mut [Vec<Point>],
    ctl: &mut Control<'_>,
) -> ControlFlow<()> {
    for e in 0..edges.len() {
        if ctl.is_cancelled() {
            return ControlFlow::Break(());
        }
        if !edges.is_self_loop(e) {
            integrate_edge(edges, compat, cfg, read, e, &mut write[e]);
        }
        ctl.progress.inc_subtask();
    }
    ControlFlow::Continue(())
}
