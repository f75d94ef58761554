//! Pairwise compatibility measures.

use crate::edges::EdgeSet;
use crate::error::{Error, Result};
use crate::geom::{self, Point, EPS};
use crate::params::BundlingParams;

/// Raw measure for a pair `(i, j)`, before binarization of `C` and sign negation.
pub type MeasureFn = fn(&EdgeSet, usize, usize, &CompatCfg) -> Result<f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Measure {
    Simple,
    Standard,
}

impl Measure {
    /// Resolve the strategy once; the per-pair loop calls the returned function.
    pub fn resolve(self) -> MeasureFn {
        match self {
            Measure::Simple => simple_measure,
            Measure::Standard => standard_compatibility,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Measure::Simple => "simple",
            Measure::Standard => "standard",
        }
    }
}

/// Compatibility settings derived from `BundlingParams`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompatCfg {
    pub measure: Measure,
    pub threshold: f64,
    pub binary: bool,
    pub direction_matters: bool,
    pub repulsion_for_opposite: bool,
}

impl CompatCfg {
    pub fn from_params(p: &BundlingParams) -> Self {
        Self {
            measure: if p.use_simple_compatibility_measure {
                Measure::Simple
            } else {
                Measure::Standard
            },
            threshold: p.compatibility_threshold,
            binary: p.binary_compatibility,
            direction_matters: p.direction_affects_compatibility,
            repulsion_for_opposite: p.use_repulsion_for_opposite_edges,
        }
    }
}

/// `l_avg / (l_avg + |s_i - s_j| + |e_i - e_j|)`; 0 if either edge is a self-loop.
pub fn simple_compatibility(edges: &EdgeSet, i: usize, j: usize) -> f64 {
    if edges.is_self_loop(i) || edges.is_self_loop(j) {
        return 0.0;
    }
    let l_avg = (edges.length(i) + edges.length(j)) / 2.0;
    l_avg
        / (l_avg
            + geom::distance(edges.start(i), edges.start(j))
            + geom::distance(edges.end(i), edges.end(j)))
}

fn simple_measure(edges: &EdgeSet, i: usize, j: usize, _cfg: &CompatCfg) -> Result<f64> {
    Ok(simple_compatibility(edges, i, j))
}

/// The four factors of the standard measure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardScores {
    pub angle: f64,
    pub scale: f64,
    pub position: f64,
    pub visibility: f64,
}

impl StandardScores {
    #[inline]
    pub fn product(&self) -> f64 {
        self.angle * self.scale * self.position * self.visibility
    }

    /// Every factor must lie in `[0, 1]`; NaN fails too.
    pub fn check(&self, i: usize, j: usize) -> Result<()> {
        for (name, value) in [
            ("Ca", self.angle),
            ("Cs", self.scale),
            ("Cp", self.position),
            ("Cv", self.visibility),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ScoreOutOfRange { name, value, i, j });
            }
        }
        Ok(())
    }

    fn binarized(self, threshold: f64) -> Self {
        let b = |v: f64| if v >= threshold { 1.0 } else { 0.0 };
        Self {
            angle: b(self.angle),
            scale: b(self.scale),
            position: b(self.position),
            visibility: b(self.visibility),
        }
    }
}

/// Angle, scale, position and visibility scores of a pair of non-loop edges.
pub fn standard_scores(
    edges: &EdgeSet,
    i: usize,
    j: usize,
    direction_matters: bool,
) -> StandardScores {
    let p = edges.direction(i);
    let q = edges.direction(j);
    let (li, lj) = (edges.length(i), edges.length(j));
    let l_avg = (li + lj) / 2.0;

    let cos = geom::cos_angle(p, q);
    let mut angle = if direction_matters {
        (cos + 1.0) / 2.0
    } else {
        cos.abs()
    };
    // Rounding can leave the cosine a hair outside [-1, 1].
    if angle.abs() < EPS {
        angle = 0.0;
    }
    if (angle.abs() - 1.0).abs() < EPS {
        angle = 1.0;
    }

    let scale = 2.0 / (l_avg / li.min(lj) + li.max(lj) / l_avg);
    let position = l_avg / (l_avg + geom::distance(edges.midpoint(i), edges.midpoint(j)));

    // Only (almost) parallel, similar, close edges are checked for visibility.
    let visibility = if angle * scale * position > 0.9 {
        visibility_compatibility(edges.start(i), edges.end(i), edges.start(j), edges.end(j)).min(
            visibility_compatibility(edges.start(j), edges.end(j), edges.start(i), edges.end(i)),
        )
    } else {
        1.0
    };

    StandardScores {
        angle,
        scale,
        position,
        visibility,
    }
}

/// Standard measure with the per-factor range check and optional per-factor binarization.
pub fn standard_compatibility(edges: &EdgeSet, i: usize, j: usize, cfg: &CompatCfg) -> Result<f64> {
    if edges.is_self_loop(i) || edges.is_self_loop(j) {
        return Ok(0.0);
    }
    let scores = standard_scores(edges, i, j, cfg.direction_matters);
    scores.check(i, j)?;
    let scores = if cfg.binary {
        scores.binarized(cfg.threshold)
    } else {
        scores
    };
    Ok(scores.product())
}

/// How well segment `q` is visible from segment `p`: `max(0, 1 - 2|p_m - i_m| / |i_0 - i_1|)`,
/// where `i_0, i_1` are the projections of `q`'s endpoints onto the line through `p`.
pub fn visibility_compatibility(p0: Point, p1: Point, q0: Point, q1: Point) -> f64 {
    let i0 = geom::project_point_to_line(p0, p1, q0);
    let i1 = geom::project_point_to_line(p0, p1, q1);
    let im = geom::midpoint(i0, i1);
    let pm = geom::midpoint(p0, p1);
    (1.0 - 2.0 * geom::distance(pm, im) / geom::distance(i0, i1)).max(0.0)
}

/// Final coefficient of a pair: measure, range check, binarization, repulsion sign.
pub fn edge_compatibility(
    edges: &EdgeSet,
    i: usize,
    j: usize,
    cfg: &CompatCfg,
    measure: MeasureFn,
) -> Result<f64> {
    let mut c = measure(edges, i, j, cfg)?;
    if !(0.0..=1.0).contains(&c) {
        return Err(Error::ScoreOutOfRange {
            name: "C",
            value: c,
            i,
            j,
        });
    }
    if cfg.binary {
        c = if c >= cfg.threshold { 1.0 } else { 0.0 };
    }
    if cfg.repulsion_for_opposite && edges.direction(i).dot(&edges.direction(j)) < 0.0 {
        c = -c;
    }
    Ok(c)
}
