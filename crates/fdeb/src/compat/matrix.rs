//! Sparse symmetric compatibility lists (O(E²) construction).

use std::ops::ControlFlow;

use tracing::{debug, info};

use super::measures::{edge_compatibility, CompatCfg};
use crate::edges::EdgeSet;
use crate::error::Result;
use crate::progress::Control;

/// Entry of an edge's compatibility list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompatibleEdge {
    pub edge: usize,
    pub c: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompatibilityStats {
    pub pairs_examined: usize,
    pub compatible_pairs: usize,
    /// Mean `|C|` over all examined pairs.
    pub mean_abs_c: f64,
}

impl CompatibilityStats {
    /// Share of examined pairs that were kept, in percent.
    pub fn compatible_ratio_pct(&self) -> f64 {
        if self.pairs_examined == 0 {
            return 0.0;
        }
        self.compatible_pairs as f64 * 100.0 / self.pairs_examined as f64
    }
}

/// Per-edge lists of compatible edges; `j ∈ lists[i]` iff `i ∈ lists[j]`, with the same `C`.
#[derive(Clone, Debug, Default)]
pub struct CompatibilityLists {
    lists: Vec<Vec<CompatibleEdge>>,
    stats: CompatibilityStats,
}

impl CompatibilityLists {
    pub fn len(&self) -> usize {
        self.lists.len()
    }
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
    /// Compatible edges of `edge`; empty before the lists are built.
    #[inline]
    pub fn compatible(&self, edge: usize) -> &[CompatibleEdge] {
        self.lists.get(edge).map(Vec::as_slice).unwrap_or(&[])
    }
    pub fn stats(&self) -> CompatibilityStats {
        self.stats
    }
}

/// Score all unordered pairs and keep those with `|C| ≥ threshold`.
///
/// Polls cancellation once per pair; returns `Break` when cancelled.
pub fn build_compatibility_lists(
    edges: &EdgeSet,
    cfg: &CompatCfg,
    ctl: &mut Control<'_>,
) -> Result<ControlFlow<(), CompatibilityLists>> {
    let n = edges.len();
    ctl.progress.start_subtask("Allocating memory", 0.05);
    let mut lists: Vec<Vec<CompatibleEdge>> = vec![Vec::new(); n];
    ctl.progress.subtask_completed();

    info!(measure = cfg.measure.name(), edges = n, "calculating compatibility measures");
    ctl.progress
        .start_subtask("Precalculating edge compatibility measures", 0.95);
    if n > 0 {
        ctl.progress.set_subtask_increment(100.0 / n as f64);
    }

    let measure = cfg.measure.resolve();
    let mut pairs_examined = 0usize;
    let mut compatible_pairs = 0usize;
    let mut abs_sum = 0.0;
    for i in 0..n {
        for j in 0..i {
            if ctl.is_cancelled() {
                return Ok(ControlFlow::Break(()));
            }
            pairs_examined += 1;
            if edges.is_self_loop(i) || edges.is_self_loop(j) {
                continue;
            }
            let c = edge_compatibility(edges, i, j, cfg, measure)?;
            if c.abs() >= cfg.threshold {
                lists[i].push(CompatibleEdge { edge: j, c });
                lists[j].push(CompatibleEdge { edge: i, c });
                compatible_pairs += 1;
            }
            abs_sum += c.abs();
        }
        ctl.progress.inc_subtask();
    }
    if ctl.is_cancelled() {
        return Ok(ControlFlow::Break(()));
    }
    ctl.progress.subtask_completed();

    let stats = CompatibilityStats {
        pairs_examined,
        compatible_pairs,
        mean_abs_c: if pairs_examined > 0 {
            abs_sum / pairs_examined as f64
        } else {
            0.0
        },
    };
    debug!(
        mean_abs_c = stats.mean_abs_c,
        ratio_pct = (stats.compatible_ratio_pct() * 100.0).round() / 100.0,
        "compatibility statistics"
    );
    Ok(ControlFlow::Continue(CompatibilityLists { lists, stats }))
}
