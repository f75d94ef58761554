//! Edge compatibility: which edges attract each other, and how strongly.
//!
//! Purpose
//! - Score every unordered edge pair with a coefficient `C ∈ [-1, 1]` and keep
//!   only pairs with `|C| ≥ threshold`, stored symmetrically as sparse lists.
//!
//! Measures
//! - `Simple`: `l_avg / (l_avg + |s_i - s_j| + |e_i - e_j|)`.
//! - `Standard`: the product of angle, scale, position and visibility scores
//!   from Holten & van Wijk (2009), each in `[0, 1]`.
//! - The measure is resolved once per run into a plain function (`Measure::resolve`).
//!
//! Self-loops score 0 under both measures and never enter any list.

mod matrix;
mod measures;

pub use matrix::{build_compatibility_lists, CompatibilityLists, CompatibilityStats, CompatibleEdge};
pub use measures::{
    edge_compatibility, simple_compatibility, standard_compatibility, standard_scores,
    visibility_compatibility, CompatCfg, Measure, MeasureFn, StandardScores,
};
