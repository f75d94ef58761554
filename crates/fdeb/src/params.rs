//! Bundling parameters.
//!
//! - `BundlingParams`: everything a run needs, captured once at run start.
//! - `Default` carries the flow-map tool's defaults; `validate` checks the ranges
//!   a run relies on before any computation starts.
//! - `normalized` resolves flag combinations that are meaningless together.
//! - With the `serde` feature, parameters (de)serialize field by field; missing
//!   fields take their defaults and unknown fields are rejected.

use crate::error::{Error, Result};

/// Parameters of one bundling run.
///
/// Notation follows Holten & van Wijk: `p` subdivision points, `s` step size,
/// `i` iterations per cycle, `k` global spring stiffness.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct BundlingParams {
    pub num_cycles: usize,
    /// Initial subdivision point count. Cycle 0 places exactly one midpoint, so this must be 1.
    pub p: usize,
    /// Initial step size; should not exceed 1.
    pub s: f64,
    /// Initial iterations per cycle.
    pub i: usize,
    pub k: f64,
    /// Fraction by which `s` shrinks every cycle after the first, in `[0, 1)`.
    pub step_damping_factor: f64,
    /// Growth factor of `p` per cycle after the first, `> 1`.
    pub subdivision_increase_rate: f64,
    /// Pairs with `|C|` below this are dropped, in `[0, 1]`.
    pub compatibility_threshold: f64,
    pub direction_affects_compatibility: bool,
    pub binary_compatibility: bool,
    pub use_inverse_quadratic_model: bool,
    /// Compatible edges pointing in opposite directions repel each other.
    pub use_repulsion_for_opposite_edges: bool,
    pub use_simple_compatibility_measure: bool,
    /// Heavier edges attract lighter ones more strongly (needs edge weights).
    pub edge_value_affects_attraction: bool,
    pub repulsion_amount: f64,
    /// Publish points after every committed cycle instead of once at the end.
    pub update_after_each_cycle: bool,
}

impl Default for BundlingParams {
    fn default() -> Self {
        Self {
            num_cycles: 10,
            p: 1,
            s: 1.0,
            i: 100,
            k: 0.1,
            step_damping_factor: 0.5,
            subdivision_increase_rate: 1.3,
            compatibility_threshold: 0.60,
            direction_affects_compatibility: true,
            binary_compatibility: false,
            use_inverse_quadratic_model: false,
            use_repulsion_for_opposite_edges: false,
            use_simple_compatibility_measure: false,
            edge_value_affects_attraction: false,
            repulsion_amount: 1.0,
            update_after_each_cycle: true,
        }
    }
}

impl BundlingParams {
    /// Precondition check, run before any computation.
    pub fn validate(&self) -> Result<()> {
        if self.num_cycles == 0 {
            return Err(Error::config("num_cycles", "must be positive"));
        }
        if self.i == 0 {
            return Err(Error::config("i", "must be positive"));
        }
        if self.p != 1 {
            return Err(Error::config(
                "p",
                format!("the first cycle places one midpoint per edge, got p = {}", self.p),
            ));
        }
        if !(self.s.is_finite() && self.s > 0.0) {
            return Err(Error::config("s", format!("must be positive, got {}", self.s)));
        }
        if !self.k.is_finite() {
            return Err(Error::config("k", format!("must be finite, got {}", self.k)));
        }
        if !(self.subdivision_increase_rate.is_finite() && self.subdivision_increase_rate > 1.0) {
            return Err(Error::config(
                "subdivision_increase_rate",
                format!("must be greater than 1, got {}", self.subdivision_increase_rate),
            ));
        }
        if !(0.0..1.0).contains(&self.step_damping_factor) {
            return Err(Error::config(
                "step_damping_factor",
                format!("must lie in [0, 1), got {}", self.step_damping_factor),
            ));
        }
        if !(0.0..=1.0).contains(&self.compatibility_threshold) {
            return Err(Error::config(
                "compatibility_threshold",
                format!("must lie in [0, 1], got {}", self.compatibility_threshold),
            ));
        }
        if !(self.repulsion_amount.is_finite() && self.repulsion_amount >= 0.0) {
            return Err(Error::config(
                "repulsion_amount",
                format!("must be non-negative, got {}", self.repulsion_amount),
            ));
        }
        Ok(())
    }

    /// Direction only matters for the standard measure without repulsion;
    /// otherwise it is forced off.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        if out.use_simple_compatibility_measure || out.use_repulsion_for_opposite_edges {
            out.direction_affects_compatibility = false;
        }
        out
    }

    /// Derive `k` from the extent of the node bounding box: `ord(min(w, h) / 1000)`.
    pub fn with_extent_stiffness(mut self, width: f64, height: f64) -> Self {
        self.k = default_stiffness(width, height);
        self
    }
}

/// Spring stiffness the flow-map tool uses for a layout of the given extent.
pub fn default_stiffness(width: f64, height: f64) -> f64 {
    order_of_magnitude(width.min(height) / 1000.0)
}

/// Largest power of ten not exceeding `x`; 0 for non-positive or non-finite `x`.
pub fn order_of_magnitude(x: f64) -> f64 {
    if !(x.is_finite() && x > 0.0) {
        return 0.0;
    }
    let e = x.log10().floor() as i32;
    let mut ord = 10f64.powi(e);
    // log10 can land one ulp on the wrong side of an exact power.
    if ord > x {
        ord = 10f64.powi(e - 1);
    } else if ord * 10.0 <= x {
        ord = 10f64.powi(e + 1);
    }
    ord
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * b.abs().max(1.0)
    }

    #[test]
    fn defaults_are_valid() {
        let p = BundlingParams::default();
        p.validate().unwrap();
        assert_eq!(p.num_cycles, 10);
        assert_eq!(p.i, 100);
        assert!(close(p.compatibility_threshold, 0.6));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            BundlingParams {
                num_cycles: 0,
                ..Default::default()
            },
            BundlingParams {
                i: 0,
                ..Default::default()
            },
            BundlingParams {
                p: 2,
                ..Default::default()
            },
            BundlingParams {
                s: 0.0,
                ..Default::default()
            },
            BundlingParams {
                subdivision_increase_rate: 1.0,
                ..Default::default()
            },
            BundlingParams {
                step_damping_factor: 1.0,
                ..Default::default()
            },
            BundlingParams {
                compatibility_threshold: 1.5,
                ..Default::default()
            },
            BundlingParams {
                repulsion_amount: f64::NAN,
                ..Default::default()
            },
        ];
        for p in bad {
            assert!(
                matches!(p.validate(), Err(Error::InvalidConfig { .. })),
                "accepted {p:?}"
            );
        }
    }

    #[test]
    fn normalization_clears_direction_flag() {
        let simple = BundlingParams {
            use_simple_compatibility_measure: true,
            ..Default::default()
        };
        assert!(!simple.normalized().direction_affects_compatibility);
        let repulsive = BundlingParams {
            use_repulsion_for_opposite_edges: true,
            ..Default::default()
        };
        assert!(!repulsive.normalized().direction_affects_compatibility);
        assert!(BundlingParams::default().normalized().direction_affects_compatibility);
    }

    #[test]
    fn order_of_magnitude_cases() {
        assert!(close(order_of_magnitude(1234.0), 1000.0));
        assert!(close(order_of_magnitude(1000.0), 1000.0));
        assert!(close(order_of_magnitude(0.5), 0.1));
        assert!(close(order_of_magnitude(7.0), 1.0));
        assert_eq!(order_of_magnitude(0.0), 0.0);
        assert_eq!(order_of_magnitude(-3.0), 0.0);
        assert_eq!(order_of_magnitude(f64::INFINITY), 0.0);
    }

    #[test]
    fn stiffness_from_extent() {
        let p = BundlingParams::default().with_extent_stiffness(800.0, 350.0);
        assert!(close(p.k, 0.1));
    }
}
