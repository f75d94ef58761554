//! Run state, cycle schedule and outcome.

/// Lifecycle of a `Bundler`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Initializing,
    /// Last committed cycle (0-based).
    Cycling(usize),
    Finished,
    Cancelled,
    /// `init` returned an error; the run cannot continue.
    Failed,
}

/// Per-cycle simulation parameters `(P, S, I)`.
///
/// `p_exact` keeps the unrounded point count so the growth rate stays stable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Schedule {
    pub p: usize,
    pub p_exact: f64,
    pub s: f64,
    pub i: usize,
}

impl Schedule {
    pub fn initial(p: usize, s: f64, i: usize) -> Self {
        Self {
            p,
            p_exact: p as f64,
            s,
            i,
        }
    }

    /// Parameters of the next cycle: `P` grows by `rate`, `S` shrinks by `damping`, `I` by a third.
    pub fn advance(&self, rate: f64, damping: f64) -> Self {
        let p_exact = self.p_exact * rate;
        Self {
            p: p_exact.round() as usize,
            p_exact,
            s: self.s * (1.0 - damping),
            i: self.i * 2 / 3,
        }
    }
}

/// How a run ended. Points of the last committed cycle are valid in both cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Finished { cycles: usize },
    Cancelled { committed_cycles: usize },
}
