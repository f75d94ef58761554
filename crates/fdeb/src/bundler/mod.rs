//! Cycle controller: runs the bundling schedule over a flow graph.
//!
//! States: `NotStarted → Initializing → Cycling(0..N-1) → Finished | Cancelled`.
//! A failed `init` ends in `Failed`; `Failed` and `Cancelled` are terminal.
//!
//! Schedule
//! - Cycle 0 places one midpoint per edge and uses the configured `I` and `S`.
//! - Every later cycle sets `P = round(P_exact · rate)`, `S ·= 1 − damping`,
//!   `I = ⌊2I/3⌋`, so `P` never shrinks and `I` never grows.
//!
//! A cycle only commits `(P, S, I)` and its points after all `I` passes ran
//! uncancelled; committed points are then published to the graph.
//!
//! Split: `types.rs` (state, schedule, outcome), `run.rs` (the `Bundler`).

mod run;
mod types;

pub use run::Bundler;
pub use types::{RunOutcome, RunState, Schedule};

use crate::edges::FlowGraph;
use crate::error::Result;
use crate::params::BundlingParams;
use crate::progress::{CancelToken, Control, NoProgress};

/// Bundle `graph` in place with `params`, without progress or cancellation.
pub fn bundle_edges<G: FlowGraph + ?Sized>(
    graph: &mut G,
    params: BundlingParams,
) -> Result<RunOutcome> {
    let token = CancelToken::new();
    let mut sink = NoProgress;
    let mut ctl = Control::new(&token, &mut sink);
    Bundler::new(params)?.bundle(graph, &mut ctl)
}
