//! Force-directed edge bundling (FDEB) for flow maps.
//!
//! Each edge of a flow graph is treated as a chain of mass points. Spring forces
//! keep a chain smooth; electrostatic-like forces pull corresponding points of
//! compatible edges together. The simulation is refined over cycles that add
//! subdivision points and shrink the step size.
//!
//! Layout
//! - `edges`: capture immutable edge geometry from a `FlowGraph`, publish results back.
//! - `compat`: pairwise compatibility coefficients, kept as sparse adjacency lists.
//! - `subdivision`: arc-length resampling of the interior points per cycle.
//! - `forces`: one double-buffered integration pass.
//! - `bundler`: the run object and its cycle schedule.
//! - `progress`: cancellation token and progress sink threaded through long calls.
//!
//! Reference: D. Holten, J. J. van Wijk, "Force-Directed Edge Bundling for Graph
//! Visualization", EuroVis 2009.

pub mod api;
pub mod bundler;
pub mod compat;
pub mod edges;
pub mod error;
pub mod forces;
pub mod gen;
pub mod geom;
pub mod params;
pub mod progress;
pub mod subdivision;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use geom::Point;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::bundler::{bundle_edges, Bundler, RunOutcome, RunState, Schedule};
    pub use crate::edges::{FlowEdge, FlowEdges, FlowGraph};
    pub use crate::params::BundlingParams;
    pub use crate::progress::{CancelToken, Control, NoProgress, Progress};
    pub use crate::{Error, Point, Result};
}
