//! Curated API for callers embedding the engine (CLI, benches, tests).
//!
//! Prefer these re-exports over reaching into individual modules; the module
//! layout may still move around.

// Running a bundling
pub use crate::bundler::{bundle_edges, Bundler, RunOutcome, RunState, Schedule};
pub use crate::params::{default_stiffness, order_of_magnitude, BundlingParams};
pub use crate::progress::{CancelToken, Control, NoProgress, Progress, RecordingProgress};
// Graph boundary
pub use crate::edges::{EdgeSet, EdgeValues, FlowEdge, FlowEdges, FlowGraph};
// Compatibility measures
pub use crate::compat::{
    build_compatibility_lists, edge_compatibility, simple_compatibility, standard_scores,
    CompatCfg, CompatibilityLists, CompatibilityStats, CompatibleEdge, Measure, StandardScores,
};
// Random flow graphs
pub use crate::gen::{draw_flow_edges, ReplayToken as FlowReplay, SamplerCfg};
