//! The run object: owns all per-run buffers and drives the cycles.

use std::ops::ControlFlow;

use tracing::info;

use super::types::{RunOutcome, RunState, Schedule};
use crate::compat::{build_compatibility_lists, CompatCfg, CompatibilityLists, CompatibleEdge};
use crate::edges::{self, EdgeSet, FlowGraph};
use crate::error::{Error, Result};
use crate::forces::{integrate_pass, ForceCfg};
use crate::geom::Point;
use crate::params::BundlingParams;
use crate::progress::Control;
use crate::subdivision;

const INIT_WEIGHT: f64 = 0.05;
const SUBDIVISION_WEIGHT: f64 = 0.1;

/// One bundling run over one flow graph.
///
/// Everything mutable (points, compatibility lists, schedule) lives here, so
/// independent runs share nothing. The committed state only changes at the end
/// of a successful cycle; a cancelled cycle leaves it untouched.
#[derive(Clone, Debug)]
pub struct Bundler {
    params: BundlingParams,
    state: RunState,
    edges: EdgeSet,
    compat: CompatibilityLists,
    /// Committed subdivision points, indexed by edge.
    points: Vec<Vec<Point>>,
    /// Committed `(P, S, I)`.
    schedule: Schedule,
    /// Number of committed cycles.
    cycle: usize,
}

impl Bundler {
    /// Validate and capture the parameters. Fails before any computation.
    pub fn new(params: BundlingParams) -> Result<Self> {
        params.validate()?;
        let params = params.normalized();
        let schedule = Schedule::initial(params.p, params.s, params.i);
        Ok(Self {
            params,
            state: RunState::NotStarted,
            edges: EdgeSet::default(),
            compat: CompatibilityLists::default(),
            points: Vec::new(),
            schedule,
            cycle: 0,
        })
    }

    pub fn params(&self) -> &BundlingParams {
        &self.params
    }
    pub fn state(&self) -> RunState {
        self.state
    }
    /// `(P, S, I)` of the last committed cycle (the initial values before any).
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }
    pub fn committed_cycles(&self) -> usize {
        self.cycle
    }
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }
    pub fn compatible_edges(&self, edge: usize) -> &[CompatibleEdge] {
        self.compat.compatible(edge)
    }
    pub fn compatibility(&self) -> &CompatibilityLists {
        &self.compat
    }

    /// Committed points of `edge`; empty for self-loops and before the first cycle.
    pub fn subdivision_points(&self, edge: usize) -> &[Point] {
        if edge >= self.points.len() || self.edges.is_self_loop(edge) {
            return &[];
        }
        &self.points[edge]
    }

    /// Run the whole schedule, publishing to `graph` as cycles commit.
    pub fn bundle<G: FlowGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        ctl: &mut Control<'_>,
    ) -> Result<RunOutcome> {
        info!(params = ?self.params, "FDE bundling started");
        ctl.progress.start_task("Initializing", INIT_WEIGHT);
        if self.init(graph, ctl)?.is_break() {
            return self.cancelled(graph);
        }
        ctl.progress.task_completed();

        let n = self.params.num_cycles;
        for cycle in 0..n {
            ctl.progress.start_task(
                &format!("Bundling cycle {} of {}", cycle + 1, n),
                (1.0 - INIT_WEIGHT) / n as f64,
            );
            if self.next_cycle(ctl)?.is_break() {
                return self.cancelled(graph);
            }
            ctl.progress.task_completed();
            if self.params.update_after_each_cycle {
                self.publish(graph)?;
            }
        }
        if !self.params.update_after_each_cycle {
            self.publish(graph)?;
        }

        self.state = RunState::Finished;
        ctl.progress.finished();
        info!(cycles = self.cycle, "FDE bundling finished");
        Ok(RunOutcome::Finished { cycles: self.cycle })
    }

    /// Capture edges and build the compatibility lists.
    pub fn init<G: FlowGraph + ?Sized>(
        &mut self,
        graph: &G,
        ctl: &mut Control<'_>,
    ) -> Result<ControlFlow<()>> {
        if self.state != RunState::NotStarted {
            return Err(Error::InvalidState {
                op: "initialize",
                state: self.state,
            });
        }
        self.state = RunState::Initializing;
        match self.capture_and_score(graph, ctl) {
            Ok(ControlFlow::Continue(())) => Ok(ControlFlow::Continue(())),
            Ok(ControlFlow::Break(())) => {
                self.state = RunState::Cancelled;
                Ok(ControlFlow::Break(()))
            }
            Err(e) => {
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    fn capture_and_score<G: FlowGraph + ?Sized>(
        &mut self,
        graph: &G,
        ctl: &mut Control<'_>,
    ) -> Result<ControlFlow<()>> {
        self.edges = EdgeSet::capture(graph, self.params.edge_value_affects_attraction)?;
        self.points = vec![Vec::new(); self.edges.len()];

        let cfg = CompatCfg::from_params(&self.params);
        match build_compatibility_lists(&self.edges, &cfg, ctl)? {
            ControlFlow::Continue(lists) => {
                self.compat = lists;
                Ok(ControlFlow::Continue(()))
            }
            ControlFlow::Break(()) => Ok(ControlFlow::Break(())),
        }
    }

    /// Run one cycle: resample, integrate `I` passes, then commit.
    ///
    /// Returns `Break` if cancellation is observed; nothing is committed and the
    /// run becomes `Cancelled`.
    pub fn next_cycle(&mut self, ctl: &mut Control<'_>) -> Result<ControlFlow<()>> {
        match self.state {
            RunState::Initializing | RunState::Cycling(_) => {}
            state => {
                return Err(Error::InvalidState {
                    op: "run a cycle",
                    state,
                })
            }
        }
        let flow = self.run_cycle(ctl);
        if flow.is_break() {
            self.state = RunState::Cancelled;
        }
        Ok(flow)
    }

    fn run_cycle(&mut self, ctl: &mut Control<'_>) -> ControlFlow<()> {
        let next = if self.cycle == 0 {
            self.schedule
        } else {
            self.schedule.advance(
                self.params.subdivision_increase_rate,
                self.params.step_damping_factor,
            )
        };
        info!(
            cycle = self.cycle + 1,
            p = next.p,
            s = next.s,
            i = next.i,
            "FDE bundling cycle"
        );

        if ctl.is_cancelled() {
            return ControlFlow::Break(());
        }
        // A cycle whose iterations decayed to 0 is all subdivision.
        let subdivision_weight = if next.i == 0 { 1.0 } else { SUBDIVISION_WEIGHT };
        ctl.progress
            .start_subtask("Adding subdivision points", subdivision_weight);
        let mut read = if self.cycle == 0 {
            subdivision::midpoints(&self.edges)
        } else {
            subdivision::regenerate(&self.edges, &self.points, next.p)
        };
        ctl.progress.subtask_completed();

        let mut write = read.clone();
        let force = ForceCfg::new(&self.params, next.s);
        let increment = 100.0 / self.edges.len().max(1) as f64;
        for step in 0..next.i {
            if ctl.is_cancelled() {
                return ControlFlow::Break(());
            }
            ctl.progress.start_subtask(
                &format!("Step {} of {}", step + 1, next.i),
                (1.0 - SUBDIVISION_WEIGHT) / next.i as f64,
            );
            ctl.progress.set_subtask_increment(increment);
            let pass = integrate_pass(&self.edges, &self.compat, &force, &read, &mut write, ctl);
            if pass.is_break() {
                return ControlFlow::Break(());
            }
            std::mem::swap(&mut read, &mut write);
            ctl.progress.subtask_completed();
        }
        if ctl.is_cancelled() {
            return ControlFlow::Break(());
        }

        self.points = read;
        self.schedule = next;
        self.state = RunState::Cycling(self.cycle);
        self.cycle += 1;
        ControlFlow::Continue(())
    }

    /// Copy the committed points onto `graph`.
    ///
    /// Fails with `InvalidState` before `init` and after a failed `init`.
    pub fn publish<G: FlowGraph + ?Sized>(&self, graph: &mut G) -> Result<()> {
        if matches!(self.state, RunState::NotStarted | RunState::Failed) {
            return Err(Error::InvalidState {
                op: "publish",
                state: self.state,
            });
        }
        edges::publish(graph, &self.edges, &self.points)
    }

    fn cancelled<G: FlowGraph + ?Sized>(&mut self, graph: &mut G) -> Result<RunOutcome> {
        self.state = RunState::Cancelled;
        if !self.params.update_after_each_cycle && self.cycle > 0 {
            self.publish(graph)?;
        }
        info!(committed_cycles = self.cycle, "FDE bundling cancelled");
        Ok(RunOutcome::Cancelled {
            committed_cycles: self.cycle,
        })
    }
}
