//! Cooperative cancellation and progress reporting.
//!
//! The engine polls `CancelToken::is_cancelled` at fine granularity (per
//! compatibility pair, per integrated edge, per cycle boundary) and reports
//! named tasks with weight fractions through a `Progress` sink. Both travel
//! together in a `Control`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag; clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receiver of progress events. All methods default to no-ops.
///
/// Tasks are top-level steps whose weights sum to 1 over a run; subtasks split
/// the current task and their weights sum to 1 within it. `inc_subtask` advances
/// the current subtask by the last unit set with `set_subtask_increment`
/// (in percent of the subtask).
pub trait Progress {
    fn start_task(&mut self, _name: &str, _weight: f64) {}
    fn task_completed(&mut self) {}
    fn start_subtask(&mut self, _name: &str, _weight: f64) {}
    fn set_subtask_increment(&mut self, _unit: f64) {}
    fn inc_subtask(&mut self) {}
    fn subtask_completed(&mut self) {}
    fn finished(&mut self) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Cancellation token plus progress sink, passed to every long-running call.
pub struct Control<'a> {
    pub cancel: &'a CancelToken,
    pub progress: &'a mut dyn Progress,
}

impl<'a> Control<'a> {
    pub fn new(cancel: &'a CancelToken, progress: &'a mut dyn Progress) -> Self {
        Self { cancel, progress }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A progress event as seen by `RecordingProgress`.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    TaskStarted { name: String, weight: f64 },
    TaskCompleted,
    SubtaskStarted { name: String, weight: f64 },
    SubtaskCompleted,
    Finished,
}

/// Collects structural events and counts increments.
#[derive(Clone, Debug, Default)]
pub struct RecordingProgress {
    pub events: Vec<ProgressEvent>,
    pub increments: usize,
}

impl RecordingProgress {
    /// Names of all started tasks, in order.
    pub fn task_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::TaskStarted { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sum of subtask weights per started task (one entry per task, in order).
    pub fn subtask_weight_sums(&self) -> Vec<f64> {
        let mut sums = Vec::new();
        for e in &self.events {
            match e {
                ProgressEvent::TaskStarted { .. } => sums.push(0.0),
                ProgressEvent::SubtaskStarted { weight, .. } => {
                    if let Some(last) = sums.last_mut() {
                        *last += weight;
                    }
                }
                _ => {}
            }
        }
        sums
    }
}

impl Progress for RecordingProgress {
    fn start_task(&mut self, name: &str, weight: f64) {
        self.events.push(ProgressEvent::TaskStarted {
            name: name.to_string(),
            weight,
        });
    }
    fn task_completed(&mut self) {
        self.events.push(ProgressEvent::TaskCompleted);
    }
    fn start_subtask(&mut self, name: &str, weight: f64) {
        self.events.push(ProgressEvent::SubtaskStarted {
            name: name.to_string(),
            weight,
        });
    }
    fn inc_subtask(&mut self) {
        self.increments += 1;
    }
    fn subtask_completed(&mut self) {
        self.events.push(ProgressEvent::SubtaskCompleted);
    }
    fn finished(&mut self) {
        self.events.push(ProgressEvent::Finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_the_flag() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn recording_sums_subtask_weights_per_task() {
        let mut rec = RecordingProgress::default();
        rec.start_task("a", 0.5);
        rec.start_subtask("x", 0.25);
        rec.subtask_completed();
        rec.start_subtask("y", 0.75);
        rec.inc_subtask();
        rec.subtask_completed();
        rec.task_completed();
        rec.start_task("b", 0.5);
        assert_eq!(rec.task_names(), vec!["a", "b"]);
        assert_eq!(rec.subtask_weight_sums(), vec![1.0, 0.0]);
        assert_eq!(rec.increments, 1);
    }
}
