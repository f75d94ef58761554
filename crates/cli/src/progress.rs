//! Progress sink for command-line runs.

use fdeb::prelude::{CancelToken, Progress};

/// Logs task starts/completions (when `log_tasks`) and optionally cancels
/// the run once a given number of cycles has committed.
pub struct LogProgress {
    token: CancelToken,
    log_tasks: bool,
    cancel_after_cycles: Option<usize>,
    current: String,
    cycles_done: usize,
}

impl LogProgress {
    pub fn new(token: CancelToken, log_tasks: bool, cancel_after_cycles: Option<usize>) -> Self {
        Self {
            token,
            log_tasks,
            cancel_after_cycles,
            current: String::new(),
            cycles_done: 0,
        }
    }

    pub fn cycles_done(&self) -> usize {
        self.cycles_done
    }
}

impl Progress for LogProgress {
    fn start_task(&mut self, name: &str, weight: f64) {
        self.current = name.to_string();
        if self.log_tasks {
            tracing::info!(task = name, weight, "started");
        }
    }

    fn task_completed(&mut self) {
        if self.log_tasks {
            tracing::info!(task = %self.current, "completed");
        }
        if self.current.starts_with("Bundling cycle") {
            self.cycles_done += 1;
            if self.cancel_after_cycles == Some(self.cycles_done) {
                tracing::info!(cycles = self.cycles_done, "cancelling run");
                self.token.cancel();
            }
        }
    }
}
