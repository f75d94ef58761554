//! Provenance sidecars: `<output-stem>.provenance.json` next to each bundled file.

use anyhow::{Context, Result};
use fdeb::prelude::*;
use serde::Serialize;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleRecord {
    pub p: usize,
    pub s: f64,
    pub i: usize,
}

/// How a run ended and the schedule it left behind.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub cycles: usize,
    pub cancelled: bool,
    pub schedule: ScheduleRecord,
    pub compatible_pairs: usize,
    pub mean_abs_c: f64,
}

impl RunSummary {
    pub fn of(bundler: &Bundler, outcome: RunOutcome) -> Self {
        let (cycles, cancelled) = match outcome {
            RunOutcome::Finished { cycles } => (cycles, false),
            RunOutcome::Cancelled { committed_cycles } => (committed_cycles, true),
        };
        let sched = bundler.schedule();
        let stats = bundler.compatibility().stats();
        Self {
            cycles,
            cancelled,
            schedule: ScheduleRecord {
                p: sched.p,
                s: sched.s,
                i: sched.i,
            },
            compatible_pairs: stats.compatible_pairs,
            mean_abs_c: stats.mean_abs_c,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

/// Sidecar document; field order is the on-disk key order.
#[derive(Clone, Debug, Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    version: &'static str,
    callsite: Callsite,
    input: &'a Path,
    params: &'a BundlingParams,
    outcome: &'a RunSummary,
    outputs: [&'a Path; 1],
}

/// Record what produced `output` and return the sidecar path.
#[track_caller]
pub fn write_sidecar(
    output: &Path,
    input: &Path,
    params: &BundlingParams,
    outcome: &RunSummary,
) -> Result<PathBuf> {
    let at = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        version: fdeb::VERSION,
        callsite: Callsite {
            file: at.file(),
            line: at.line(),
        },
        input,
        params,
        outcome,
        outputs: [output],
    };
    let path = sidecar_path(output);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map_or_else(|| "bundled".into(), |s| s.to_string_lossy());
    output.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else `unknown`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_owned())
        .unwrap_or_else(|| "unknown".to_owned())
}
