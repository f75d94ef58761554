use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fdeb::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod progress;
mod provenance;

use io::BundledFile;
use progress::LogProgress;
use provenance::RunSummary;

#[derive(Parser)]
#[command(name = "fdeb")]
#[command(about = "Force-directed edge bundling for flow maps")]
struct Cmd {
    /// Log at debug level (subdivision resizing, compatibility statistics)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Bundle the edges of a JSON flow graph and write the polylines
    Bundle(BundleArgs),
    /// Print the default parameters as JSON
    Defaults,
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone, Debug, Default)]
struct BundleArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// JSON parameter file; flags below override it
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long)]
    cycles: Option<usize>,
    #[arg(long)]
    iterations: Option<usize>,
    #[arg(long)]
    step: Option<f64>,
    #[arg(long)]
    stiffness: Option<f64>,
    #[arg(long)]
    threshold: Option<f64>,
    /// Use the simple compatibility measure
    #[arg(long)]
    simple: bool,
    #[arg(long)]
    binary: bool,
    /// Opposite edges repel each other
    #[arg(long)]
    repulsion: bool,
    #[arg(long)]
    inverse_quadratic: bool,
    /// Heavier edges attract lighter ones more (needs weights)
    #[arg(long)]
    weighted: bool,
    /// Derive the stiffness from the node bounding box (ignored with --stiffness)
    #[arg(long)]
    auto_stiffness: bool,
    /// Log every task start and completion
    #[arg(long)]
    progress: bool,
    /// Cancel the run after this many committed cycles
    #[arg(long)]
    cancel_after_cycles: Option<usize>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Bundle(args) => bundle(&args).map(|_| ()),
        Action::Defaults => defaults(),
        Action::Report => report(),
    }
}

/// File parameters (or defaults), then flag overrides.
fn effective_params(args: &BundleArgs, graph: &FlowEdges) -> Result<BundlingParams> {
    let mut p = match &args.params {
        Some(path) => io::read_params(path)?,
        None => BundlingParams::default(),
    };
    if let Some(n) = args.cycles {
        p.num_cycles = n;
    }
    if let Some(i) = args.iterations {
        p.i = i;
    }
    if let Some(s) = args.step {
        p.s = s;
    }
    if let Some(t) = args.threshold {
        p.compatibility_threshold = t;
    }
    p.use_simple_compatibility_measure |= args.simple;
    p.binary_compatibility |= args.binary;
    p.use_repulsion_for_opposite_edges |= args.repulsion;
    p.use_inverse_quadratic_model |= args.inverse_quadratic;
    p.edge_value_affects_attraction |= args.weighted;
    match (args.stiffness, args.auto_stiffness) {
        (Some(k), _) => p.k = k,
        (None, true) => {
            if let Some((w, h)) = io::extent(graph) {
                p = p.with_extent_stiffness(w, h);
                if p.k == 0.0 {
                    tracing::warn!(width = w, height = h, "degenerate extent; stiffness is 0");
                }
            }
        }
        (None, false) => {}
    }
    Ok(p)
}

fn bundle(args: &BundleArgs) -> Result<RunOutcome> {
    tracing::info!(input = %args.input.display(), out = %args.out.display(), "bundle");
    let mut graph = io::read_edges(&args.input)?.into_graph();
    let params = effective_params(args, &graph)?;

    let token = CancelToken::new();
    let mut sink = LogProgress::new(token.clone(), args.progress, args.cancel_after_cycles);
    let mut ctl = Control::new(&token, &mut sink);
    let mut bundler = Bundler::new(params).context("invalid bundling parameters")?;
    let outcome = bundler
        .bundle(&mut graph, &mut ctl)
        .with_context(|| format!("bundling {}", args.input.display()))?;
    let stats = bundler.compatibility().stats();
    tracing::info!(
        ?outcome,
        edges = graph.edges.len(),
        compatible_pairs = stats.compatible_pairs,
        "bundle done"
    );

    io::write_bundled(&args.out, &BundledFile::from_graph(&graph))?;
    let summary = RunSummary::of(&bundler, outcome);
    let prov = provenance::write_sidecar(&args.out, &args.input, bundler.params(), &summary)?;
    tracing::debug!(provenance = %prov.display(), "wrote provenance");
    Ok(outcome)
}

fn defaults() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&BundlingParams::default())?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": fdeb::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
