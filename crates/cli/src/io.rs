//! JSON formats read and written by the CLI.
//!
//! - Input edges: `{"edges":[{"start":[x,y],"end":[x,y],"weight":w?}, ...]}`.
//! - Parameters: `BundlingParams` as JSON, all fields optional (missing → default).
//! - Output: `{"edges":[{"points":[[x,y],...]}]}`, full polylines in input order.

use anyhow::{Context, Result};
use fdeb::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EdgeRecord {
    pub start: [f64; 2],
    pub end: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EdgesFile {
    pub edges: Vec<EdgeRecord>,
}

impl EdgesFile {
    pub fn into_graph(self) -> FlowEdges {
        self.edges
            .into_iter()
            .map(|r| {
                let start = Point::new(r.start[0], r.start[1]);
                let end = Point::new(r.end[0], r.end[1]);
                FlowEdge {
                    weight: r.weight,
                    ..FlowEdge::new(start, end)
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PolylineRecord {
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BundledFile {
    pub edges: Vec<PolylineRecord>,
}

impl BundledFile {
    pub fn from_graph(graph: &FlowEdges) -> Self {
        Self {
            edges: graph
                .edges
                .iter()
                .map(|e| PolylineRecord {
                    points: e.polyline().iter().map(|p| [p.x, p.y]).collect(),
                })
                .collect(),
        }
    }
}

pub fn read_edges(path: &Path) -> Result<EdgesFile> {
    let bytes = fs::read(path).with_context(|| format!("reading edges {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing edges {}", path.display()))
}

/// Parameter file; missing fields take their defaults.
pub fn read_params(path: &Path) -> Result<BundlingParams> {
    let bytes = fs::read(path).with_context(|| format!("reading params {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing params {}", path.display()))
}

pub fn write_bundled(path: &Path, out: &BundledFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(out)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Width and height of the bounding box of all edge endpoints.
pub fn extent(graph: &FlowEdges) -> Option<(f64, f64)> {
    let mut pts = graph.edges.iter().flat_map(|e| [e.start, e.end]);
    let first = pts.next()?;
    let (lo, hi) = pts.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p)));
    Some((hi.x - lo.x, hi.y - lo.y))
}
