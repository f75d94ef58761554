//! Edge model: the boundary to the external flow graph.
//!
//! - `FlowGraph`: what the engine needs from the caller's graph (geometry, weights)
//!   and where it writes bundled points back.
//! - `EdgeSet`: immutable per-edge geometry captured once at run start. Edge index
//!   is the stable key for the lifetime of a run.
//! - `publish`: copies subdivision points onto the graph after a committed cycle.
//! - `FlowEdges`: a plain in-memory `FlowGraph`.

use crate::error::{Error, Result};
use crate::geom::{self, Point, EPS};

/// External flow graph seen by the bundler.
pub trait FlowGraph {
    fn edge_count(&self) -> usize;
    /// Projected 2D position of the edge's source node.
    fn edge_start(&self, edge: usize) -> Point;
    /// Projected 2D position of the edge's target node.
    fn edge_end(&self, edge: usize) -> Point;
    /// Flow magnitude, if the graph carries one.
    fn edge_weight(&self, edge: usize) -> Option<f64>;
    /// Replace the edge's interior points (endpoints excluded).
    fn set_subdivision_points(&mut self, edge: usize, points: Vec<Point>);
}

/// One flow edge with its current bundled path.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
    pub start: Point,
    pub end: Point,
    pub weight: Option<f64>,
    pub subdivision_points: Vec<Point>,
}

impl FlowEdge {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            weight: None,
            subdivision_points: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Full path: start, interior points, end.
    pub fn polyline(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.subdivision_points.len() + 2);
        out.push(self.start);
        out.extend_from_slice(&self.subdivision_points);
        out.push(self.end);
        out
    }
}

/// Vec-backed flow graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowEdges {
    pub edges: Vec<FlowEdge>,
}

impl FlowEdges {
    pub fn new(edges: Vec<FlowEdge>) -> Self {
        Self { edges }
    }
}

impl FromIterator<FlowEdge> for FlowEdges {
    fn from_iter<T: IntoIterator<Item = FlowEdge>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl FlowGraph for FlowEdges {
    fn edge_count(&self) -> usize {
        self.edges.len()
    }
    fn edge_start(&self, edge: usize) -> Point {
        self.edges[edge].start
    }
    fn edge_end(&self, edge: usize) -> Point {
        self.edges[edge].end
    }
    fn edge_weight(&self, edge: usize) -> Option<f64> {
        self.edges[edge].weight
    }
    fn set_subdivision_points(&mut self, edge: usize, points: Vec<Point>) {
        self.edges[edge].subdivision_points = points;
    }
}

/// Edge weights with their global bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeValues {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl EdgeValues {
    /// Attraction multiplier for edge `e` pulled by edge `q`:
    /// `1 + max(-1, (v_q - v_e) / (max + min))`.
    ///
    /// A zero denominator leaves the attraction unweighted.
    #[inline]
    pub fn attraction_coefficient(&self, e: usize, q: usize) -> f64 {
        let denom = self.max + self.min;
        if denom == 0.0 {
            return 1.0;
        }
        1.0 + ((self.values[q] - self.values[e]) / denom).max(-1.0)
    }
}

/// Immutable per-edge geometry for one run.
#[derive(Clone, Debug, Default)]
pub struct EdgeSet {
    starts: Vec<Point>,
    ends: Vec<Point>,
    lengths: Vec<f64>,
    values: Option<EdgeValues>,
}

impl EdgeSet {
    /// Capture geometry (and weights, if `with_values`) from the graph.
    pub fn capture<G: FlowGraph + ?Sized>(graph: &G, with_values: bool) -> Result<Self> {
        let n = graph.edge_count();
        let segments: Vec<(Point, Point)> = (0..n)
            .map(|e| (graph.edge_start(e), graph.edge_end(e)))
            .collect();
        let mut set = Self::from_segments(&segments);
        if with_values {
            let mut values = Vec::with_capacity(n);
            let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
            for e in 0..n {
                let v = match graph.edge_weight(e) {
                    Some(v) if v.is_finite() => v,
                    other => {
                        return Err(Error::config(
                            "edge weight",
                            format!(
                                "edge {e} has weight {other:?}; \
                                 value-affects-attraction needs finite weights"
                            ),
                        ))
                    }
                };
                min = min.min(v);
                max = max.max(v);
                values.push(v);
            }
            set.values = Some(EdgeValues { values, min, max });
        }
        Ok(set)
    }

    /// Geometry-only set from `(start, end)` pairs.
    pub fn from_segments(segments: &[(Point, Point)]) -> Self {
        let mut set = Self {
            starts: Vec::with_capacity(segments.len()),
            ends: Vec::with_capacity(segments.len()),
            lengths: Vec::with_capacity(segments.len()),
            values: None,
        };
        for &(s, t) in segments {
            let mut length = geom::distance(s, t);
            if length.abs() < EPS {
                length = 0.0;
            }
            set.starts.push(s);
            set.ends.push(t);
            set.lengths.push(length);
        }
        set
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.starts.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
    #[inline]
    pub fn start(&self, e: usize) -> Point {
        self.starts[e]
    }
    #[inline]
    pub fn end(&self, e: usize) -> Point {
        self.ends[e]
    }
    /// Euclidean length; exactly 0 for self-loops.
    #[inline]
    pub fn length(&self, e: usize) -> f64 {
        self.lengths[e]
    }
    #[inline]
    pub fn is_self_loop(&self, e: usize) -> bool {
        self.lengths[e] == 0.0
    }
    /// Direction vector `end - start`.
    #[inline]
    pub fn direction(&self, e: usize) -> Point {
        self.ends[e] - self.starts[e]
    }
    #[inline]
    pub fn midpoint(&self, e: usize) -> Point {
        geom::midpoint(self.starts[e], self.ends[e])
    }
    pub fn values(&self) -> Option<&EdgeValues> {
        self.values.as_ref()
    }
}

/// Write `points` onto the graph. Self-loops always receive an empty list.
pub fn publish<G: FlowGraph + ?Sized>(
    graph: &mut G,
    edges: &EdgeSet,
    points: &[Vec<Point>],
) -> Result<()> {
    let found = graph.edge_count();
    if found != edges.len() || points.len() != edges.len() {
        return Err(Error::EdgeCountMismatch {
            expected: edges.len(),
            found,
        });
    }
    for (e, pts) in points.iter().enumerate() {
        let out = if edges.is_self_loop(e) {
            Vec::new()
        } else {
            pts.clone()
        };
        graph.set_subdivision_points(e, out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> FlowEdges {
        FlowEdges::new(vec![
            FlowEdge::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0)).with_weight(2.0),
            FlowEdge::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0)).with_weight(8.0),
            FlowEdge::new(Point::new(0.0, 0.0), Point::new(5e-8, 0.0)).with_weight(-1.0),
        ])
    }

    #[test]
    fn capture_lengths_and_self_loops() {
        let set = EdgeSet::capture(&graph(), false).unwrap();
        assert_eq!(set.len(), 3);
        assert!((set.length(0) - 5.0).abs() < 1e-12);
        assert!(!set.is_self_loop(0));
        assert!(set.is_self_loop(1));
        // Below the 1e-7 tolerance counts as a loop too.
        assert!(set.is_self_loop(2));
        assert!(set.values().is_none());
    }

    #[test]
    fn capture_values_with_bounds() {
        let set = EdgeSet::capture(&graph(), true).unwrap();
        let v = set.values().unwrap();
        assert_eq!(v.values, vec![2.0, 8.0, -1.0]);
        assert_eq!((v.min, v.max), (-1.0, 8.0));
        // (8 - 2) / 7 + 1
        assert!((v.attraction_coefficient(0, 1) - (1.0 + 6.0 / 7.0)).abs() < 1e-12);
        // Clamped at -1 → coefficient 0.
        assert_eq!(v.attraction_coefficient(1, 2), 0.0);
    }

    #[test]
    fn missing_weight_is_a_config_error() {
        let mut g = graph();
        g.edges[1].weight = None;
        assert!(matches!(
            EdgeSet::capture(&g, true),
            Err(Error::InvalidConfig { field: "edge weight", .. })
        ));
        // Weights are not consulted otherwise.
        assert!(EdgeSet::capture(&g, false).is_ok());
    }

    #[test]
    fn publish_clears_self_loops_and_checks_counts() {
        let mut g = graph();
        let set = EdgeSet::capture(&g, false).unwrap();
        let pts = vec![
            vec![Point::new(1.5, 2.0)],
            vec![Point::new(9.0, 9.0)],
            vec![],
        ];
        publish(&mut g, &set, &pts).unwrap();
        assert_eq!(g.edges[0].subdivision_points, vec![Point::new(1.5, 2.0)]);
        assert!(g.edges[1].subdivision_points.is_empty());
        assert_eq!(g.edges[0].polyline().len(), 3);

        g.edges.pop();
        assert!(matches!(
            publish(&mut g, &set, &pts),
            Err(Error::EdgeCountMismatch {
                expected: 3,
                found: 2
            })
        ));
    }
}
