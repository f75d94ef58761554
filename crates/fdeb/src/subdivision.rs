//! Subdivision points: evenly arc-length-spaced interior points per edge.
//!
//! At the start of each cycle the previous polyline (start, old points, end) is
//! resampled to the new point count. The first cycle places the edge midpoint.

use tracing::debug;

use crate::edges::EdgeSet;
use crate::geom::{self, Point};

/// One midpoint per non-loop edge; empty lists for self-loops.
pub fn midpoints(edges: &EdgeSet) -> Vec<Vec<Point>> {
    (0..edges.len())
        .map(|e| {
            if edges.is_self_loop(e) {
                Vec::new()
            } else {
                vec![edges.midpoint(e)]
            }
        })
        .collect()
}

/// Resample every non-loop edge's polyline to `count` interior points.
///
/// `prev` holds the previous cycle's points (same edge order).
pub fn regenerate(edges: &EdgeSet, prev: &[Vec<Point>], count: usize) -> Vec<Vec<Point>> {
    let prev_count = prev
        .iter()
        .enumerate()
        .find(|(e, _)| !edges.is_self_loop(*e))
        .map_or(0, |(_, p)| p.len());
    debug!(prev_p = prev_count, p = count, "adding subdivision points");
    (0..edges.len())
        .map(|e| {
            if edges.is_self_loop(e) {
                Vec::new()
            } else {
                resample(edges.start(e), edges.end(e), &prev[e], count)
            }
        })
        .collect()
}

/// Place `count` points at equal arc-length spacing along `start, interior.., end`.
///
/// With spacing `L = total / (count + 1)`, point `j` sits at arc length `L·(j+1)`.
pub fn resample(start: Point, end: Point, interior: &[Point], count: usize) -> Vec<Point> {
    let mut poly = Vec::with_capacity(interior.len() + 2);
    poly.push(start);
    poly.extend_from_slice(interior);
    poly.push(end);

    let seg_len: Vec<f64> = poly.windows(2).map(|w| geom::distance(w[0], w[1])).collect();
    let total: f64 = seg_len.iter().sum();
    let spacing = total / (count + 1) as f64;

    let last = seg_len.len() - 1;
    let mut out = Vec::with_capacity(count);
    let mut seg = 0usize;
    let mut before = 0.0; // arc length up to the start of `seg`
    for j in 0..count {
        let target = spacing * (j + 1) as f64;
        while seg < last && seg_len[seg] < target - before {
            before += seg_len[seg];
            seg += 1;
        }
        let len = seg_len[seg];
        let p = if len > 0.0 {
            geom::between(poly[seg], poly[seg + 1], (target - before) / len)
        } else {
            poly[seg]
        };
        out.push(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arc_lengths(start: Point, pts: &[Point], end: Point) -> Vec<f64> {
        let mut poly = vec![start];
        poly.extend_from_slice(pts);
        poly.push(end);
        poly.windows(2).map(|w| (w[1] - w[0]).norm()).collect()
    }

    #[test]
    fn first_cycle_is_the_midpoint() {
        let edges = EdgeSet::from_segments(&[
            (Point::new(0.0, 0.0), Point::new(4.0, 2.0)),
            (Point::new(1.0, 1.0), Point::new(1.0, 1.0)),
        ]);
        let pts = midpoints(&edges);
        assert_eq!(pts[0], vec![Point::new(2.0, 1.0)]);
        assert!(pts[1].is_empty());
        // Resampling a bare segment to one point agrees.
        let r = resample(Point::new(0.0, 0.0), Point::new(4.0, 2.0), &[], 1);
        assert!((r[0] - Point::new(2.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn straight_segment_even_spacing() {
        let r = resample(Point::new(0.0, 0.0), Point::new(10.0, 0.0), &[], 4);
        for (j, p) in r.iter().enumerate() {
            assert!((p - Point::new(2.0 * (j + 1) as f64, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn bent_polyline_follows_arc_length() {
        // L-shape of total length 20: (0,0) → (10,0) → (10,10).
        let r = resample(Point::new(0.0, 0.0), Point::new(10.0, 10.0), &[Point::new(10.0, 0.0)], 3);
        assert!((r[0] - Point::new(5.0, 0.0)).norm() < 1e-12);
        assert!((r[1] - Point::new(10.0, 0.0)).norm() < 1e-12);
        assert!((r[2] - Point::new(10.0, 5.0)).norm() < 1e-12);
    }

    #[test]
    fn regenerate_skips_self_loops_and_grows_counts() {
        let edges = EdgeSet::from_segments(&[
            (Point::new(0.0, 0.0), Point::new(6.0, 0.0)),
            (Point::new(2.0, 2.0), Point::new(2.0, 2.0)),
        ]);
        let next = regenerate(&edges, &midpoints(&edges), 2);
        assert_eq!(next[0].len(), 2);
        assert!(next[1].is_empty());
        assert!((next[0][0] - Point::new(2.0, 0.0)).norm() < 1e-12);
        assert!((next[0][1] - Point::new(4.0, 0.0)).norm() < 1e-12);
    }

    fn polyline_strategy() -> impl Strategy<Value = (Point, Vec<Point>, Point, usize)> {
        (
            prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 0..6),
            (-50.0f64..50.0, -50.0f64..50.0),
            (-50.0f64..50.0, -50.0f64..50.0),
            1usize..12,
        )
            .prop_map(|(inner, s, e, count)| {
                let interior = inner.into_iter().map(|(x, y)| Point::new(x, y)).collect();
                (Point::new(s.0, s.1), interior, Point::new(e.0, e.1), count)
            })
    }

    /// Equal-length steps in random directions: a polyline already evenly spaced by arc length.
    fn even_walk_strategy() -> impl Strategy<Value = (Point, Vec<Point>, Point)> {
        (
            (-50.0f64..50.0, -50.0f64..50.0),
            0.1f64..10.0,
            prop::collection::vec(0.0f64..std::f64::consts::TAU, 2..14),
        )
            .prop_map(|(s, step, angles)| {
                let start = Point::new(s.0, s.1);
                let mut cur = start;
                let mut pts = Vec::with_capacity(angles.len());
                for th in angles {
                    cur += Point::new(th.cos(), th.sin()) * step;
                    pts.push(cur);
                }
                let end = pts.pop().unwrap_or(cur);
                (start, pts, end)
            })
    }

    proptest! {
        #[test]
        fn prop_resample_chords_within_spacing((start, interior, end, count) in polyline_strategy()) {
            // New points sit at arc length L·(j+1) on the old polyline, so no chord exceeds L.
            let total: f64 = arc_lengths(start, &interior, end).iter().sum();
            let spacing = total / (count + 1) as f64;
            let pts = resample(start, end, &interior, count);
            prop_assert_eq!(pts.len(), count);
            for l in arc_lengths(start, &pts, end) {
                prop_assert!(l <= spacing * (1.0 + 1e-9) + 1e-9, "chord {} > spacing {}", l, spacing);
            }
        }

        #[test]
        fn prop_resample_is_idempotent((start, pts, end) in even_walk_strategy()) {
            let again = resample(start, end, &pts, pts.len());
            prop_assert_eq!(again.len(), pts.len());
            for (a, b) in pts.iter().zip(&again) {
                prop_assert!((a - b).norm() < 1e-6, "{:?} vs {:?}", a, b);
            }
        }
    }
}
