//! Ear-clipping triangulation of simple polygons.
//!
//! The ring of live vertices is an arena of `prev`/`next` indices, so finding
//! the neighbours of an ear and unlinking it are both O(1). Every clip removes
//! one vertex and queues at most two neighbours, which bounds the number of
//! queue pops; a hard cap on pops turns a corrupt ring into a
//! [`GeometryError::TriangulationFailure`] instead of a hang.
//!
//! ## Winding
//!
//! A corner is convex when `cross(v − prev, next − v) ≥ 0`, i.e. the ring
//! turns left there. Callers must wind polygons counter-clockwise in a y-up
//! frame (clockwise on a y-down screen). A ring wound the other way classifies
//! every corner as reflex, has no ears, and fails.

use crate::constants::TRIANGULATION_POPS_PER_VERTEX;
use crate::error::{GeometryError, GeometryResult};
use crate::math::cross_product;
use crate::shape::point_in_triangle;
use bevy::math::Vec2;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    Convex,
    Reflex,
}

/// Doubly-linked ring of vertex indices.
struct Ring {
    prev: Vec<usize>,
    next: Vec<usize>,
    removed: Vec<bool>,
    live: usize,
}

impl Ring {
    fn new(n: usize) -> Self {
        Self {
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            next: (0..n).map(|i| (i + 1) % n).collect(),
            removed: vec![false; n],
            live: n,
        }
    }

    fn unlink(&mut self, i: usize) {
        let (p, n) = (self.prev[i], self.next[i]);
        self.next[p] = n;
        self.prev[n] = p;
        self.removed[i] = true;
        self.live -= 1;
    }

    /// Any vertex still on the ring.
    fn first_live(&self) -> Option<usize> {
        self.removed.iter().position(|r| !r)
    }
}

fn classify(points: &[Vec2], ring: &Ring, i: usize) -> Corner {
    if cross_product(points[ring.prev[i]], points[i], points[ring.next[i]]) >= 0.0 {
        Corner::Convex
    } else {
        Corner::Reflex
    }
}

/// A convex corner is an ear when no other live reflex vertex lies inside
/// (or on) the triangle it forms with its neighbours.
fn is_ear(points: &[Vec2], ring: &Ring, corners: &[Corner], i: usize) -> bool {
    if corners[i] == Corner::Reflex {
        return false;
    }
    let (before, after) = (ring.prev[i], ring.next[i]);
    let (a, b, c) = (points[i], points[before], points[after]);

    let mut j = ring.next[after];
    while j != before {
        if corners[j] == Corner::Reflex && point_in_triangle(points[j], a, b, c) {
            return false;
        }
        j = ring.next[j];
    }
    true
}

/// True if every corner of the ring turns the same way as a counter-clockwise
/// (y-up) convex polygon.
pub fn is_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    n >= 3
        && (0..n).all(|i| {
            cross_product(points[(i + n - 1) % n], points[i], points[(i + 1) % n]) >= 0.0
        })
}

/// Triangulate a simple polygon by ear clipping.
///
/// Returns `N − 2` index triples `[ear, before, after]` into `points`.
pub fn triangulate(points: &[Vec2]) -> GeometryResult<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::InvalidGeometry {
            vertex_count: n,
            index_count: 0,
            reason: "a polygon needs at least 3 vertices",
        });
    }

    let mut ring = Ring::new(n);
    let mut corners: Vec<Corner> = (0..n).map(|i| classify(points, &ring, i)).collect();
    let mut ear_flags: Vec<bool> = (0..n).map(|i| is_ear(points, &ring, &corners, i)).collect();
    let mut ears: VecDeque<usize> = (0..n).filter(|&i| ear_flags[i]).collect();

    if ears.is_empty() {
        return Err(GeometryError::TriangulationFailure {
            vertex_count: n,
            remaining: n,
        });
    }

    let mut triangles = Vec::with_capacity(n - 2);
    let max_pops = n * TRIANGULATION_POPS_PER_VERTEX;
    let mut pops = 0;

    while ring.live > 3 {
        let Some(i) = ears.pop_front() else {
            return Err(GeometryError::TriangulationFailure {
                vertex_count: n,
                remaining: ring.live,
            });
        };
        pops += 1;
        if pops > max_pops {
            return Err(GeometryError::TriangulationFailure {
                vertex_count: n,
                remaining: ring.live,
            });
        }
        // Stale queue entry: already clipped, or lost its ear status.
        if ring.removed[i] || !ear_flags[i] {
            continue;
        }

        let (before, after) = (ring.prev[i], ring.next[i]);
        triangles.push([i, before, after]);
        ring.unlink(i);
        ear_flags[i] = false;

        for j in [before, after] {
            corners[j] = classify(points, &ring, j);
            let ear = is_ear(points, &ring, &corners, j);
            if ear && !ear_flags[j] {
                ears.push_back(j);
            }
            ear_flags[j] = ear;
        }
    }

    let a = ring
        .first_live()
        .ok_or(GeometryError::TriangulationFailure {
            vertex_count: n,
            remaining: 0,
        })?;
    let b = ring.next[a];
    let c = ring.next[b];
    triangles.push([a, b, c]);

    Ok(triangles)
}
