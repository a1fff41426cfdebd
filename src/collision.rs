//! Separating Axis Theorem overlap test.
//!
//! Two convex shapes are disjoint iff some edge normal of either shape
//! separates their projections. Concave polygons are tested triangle by
//! triangle. All tests read the world-space vertex caches, so both shapes must
//! have been updated this tick.

use crate::constants::DEGENERATE_AXIS_EPSILON;
use crate::error::{GeometryError, GeometryResult};
use crate::math::edge_normal;
use crate::shape::{Shape, ShapeKind};
use bevy::math::Vec2;

/// Closed 1D interval of a shape projected onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Intervals overlap unless one lies strictly beyond the other.
    /// Touching endpoints count as overlap.
    pub fn overlaps(&self, other: &Projection) -> bool {
        !(self.max < other.min || other.max < self.min)
    }
}

/// Project `points` onto a unit `axis`.
///
/// An empty point set yields the inverted interval `[+∞, −∞]`, which overlaps
/// nothing.
pub fn project(points: &[Vec2], axis: Vec2) -> Projection {
    points.iter().fold(
        Projection::new(f32::INFINITY, f32::NEG_INFINITY),
        |acc, p| {
            let d = axis.dot(*p);
            Projection::new(acc.min.min(d), acc.max.max(d))
        },
    )
}

/// Unit axis perpendicular to edge number `edge` running from `points[from]`
/// to `points[to]`.
pub fn edge_axis(points: &[Vec2], edge: usize, (from, to): (usize, usize)) -> GeometryResult<Vec2> {
    let (Some(a), Some(b)) = (points.get(from), points.get(to)) else {
        return Err(GeometryError::DegenerateAxis { edge });
    };
    let normal = edge_normal(*b - *a);
    if normal.length_squared() < DEGENERATE_AXIS_EPSILON {
        return Err(GeometryError::DegenerateAxis { edge });
    }
    Ok(normal.normalize())
}

/// Axes tested when neither shape contributes an edge axis.
const FALLBACK_AXES: [Vec2; 2] = [Vec2::X, Vec2::Y];

/// Usable axes from one shape's edges; zero-length edges are skipped.
fn shape_axes(shape: &Shape) -> impl Iterator<Item = Vec2> + '_ {
    shape
        .edges()
        .enumerate()
        .filter_map(|(k, e)| edge_axis(shape.world_vertices(), k, e).ok())
}

/// Every candidate separating axis for a convex pair: A's edges, then B's.
pub fn candidate_axes(a: &Shape, b: &Shape) -> Vec<Vec2> {
    shape_axes(a).chain(shape_axes(b)).collect()
}

/// True if `axis` separates the world-space projections of `a` and `b`.
pub fn separates(a: &Shape, b: &Shape, axis: Vec2) -> bool {
    !a.project(axis).overlaps(&b.project(axis))
}

fn convex_intersects(a: &Shape, b: &Shape) -> bool {
    if a.world_vertices().is_empty() || b.world_vertices().is_empty() {
        return false;
    }
    let mut axes = shape_axes(a).chain(shape_axes(b)).peekable();
    if axes.peek().is_none() {
        // No usable edge on either side (points or collapsed shapes): compare
        // extents on the world axes instead.
        return !FALLBACK_AXES.iter().any(|&axis| separates(a, b, axis));
    }
    // Short-circuits on the first separating axis.
    !axes.any(|axis| separates(a, b, axis))
}

/// Whether `a` and `b` overlap.
///
/// A shape always intersects itself. A concave operand intersects the other
/// shape iff any of its triangles does.
pub fn intersects(a: &Shape, b: &Shape) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    match (a.kind(), b.kind()) {
        (ShapeKind::ConcavePolygon { triangles }, _) => triangles.iter().any(|t| intersects(t, b)),
        (_, ShapeKind::ConcavePolygon { triangles }) => triangles.iter().any(|t| intersects(a, t)),
        _ => convex_intersects(a, b),
    }
}
