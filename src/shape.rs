//! Shape data model and the local → world transform pipeline.
//!
//! A [`Shape`] carries the transform state every variant shares (position,
//! rotation, scale), its local-space vertices and edge indices, and a cache of
//! world-space vertices that [`Shape::update`] rebuilds once per tick. The
//! variant-specific payload lives in [`ShapeKind`].
//!
//! Rectangles and triangles generate their vertices lazily on the first
//! update; caller-supplied polygons are fully formed at construction. A
//! concave polygon is triangulated once, up front, and keeps its triangles in
//! step with its own transform on every update.

use crate::collision::{self, Projection};
use crate::constants::MAX_SHAPE_VERTICES;
use crate::error::{GeometryError, GeometryResult};
use crate::math::{cross_product, world_transform, wrap_angle};
use crate::triangulate::triangulate;
use bevy::color::Color;
use bevy::math::Vec2;

/// A local-space point plus the colour a renderer should draw it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    pub color: Color,
}

impl Vertex {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            color: Color::WHITE,
        }
    }
}

/// Per-variant geometry payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned (in local space) rectangle centred on the origin.
    Rectangle { width: f32, height: f32 },
    /// Three explicit local-space points.
    Triangle { points: [Vec2; 3] },
    /// Caller-supplied polygon, assumed convex.
    ConvexPolygon,
    /// Caller-supplied simple polygon plus its ear-clipped triangles.
    ConcavePolygon { triangles: Vec<Shape> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    position: Vec2,
    rotation: f32,
    scale: f32,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    world_vertices: Vec<Vec2>,
    built: bool,
    kind: ShapeKind,
}

/// Edge indices for a closed ring of `vertex_count` vertices:
/// `0,1, 1,2, …, n-1,0`.
///
/// Indices are `u16`; counts above [`MAX_SHAPE_VERTICES`] wrap, and shape
/// construction rejects such rings.
pub fn closed_loop_indices(vertex_count: usize) -> Vec<u16> {
    (0..vertex_count)
        .flat_map(|i| [i as u16, ((i + 1) % vertex_count) as u16])
        .collect()
}

/// Same-side point-in-triangle test. Points on an edge count as inside.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    same_side(p, a, b, c) && same_side(p, b, a, c) && same_side(p, c, a, b)
}

/// True if `p1` and `p2` lie on the same side of the line through `a` and `b`.
fn same_side(p1: Vec2, p2: Vec2, a: Vec2, b: Vec2) -> bool {
    cross_product(a, b, p1) * cross_product(a, b, p2) >= 0.0
}

/// Check that `indices` describes a closed loop over `vertex_count` vertices.
fn validate_edges(vertex_count: usize, indices: &[u16]) -> GeometryResult<()> {
    let invalid = |reason| GeometryError::InvalidGeometry {
        vertex_count,
        index_count: indices.len(),
        reason,
    };
    if vertex_count < 3 {
        return Err(invalid("a polygon needs at least 3 vertices"));
    }
    if vertex_count > MAX_SHAPE_VERTICES {
        return Err(invalid("too many vertices for u16 edge indices"));
    }
    if indices.len() != vertex_count * 2 {
        return Err(invalid("index count must be twice the vertex count"));
    }
    if indices.iter().any(|&i| i as usize >= vertex_count) {
        return Err(invalid("edge index references a missing vertex"));
    }
    let chained = indices
        .chunks_exact(2)
        .zip(indices.chunks_exact(2).cycle().skip(1))
        .all(|(edge, next)| edge[1] == next[0]);
    if !chained {
        return Err(invalid("edges must form a single closed loop"));
    }
    // A chained list could still circle part of the ring more than once.
    let mut started = vec![false; vertex_count];
    for edge in indices.chunks_exact(2) {
        let from = edge[0] as usize;
        if started[from] {
            return Err(invalid("edges must visit every vertex once"));
        }
        started[from] = true;
    }
    Ok(())
}

impl Shape {
    fn with_kind(position: Vec2, kind: ShapeKind) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
            vertices: Vec::new(),
            indices: Vec::new(),
            world_vertices: Vec::new(),
            built: false,
            kind,
        }
    }

    fn from_points(
        position: Vec2,
        points: &[Vec2],
        indices: &[u16],
        kind: ShapeKind,
    ) -> GeometryResult<Self> {
        validate_edges(points.len(), indices)?;
        let mut shape = Self::with_kind(position, kind);
        shape.vertices = points.iter().copied().map(Vertex::new).collect();
        shape.indices = indices.to_vec();
        shape.world_vertices = vec![Vec2::ZERO; points.len()];
        shape.built = true;
        Ok(shape)
    }

    /// Rectangle centred on its position. Vertices are generated on the first
    /// [`update`](Self::update).
    pub fn rectangle(position: Vec2, width: f32, height: f32) -> Self {
        Self::with_kind(position, ShapeKind::Rectangle { width, height })
    }

    /// Zero-sized rectangle at the origin.
    pub fn empty_rectangle() -> Self {
        Self::rectangle(Vec2::ZERO, 0.0, 0.0)
    }

    /// Triangle from three local-space points. Vertices are generated on the
    /// first [`update`](Self::update).
    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self::with_kind(Vec2::ZERO, ShapeKind::Triangle { points: [a, b, c] })
    }

    pub fn triangle_at(a: Vec2, b: Vec2, c: Vec2, position: Vec2) -> Self {
        Self::with_kind(position, ShapeKind::Triangle { points: [a, b, c] })
    }

    /// Caller-supplied convex polygon. Convexity is not checked.
    pub fn convex(position: Vec2, points: &[Vec2], indices: &[u16]) -> GeometryResult<Self> {
        Self::from_points(position, points, indices, ShapeKind::ConvexPolygon)
    }

    /// Caller-supplied simple polygon, triangulated immediately.
    ///
    /// `points` must be wound so convex corners turn left (counter-clockwise
    /// in a y-up frame); a ring wound the other way has no ears and fails with
    /// [`GeometryError::TriangulationFailure`].
    pub fn concave(position: Vec2, points: &[Vec2], indices: &[u16]) -> GeometryResult<Self> {
        validate_edges(points.len(), indices)?;
        let triangles = triangulate(points)?
            .into_iter()
            .map(|[i, before, after]| {
                let mut t = Self::triangle_at(points[i], points[before], points[after], position);
                t.ensure_built();
                t
            })
            .collect();
        Self::from_points(
            position,
            points,
            indices,
            ShapeKind::ConcavePolygon { triangles },
        )
    }

    /// Generate vertices and edges for the procedural variants.
    fn ensure_built(&mut self) {
        if self.built {
            return;
        }
        let points: Vec<Vec2> = match &self.kind {
            ShapeKind::Rectangle { width, height } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                // Clockwise from the top-right corner.
                vec![
                    Vec2::new(hw, hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(-hw, -hh),
                    Vec2::new(-hw, hh),
                ]
            }
            ShapeKind::Triangle { points } => points.to_vec(),
            ShapeKind::ConvexPolygon | ShapeKind::ConcavePolygon { .. } => {
                self.built = true;
                return;
            }
        };
        self.indices = closed_loop_indices(points.len());
        self.world_vertices = vec![Vec2::ZERO; points.len()];
        self.vertices = points.into_iter().map(Vertex::new).collect();
        self.built = true;
    }

    /// Recompute the world-space vertex cache from the current transform.
    ///
    /// `dt` is the elapsed tick time; the geometry itself is time-independent.
    pub fn update(&mut self, dt: f32) {
        self.ensure_built();

        let world = world_transform(self.position, self.rotation, self.scale);
        for (out, v) in self.world_vertices.iter_mut().zip(&self.vertices) {
            *out = world.transform_point2(v.position);
        }

        if let ShapeKind::ConcavePolygon { triangles } = &mut self.kind {
            for t in triangles.iter_mut() {
                t.position = self.position;
                t.rotation = self.rotation;
                t.scale = self.scale;
                t.update(dt);
            }
        }
    }

    // ── Transform state ──────────────────────────────────────────────────────

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Rotation in radians, always within (-π, π].
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = wrap_angle(rotation);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    // ── Geometry ─────────────────────────────────────────────────────────────

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Local-space vertex positions.
    pub fn local_points(&self) -> Vec<Vec2> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Flat edge index list, two indices per edge.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Edges as `(from, to)` vertex index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.indices
            .chunks_exact(2)
            .map(|e| (e[0] as usize, e[1] as usize))
    }

    /// World-space vertices as of the last [`update`](Self::update).
    pub fn world_vertices(&self) -> &[Vec2] {
        &self.world_vertices
    }

    /// World-space line segments, one per edge, for a line-list renderer.
    pub fn world_segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.edges()
            .map(|(a, b)| (self.world_vertices[a], self.world_vertices[b]))
    }

    /// Ear-clipped triangles of a concave polygon; empty for other variants.
    pub fn triangles(&self) -> &[Shape] {
        match &self.kind {
            ShapeKind::ConcavePolygon { triangles } => triangles,
            _ => &[],
        }
    }

    pub fn is_concave(&self) -> bool {
        matches!(self.kind, ShapeKind::ConcavePolygon { .. })
    }

    /// True for a rectangle with zero width and height.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ShapeKind::Rectangle { width, height } if width == 0.0 && height == 0.0)
    }

    /// Project the world-space vertices onto a unit `axis`.
    pub fn project(&self, axis: Vec2) -> Projection {
        collision::project(&self.world_vertices, axis)
    }

    /// Whether this shape overlaps `other`; see [`collision::intersects`].
    pub fn intersects(&self, other: &Shape) -> bool {
        collision::intersects(self, other)
    }

    /// World-space point membership, valid after an update.
    ///
    /// Triangles use the same-side test; concave polygons defer to their
    /// triangles; other convex shapes require the point to sit on the same side
    /// of every edge.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let w = &self.world_vertices;
        match &self.kind {
            ShapeKind::ConcavePolygon { triangles } => triangles.iter().any(|t| t.contains_point(p)),
            ShapeKind::Triangle { .. } if w.len() == 3 => point_in_triangle(p, w[0], w[1], w[2]),
            _ if w.len() >= 3 => {
                let mut sign = 0.0_f32;
                for (a, b) in self.world_segments() {
                    let c = cross_product(a, b, p);
                    if c * sign < 0.0 {
                        return false;
                    }
                    if c != 0.0 {
                        sign = c;
                    }
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn arrow() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 4.0),
        ]
    }

    // ── Construction ─────────────────────────────────────────────────────────

    #[test]
    fn closed_loop_indices_wrap_to_start() {
        assert_eq!(closed_loop_indices(3), vec![0, 1, 1, 2, 2, 0]);
    }

    #[test]
    fn convex_rejects_mismatched_index_count() {
        let pts = [Vec2::ZERO, Vec2::X, Vec2::Y];
        let err = Shape::convex(Vec2::ZERO, &pts, &[0, 1, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidGeometry {
                vertex_count: 3,
                index_count: 4,
                ..
            }
        ));
    }

    #[test]
    fn convex_rejects_out_of_range_index() {
        let pts = [Vec2::ZERO, Vec2::X, Vec2::Y];
        let err = Shape::convex(Vec2::ZERO, &pts, &[0, 1, 1, 7, 7, 0]).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometry { .. }));
    }

    #[test]
    fn convex_rejects_broken_loop() {
        let pts = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let err = Shape::convex(Vec2::ZERO, &pts, &[0, 1, 2, 3, 1, 2, 3, 0]).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometry { .. }));
    }

    #[test]
    fn convex_rejects_edges_that_skip_vertices() {
        // Chained, but bounces between two corners and never reaches the rest.
        let pts = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let err = Shape::convex(Vec2::ZERO, &pts, &[0, 1, 1, 0, 0, 1, 1, 0]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidGeometry {
                vertex_count: 4,
                index_count: 8,
                reason: "edges must visit every vertex once",
            }
        );
    }

    #[test]
    fn convex_accepts_ring_starting_mid_loop() {
        let pts = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert!(Shape::convex(Vec2::ZERO, &pts, &[2, 3, 3, 0, 0, 1, 1, 2]).is_ok());
    }

    #[test]
    fn convex_rejects_more_vertices_than_u16_indices_reach() {
        let n = MAX_SHAPE_VERTICES + 1;
        let pts: Vec<Vec2> = (0..n)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / n as f32;
                Vec2::new(angle.cos(), angle.sin())
            })
            .collect();
        let err = Shape::convex(Vec2::ZERO, &pts, &closed_loop_indices(n)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidGeometry {
                reason: "too many vertices for u16 edge indices",
                ..
            }
        ));
    }

    #[test]
    fn convex_rejects_two_vertices() {
        let err = Shape::convex(Vec2::ZERO, &[Vec2::ZERO, Vec2::X], &[0, 1, 1, 0]).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometry { .. }));
    }

    #[test]
    fn concave_rejects_mismatched_index_count_before_triangulating() {
        let pts = arrow();
        let err = Shape::concave(Vec2::ZERO, &pts, &closed_loop_indices(4)).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometry { .. }));
    }

    #[test]
    fn concave_owns_n_minus_two_triangles() {
        let pts = arrow();
        let shape = Shape::concave(Vec2::ZERO, &pts, &closed_loop_indices(pts.len())).unwrap();
        assert!(shape.is_concave());
        assert_eq!(shape.triangles().len(), 3);
        assert!(shape.triangles().iter().all(|t| t.vertices().len() == 3));
    }

    #[test]
    fn concave_rejects_clockwise_ring() {
        let mut pts = arrow();
        pts.reverse();
        let err = Shape::concave(Vec2::ZERO, &pts, &closed_loop_indices(pts.len())).unwrap_err();
        assert!(matches!(err, GeometryError::TriangulationFailure { .. }));
    }

    // ── Lazy generation ──────────────────────────────────────────────────────

    #[test]
    fn rectangle_generates_vertices_on_first_update() {
        let mut rect = Shape::rectangle(Vec2::ZERO, 4.0, 2.0);
        assert!(rect.vertices().is_empty());
        assert!(rect.world_vertices().is_empty());

        rect.update(0.0);
        assert_eq!(rect.vertices().len(), 4);
        assert_eq!(rect.world_vertices().len(), 4);
        assert_eq!(rect.indices(), &[0, 1, 1, 2, 2, 3, 3, 0]);
        assert_eq!(rect.local_points()[0], Vec2::new(2.0, 1.0));
        assert_eq!(rect.local_points()[2], Vec2::new(-2.0, -1.0));
    }

    #[test]
    fn triangle_generates_three_edges_on_first_update() {
        let mut tri = Shape::triangle(Vec2::ZERO, Vec2::X, Vec2::Y);
        tri.update(0.0);
        assert_eq!(tri.indices(), &[0, 1, 1, 2, 2, 0]);
        assert_eq!(tri.edges().count(), 3);
    }

    #[test]
    fn empty_rectangle_reports_empty() {
        assert!(Shape::empty_rectangle().is_empty());
        assert!(!Shape::rectangle(Vec2::ZERO, 1.0, 0.0).is_empty());
    }

    // ── Transform pipeline ───────────────────────────────────────────────────

    #[test]
    fn update_applies_scale_rotation_translation() {
        let mut rect = Shape::rectangle(Vec2::new(100.0, 50.0), 2.0, 2.0);
        rect.set_scale(3.0);
        rect.set_rotation(FRAC_PI_2);
        rect.update(1.0 / 60.0);
        // Local (1,1) → scaled (3,3) → rotated (-3,3) → translated (97,53)
        let p = rect.world_vertices()[0];
        assert!((p - Vec2::new(97.0, 53.0)).length() < 1e-4, "got {p:?}");
    }

    #[test]
    fn world_vertices_stay_stale_until_update() {
        let mut rect = Shape::rectangle(Vec2::ZERO, 2.0, 2.0);
        rect.update(0.0);
        let before = rect.world_vertices().to_vec();
        rect.set_position(Vec2::new(10.0, 0.0));
        assert_eq!(rect.world_vertices(), before.as_slice());
        rect.update(0.0);
        assert_eq!(rect.world_vertices()[0], Vec2::new(11.0, 1.0));
    }

    #[test]
    fn set_rotation_wraps_on_every_assignment() {
        let mut shape = Shape::rectangle(Vec2::ZERO, 1.0, 1.0);
        let mut angle = 0.0;
        for _ in 0..10_000 {
            angle = shape.rotation() + 0.1;
            shape.set_rotation(angle);
            assert!(shape.rotation() > -PI && shape.rotation() <= PI);
        }
        assert!(angle.abs() <= PI + 0.1);
    }

    #[test]
    fn set_rotation_full_turns_store_same_value() {
        let mut a = Shape::rectangle(Vec2::ZERO, 1.0, 1.0);
        let mut b = a.clone();
        a.set_rotation(1.25);
        for k in -5..=5 {
            b.set_rotation(1.25 + TAU * k as f32);
            assert!((a.rotation() - b.rotation()).abs() < 1e-5, "k={k}");
        }
    }

    #[test]
    fn concave_update_keeps_triangles_in_sync() {
        let pts = arrow();
        let mut shape =
            Shape::concave(Vec2::new(5.0, 5.0), &pts, &closed_loop_indices(pts.len())).unwrap();
        shape.set_rotation(0.7);
        shape.set_scale(2.0);
        shape.set_position(Vec2::new(-3.0, 8.0));
        shape.update(0.016);
        for t in shape.triangles() {
            assert_eq!(t.position(), shape.position());
            assert_eq!(t.rotation(), shape.rotation());
            assert_eq!(t.scale(), shape.scale());
            // Every triangle corner is one of the parent's world vertices.
            for w in t.world_vertices() {
                assert!(
                    shape
                        .world_vertices()
                        .iter()
                        .any(|p| (*p - *w).length() < 1e-4),
                    "triangle vertex {w:?} not on parent"
                );
            }
        }
    }

    #[test]
    fn clone_is_independent() {
        let pts = arrow();
        let parent = Shape::concave(Vec2::ZERO, &pts, &closed_loop_indices(pts.len())).unwrap();
        let mut copy = parent.clone();
        copy.set_position(Vec2::new(50.0, 50.0));
        copy.update(0.0);
        assert_eq!(parent.position(), Vec2::ZERO);
        assert_ne!(parent.world_vertices(), copy.world_vertices());
        assert_eq!(parent.local_points(), copy.local_points());
    }

    #[test]
    fn world_segments_follow_edges() {
        let mut tri = Shape::triangle_at(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::new(1.0, 1.0));
        tri.update(0.0);
        let segs: Vec<_> = tri.world_segments().collect();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0], (Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0)));
        assert_eq!(segs[2].1, segs[0].0);
    }

    // ── Point membership ─────────────────────────────────────────────────────

    #[test]
    fn point_in_triangle_inside_edge_and_outside() {
        let (a, b, c) = (Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        assert!(point_in_triangle(Vec2::new(1.0, 1.0), a, b, c));
        assert!(point_in_triangle(Vec2::new(2.0, 0.0), a, b, c));
        assert!(!point_in_triangle(Vec2::new(3.0, 3.0), a, b, c));
    }

    #[test]
    fn contains_point_for_each_variant() {
        let mut rect = Shape::rectangle(Vec2::new(10.0, 10.0), 4.0, 4.0);
        rect.update(0.0);
        assert!(rect.contains_point(Vec2::new(11.0, 9.0)));
        assert!(!rect.contains_point(Vec2::new(13.0, 10.0)));

        let pts = arrow();
        let mut concave = Shape::concave(Vec2::ZERO, &pts, &closed_loop_indices(pts.len())).unwrap();
        concave.update(0.0);
        assert!(concave.contains_point(Vec2::new(1.0, 1.0)));
        // The notch between the two prongs is outside the polygon.
        assert!(!concave.contains_point(Vec2::new(2.0, 3.5)));
    }
}
