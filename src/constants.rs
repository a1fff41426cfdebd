//! Centralised geometry and screen-wrap constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant notes the observable consequence of changing it.
//! [`crate::config::GeometryConfig`] mirrors the runtime-tunable subset and
//! uses these values as its defaults.

// ── Screen Bounds ─────────────────────────────────────────────────────────────

/// Width of the visible play field (world units, origin at the top-left).
pub const SCREEN_WIDTH: f32 = 800.0;

/// Height of the visible play field (world units, origin at the top-left).
pub const SCREEN_HEIGHT: f32 = 600.0;

// ── Screen Wrap ───────────────────────────────────────────────────────────────

/// Minimum time (seconds) between two reflections of the same body.
///
/// A body that has just wrapped sits right on the opposite boundary; without a
/// grace period it would be considered out of bounds again on the next tick.
/// Lower values make wrapping feel snappier; values below one frame reintroduce
/// jitter at the edges.
pub const REFLECT_GRACE_PERIOD: f32 = 1.5;

/// Default effective half-width of a body (world units).
///
/// Used for the out-of-bounds test, independent of the exact polygon extents.
pub const DEFAULT_EFFECTIVE_WIDTH: f32 = 15.0;

/// Default effective half-height of a body (world units).
pub const DEFAULT_EFFECTIVE_HEIGHT: f32 = 15.0;

// ── Collision ─────────────────────────────────────────────────────────────────

/// Squared length below which an edge is treated as zero-length.
///
/// Axes derived from such edges are skipped by the SAT test instead of being
/// normalised into NaN.
pub const DEGENERATE_AXIS_EPSILON: f32 = 1e-12;

// ── Triangulation ─────────────────────────────────────────────────────────────

/// Upper bound on ear-queue pops per input vertex.
///
/// Every clip removes one vertex and queues at most two neighbours, so a
/// healthy run never gets near `vertices × TRIANGULATION_POPS_PER_VERTEX`
/// pops. Hitting the cap means the ring state is corrupt and triangulation
/// fails instead of hanging.
pub const TRIANGULATION_POPS_PER_VERTEX: usize = 4;

// ── Shape Limits ──────────────────────────────────────────────────────────────

/// Largest vertex count a shape can hold.
///
/// Edge indices are `u16`, so vertex 65 535 is the last one an edge can
/// reference. Larger rings are rejected at construction.
pub const MAX_SHAPE_VERTICES: usize = u16::MAX as usize + 1;
