//! Geometry error types.
//!
//! Everything in here is a construction-time failure. Steady-state per-tick
//! work (transform update, SAT test, screen wrap) is total over valid shapes,
//! so invalid geometry is rejected at the point of creation and never enters
//! the simulation.
//!
//! ## Usage
//!
//! ```rust
//! use asteroid_geometry::error::GeometryResult;
//! use asteroid_geometry::shape::{closed_loop_indices, Shape};
//! use bevy::math::Vec2;
//!
//! fn build(points: &[Vec2]) -> GeometryResult<Shape> {
//!     let shape = Shape::concave(Vec2::ZERO, points, &closed_loop_indices(points.len()))?;
//!     Ok(shape)
//! }
//! ```

use std::fmt;

/// Top-level error enum for shape construction and triangulation.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Vertex and edge data disagree: the index list is not exactly twice the
    /// vertex count, references a missing vertex, or there are fewer than 3
    /// vertices.
    InvalidGeometry {
        /// Number of vertices supplied.
        vertex_count: usize,
        /// Number of edge indices supplied.
        index_count: usize,
        /// What exactly was wrong.
        reason: &'static str,
    },

    /// Ear clipping ran out of ears before the ring was reduced to a single
    /// triangle. Usually a self-intersecting ring or one wound the wrong way.
    TriangulationFailure {
        /// Number of vertices in the input ring.
        vertex_count: usize,
        /// Live vertices left when clipping stopped.
        remaining: usize,
    },

    /// An edge has zero length, so no separating axis can be derived from it.
    DegenerateAxis {
        /// Index of the offending edge within the shape's edge list.
        edge: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidGeometry {
                vertex_count,
                index_count,
                reason,
            } => write!(
                f,
                "invalid geometry ({} vertices, {} indices): {}",
                vertex_count, index_count, reason
            ),
            GeometryError::TriangulationFailure {
                vertex_count,
                remaining,
            } => write!(
                f,
                "ear clipping failed on a {}-vertex ring with {} vertices left unclipped",
                vertex_count, remaining
            ),
            GeometryError::DegenerateAxis { edge } => {
                write!(f, "edge {} has zero length and yields no axis", edge)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Convenience alias: a `Result` using `GeometryError` as the error type.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised while reading [`crate::config::GeometryConfig`] from text.
#[derive(Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed into the config shape.
    Parse(toml::de::Error),

    /// A value parsed fine but is outside its usable range.
    UnsafeValue {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "failed to parse geometry config: {}", e),
            ConfigError::UnsafeValue {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::UnsafeValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::UnsafeValue {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if `value` is negative or not finite.
pub fn validate_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::UnsafeValue {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}
