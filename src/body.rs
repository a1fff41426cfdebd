//! Moving bodies and toroidal screen wrap.
//!
//! A [`Body`] owns its [`Shape`] and the motion state that drives it. Each tick
//! the body advances along its direction, pushes its transform into the shape,
//! and counts down its reflection cooldown. [`Body::reflect`] wraps a body that
//! has fully left the screen to the opposite side.

use crate::constants::{DEFAULT_EFFECTIVE_HEIGHT, DEFAULT_EFFECTIVE_WIDTH, REFLECT_GRACE_PERIOD};
use crate::math::wrap_angle;
use crate::shape::Shape;
use bevy::prelude::*;

/// A shape plus the motion and screen-wrap state that moves it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Body {
    shape: Shape,
    position: Vec2,
    rotation: f32,
    scale: f32,
    direction: Vec2,
    /// Distance moved per tick along `direction`.
    linear_speed: f32,
    /// Half-extents used for the out-of-bounds test.
    effective_extents: Vec2,
    reflected: bool,
    time_since_reflect: f32,
    grace_period: f32,
}

/// New position for a body that has left the screen, or `None` if it is
/// still (partly) visible.
///
/// Horizontal exits are checked first (right, then left) and may carry a
/// simultaneous vertical correction, so a body leaving through a corner wraps
/// diagonally in one step. A purely vertical exit only moves `y`.
pub fn wrap_position(position: Vec2, half_extents: Vec2, screen: Vec2) -> Option<Vec2> {
    let new_x = if position.x - half_extents.x > screen.x {
        Some(-half_extents.x)
    } else if position.x + half_extents.x < 0.0 {
        Some(screen.x + half_extents.x)
    } else {
        None
    };

    let new_y = if position.y + half_extents.y < 0.0 {
        Some(screen.y + half_extents.y)
    } else if position.y - half_extents.y > screen.y {
        Some(-half_extents.y)
    } else {
        None
    };

    match (new_x, new_y) {
        (None, None) => None,
        (x, y) => Some(Vec2::new(
            x.unwrap_or(position.x),
            y.unwrap_or(position.y),
        )),
    }
}

impl Body {
    /// Wrap `shape`, starting at the shape's position and facing `rotation`.
    pub fn new(shape: Shape, rotation: f32) -> Self {
        let rotation = wrap_angle(rotation);
        Self {
            position: shape.position(),
            scale: shape.scale(),
            shape,
            rotation,
            direction: Vec2::from_angle(rotation),
            linear_speed: 0.0,
            effective_extents: Vec2::new(DEFAULT_EFFECTIVE_WIDTH, DEFAULT_EFFECTIVE_HEIGHT),
            reflected: false,
            time_since_reflect: 0.0,
            grace_period: REFLECT_GRACE_PERIOD,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_direction(mut self, direction: Vec2) -> Self {
        self.set_direction(direction);
        self
    }

    pub fn with_speed(mut self, linear_speed: f32) -> Self {
        self.linear_speed = linear_speed;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_effective_extents(mut self, half_width: f32, half_height: f32) -> Self {
        self.effective_extents = Vec2::new(half_width, half_height);
        self
    }

    pub fn with_grace_period(mut self, seconds: f32) -> Self {
        self.grace_period = seconds;
        self
    }

    /// Advance one tick: move, sync the shape transform, rebuild world
    /// vertices, and tick the reflection cooldown.
    pub fn update(&mut self, dt: f32) {
        self.position += self.direction * self.linear_speed;

        self.shape.set_position(self.position);
        self.shape.set_rotation(self.rotation);
        self.shape.set_scale(self.scale);
        self.shape.update(dt);

        if self.reflected {
            self.time_since_reflect += dt;
            if self.time_since_reflect > self.grace_period {
                self.reflected = false;
                self.time_since_reflect = 0.0;
            }
        }
    }

    /// Wrap the body to the opposite side if it has left the screen.
    ///
    /// Does nothing while the cooldown from a previous wrap is running.
    /// Returns whether the body moved.
    pub fn reflect(&mut self, screen_width: f32, screen_height: f32) -> bool {
        if self.reflected {
            return false;
        }
        let screen = Vec2::new(screen_width, screen_height);
        let Some(wrapped) = wrap_position(self.position, self.effective_extents, screen) else {
            return false;
        };
        self.position = wrapped;
        self.reflected = true;
        self.time_since_reflect = 0.0;
        true
    }

    /// Deep copy with a fresh cooldown, heading along `direction` at a
    /// fraction of this body's scale. Used when a body breaks apart.
    pub fn fragment(&self, direction: Vec2, scale_factor: f32) -> Self {
        let mut piece = self.clone();
        piece.set_direction(direction);
        piece.scale = self.scale * scale_factor;
        piece.reflected = false;
        piece.time_since_reflect = 0.0;
        piece
    }

    pub fn intersects(&self, other: &Body) -> bool {
        self.shape.intersects(&other.shape)
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = wrap_angle(rotation);
    }

    /// Add `delta` radians to the current rotation.
    pub fn turn(&mut self, delta: f32) {
        self.set_rotation(self.rotation + delta);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Unit heading, or zero if the body was given a zero direction.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.normalize_or_zero();
    }

    pub fn linear_speed(&self) -> f32 {
        self.linear_speed
    }

    pub fn set_linear_speed(&mut self, linear_speed: f32) {
        self.linear_speed = linear_speed;
    }

    pub fn effective_extents(&self) -> Vec2 {
        self.effective_extents
    }

    /// Whether the body wrapped recently and is still in its cooldown.
    pub fn reflected(&self) -> bool {
        self.reflected
    }

    pub fn time_since_reflect(&self) -> f32 {
        self.time_since_reflect
    }
}
