//! Geometry plugin and systems for Bevy ECS.
//!
//! Each frame runs three passes in a fixed order:
//!
//! 1. [`body_update_system`] moves every [`Body`] and rebuilds its world-space
//!    vertices.
//! 2. [`collision_detection_system`] tests every unordered pair and records
//!    overlaps in [`CollisionPairs`].
//! 3. [`screen_wrap_system`] wraps bodies that have left the screen.
//!
//! Collisions therefore see this frame's positions, and a body wrapped this
//! frame is tested at its new position on the next one.

use crate::body::Body;
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::shape::{closed_loop_indices, Shape};
use crate::triangulate::is_convex;
use bevy::prelude::*;

pub struct GeometryPlugin;

impl Plugin for GeometryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GeometryConfig>()
            .init_resource::<CollisionPairs>()
            .add_systems(
                Update,
                (
                    body_update_system,
                    collision_detection_system,
                    screen_wrap_system,
                )
                    .chain(),
            );
        info!("GeometryPlugin: update → collision → wrap systems registered");
    }
}

/// Entity pairs whose bodies overlapped during the last collision pass.
#[derive(Resource, Debug, Default, Clone)]
pub struct CollisionPairs {
    pairs: Vec<(Entity, Entity)>,
}

impl CollisionPairs {
    pub fn iter(&self) -> impl Iterator<Item = &(Entity, Entity)> {
        self.pairs.iter()
    }

    /// True if `a` and `b` collided, in either order.
    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn push(&mut self, a: Entity, b: Entity) {
        self.pairs.push((a, b));
    }
}

/// Advance every body by this frame's delta.
pub fn body_update_system(time: Res<Time>, mut bodies: Query<&mut Body>) {
    let dt = time.delta_secs();
    for mut body in bodies.iter_mut() {
        body.update(dt);
    }
}

/// Rebuild [`CollisionPairs`] from scratch with an O(n²) pairwise SAT pass.
pub fn collision_detection_system(
    bodies: Query<(Entity, &Body)>,
    mut pairs: ResMut<CollisionPairs>,
) {
    pairs.clear();
    for [(e1, b1), (e2, b2)] in bodies.iter_combinations() {
        if b1.intersects(b2) {
            pairs.push(e1, e2);
        }
    }
}

/// Wrap bodies that have fully left the screen to the opposite edge.
pub fn screen_wrap_system(config: Res<GeometryConfig>, mut bodies: Query<(Entity, &mut Body)>) {
    for (entity, mut body) in bodies.iter_mut() {
        // Skip the write (and change detection) for bodies in cooldown.
        if body.reflected() {
            continue;
        }
        let from = body.position();
        if body.reflect(config.screen_width, config.screen_height) {
            debug!(
                "{:?} wrapped from ({:.1}, {:.1}) to ({:.1}, {:.1})",
                entity,
                from.x,
                from.y,
                body.position().x,
                body.position().y
            );
        }
    }
}

/// Build a body from a closed polygon ring, picking convex or concave
/// construction from the ring's shape. Screen-wrap settings come from
/// `config`.
pub fn polygon_body(
    position: Vec2,
    points: &[Vec2],
    rotation: f32,
    config: &GeometryConfig,
) -> GeometryResult<Body> {
    let indices = closed_loop_indices(points.len());
    let shape = if is_convex(points) {
        Shape::convex(position, points, &indices)?
    } else {
        Shape::concave(position, points, &indices)?
    };
    Ok(Body::new(shape, rotation)
        .with_effective_extents(config.default_effective_width, config.default_effective_height)
        .with_grace_period(config.reflect_grace_period))
}

/// Spawn a stationary polygon body. Construction errors are logged and
/// returned; nothing is spawned in that case.
pub fn spawn_polygon_body(
    commands: &mut Commands,
    position: Vec2,
    points: &[Vec2],
    rotation: f32,
    config: &GeometryConfig,
) -> GeometryResult<Entity> {
    let body = polygon_body(position, points, rotation, config).inspect_err(|e| {
        warn!("Rejected polygon body at ({:.1}, {:.1}): {e}", position.x, position.y);
    })?;
    Ok(commands.spawn(body).id())
}
