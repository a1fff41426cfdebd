use asteroid_geometry::body::Body;
use asteroid_geometry::config::{load_geometry_config, GeometryConfig};
use asteroid_geometry::shape::Shape;
use asteroid_geometry::simulation::{polygon_body, CollisionPairs, GeometryPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use std::env;
use std::time::Duration;

/// Frames stepped when `GEOM_DEMO_FRAMES` is unset or unparsable.
const DEFAULT_DEMO_FRAMES: u32 = 240;

/// Number of small random rocks scattered around the field.
const DEMO_DEBRIS_COUNT: usize = 6;

/// Spawn a small field: a ship-sized box drifting right, a concave rock
/// drifting left into its path, a shard heading off the top edge, and some
/// random debris.
fn spawn_demo_bodies(mut commands: Commands, config: Res<GeometryConfig>) {
    let ship = Body::new(Shape::rectangle(Vec2::new(200.0, 300.0), 20.0, 12.0), 0.0)
        .with_speed(2.0)
        .with_effective_extents(config.default_effective_width, config.default_effective_height)
        .with_grace_period(config.reflect_grace_period);
    commands.spawn(ship);

    let rock_outline = [
        Vec2::new(-30.0, -30.0),
        Vec2::new(30.0, -30.0),
        Vec2::new(30.0, 30.0),
        Vec2::new(0.0, 5.0),
        Vec2::new(-30.0, 30.0),
    ];
    match polygon_body(Vec2::new(520.0, 300.0), &rock_outline, 0.0, &config) {
        Ok(rock) => {
            commands.spawn(rock.with_direction(Vec2::NEG_X).with_speed(1.5));
        }
        Err(e) => warn!("Demo rock rejected: {e}"),
    }

    let shard_outline = [Vec2::new(0.0, 10.0), Vec2::new(-6.0, -6.0), Vec2::new(6.0, -6.0)];
    match polygon_body(Vec2::new(400.0, 40.0), &shard_outline, 0.0, &config) {
        Ok(shard) => {
            commands.spawn(shard.with_direction(Vec2::NEG_Y).with_speed(3.0));
        }
        Err(e) => warn!("Demo shard rejected: {e}"),
    }

    let mut rng = rand::thread_rng();
    for _ in 0..DEMO_DEBRIS_COUNT {
        let position = Vec2::new(
            rng.gen_range(0.0..config.screen_width),
            rng.gen_range(0.0..config.screen_height),
        );
        let size = rng.gen_range(6.0..14.0);
        let debris = Body::new(Shape::rectangle(position, size, size), rng.gen_range(-3.0..3.0))
            .with_speed(rng.gen_range(0.5..2.5))
            .with_effective_extents(config.default_effective_width, config.default_effective_height)
            .with_grace_period(config.reflect_grace_period);
        commands.spawn(debris);
    }
}

/// Log each frame's collision pairs when the set changes size.
fn log_collisions(pairs: Res<CollisionPairs>, mut last_len: Local<usize>) {
    if pairs.len() == *last_len {
        return;
    }
    *last_len = pairs.len();
    if pairs.is_empty() {
        info!("No collisions");
    }
    for (a, b) in pairs.iter() {
        info!("Collision: {a:?} <-> {b:?}");
    }
}

fn main() {
    let frames = env::var("GEOM_DEMO_FRAMES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_DEMO_FRAMES);

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), GeometryPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            1.0 / 60.0,
        )))
        .add_systems(
            Startup,
            (
                // Load config first so spawned bodies see the final values.
                load_geometry_config,
                spawn_demo_bodies.after(load_geometry_config),
            ),
        )
        .add_systems(PostUpdate, log_collisions);

    app.finish();
    app.cleanup();

    info!("Stepping {frames} frames");
    for _ in 0..frames {
        app.update();
    }

    let mut bodies = app.world_mut().query::<(Entity, &Body)>();
    for (entity, body) in bodies.iter(app.world()) {
        info!(
            "{entity:?} final position ({:.1}, {:.1}), reflected: {}",
            body.position().x,
            body.position().y,
            body.reflected()
        );
    }
}
