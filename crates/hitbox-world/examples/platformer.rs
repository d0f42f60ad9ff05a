//! Headless platformer demo.
//!
//! A player box falls under a fixed gravity step, lands on the floor, walks
//! right into a wall and bumps a rotating spinner. Each tick the demo reads
//! the player's monitor to decide whether it is grounded or blocked, the same
//! checks gameplay scripts would make.
//!
//! Run with: `RUST_LOG=debug cargo run -p hitbox-world --example platformer`

use hitbox_world::prelude::*;

const TICKS: u64 = 120;
const GRAVITY: f64 = 0.25;
const WALK_SPEED: f64 = 0.2;
const SPIN_PER_TICK: f64 = 0.05;

// ---------------------------------------------------------------------------
// Scene setup
// ---------------------------------------------------------------------------

fn main() -> Result<(), WorldError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut world = CollisionWorld::new(CollisionConfig::default())?;

    let floor = world.spawn(Rect::new(-50.0, 10.0, 100.0, 4.0))?;
    let wall = world.spawn(Rect::new(20.0, -20.0, 4.0, 30.0))?;
    let spinner = world.spawn(Rect::rotated(10.0, 4.0, 6.0, 1.0, 0.0))?;
    let coin = world.spawn(Circle::new(6.0, 8.0, 0.75))?;
    let player = world.spawn(Rect::new(0.0, 0.0, 2.0, 2.0))?;

    let mut position = Vec2::new(1.0, 1.0);
    let mut fall_speed = 0.0;
    let mut spin = 0.0;

    for _ in 0..TICKS {
        // -- move ---------------------------------------------------------
        let (grounded, blocked) = {
            let monitor = world.monitor(player)?;
            (monitor.bottom().is_some(), monitor.right().is_some())
        };

        if grounded {
            fall_speed = 0.0;
        } else {
            fall_speed += GRAVITY;
            position.y += fall_speed;
        }
        if !blocked {
            position.x += WALK_SPEED;
        }
        world.set_pose(player, position, 0.0)?;

        spin += SPIN_PER_TICK;
        let spinner_middle = world.shape(spinner)?.middle();
        world.set_pose(spinner, spinner_middle, spin)?;

        // -- collide ------------------------------------------------------
        let report = world.step();

        for event in report.events.iter().filter(|e| e.body == player) {
            let label = match event.view {
                Some(Direction::Bottom) if event.other == floor => "landed on floor",
                Some(Direction::Right) if event.other == wall => "hit wall",
                Some(_) => continue,
                None if event.other == coin => "picked up coin",
                None if event.other == spinner => "bumped spinner",
                None => continue,
            };
            tracing::info!(tick = event.tick, other = %event.other, "{label}");
        }

        if world.is_alive(coin) && world.monitor(player)?.has(coin) {
            world.despawn(coin);
        }

        // Snap onto the floor so the player rests on it instead of sinking.
        if world.monitor(player)?.has(floor) {
            let floor_top = world.shape(floor)?.bounding_box().y;
            position.y = position.y.min(floor_top - 1.0 + 0.01);
        }
    }

    tracing::info!(
        ticks = world.tick(),
        x = position.x,
        y = position.y,
        bodies = world.body_count(),
        "demo finished"
    );
    Ok(())
}
