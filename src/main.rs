//! Flipper demo table
//!
//! Builds a small pinball table, auto-plays the flippers and runs the
//! simulation headless, logging the ball and the score.
//!
//! Usage: `flipper [config.json] [seed]`

use std::f32::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Quat;
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use flipper::consts::*;
use flipper::sim::{
    Acceleration, Cinematic, Clock, DeltaSpace, Field, Hitbox, Mass, Position, Shape, Speed,
    StepReport, Universe,
};
use flipper::{PhysicsConfig, PhysicsError};

/// Simulated seconds to run
const RUN_SECONDS: f32 = 30.0;
/// Render frame time the loop pretends to have
const FRAME_DT: f32 = 1.0 / 60.0;

const BALL_RADIUS: f32 = 0.25;
const BALL_MASS: f32 = 0.08;
const BALL_START: Position = Position::new(0.0, 6.0, 0.0);
/// Below this the ball has left the table
const DRAIN_Y: f32 = -11.0;

const FLIPPER_LENGTH: f32 = 1.6;
const FLIPPER_REST: f32 = -0.5;
const FLIPPER_UP: f32 = 0.5;
const FLIPPER_SPEED: f32 = 14.0;
/// Flippers fire for this long out of every `FLIP_PERIOD` seconds
const FLIP_HOLD: f32 = 0.25;
const FLIP_PERIOD: f32 = 1.5;

const BUMPER_SCORE: u64 = 100;
const FLIPPER_SCORE: u64 = 10;

/// A flipper and the direction it swings when pressed
struct Flipper {
    hitbox: Arc<Hitbox>,
    /// +1 swings counter-clockwise (left flipper), -1 clockwise (right)
    side: f32,
}

impl Flipper {
    fn new(pivot: Position, side: f32, label: &str) -> Result<Self, PhysicsError> {
        let tip = Position::new(FLIPPER_LENGTH * side, 0.0, 0.0);
        let hitbox = Hitbox::frame(
            pivot,
            Quat::from_rotation_z(FLIPPER_REST * side),
            Mass::new(IMMOVABLE_MASS),
            vec![Position::ZERO, tip],
        )?
        .with_label(label);
        Ok(Self {
            hitbox: Arc::new(hitbox),
            side,
        })
    }

    /// Current swing angle, positive toward "up" for either side
    fn angle(&self) -> f32 {
        let (axis, angle) = self.hitbox.body().rotation().to_axis_angle();
        let mut signed = if axis.z < 0.0 { -angle } else { angle };
        if signed > PI {
            signed -= 2.0 * PI;
        } else if signed < -PI {
            signed += 2.0 * PI;
        }
        signed * self.side
    }

    /// Drive the flipper toward up/rest; stop and clamp at the limits
    fn drive(&self, pressed: bool) {
        let body = self.hitbox.body();
        let angle = self.angle();
        let (target, omega) = if pressed {
            (FLIPPER_UP, FLIPPER_SPEED)
        } else {
            (FLIPPER_REST, -FLIPPER_SPEED)
        };

        let reached = if pressed { angle >= target } else { angle <= target };
        if reached {
            body.set_angular_speed(0.0);
            body.set_rotation(Quat::from_rotation_z(target * self.side));
        } else {
            body.set_angular_speed(omega * self.side);
        }
    }
}

fn wall(label: &str, vertices: Vec<Position>) -> Result<Arc<Hitbox>, PhysicsError> {
    let hitbox = Hitbox::frame(
        Position::ZERO,
        Quat::IDENTITY,
        Mass::new(IMMOVABLE_MASS),
        vertices,
    )?;
    Ok(Arc::new(hitbox.with_label(label)))
}

fn serve(ball: &Hitbox, rng: &mut Pcg32) {
    let jitter = rng.random_range(-0.5..0.5);
    ball.body().set_position(BALL_START + DeltaSpace::new(jitter, 0.0, 0.0));
    ball.body().set_speed(Speed::new(
        rng.random_range(-2.0..2.0),
        rng.random_range(0.0..3.0),
        0.0,
    ));
}

fn main() -> Result<(), PhysicsError> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PhysicsConfig::load(path)?,
        None => PhysicsConfig::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            warn!("Ignoring bad seed: {err}");
            42
        }
        None => 42,
    };
    info!("Config: {config:?}, seed {seed}");

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut universe = Universe::with_config(config);
    let score = Arc::new(AtomicU64::new(0));

    // Cabinet: left wall, roof, right wall
    universe.add_body(wall(
        "cabinet",
        vec![
            Position::new(-5.0, -6.0, 0.0),
            Position::new(-5.0, 10.0, 0.0),
            Position::new(5.0, 10.0, 0.0),
            Position::new(5.0, -6.0, 0.0),
        ],
    )?);
    // Inlanes funnel the ball toward the flippers
    universe.add_body(wall(
        "left_inlane",
        vec![Position::new(-5.0, -6.0, 0.0), Position::new(-2.0, -8.0, 0.0)],
    )?);
    universe.add_body(wall(
        "right_inlane",
        vec![Position::new(2.0, -8.0, 0.0), Position::new(5.0, -6.0, 0.0)],
    )?);

    let flippers = [
        Flipper::new(Position::new(-2.0, -8.0, 0.0), 1.0, "left_flipper")?,
        Flipper::new(Position::new(2.0, -8.0, 0.0), -1.0, "right_flipper")?,
    ];
    for flipper in &flippers {
        let score = Arc::clone(&score);
        flipper.hitbox.set_collision_action(move |_| {
            score.fetch_add(FLIPPER_SCORE, Ordering::Relaxed);
        });
        universe.add_body(Arc::clone(&flipper.hitbox));
    }

    // Bumper: immovable circle with a weak magnet pulling the ball in
    let bumper = Arc::new(
        Hitbox::new(
            Cinematic::with_field(
                Position::new(0.0, 3.0, 0.0),
                Quat::IDENTITY,
                Mass::new(IMMOVABLE_MASS),
                Field::attraction(Position::ZERO, 2.0),
            ),
            Shape::Circle { radius: 0.8 },
        )?
        .with_label("bumper"),
    );
    {
        let score = Arc::clone(&score);
        bumper.set_collision_action(move |other| {
            let total = score.fetch_add(BUMPER_SCORE, Ordering::Relaxed) + BUMPER_SCORE;
            info!("Bumper hit by '{}', score {}", other.label(), total);
        });
    }
    universe.add_field(Arc::clone(bumper.body().field()));
    universe.add_body(Arc::clone(&bumper));

    let ball = Arc::new(
        Hitbox::circle(BALL_START, Mass::new(BALL_MASS), BALL_RADIUS).with_label("ball"),
    );
    serve(&ball, &mut rng);
    universe.add_body(Arc::clone(&ball));

    universe.add_field(Arc::new(Field::gravity(Acceleration::new(
        0.0,
        -TABLE_GRAVITY,
        0.0,
    ))));
    universe.add_field(Arc::new(Field::friction(0.002)));

    let mut clock = Clock::from_config(universe.config());
    let mut totals = StepReport::default();
    let mut drained = 0u32;
    let mut elapsed = 0.0f32;
    let mut next_log = 1.0f32;

    while elapsed < RUN_SECONDS {
        let pressed = elapsed % FLIP_PERIOD < FLIP_HOLD;
        for flipper in &flippers {
            flipper.drive(pressed);
        }

        totals += universe.run_frame(&mut clock, FRAME_DT);
        elapsed += FRAME_DT;

        let position = ball.body().position().vec();
        if position.y < DRAIN_Y || !position.is_finite() {
            drained += 1;
            info!("Ball drained at {:.2}s ({} so far)", elapsed, drained);
            serve(&ball, &mut rng);
        }

        if elapsed >= next_log {
            next_log += 1.0;
            let speed = ball.body().speed().vec();
            info!(
                "t={:>5.2}s ball=({:>6.2}, {:>6.2}) |v|={:>5.2} score={}",
                elapsed,
                position.x,
                position.y,
                speed.truncate().length(),
                score.load(Ordering::Relaxed)
            );
        }
    }

    info!(
        "Done: score={} drained={} contacts={} skipped frame pairs={}",
        score.load(Ordering::Relaxed),
        drained,
        totals.contacts,
        totals.unsupported_pairs
    );
    Ok(())
}
