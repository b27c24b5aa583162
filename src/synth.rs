//! Synthetic shots for a lone ball
//!
//! Stand-in for the physics engine when there is nothing to collide with:
//! a ball struck without spin slides until its spin catches up
//! (`|v| = 5/7 |v0|`), then rolls to a stop. Both phases use the same friction
//! model as the playback integrator, so replayed positions land exactly on
//! the synthesized events.

use std::collections::BTreeMap;

use glam::{DVec2, DVec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::heading_to_direction;
use crate::sim::{BallId, BallRenderState, BallSnapshot, Event, EventKind, MotionState, Shot, ShotSource};
use crate::table::{Table, TableConstants, TableGeometry};

/// Fraction of the straight-line run to the cushion a synthetic strike may use
const CUSHION_MARGIN: f64 = 0.95;

/// Shot for `ball` struck at `start` with centre-of-mass `velocity` and no spin
pub fn straight_shot(ball: BallId, start: DVec2, velocity: DVec2, table: &TableConstants) -> Shot {
    let speed = velocity.length();
    if speed == 0.0 {
        return Shot::new(
            0.0,
            vec![Event::single(0.0, EventKind::CueStrike, ball, BallSnapshot::at_rest(start))],
        );
    }
    let dir = velocity / speed;

    let strike = BallSnapshot {
        position: start,
        velocity,
        angular_velocity: DVec3::ZERO,
        state: MotionState::Sliding,
    };

    let slide_time = 2.0 * speed / (7.0 * table.sliding_decel());
    let roll_velocity = velocity * (5.0 / 7.0);
    let roll = BallSnapshot {
        position: start + velocity * slide_time
            - 0.5 * table.sliding_decel() * slide_time * slide_time * dir,
        velocity: roll_velocity,
        angular_velocity: rolling_spin(roll_velocity, table.ball_radius),
        state: MotionState::Rolling,
    };

    let roll_time = roll_velocity.length() / table.rolling_decel();
    let stop = BallSnapshot::at_rest(
        roll.position + roll_velocity * roll_time
            - 0.5 * table.rolling_decel() * roll_time * roll_time * dir,
    );

    let end = slide_time + roll_time;
    Shot::new(
        end,
        vec![
            Event::single(0.0, EventKind::CueStrike, ball, strike),
            Event::single(slide_time, EventKind::StateChange, ball, roll),
            Event::single(end, EventKind::StateChange, ball, stop),
        ],
    )
}

/// Spin of a ball rolling without slipping at `velocity`
pub fn rolling_spin(velocity: DVec2, radius: f64) -> DVec3 {
    DVec3::new(-velocity.y, velocity.x, 0.0) / radius
}

/// Distance a ball struck at `speed` travels before stopping
pub fn stopping_distance(speed: f64, table: &TableConstants) -> f64 {
    speed * speed * stopping_coefficient(table)
}

/// Largest strike speed that stops within `distance`
pub fn max_speed_within(distance: f64, table: &TableConstants) -> f64 {
    (distance.max(0.0) / stopping_coefficient(table)).sqrt()
}

fn stopping_coefficient(table: &TableConstants) -> f64 {
    12.0 / (49.0 * table.sliding_decel()) + 25.0 / (98.0 * table.rolling_decel())
}

/// Straight-line distance from `pos` along unit `dir` until a ball of
/// `radius` touches a cushion
pub fn distance_to_cushion(geometry: &TableGeometry, pos: DVec2, dir: DVec2, radius: f64) -> f64 {
    let axis = |p: f64, d: f64, max: f64| {
        if d > 0.0 {
            (max - radius - p) / d
        } else if d < 0.0 {
            (radius - p) / d
        } else {
            f64::INFINITY
        }
    };
    axis(pos.x, dir.x, geometry.width)
        .min(axis(pos.y, dir.y, geometry.length))
        .max(0.0)
}

/// Seeded auto-play source: strikes one ball from wherever it is shown,
/// along a base heading with uniform jitter
#[derive(Debug, Clone)]
pub struct StrikeSource {
    rng: Pcg32,
    table: Table,
    ball: BallId,
    /// Degrees, 0 = +x, 90 = +y
    heading: f64,
    jitter: f64,
    speed: f64,
    remaining: Option<usize>,
}

impl StrikeSource {
    pub fn new(seed: u64, table: Table, ball: BallId, heading: f64, speed: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            table,
            ball,
            heading,
            jitter: 0.0,
            speed,
            remaining: None,
        }
    }

    /// Randomize each heading by up to `degrees` either way
    pub fn with_jitter(mut self, degrees: f64) -> Self {
        self.jitter = degrees.abs();
        self
    }

    /// Stop after `shots` strikes
    pub fn with_limit(mut self, shots: usize) -> Self {
        self.remaining = Some(shots);
        self
    }
}

impl ShotSource for StrikeSource {
    fn next_shot(&mut self, balls: &BTreeMap<BallId, BallRenderState>) -> Option<Shot> {
        if self.remaining == Some(0) {
            return None;
        }

        let Some(current) = balls.get(&self.ball).filter(|b| b.state.on_table()) else {
            log::warn!("Ball {} is not on the table, nothing to strike", self.ball);
            return None;
        };

        let jitter = if self.jitter > 0.0 {
            self.rng.random_range(-self.jitter..self.jitter)
        } else {
            0.0
        };
        let dir = heading_to_direction(self.heading + jitter);

        let constants = &self.table.constants;
        let room = distance_to_cushion(
            &self.table.geometry,
            current.position,
            dir,
            constants.ball_radius,
        );
        let speed = self.speed.min(max_speed_within(room * CUSHION_MARGIN, constants));

        if let Some(n) = self.remaining.as_mut() {
            *n -= 1;
        }
        log::debug!(
            "Striking ball {} at {:.2} m/s, heading {:.1}°",
            self.ball,
            speed,
            self.heading + jitter
        );
        Some(straight_shot(self.ball, current.position, dir * speed, constants))
    }
}
