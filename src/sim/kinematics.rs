//! Closed-form friction kinematics between events
//!
//! Between two physics events a ball is either sliding (contact point slips,
//! sliding friction) or rolling (rolling friction). Both regimes decelerate
//! at a constant rate, so displacement is quadratic in time.

use glam::{DVec2, DVec3};

use super::segment::bracket;
use super::shot::{BallRenderState, BallSnapshot, Keyframe, MotionState};
use crate::table::TableConstants;

/// Displacement of a ball `dt` seconds after its basis snapshot.
///
/// Zero-length directions contribute nothing instead of producing NaN. A
/// sliding ball at rest with planar spin still moves, since friction follows
/// the contact velocity.
pub fn displacement(basis: &BallSnapshot, dt: f64, table: &TableConstants) -> DVec2 {
    match basis.state {
        MotionState::Rolling => {
            let dir = basis.velocity.normalize_or_zero();
            basis.velocity * dt - 0.5 * table.rolling_decel() * dt * dt * dir
        }
        MotionState::Sliding => {
            let dir = contact_velocity(basis, table.ball_radius).normalize_or_zero();
            basis.velocity * dt - 0.5 * table.sliding_decel() * dt * dt * dir
        }
        MotionState::Stationary | MotionState::Pocketed(_) | MotionState::NotInPlay => DVec2::ZERO,
    }
}

/// Velocity of the contact point relative to the cloth.
///
/// Adds the planar part of `radius * (ẑ·ω_z) × ω` to the centre-of-mass
/// velocity; sliding friction opposes this, not the ball's travel direction.
pub fn contact_velocity(basis: &BallSnapshot, radius: f64) -> DVec2 {
    let spin = basis.angular_velocity;
    let rotational = radius * DVec3::new(0.0, 0.0, spin.z).cross(spin);
    basis.velocity + rotational.truncate()
}

/// Position of a ball `dt` seconds after its basis snapshot
#[inline]
pub fn position_after(basis: &BallSnapshot, dt: f64, table: &TableConstants) -> DVec2 {
    basis.position + displacement(basis, dt, table)
}

/// Render state of one ball at `elapsed` seconds into a shot.
///
/// Past `duration` the last keyframe is returned as-is, so a settled ball
/// lands exactly where the physics engine put it. `None` means the ball has
/// not been touched yet (or never is) and keeps whatever it showed before.
pub fn sample(
    keyframes: &[Keyframe],
    elapsed: f64,
    duration: f64,
    table: &TableConstants,
) -> Option<BallRenderState> {
    if elapsed >= duration {
        return keyframes.last().map(|k| BallRenderState::from(&k.snapshot));
    }

    let basis = bracket(keyframes, elapsed)?;
    let position = position_after(&basis.snapshot, elapsed - basis.time, table);
    Some(BallRenderState::new(position, basis.snapshot.state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shot::EventKind;
    use crate::table::Pocket;
    use proptest::prelude::*;

    fn table() -> TableConstants {
        TableConstants::default()
    }

    fn snapshot(pos: (f64, f64), vel: (f64, f64), state: MotionState) -> BallSnapshot {
        BallSnapshot {
            position: DVec2::new(pos.0, pos.1),
            velocity: DVec2::new(vel.0, vel.1),
            angular_velocity: DVec3::ZERO,
            state,
        }
    }

    fn key(time: f64, pos: (f64, f64), vel: (f64, f64), state: MotionState) -> Keyframe {
        Keyframe {
            time,
            kind: EventKind::StateChange,
            snapshot: snapshot(pos, vel, state),
        }
    }

    /// Slide, roll, stop along +x
    fn scenario() -> Vec<Keyframe> {
        vec![
            key(0.0, (0.0, 0.0), (1.0, 0.0), MotionState::Sliding),
            key(0.5, (0.5, 0.0), (0.6, 0.0), MotionState::Rolling),
            key(1.2, (0.9, 0.0), (0.0, 0.0), MotionState::Stationary),
        ]
    }

    fn x_at(elapsed: f64) -> f64 {
        sample(&scenario(), elapsed, 1.2, &table()).unwrap().position.x
    }

    #[test]
    fn test_rolling_decelerates_along_travel() {
        let basis = snapshot((0.0, 0.0), (0.0, 2.0), MotionState::Rolling);
        let d = displacement(&basis, 1.0, &table());
        let expected = 2.0 - 0.5 * 0.015 * 9.81;
        assert!(d.x.abs() < 1e-12);
        assert!((d.y - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sliding_without_spin_opposes_velocity() {
        let basis = snapshot((0.0, 0.0), (-1.0, 0.0), MotionState::Sliding);
        let d = displacement(&basis, 0.5, &table());
        let expected = -(0.5 - 0.5 * 0.2 * 9.81 * 0.25);
        assert!((d.x - expected).abs() < 1e-12);
        assert_eq!(d.y, 0.0);
    }

    #[test]
    fn test_sliding_friction_follows_contact_velocity() {
        // Ball at rest with side spin: contact point still slips
        let mut basis = snapshot((0.0, 0.0), (0.0, 0.0), MotionState::Sliding);
        basis.angular_velocity = DVec3::new(10.0, 0.0, 5.0);

        let contact = contact_velocity(&basis, 0.03);
        // (0, 0, 5) x (10, 0, 5) = (0, 50, 0)
        assert!(contact.x.abs() < 1e-12);
        assert!((contact.y - 1.5).abs() < 1e-12);

        let d = displacement(&basis, 0.2, &table());
        assert!(d.x.abs() < 1e-12);
        assert!(d.y < 0.0, "friction pushes against the slip direction");
    }

    #[test]
    fn test_still_states_do_not_move() {
        for state in [
            MotionState::Stationary,
            MotionState::Pocketed(Pocket::SouthWest),
            MotionState::NotInPlay,
        ] {
            let basis = snapshot((0.3, 0.4), (1.0, 1.0), state);
            assert_eq!(displacement(&basis, 3.0, &table()), DVec2::ZERO);
            assert_eq!(position_after(&basis, 3.0, &table()), DVec2::new(0.3, 0.4));
        }
    }

    #[test]
    fn test_zero_velocity_rolling_is_finite() {
        let basis = snapshot((0.1, 0.1), (0.0, 0.0), MotionState::Rolling);
        let d = displacement(&basis, 2.0, &table());
        assert_eq!(d, DVec2::ZERO);
    }

    #[test]
    fn test_scenario_knots() {
        assert_eq!(x_at(0.0), 0.0);
        assert_eq!(x_at(0.5), 0.5);
        assert_eq!(x_at(1.2), 0.9);
        assert_eq!(x_at(5.0), 0.9);

        let state = sample(&scenario(), 0.7, 1.2, &table()).unwrap().state;
        assert_eq!(state, MotionState::Rolling);
    }

    #[test]
    fn test_scenario_mid_slide() {
        let mid = x_at(0.25);
        assert!(mid > 0.0 && mid < 0.5, "mid-slide x was {}", mid);

        let mut last = x_at(0.0);
        for i in 1..50 {
            let x = x_at(i as f64 * 0.01);
            assert!(x > last);
            last = x;
        }
    }

    #[test]
    fn test_sample_before_first_keyframe() {
        let keys = vec![key(0.3, (1.0, 1.0), (1.0, 0.0), MotionState::Sliding)];
        assert!(sample(&keys, 0.1, 2.0, &table()).is_none());
        assert!(sample(&[], 0.1, 2.0, &table()).is_none());
        // Terminal snap with nothing to snap to still holds
        assert!(sample(&[], 5.0, 2.0, &table()).is_none());
    }

    #[test]
    fn test_terminal_snap_reports_final_state() {
        let keys = vec![
            key(0.0, (0.0, 0.0), (1.0, 0.0), MotionState::Rolling),
            key(0.4, (0.38, 0.0), (0.9, 0.0), MotionState::Pocketed(Pocket::East)),
        ];
        let settled = sample(&keys, 0.6, 0.5, &table()).unwrap();
        assert_eq!(settled.position, DVec2::new(0.38, 0.0));
        assert_eq!(settled.state, MotionState::Pocketed(Pocket::East));
    }

    fn motion_state() -> impl Strategy<Value = MotionState> {
        prop_oneof![
            Just(MotionState::Stationary),
            Just(MotionState::Sliding),
            Just(MotionState::Rolling),
            Just(MotionState::NotInPlay),
        ]
    }

    fn keyframes() -> impl Strategy<Value = Vec<Keyframe>> {
        prop::collection::vec(
            (0.0f64..0.5, -2.0f64..2.0, -2.0f64..2.0, -3.0f64..3.0, -3.0f64..3.0, motion_state()),
            1..8,
        )
        .prop_map(|raw| {
            let mut time = 0.0;
            raw.into_iter()
                .map(|(gap, px, py, vx, vy, state)| {
                    time += gap;
                    key(time, (px, py), (vx, vy), state)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_boundary_continuity(keys in keyframes()) {
            let duration = keys.last().unwrap().time + 1.0;
            for k in &keys {
                let at = sample(&keys, k.time, duration, &table()).unwrap();
                let basis = bracket(&keys, k.time).unwrap();
                // Duplicate timestamps resolve to the earliest keyframe at that time
                prop_assert_eq!(basis.time, k.time);
                prop_assert_eq!(at.position, basis.snapshot.position);
            }
        }

        #[test]
        fn prop_sample_is_idempotent(keys in keyframes(), elapsed in 0.0f64..5.0) {
            let duration = keys.last().unwrap().time;
            let a = sample(&keys, elapsed, duration, &table());
            let b = sample(&keys, elapsed, duration, &table());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_terminal_snap(keys in keyframes(), past in 0.0f64..100.0) {
            let duration = keys.last().unwrap().time;
            let settled = sample(&keys, duration + past, duration, &table()).unwrap();
            prop_assert_eq!(settled.position, keys.last().unwrap().snapshot.position);
        }

        /// A ball with zero velocity stays put unless it is sliding with a
        /// slipping contact point; spin about the table normal alone does not slip
        #[test]
        fn prop_zero_velocity_is_stable(
            x in -2.0f64..2.0,
            y in -2.0f64..2.0,
            wz in -50.0f64..50.0,
            dt in 0.0f64..10.0,
        ) {
            for state in [MotionState::Rolling, MotionState::Stationary] {
                let basis = snapshot((x, y), (0.0, 0.0), state);
                prop_assert_eq!(displacement(&basis, dt, &table()), DVec2::ZERO);
            }
            // Spin about the table normal alone leaves the contact point still
            let mut spinning = snapshot((x, y), (0.0, 0.0), MotionState::Sliding);
            spinning.angular_velocity = DVec3::new(0.0, 0.0, wz);
            prop_assert_eq!(displacement(&spinning, dt, &table()), DVec2::ZERO);
        }
    }
}
