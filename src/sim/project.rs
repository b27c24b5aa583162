//! Event projection
//!
//! Reduces a shot's event list to the keyframes of a single ball.

use super::shot::{BallId, Keyframe, Shot};

/// Keyframes for `ball`, in event order.
///
/// Each keyframe carries the ball's own snapshot, never the other
/// participant's. An empty result means the shot does not touch the ball.
pub fn project(shot: &Shot, ball: BallId) -> Vec<Keyframe> {
    shot.events
        .iter()
        .filter_map(|event| {
            event.snapshot_for(ball).map(|snapshot| Keyframe {
                time: event.time,
                kind: event.kind,
                snapshot: *snapshot,
            })
        })
        .collect()
}
