//! Shot data model
//!
//! A shot is what the physics engine hands back after a strike: its total
//! duration and the chronological list of transition events. Nothing here is
//! mutated once built.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::table::Pocket;

/// Ball identifier (0 = cue ball, 1..=15 object balls)
pub type BallId = u32;

/// Kinematic regime of a ball at an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MotionState {
    #[default]
    Stationary,
    /// Contact point slips against the cloth
    Sliding,
    /// Pure rolling, contact point at rest
    Rolling,
    /// Dropped into the given pocket
    Pocketed(Pocket),
    /// Removed from the table
    NotInPlay,
}

impl MotionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionState::Stationary => "Stationary",
            MotionState::Sliding => "Sliding",
            MotionState::Rolling => "Rolling",
            MotionState::Pocketed(_) => "Pocketed",
            MotionState::NotInPlay => "NotInPlay",
        }
    }

    /// Whether the ball sits on the cloth and should be drawn
    pub fn on_table(&self) -> bool {
        !matches!(self, MotionState::Pocketed(_) | MotionState::NotInPlay)
    }

    /// Whether the ball moves under integration
    pub fn is_moving(&self) -> bool {
        matches!(self, MotionState::Sliding | MotionState::Rolling)
    }
}

/// What caused an event, as tagged by the physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EventKind {
    StateChange,
    BallCollision,
    RailCollision,
    Pocketed,
    CueStrike,
    Miscue,
    #[default]
    Unknown,
}

/// Kinematic snapshot of one ball, captured at its event's time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BallSnapshot {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Spin (rad/s), z is the table normal
    pub angular_velocity: DVec3,
    pub state: MotionState,
}

impl BallSnapshot {
    /// A ball at rest at `position`
    pub fn at_rest(position: DVec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// One participant slot of an event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub ball: BallId,
    pub snapshot: BallSnapshot,
}

/// A discrete transition reported by the physics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Seconds since the strike
    pub time: f64,
    #[serde(default)]
    pub kind: EventKind,
    pub first: Option<Participant>,
    #[serde(default)]
    pub second: Option<Participant>,
}

impl Event {
    /// Event involving a single ball
    pub fn single(time: f64, kind: EventKind, ball: BallId, snapshot: BallSnapshot) -> Self {
        Self {
            time,
            kind,
            first: Some(Participant { ball, snapshot }),
            second: None,
        }
    }

    /// Event involving two balls (e.g. a collision)
    pub fn pair(time: f64, kind: EventKind, a: Participant, b: Participant) -> Self {
        Self {
            time,
            kind,
            first: Some(a),
            second: Some(b),
        }
    }

    /// Snapshot of `ball` if it takes part in this event.
    /// The first slot wins if both slots name the same ball.
    pub fn snapshot_for(&self, ball: BallId) -> Option<&BallSnapshot> {
        [self.first.as_ref(), self.second.as_ref()]
            .into_iter()
            .flatten()
            .find(|p| p.ball == ball)
            .map(|p| &p.snapshot)
    }

    /// Ids of the balls involved
    pub fn balls(&self) -> impl Iterator<Item = BallId> + '_ {
        [self.first.as_ref(), self.second.as_ref()]
            .into_iter()
            .flatten()
            .map(|p| p.ball)
    }
}

/// Complete outcome of one cue strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Shot {
    /// Seconds from strike until every ball is at rest
    pub duration: f64,
    /// Chronological, as produced by the physics engine
    pub events: Vec<Event>,
}

impl Shot {
    pub fn new(duration: f64, events: Vec<Event>) -> Self {
        Self { duration, events }
    }

    /// True if event times never decrease
    pub fn is_chronological(&self) -> bool {
        self.events.windows(2).all(|w| w[0].time <= w[1].time)
    }
}

/// One event projected onto a single ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub kind: EventKind,
    pub snapshot: BallSnapshot,
}

/// What the renderer draws for a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BallRenderState {
    pub position: DVec2,
    pub state: MotionState,
}

impl BallRenderState {
    pub fn new(position: DVec2, state: MotionState) -> Self {
        Self { position, state }
    }
}

impl From<&BallSnapshot> for BallRenderState {
    fn from(snapshot: &BallSnapshot) -> Self {
        Self {
            position: snapshot.position,
            state: snapshot.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(ball: BallId, x: f64) -> Participant {
        Participant {
            ball,
            snapshot: BallSnapshot::at_rest(DVec2::new(x, 0.0)),
        }
    }

    #[test]
    fn test_snapshot_for_picks_own_slot() {
        let event = Event::pair(0.3, EventKind::BallCollision, participant(0, 1.0), participant(5, 2.0));

        assert_eq!(event.snapshot_for(0).map(|s| s.position.x), Some(1.0));
        assert_eq!(event.snapshot_for(5).map(|s| s.position.x), Some(2.0));
        assert!(event.snapshot_for(7).is_none());
        assert_eq!(event.balls().collect::<Vec<_>>(), vec![0, 5]);
    }

    #[test]
    fn test_is_chronological() {
        let mut shot = Shot::new(
            1.0,
            vec![
                Event::single(0.0, EventKind::CueStrike, 0, BallSnapshot::default()),
                Event::single(0.5, EventKind::StateChange, 0, BallSnapshot::default()),
                Event::single(0.5, EventKind::StateChange, 1, BallSnapshot::default()),
            ],
        );
        assert!(shot.is_chronological());

        shot.events.swap(0, 2);
        assert!(!shot.is_chronological());
    }

    #[test]
    fn test_motion_state_flags() {
        assert!(MotionState::Rolling.is_moving());
        assert!(!MotionState::Stationary.is_moving());
        assert!(!MotionState::Pocketed(Pocket::East).on_table());
        assert!(!MotionState::NotInPlay.on_table());
        assert!(MotionState::Sliding.on_table());
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{
            "time": 0.25,
            "first": { "ball": 3, "snapshot": {
                "position": [0.1, 0.2],
                "velocity": [1.0, 0.0],
                "angular_velocity": [0.0, 0.0, 4.0],
                "state": "Sliding"
            } }
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::Unknown);
        assert!(event.second.is_none());
        let snap = event.snapshot_for(3).unwrap();
        assert_eq!(snap.state, MotionState::Sliding);
        assert_eq!(snap.angular_velocity.z, 4.0);
    }
}
