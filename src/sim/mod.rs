//! Shot playback core
//!
//! Everything between "the physics engine returned a shot" and "here is where
//! each ball is drawn this frame". This module must stay pure and
//! frame-rate independent:
//! - Positions are derived from (events, elapsed time), never accumulated
//! - Wall-clock time enters only through `ShotPlayer::tick`
//! - No rendering or platform dependencies

pub mod kinematics;
pub mod playback;
pub mod project;
pub mod segment;
pub mod shot;

pub use kinematics::{contact_velocity, displacement, position_after, sample};
pub use playback::{PlaybackPhase, ShotPlayer, ShotSource, TickOutcome};
pub use project::project;
pub use segment::bracket;
pub use shot::{
    BallId, BallRenderState, BallSnapshot, Event, EventKind, Keyframe, MotionState, Participant,
    Shot,
};
