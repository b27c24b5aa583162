//! Pool Playback - continuous billiards motion from sparse shot events
//!
//! A physics engine reports a shot as a duration plus a handful of
//! transition events. This crate turns that into a ball position for any
//! instant of the shot, so a renderer can draw at whatever frame rate it likes.
//!
//! Core modules:
//! - `sim`: Playback core (event projection, bracketing, friction kinematics, controller)
//! - `table`: Table constants, geometry and rack layout
//! - `settings`: Playback configuration
//! - `replay`: JSON shot logs and scripted shot sources
//! - `synth`: Closed-form single-ball shots for demos and tests

pub mod replay;
pub mod settings;
pub mod sim;
pub mod synth;
pub mod table;

pub use settings::{PlaybackSpeed, Settings};
pub use sim::{BallRenderState, MotionState, Shot, ShotPlayer, TickOutcome};
pub use table::{RackLayout, Table, TableConstants, TableGeometry};

use glam::DVec2;

/// Regulation table defaults (SI units)
pub mod consts {
    /// Rolling friction coefficient
    pub const MU_ROLLING: f64 = 0.015;
    /// Sliding friction coefficient
    pub const MU_SLIDING: f64 = 0.2;
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;

    /// Ball radius (2.25" ball)
    pub const BALL_RADIUS: f64 = 0.028575;

    /// Playing surface of an 8 ft table
    pub const TABLE_WIDTH: f64 = 1.1684;
    pub const TABLE_LENGTH: f64 = 2.3368;
    pub const SIDE_POCKET_WIDTH: f64 = 0.127;
    pub const CORNER_POCKET_WIDTH: f64 = 0.1143;

    /// Cue ball id; object balls are 1..=15
    pub const CUE_BALL: u32 = 0;
}

/// Unit vector for a heading in degrees (0 = +x, 90 = +y)
#[inline]
pub fn heading_to_direction(degrees: f64) -> DVec2 {
    let rad = degrees.to_radians();
    DVec2::new(rad.cos(), rad.sin())
}
