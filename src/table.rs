//! Table constants and geometry
//!
//! Coordinates are in metres on the playing surface ("cloth"): x runs across
//! the width, y along the length, origin at the north-west corner.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::shot::{BallId, BallRenderState, MotionState};

/// Friction and ball constants that drive the kinematics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableConstants {
    pub mu_rolling: f64,
    pub mu_sliding: f64,
    /// Gravitational acceleration
    pub g: f64,
    pub ball_radius: f64,
}

impl Default for TableConstants {
    fn default() -> Self {
        Self {
            mu_rolling: MU_ROLLING,
            mu_sliding: MU_SLIDING,
            g: GRAVITY,
            ball_radius: BALL_RADIUS,
        }
    }
}

impl TableConstants {
    /// Rolling deceleration magnitude
    #[inline]
    pub fn rolling_decel(&self) -> f64 {
        self.mu_rolling * self.g
    }

    /// Sliding deceleration magnitude
    #[inline]
    pub fn sliding_decel(&self) -> f64 {
        self.mu_sliding * self.g
    }
}

/// The six pockets, named by compass position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pocket {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

impl Pocket {
    pub const ALL: [Pocket; 6] = [
        Pocket::NorthEast,
        Pocket::East,
        Pocket::SouthEast,
        Pocket::SouthWest,
        Pocket::West,
        Pocket::NorthWest,
    ];

    pub fn is_corner(&self) -> bool {
        !matches!(self, Pocket::East | Pocket::West)
    }
}

/// Playing surface and pocket dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableGeometry {
    pub width: f64,
    pub length: f64,
    pub side_pocket_width: f64,
    pub corner_pocket_width: f64,
}

impl Default for TableGeometry {
    fn default() -> Self {
        Self {
            width: TABLE_WIDTH,
            length: TABLE_LENGTH,
            side_pocket_width: SIDE_POCKET_WIDTH,
            corner_pocket_width: CORNER_POCKET_WIDTH,
        }
    }
}

/// Small clearance between racked balls
const RACK_GAP: f64 = 0.0005;

/// Slack on the cloth bounds for balls recorded touching a cushion
const BOUNDS_EPSILON: f64 = 1e-9;

/// Starting layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RackLayout {
    /// Full 8-ball rack
    #[default]
    Full,
    /// Cue ball alone
    OneBall,
    /// Cue ball and the 1 ball
    TwoBall,
}

impl RackLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            RackLayout::Full => "full",
            RackLayout::OneBall => "one-ball",
            RackLayout::TwoBall => "two-ball",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "full" => Some(RackLayout::Full),
            "one-ball" => Some(RackLayout::OneBall),
            "two-ball" => Some(RackLayout::TwoBall),
            _ => None,
        }
    }
}

/// 8-ball rack order: (ball, row, lateral offset in ball spacings)
#[rustfmt::skip]
const EIGHT_BALL_RACK: [(BallId, u32, f64); 15] = [
    (1, 0, 0.0),
    (9, 1, -0.5), (2, 1, 0.5),
    (3, 2, -1.0), (8, 2, 0.0), (10, 2, 1.0),
    (11, 3, -1.5), (4, 3, -0.5), (5, 3, 0.5), (12, 3, 1.5),
    (6, 4, -2.0), (13, 4, -1.0), (14, 4, 0.0), (7, 4, 1.0), (15, 4, 2.0),
];

impl TableGeometry {
    /// Wooden frame thickness
    #[inline]
    pub fn wood_width(&self) -> f64 {
        self.width / 10.0
    }

    /// Cushion thickness
    #[inline]
    pub fn rail_width(&self) -> f64 {
        self.width / 30.0
    }

    /// Full table width including rails and frame
    pub fn outer_width(&self) -> f64 {
        self.width + 2.0 * self.wood_width() + 2.0 * self.rail_width()
    }

    /// Full table length including rails and frame
    pub fn outer_length(&self) -> f64 {
        self.length + 2.0 * self.wood_width() + 2.0 * self.rail_width()
    }

    /// Offset of the cloth origin inside the outer frame
    pub fn cloth_origin(&self) -> DVec2 {
        DVec2::splat(self.wood_width() + self.rail_width())
    }

    /// Centre of a pocket mouth in cloth coordinates
    pub fn pocket_center(&self, pocket: Pocket) -> DVec2 {
        let (w, l) = (self.width, self.length);
        match pocket {
            Pocket::NorthEast => DVec2::new(w, 0.0),
            Pocket::East => DVec2::new(w, l / 2.0),
            Pocket::SouthEast => DVec2::new(w, l),
            Pocket::SouthWest => DVec2::new(0.0, l),
            Pocket::West => DVec2::new(0.0, l / 2.0),
            Pocket::NorthWest => DVec2::ZERO,
        }
    }

    /// Mouth width of a pocket
    pub fn pocket_width(&self, pocket: Pocket) -> f64 {
        if pocket.is_corner() {
            self.corner_pocket_width
        } else {
            self.side_pocket_width
        }
    }

    /// True if a ball of `radius` at `position` lies fully on the cloth,
    /// counting a ball that touches a cushion
    pub fn contains(&self, position: DVec2, radius: f64) -> bool {
        let lo = radius - BOUNDS_EPSILON;
        let hi = DVec2::new(self.width, self.length) - (radius - BOUNDS_EPSILON);
        position.x >= lo && position.y >= lo && position.x <= hi.x && position.y <= hi.y
    }

    /// Head spot, where the cue ball starts
    pub fn head_spot(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.length * 0.75)
    }

    /// Foot spot, where the rack apex sits
    pub fn foot_spot(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.length * 0.25)
    }

    /// Standard 8-ball layout: cue ball on the head spot, ball 1 on the foot
    /// spot, rows growing toward the north rail, 8 in the centre of row 3.
    pub fn eight_ball_rack(&self, radius: f64) -> BTreeMap<BallId, BallRenderState> {
        let gap = radius * 2.0 + RACK_GAP;
        let row_offset = gap * 3f64.sqrt() / 2.0;
        let apex = self.foot_spot();

        let mut layout = BTreeMap::new();
        layout.insert(
            CUE_BALL,
            BallRenderState::new(self.head_spot(), MotionState::Stationary),
        );
        for (ball, row, lateral) in EIGHT_BALL_RACK {
            let pos = DVec2::new(apex.x + lateral * gap, apex.y - row as f64 * row_offset);
            layout.insert(ball, BallRenderState::new(pos, MotionState::Stationary));
        }
        layout
    }

    /// Rack with only the cue ball in play; the rest are parked at the origin
    pub fn one_ball_layout(&self, radius: f64) -> BTreeMap<BallId, BallRenderState> {
        let mut layout = self.eight_ball_rack(radius);
        for (_, ball) in layout.range_mut(CUE_BALL + 1..) {
            *ball = BallRenderState::new(DVec2::ZERO, MotionState::NotInPlay);
        }
        layout
    }

    /// Rack with only the cue ball and the 1 ball in play
    pub fn two_ball_layout(&self, radius: f64) -> BTreeMap<BallId, BallRenderState> {
        let mut layout = self.eight_ball_rack(radius);
        for (_, ball) in layout.range_mut(2..) {
            ball.state = MotionState::NotInPlay;
        }
        layout
    }
}

/// Everything playback needs to know about a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Table {
    pub constants: TableConstants,
    pub geometry: TableGeometry,
}

impl Table {
    pub fn new(constants: TableConstants, geometry: TableGeometry) -> Self {
        Self { constants, geometry }
    }

    /// Racked 8-ball layout for this table's ball size
    pub fn eight_ball_rack(&self) -> BTreeMap<BallId, BallRenderState> {
        self.geometry.eight_ball_rack(self.constants.ball_radius)
    }

    /// Starting layout of the given kind for this table's ball size
    pub fn layout(&self, kind: RackLayout) -> BTreeMap<BallId, BallRenderState> {
        let radius = self.constants.ball_radius;
        match kind {
            RackLayout::Full => self.geometry.eight_ball_rack(radius),
            RackLayout::OneBall => self.geometry.one_ball_layout(radius),
            RackLayout::TwoBall => self.geometry.two_ball_layout(radius),
        }
    }
}
