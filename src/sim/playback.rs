//! Shot playback controller
//!
//! Owns the queue of pending shots and the per-ball render states. The host
//! render loop calls [`ShotPlayer::tick`] once per frame with a monotonic
//! timestamp; ball positions are rebuilt from the active shot's events every
//! tick, never accumulated.

use std::collections::{BTreeMap, VecDeque};

use super::kinematics::sample;
use super::project::project;
use super::shot::{BallId, BallRenderState, Keyframe, Shot};
use crate::settings::Settings;
use crate::table::Table;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No active shot
    Idle,
    /// A shot is being played back
    Playing,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to play
    Idle,
    /// Nothing to play and the shot source has no more shots
    Exhausted,
    /// Balls were moved to their positions at `elapsed` shot-seconds
    Playing { elapsed: f64 },
    /// The active shot finished; balls were snapped to their final events
    Settled,
}

/// Supplies the next shot when playback runs out (auto-play)
pub trait ShotSource {
    /// Next shot for the table as currently shown, or `None` when done
    fn next_shot(&mut self, balls: &BTreeMap<BallId, BallRenderState>) -> Option<Shot>;
}

impl<F> ShotSource for F
where
    F: FnMut(&BTreeMap<BallId, BallRenderState>) -> Option<Shot>,
{
    fn next_shot(&mut self, balls: &BTreeMap<BallId, BallRenderState>) -> Option<Shot> {
        self(balls)
    }
}

/// The shot currently being played
#[derive(Debug)]
struct ActiveShot {
    shot: Shot,
    started_at: f64,
    /// Speed factor fixed for the whole shot
    speed_factor: f64,
    /// Render states when the shot began; untouched balls hold these
    origin: BTreeMap<BallId, BallRenderState>,
    /// Per-ball keyframes, projected once per shot
    tracks: BTreeMap<BallId, Vec<Keyframe>>,
}

impl ActiveShot {
    fn start(
        shot: Shot,
        started_at: f64,
        speed_factor: f64,
        origin: BTreeMap<BallId, BallRenderState>,
    ) -> Self {
        let tracks: BTreeMap<BallId, Vec<Keyframe>> = origin
            .keys()
            .map(|&id| (id, project(&shot, id)))
            .collect();

        let unknown: Vec<BallId> = {
            let mut ids: Vec<BallId> = shot
                .events
                .iter()
                .flat_map(|e| e.balls())
                .filter(|id| !origin.contains_key(id))
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        if !unknown.is_empty() {
            log::warn!("Shot references unknown balls {:?}; ignoring them", unknown);
        }

        log::debug!(
            "Projected {} events onto {} balls ({} moved)",
            shot.events.len(),
            tracks.len(),
            tracks.values().filter(|t| !t.is_empty()).count()
        );

        Self {
            shot,
            started_at,
            speed_factor,
            origin,
            tracks,
        }
    }

    /// Render states at `elapsed` shot-seconds
    fn states_at(&self, elapsed: f64, table: &Table) -> BTreeMap<BallId, BallRenderState> {
        self.origin
            .iter()
            .map(|(&id, &held)| {
                let state = self
                    .tracks
                    .get(&id)
                    .and_then(|track| {
                        sample(track, elapsed, self.shot.duration, &table.constants)
                    })
                    .unwrap_or(held);
                (id, state)
            })
            .collect()
    }

    /// Final render states: each ball's last keyframe, or its origin if untouched
    fn final_states(&self) -> BTreeMap<BallId, BallRenderState> {
        self.origin
            .iter()
            .map(|(&id, &held)| {
                let state = self
                    .tracks
                    .get(&id)
                    .and_then(|track| track.last())
                    .map(|k| BallRenderState::from(&k.snapshot))
                    .unwrap_or(held);
                (id, state)
            })
            .collect()
    }
}

/// Plays queued shots back against a wall clock
#[derive(Debug)]
pub struct ShotPlayer {
    table: Table,
    speed_factor: f64,
    queue: VecDeque<Shot>,
    active: Option<ActiveShot>,
    balls: BTreeMap<BallId, BallRenderState>,
}

impl ShotPlayer {
    /// Create a player showing `layout` at rest.
    /// `speed_factor` scales shot time against wall time (2.0 = twice as fast).
    pub fn new(table: Table, layout: BTreeMap<BallId, BallRenderState>, speed_factor: f64) -> Self {
        Self {
            table,
            speed_factor: sanitize_speed(speed_factor),
            queue: VecDeque::new(),
            active: None,
            balls: layout,
        }
    }

    /// Create a player from settings, starting from `layout`
    pub fn from_settings(settings: &Settings, layout: BTreeMap<BallId, BallRenderState>) -> Self {
        Self::new(settings.table, layout, settings.effective_speed_factor())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Change playback speed. Takes effect from the next shot.
    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        self.speed_factor = sanitize_speed(speed_factor);
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.active.is_some() {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Idle
        }
    }

    /// Number of queued shots (excluding the active one)
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Current render state of every ball
    pub fn render_states(&self) -> &BTreeMap<BallId, BallRenderState> {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&BallRenderState> {
        self.balls.get(&id)
    }

    /// Queue a shot behind any already pending. Never interrupts playback.
    pub fn enqueue(&mut self, shot: Shot) {
        debug_assert!(shot.is_chronological(), "shot events must be time-ordered");
        self.queue.push_back(shot);
    }

    /// Advance playback to wall-clock time `now` (seconds, monotonic)
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        if self.active.is_none() && !self.start_next(now) {
            return TickOutcome::Idle;
        }
        self.advance(now)
    }

    /// Like [`tick`](Self::tick), but asks `source` for a shot when idle with
    /// nothing queued
    pub fn tick_with(&mut self, now: f64, source: &mut dyn ShotSource) -> TickOutcome {
        if self.active.is_none() && self.queue.is_empty() {
            match source.next_shot(&self.balls) {
                Some(shot) => self.enqueue(shot),
                None => return TickOutcome::Exhausted,
            }
        }
        self.tick(now)
    }

    /// Drop the active shot and everything queued. Balls stay where they are
    /// currently drawn.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() || !self.queue.is_empty() {
            log::info!("Playback cancelled ({} queued shots dropped)", self.queue.len());
        }
        self.queue.clear();
    }

    /// Cancel playback and show `layout` instead
    pub fn reset(&mut self, layout: BTreeMap<BallId, BallRenderState>) {
        self.cancel();
        self.balls = layout;
    }

    fn start_next(&mut self, now: f64) -> bool {
        let Some(shot) = self.queue.pop_front() else {
            return false;
        };
        log::info!(
            "Starting shot: {:.3}s, {} events ({} queued)",
            shot.duration,
            shot.events.len(),
            self.queue.len()
        );
        self.active = Some(ActiveShot::start(shot, now, self.speed_factor, self.balls.clone()));
        true
    }

    fn advance(&mut self, now: f64) -> TickOutcome {
        let Some(active) = &self.active else {
            return TickOutcome::Idle;
        };

        let elapsed = (now - active.started_at) * active.speed_factor;
        if elapsed > active.shot.duration {
            self.balls = active.final_states();
            self.active = None;
            log::info!("Shot settled");
            return TickOutcome::Settled;
        }

        let next = active.states_at(elapsed, &self.table);
        self.warn_off_table(&next);
        self.balls = next;
        TickOutcome::Playing { elapsed }
    }

    fn warn_off_table(&self, next: &BTreeMap<BallId, BallRenderState>) {
        let radius = self.table.constants.ball_radius;
        for (id, ball) in next {
            let was_on = self
                .balls
                .get(id)
                .is_some_and(|b| self.table.geometry.contains(b.position, radius));
            if ball.state.on_table() && was_on && !self.table.geometry.contains(ball.position, radius) {
                log::warn!("Ball {} left the cloth at {:?}", id, ball.position);
            }
        }
    }
}

fn sanitize_speed(speed_factor: f64) -> f64 {
    if speed_factor.is_finite() && speed_factor > 0.0 {
        speed_factor
    } else {
        log::warn!("Invalid speed factor {}, using 1.0", speed_factor);
        1.0
    }
}
