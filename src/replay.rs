//! Recorded shot logs
//!
//! A shot log is a table, the ball layout before the first shot, and the
//! shots in the order they were played. Logs let a session be replayed
//! without the physics engine.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::sim::{BallId, BallRenderState, Shot, ShotPlayer, ShotSource};
use crate::table::Table;

/// A recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShotLog {
    pub table: Table,
    /// Ball layout before the first shot
    pub layout: BTreeMap<BallId, BallRenderState>,
    pub shots: Vec<Shot>,
}

impl ShotLog {
    pub fn new(table: Table, layout: BTreeMap<BallId, BallRenderState>) -> Self {
        Self {
            table,
            layout,
            shots: Vec::new(),
        }
    }

    /// Append a shot as it is played
    pub fn record(&mut self, shot: Shot) {
        self.shots.push(shot);
    }

    /// Read and validate a log
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading shot log {}", path.display()))?;
        let shot_log: ShotLog = serde_json::from_str(&json)
            .with_context(|| format!("parsing shot log {}", path.display()))?;

        for (i, shot) in shot_log.shots.iter().enumerate() {
            ensure!(
                shot.is_chronological(),
                "shot {} in {} has out-of-order events",
                i,
                path.display()
            );
        }

        log::info!(
            "Loaded {} shots for {} balls from {}",
            shot_log.shots.len(),
            shot_log.layout.len(),
            path.display()
        );
        Ok(shot_log)
    }

    /// Write the log (to a temp file, then renamed)
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(self).context("serializing shot log")?;
        fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    /// A player showing the log's starting layout
    pub fn player(&self, speed_factor: f64) -> ShotPlayer {
        ShotPlayer::new(self.table, self.layout.clone(), speed_factor)
    }

    /// The log's shots as a source, in recorded order
    pub fn into_source(self) -> ScriptedShots {
        ScriptedShots::new(self.shots)
    }
}

/// Hands out a fixed list of shots, then reports none left
#[derive(Debug, Clone, Default)]
pub struct ScriptedShots {
    shots: VecDeque<Shot>,
}

impl ScriptedShots {
    pub fn new(shots: impl IntoIterator<Item = Shot>) -> Self {
        Self {
            shots: shots.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.shots.len()
    }
}

impl ShotSource for ScriptedShots {
    fn next_shot(&mut self, _balls: &BTreeMap<BallId, BallRenderState>) -> Option<Shot> {
        self.shots.pop_front()
    }
}
