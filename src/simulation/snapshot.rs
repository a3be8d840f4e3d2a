//! Save/restore record for a whole simulation session
//!
//! A snapshot is plain data. `validate` checks everything that could make a
//! restored session panic or drift (lengths, bounds, finite values, id
//! references) so that a restore can be all-or-nothing.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::blueprints::room::RoomBlueprint;
use crate::core::calendar::Calendar;
use crate::core::error::SnapshotError;
use crate::core::types::GridPos;
use crate::entity::ant::Ant;
use crate::entity::colony::{Colony, MILESTONES};
use crate::simulation::actions::{ActionKind, GodAction};
use crate::world::grid::cell_count;
use crate::world::terrain::Terrain;

/// Bumped whenever the snapshot layout changes
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub version: u32,
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Terrain>,
    pub food_trail: Vec<f32>,
    pub home_trail: Vec<f32>,
    pub terrain_version: u64,
    pub ants: Vec<Ant>,
    pub colonies: Vec<Colony>,
    pub rng_seed: u64,
    /// ChaCha word position of the tick RNG
    pub rng_word_pos: u128,
    pub calendar: Calendar,
    /// Simulated time, the sum of every `dt` ticked so far
    pub elapsed: f64,
    pub next_ant_id: u32,
    pub next_blueprint_id: u32,
    pub blueprints: Vec<RoomBlueprint>,
    pub cooldowns: [u32; ActionKind::COUNT],
    pub pending_actions: Vec<GodAction>,
}

impl SimulationSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    /// Check internal consistency. `max_carry` comes from the session config.
    pub fn validate(&self, max_carry: f32) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let expected = cell_count(self.cols, self.rows);
        for (field, len) in [
            ("cells", self.cells.len()),
            ("food_trail", self.food_trail.len()),
            ("home_trail", self.home_trail.len()),
        ] {
            if expected != Some(len) {
                return Err(SnapshotError::Dimensions {
                    field,
                    cols: self.cols,
                    rows: self.rows,
                    len,
                });
            }
        }
        if self.calendar.ticks_per_day() == 0 || self.calendar.days_per_season() == 0 {
            return Err(malformed("calendar has a zero-length day or season"));
        }
        if !self.elapsed.is_finite() || self.elapsed < 0.0 {
            return Err(malformed(format!("elapsed time {} is invalid", self.elapsed)));
        }

        self.validate_colonies()?;
        self.validate_ants(max_carry)?;
        self.validate_blueprints()
    }

    fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    fn validate_colonies(&self) -> Result<(), SnapshotError> {
        let mut ids = AHashSet::new();
        for colony in &self.colonies {
            if !ids.insert(colony.id) {
                return Err(malformed(format!("duplicate {}", colony.id)));
            }
            if !self.in_bounds(colony.nest) {
                return Err(malformed(format!("{} nest {} is off-grid", colony.id, colony.nest)));
            }
            let stock_ok = colony.food_stock.is_finite() && colony.food_stock >= 0.0;
            let total_ok = colony.total_collected.is_finite() && colony.total_collected >= 0.0;
            if !stock_ok || !total_ok {
                return Err(malformed(format!("{} has invalid food totals", colony.id)));
            }
            if colony.next_milestone > MILESTONES.len() {
                return Err(malformed(format!("{} milestone index out of range", colony.id)));
            }
        }
        Ok(())
    }

    fn validate_ants(&self, max_carry: f32) -> Result<(), SnapshotError> {
        let mut ids = AHashSet::new();
        for ant in &self.ants {
            if !ids.insert(ant.id) {
                return Err(malformed(format!("duplicate {}", ant.id)));
            }
            if ant.id.0 >= self.next_ant_id {
                return Err(malformed(format!("{} is beyond the id counter", ant.id)));
            }
            if !self.colonies.iter().any(|c| c.id == ant.colony) {
                return Err(malformed(format!("{} belongs to unknown {}", ant.id, ant.colony)));
            }
            if !ant.position.is_finite() || !ant.heading.is_finite() {
                return Err(malformed(format!("{} has a non-finite position", ant.id)));
            }
            if !self.in_bounds(ant.cell()) {
                return Err(malformed(format!("{} is off-grid at {}", ant.id, ant.cell())));
            }
            if !(ant.carry.is_finite() && (0.0..=max_carry).contains(&ant.carry)) {
                return Err(malformed(format!(
                    "{} carries {}, limit is {}",
                    ant.id, ant.carry, max_carry
                )));
            }
            if !(ant.trail_strength.is_finite() && ant.trail_strength >= 0.0) {
                return Err(malformed(format!("{} has invalid trail strength", ant.id)));
            }
        }

        let rostered: usize = self.colonies.iter().map(|c| c.roster.len()).sum();
        if rostered != self.ants.len() {
            return Err(malformed("colony rosters do not match the ant list"));
        }
        for colony in &self.colonies {
            let mismatch = colony.roster.iter().find(|id| {
                !self
                    .ants
                    .iter()
                    .any(|a| a.id == **id && a.colony == colony.id)
            });
            if let Some(id) = mismatch {
                return Err(malformed(format!("{} roster lists foreign {}", colony.id, id)));
            }
        }
        Ok(())
    }

    fn validate_blueprints(&self) -> Result<(), SnapshotError> {
        let mut ids = AHashSet::new();
        for bp in &self.blueprints {
            if !ids.insert(bp.id) || bp.id.0 >= self.next_blueprint_id {
                return Err(malformed(format!("{} id is duplicated or out of range", bp.id)));
            }
            if !self.colonies.iter().any(|c| c.id == bp.colony) {
                return Err(malformed(format!("{} belongs to unknown {}", bp.id, bp.colony)));
            }
            if let Some(cell) = bp.planned_cells().find(|p| !self.in_bounds(**p)) {
                return Err(malformed(format!("{} cell {} is off-grid", bp.id, cell)));
            }
        }
        Ok(())
    }
}

fn malformed(message: impl Into<String>) -> SnapshotError {
    SnapshotError::Malformed(message.into())
}
