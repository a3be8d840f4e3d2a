//! Colony state: nest, food stock, roster and milestones

use serde::{Deserialize, Serialize};

use crate::core::types::{AntId, ColonyId, GridPos};

/// Total-food-collected thresholds that raise a milestone event
pub const MILESTONES: [u32; 10] = [10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    pub id: ColonyId,
    pub name: String,
    /// Fixed at generation time
    pub nest: GridPos,
    pub food_stock: f32,
    pub total_collected: f32,
    /// Index into `MILESTONES` of the next milestone to reach
    pub next_milestone: usize,
    /// Living ants, in spawn order
    pub roster: Vec<AntId>,
}

impl Colony {
    pub fn new(id: ColonyId, name: impl Into<String>, nest: GridPos) -> Self {
        Self {
            id,
            name: name.into(),
            nest,
            food_stock: 0.0,
            total_collected: 0.0,
            next_milestone: 0,
            roster: Vec::new(),
        }
    }

    pub fn population(&self) -> usize {
        self.roster.len()
    }

    /// Food brought home by an ant
    pub fn deliver(&mut self, amount: f32) {
        self.food_stock += amount;
        self.total_collected += amount;
    }

    /// Spend `cost` from the stock if it covers it
    pub fn try_spend(&mut self, cost: f32) -> bool {
        if self.food_stock >= cost {
            self.food_stock -= cost;
            true
        } else {
            false
        }
    }

    /// Milestones crossed since the last call, in ascending order
    pub fn take_reached_milestones(&mut self) -> Vec<u32> {
        let mut reached = Vec::new();
        while let Some(&threshold) = MILESTONES.get(self.next_milestone) {
            if self.total_collected < threshold as f32 {
                break;
            }
            reached.push(threshold);
            self.next_milestone += 1;
        }
        reached
    }

    pub fn remove_ant(&mut self, id: AntId) {
        self.roster.retain(|a| *a != id);
    }
}
