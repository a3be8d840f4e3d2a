//! Events raised during a tick, drained by the caller between ticks

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::calendar::Season;
use crate::core::types::{AntId, BlueprintId, ColonyId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    // Economy
    FoodCollected { colony: ColonyId, ant: AntId, amount: f32 },
    MilestoneReached { colony: ColonyId, milestone: u32 },

    // Population
    AntBorn { colony: ColonyId, ant: AntId },
    AntDied { colony: ColonyId, ant: AntId },

    // Calendar
    DayAdvanced { day: u64 },
    SeasonChanged { season: Season },

    // Construction
    BlueprintCompleted { blueprint: BlueprintId, colony: ColonyId },
}

/// FIFO of events in the order they were raised
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push_back(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
