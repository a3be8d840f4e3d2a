//! Calendar system for day and season tracking
//!
//! The calendar counts ticks; days and seasons are derived from the count so
//! a restored calendar continues exactly where the saved one stopped.

use serde::{Deserialize, Serialize};

/// Seasons of the simulated year, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn from_index(index: u64) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    /// Scale applied to periodic food spawning
    pub fn food_spawn_multiplier(&self) -> f32 {
        match self {
            Season::Spring => 1.0,
            Season::Summer => 1.5,
            Season::Autumn => 0.75,
            Season::Winter => 0.0,
        }
    }
}

/// What changed when the calendar advanced by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarChange {
    pub day_advanced: Option<u64>,
    pub season_changed: Option<Season>,
}

/// Calendar tracks simulation time with day/season granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    tick: u64,
    ticks_per_day: u64,
    days_per_season: u64,
}

impl Calendar {
    pub fn new(ticks_per_day: u64, days_per_season: u64) -> Self {
        Self {
            tick: 0,
            ticks_per_day: ticks_per_day.max(1),
            days_per_season: days_per_season.max(1),
        }
    }

    pub fn advance(&mut self) -> CalendarChange {
        let day_before = self.current_day();
        let season_before = self.season_index();
        self.tick += 1;

        let mut change = CalendarChange::default();
        if self.current_day() != day_before {
            change.day_advanced = Some(self.current_day());
        }
        if self.season_index() != season_before {
            change.season_changed = Some(self.current_season());
        }
        change
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn current_day(&self) -> u64 {
        self.tick / self.ticks_per_day
    }

    /// Number of whole seasons elapsed since the start
    pub fn season_index(&self) -> u64 {
        self.current_day() / self.days_per_season
    }

    pub fn current_season(&self) -> Season {
        Season::from_index(self.season_index())
    }

    pub fn current_year(&self) -> u64 {
        self.season_index() / 4
    }

    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }

    pub fn days_per_season(&self) -> u64 {
        self.days_per_season
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(600, 10)
    }
}
