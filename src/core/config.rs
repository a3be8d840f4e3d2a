//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section deserializes from
//! TOML with per-field defaults, so a config file only needs the values it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::GridPos;
use crate::world::generation::Anchor;
use crate::world::grid::cell_count;

/// Top-level configuration for one simulation session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: GenerationConfig,
    /// Scripted features that replace random placement (structured levels)
    pub anchors: Vec<Anchor>,
    pub pheromone: PheromoneConfig,
    pub ants: AntConfig,
    pub colony: ColonyConfig,
    pub actions: ActionConfig,
    pub calendar: CalendarConfig,
    pub planning: PlanningConfig,
}

/// Procedural terrain parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub cols: usize,
    pub rows: usize,

    /// Rows of open air along the top edge (the surface ants forage on)
    pub surface_rows: usize,

    /// Ring the left, right and bottom edges with indestructible hardite
    pub hardite_border: bool,

    /// One nest per colony, carved out as a chamber with a shaft to the surface
    pub nests: Vec<GridPos>,

    /// Radius of the carved nest chamber
    pub nest_chamber_radius: i32,

    /// Number of random rock formations
    pub rock_formations: u32,
    pub min_rock_radius: i32,
    pub max_rock_radius: i32,

    /// Probability that a cell inside a rock formation becomes rock rather
    /// than staying dirt. 1.0 gives solid boulders, 0.3 gives gravel.
    pub hardness_bias: f32,

    /// Number of random air caverns below the surface
    pub caverns: u32,
    pub min_cavern_radius: i32,
    pub max_cavern_radius: i32,

    /// Number of food clusters placed at generation time
    pub food_clusters: u32,
    pub food_cluster_radius: i32,

    /// Minimum nest-to-food distance as a fraction of the world diagonal
    ///
    /// At 0.25 on the default 96x64 world, food starts at least ~29 cells
    /// from every nest, so the first trips are genuine searches.
    pub min_food_distance_factor: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            cols: 96,
            rows: 64,
            surface_rows: 8,
            hardite_border: true,
            nests: vec![GridPos::new(48, 24)],
            nest_chamber_radius: 3,
            rock_formations: 6,
            min_rock_radius: 2,
            max_rock_radius: 5,
            hardness_bias: 0.6,
            caverns: 4,
            min_cavern_radius: 2,
            max_cavern_radius: 4,
            food_clusters: 5,
            food_cluster_radius: 2,
            min_food_distance_factor: 0.25,
        }
    }
}

/// Which neighbors receive diffused pheromone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    Four,
    Eight,
}

/// Pheromone field dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PheromoneConfig {
    /// Exponential decay rate per unit of time: each step multiplies values
    /// by exp(-decay_rate * dt). At 0.02 a trail loses half its strength in
    /// about 35 ticks.
    pub decay_rate: f32,

    /// Fraction of a cell's value shared with its neighbors per unit time
    ///
    /// Capped at 1.0 per step, which keeps the explicit scheme stable.
    pub diffusion_rate: f32,

    /// Values below this are dropped instead of processed
    ///
    /// This is what makes the step cost proportional to trail area.
    pub negligible_threshold: f32,

    /// Upper bound for any single cell
    pub max_strength: f32,

    pub neighborhood: Neighborhood,
}

impl Default for PheromoneConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.02,
            diffusion_rate: 0.05,
            negligible_threshold: 0.001,
            max_strength: 1.0,
            neighborhood: Neighborhood::Four,
        }
    }
}

/// Per-ant sensing and movement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntConfig {
    /// Cells travelled per unit of time
    pub speed: f32,

    /// Hard cap on what any ant can carry
    pub max_carry: f32,

    /// Food units held by one food cell (taken whole, then capped by capacity)
    pub food_per_cell: f32,

    /// Trail values at or below this are treated as "no signal"
    pub sense_threshold: f32,

    // === STEERING WEIGHTS ===
    // desired = gradient * gradient_weight + random * exploration_weight
    //         + heading * persistence_weight (+ nest * homing_weight when returning)
    pub gradient_weight: f32,
    pub exploration_weight: f32,
    pub persistence_weight: f32,
    pub homing_weight: f32,

    /// Pheromone laid per step at full trail strength
    pub deposit_amount: f32,

    /// Multiplier applied to trail strength after every step away from
    /// nest or food. At 0.97 a trail is ~5% strength after 100 steps.
    pub trail_strength_decay: f32,

    /// Chebyshev distance from the nest cell that counts as "home"
    pub nest_arrival_radius: i32,

    pub worker_lifespan: u64,
    pub scout_lifespan: u64,

    /// Whether ants dig dirt on their own. Off by default: digging is
    /// normally issued by the player/AI layer.
    pub autonomous_dig: bool,

    /// Chance per tick that an ant facing dirt digs it (autonomous_dig only)
    pub dig_chance: f32,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_carry: 1.0,
            food_per_cell: 1.0,
            sense_threshold: 0.005,
            gradient_weight: 2.0,
            exploration_weight: 0.6,
            persistence_weight: 1.0,
            homing_weight: 0.5,
            deposit_amount: 0.2,
            trail_strength_decay: 0.97,
            nest_arrival_radius: 1,
            worker_lifespan: 12_000,
            scout_lifespan: 6_000,
            autonomous_dig: false,
            dig_chance: 0.05,
        }
    }
}

/// Colony population and food economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Display names, one per nest; missing names become "Colony N"
    pub names: Vec<String>,
    pub initial_ants: u32,

    /// Probability that a newborn ant is a scout
    pub scout_ratio: f32,

    /// Food stock consumed per birth
    pub birth_cost: f32,
    pub birth_interval: u64,
    pub max_population: usize,

    /// Ticks between food cluster spawns (scaled by season)
    pub food_spawn_interval: u64,
    pub food_spawn_radius: i32,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            initial_ants: 40,
            scout_ratio: 0.15,
            birth_cost: 5.0,
            birth_interval: 50,
            max_population: 200,
            food_spawn_interval: 400,
            food_spawn_radius: 2,
        }
    }
}

/// Cooldowns for player/AI actions, in ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub drop_food_cooldown: u32,
    pub dig_cooldown: u32,
    pub rock_wall_cooldown: u32,

    /// Brush radii above this are clamped
    pub max_brush_radius: i32,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            drop_food_cooldown: 0,
            dig_cooldown: 0,
            rock_wall_cooldown: 0,
            max_brush_radius: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub ticks_per_day: u64,
    pub days_per_season: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 600,
            days_per_season: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Hard cap on cells expanded by one connection-path search
    pub max_path_expansions: usize,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            max_path_expansions: 20_000,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML config
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let p = &self.pheromone;
        if !(p.decay_rate > 0.0 && p.decay_rate.is_finite()) {
            return Err(format!("pheromone.decay_rate ({}) must be positive", p.decay_rate));
        }
        if !(0.0..=1.0).contains(&p.diffusion_rate) {
            return Err(format!(
                "pheromone.diffusion_rate ({}) must be within [0, 1]",
                p.diffusion_rate
            ));
        }
        if p.negligible_threshold < 0.0 || p.negligible_threshold >= p.max_strength {
            return Err(format!(
                "pheromone.negligible_threshold ({}) must be within [0, max_strength)",
                p.negligible_threshold
            ));
        }

        let a = &self.ants;
        if a.speed <= 0.0 || a.max_carry <= 0.0 || a.food_per_cell <= 0.0 {
            return Err("ants.speed, ants.max_carry and ants.food_per_cell must be positive".into());
        }
        if !(0.0..=1.0).contains(&a.trail_strength_decay) {
            return Err(format!(
                "ants.trail_strength_decay ({}) must be within [0, 1]",
                a.trail_strength_decay
            ));
        }
        if !(0.0..=1.0).contains(&a.dig_chance) {
            return Err(format!("ants.dig_chance ({}) must be within [0, 1]", a.dig_chance));
        }

        let c = &self.colony;
        if !(0.0..=1.0).contains(&c.scout_ratio) {
            return Err(format!("colony.scout_ratio ({}) must be within [0, 1]", c.scout_ratio));
        }
        if c.birth_interval == 0 || c.food_spawn_interval == 0 {
            return Err("colony.birth_interval and colony.food_spawn_interval must be > 0".into());
        }

        if self.calendar.ticks_per_day == 0 || self.calendar.days_per_season == 0 {
            return Err("calendar.ticks_per_day and calendar.days_per_season must be > 0".into());
        }
        if self.planning.max_path_expansions == 0 {
            return Err("planning.max_path_expansions must be > 0".into());
        }

        self.world.validate()
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.cols < 8 || self.rows < self.surface_rows + 4 {
            return Err(format!(
                "world {}x{} is too small for {} surface rows",
                self.cols, self.rows, self.surface_rows
            ));
        }
        if cell_count(self.cols, self.rows).is_none() {
            return Err(format!("world {}x{} is too large", self.cols, self.rows));
        }
        if self.min_rock_radius < 0 || self.min_rock_radius > self.max_rock_radius {
            return Err("rock radius range is empty".into());
        }
        if self.min_cavern_radius < 0 || self.min_cavern_radius > self.max_cavern_radius {
            return Err("cavern radius range is empty".into());
        }
        if self.food_cluster_radius < 0 || self.nest_chamber_radius < 0 {
            return Err("radii must not be negative".into());
        }
        if !(0.0..=1.0).contains(&self.hardness_bias) {
            return Err(format!("hardness_bias ({}) must be within [0, 1]", self.hardness_bias));
        }
        if !(0.0..=1.0).contains(&self.min_food_distance_factor) {
            return Err(format!(
                "min_food_distance_factor ({}) must be within [0, 1]",
                self.min_food_distance_factor
            ));
        }
        for nest in &self.nests {
            let inside = nest.x > 0
                && nest.y > 0
                && (nest.x as usize) < self.cols - 1
                && (nest.y as usize) < self.rows - 1;
            if !inside {
                return Err(format!("nest {} is outside the world interior", nest));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
[world]
cols = 40
rows = 30
nests = [{ x = 20, y = 15 }]

[ants]
autonomous_dig = true
"#,
        )
        .unwrap();

        assert_eq!(config.world.cols, 40);
        assert_eq!(config.world.surface_rows, 8);
        assert!(config.ants.autonomous_dig);
        assert_eq!(config.pheromone, PheromoneConfig::default());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_unstable_diffusion() {
        let mut config = SimulationConfig::default();
        config.pheromone.diffusion_rate = 1.5;
        assert!(config.validate().unwrap_err().contains("diffusion_rate"));
    }

    #[test]
    fn test_rejects_nest_on_border() {
        let mut config = SimulationConfig::default();
        config.world.nests = vec![GridPos::new(0, 10)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_world() {
        let mut config = SimulationConfig::default();
        config.world.cols = 1 << 32;
        config.world.rows = 1 << 32;
        assert!(config.validate().unwrap_err().contains("too large"));
    }

    #[test]
    fn test_autonomous_dig_off_by_default() {
        assert!(!AntConfig::default().autonomous_dig);
    }
}
