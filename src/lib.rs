//! Formicary - deterministic ant colony foraging simulation
//!
//! Ants forage across a 2D cellular world by following and laying two
//! pheromone trails; the colony turns delivered food into new ants; a
//! planning layer validates painted room regions and plans the tunnels that
//! connect them.

pub mod blueprints;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod world;

pub use crate::blueprints::{RoomBlueprint, RoomBlueprintManager, RoomType};
pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::simulation::{ColonyOrchestrator, GodAction, SimEvent, SimulationSnapshot};
pub use crate::world::{Terrain, WorldGrid};
