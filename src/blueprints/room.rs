//! Room types and committed room blueprints
//!
//! A blueprint is a painted region plus the tunnel that links it to the
//! colony's network. Build progress is never stored: it is recomputed from
//! the grid, so digs from any source count toward it automatically.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::types::{BlueprintId, ColonyId, GridPos};
use crate::world::grid::WorldGrid;
use crate::world::terrain::Terrain;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[display(fmt = "food storage")]
    FoodStorage,
    #[display(fmt = "nursery")]
    Nursery,
    #[display(fmt = "queen chamber")]
    QueenChamber,
    #[display(fmt = "barracks")]
    Barracks,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [
        RoomType::FoodStorage,
        RoomType::Nursery,
        RoomType::QueenChamber,
        RoomType::Barracks,
    ];

    /// Fewest painted cells a room of this type may have
    pub fn min_cells(&self) -> usize {
        match self {
            RoomType::FoodStorage => 16,
            RoomType::Nursery => 12,
            RoomType::QueenChamber => 20,
            RoomType::Barracks => 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomBlueprint {
    pub id: BlueprintId,
    pub room_type: RoomType,
    pub colony: ColonyId,
    /// Painted region, in paint order
    pub cells: Vec<GridPos>,
    /// Tunnel from the region to the network, region end first
    pub path: Vec<GridPos>,
    /// Set once by the orchestrator when every planned cell is air
    pub completed: bool,
}

impl RoomBlueprint {
    /// Every planned cell: region then path
    pub fn planned_cells(&self) -> impl Iterator<Item = &GridPos> {
        self.cells.iter().chain(self.path.iter())
    }

    pub fn planned_len(&self) -> usize {
        self.cells.len() + self.path.len()
    }

    /// Fraction of planned cells that are currently air, in [0, 1]
    pub fn build_progress(&self, world: &WorldGrid) -> f32 {
        let total = self.planned_len();
        if total == 0 {
            return 1.0;
        }
        let dug = self
            .planned_cells()
            .filter(|p| world.get(**p) == Some(Terrain::Air))
            .count();
        dug as f32 / total as f32
    }

    pub fn is_built(&self, world: &WorldGrid) -> bool {
        self.planned_cells()
            .all(|p| world.get(*p) == Some(Terrain::Air))
    }

    /// Next cell to dig: the connection path first (nearest the network),
    /// then the room itself
    pub fn next_dig_target(&self, world: &WorldGrid) -> Option<GridPos> {
        self.path
            .iter()
            .rev()
            .chain(self.cells.iter())
            .find(|p| world.get(**p) != Some(Terrain::Air))
            .copied()
    }
}
