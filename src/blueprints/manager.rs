//! Room planning: paint a region, validate it, connect it to the network
//!
//! The manager is a small state machine. `start_painting` enters the
//! painting state, `add_paint_cell` accumulates cells, and `finish_painting`
//! either commits a blueprint or returns an error. Both outcomes leave the
//! manager idle, and a failed finish never touches committed blueprints.

use ahash::AHashSet;
use tracing::{debug, info};

use crate::blueprints::pathfinding::find_connection_path;
use crate::blueprints::room::{RoomBlueprint, RoomType};
use crate::core::error::{PathError, PlanningError};
use crate::core::types::{BlueprintId, ColonyId, GridPos};
use crate::world::grid::WorldGrid;
use crate::world::terrain::Terrain;

#[derive(Debug, Clone)]
struct PaintState {
    room_type: RoomType,
    colony: ColonyId,
    cells: Vec<GridPos>,
    seen: AHashSet<GridPos>,
}

#[derive(Debug, Clone)]
pub struct RoomBlueprintManager {
    painting: Option<PaintState>,
    blueprints: Vec<RoomBlueprint>,
    next_id: u32,
    nests: Vec<(ColonyId, GridPos)>,
    max_expansions: usize,
}

impl RoomBlueprintManager {
    pub fn new(max_expansions: usize) -> Self {
        Self {
            painting: None,
            blueprints: Vec::new(),
            next_id: 0,
            nests: Vec::new(),
            max_expansions,
        }
    }

    /// Rebuild a manager from restored blueprints
    pub fn with_blueprints(
        max_expansions: usize,
        blueprints: Vec<RoomBlueprint>,
        next_id: u32,
    ) -> Self {
        Self {
            blueprints,
            next_id,
            ..Self::new(max_expansions)
        }
    }

    /// Nest cells are the root of each colony's tunnel network
    pub fn register_nest(&mut self, colony: ColonyId, nest: GridPos) {
        self.nests.retain(|(c, _)| *c != colony);
        self.nests.push((colony, nest));
    }

    /// Begin a new region. Any region still being painted is discarded.
    pub fn start_painting(&mut self, room_type: RoomType, colony: ColonyId) {
        if self.painting.is_some() {
            debug!("Discarding unfinished paint for a new {} region", room_type);
        }
        self.painting = Some(PaintState {
            room_type,
            colony,
            cells: Vec::new(),
            seen: AHashSet::new(),
        });
    }

    /// Add one cell to the region being painted.
    ///
    /// Returns false (and changes nothing) when not painting, when the cell
    /// is off-grid or not dirt, or when it was already painted.
    pub fn add_paint_cell(&mut self, x: i32, y: i32, world: &WorldGrid) -> bool {
        let Some(paint) = self.painting.as_mut() else {
            return false;
        };
        let pos = GridPos::new(x, y);
        if world.get(pos) != Some(Terrain::Dirt) {
            return false;
        }
        if !paint.seen.insert(pos) {
            return false;
        }
        paint.cells.push(pos);
        true
    }

    pub fn is_painting(&self) -> bool {
        self.painting.is_some()
    }

    /// Cells painted so far, in paint order
    pub fn painted_cells(&self) -> &[GridPos] {
        self.painting.as_ref().map_or(&[], |p| p.cells.as_slice())
    }

    /// Validate the painted region and commit it as a blueprint.
    ///
    /// Checks run in order: size, overlap with committed rooms and tunnels,
    /// terrain, then a connection path to the colony's nest or rooms.
    pub fn finish_painting(&mut self, world: &WorldGrid) -> Result<&RoomBlueprint, PlanningError> {
        let paint = self.painting.take().ok_or(PlanningError::NotPainting)?;

        let minimum = paint.room_type.min_cells();
        if paint.cells.len() < minimum {
            return Err(PlanningError::TooSmall {
                room_type: paint.room_type,
                painted: paint.cells.len(),
                minimum,
            });
        }

        for &cell in &paint.cells {
            if let Some(bp) = self
                .blueprints
                .iter()
                .find(|bp| bp.planned_cells().any(|p| *p == cell))
            {
                return Err(PlanningError::Overlap {
                    cell,
                    blueprint: bp.id,
                });
            }
        }

        if let Some(&cell) = paint
            .cells
            .iter()
            .find(|p| world.get(**p) != Some(Terrain::Dirt))
        {
            return Err(PlanningError::OverlapTerrain { cell });
        }

        let path = self.connect(&paint, world)?;

        let id = BlueprintId(self.next_id);
        self.next_id += 1;
        info!(
            "Committed {} {} for colony {}: {} cells, {} tunnel cells",
            paint.room_type,
            id,
            paint.colony,
            paint.cells.len(),
            path.len()
        );
        self.blueprints.push(RoomBlueprint {
            id,
            room_type: paint.room_type,
            colony: paint.colony,
            cells: paint.cells,
            path,
            completed: false,
        });
        let index = self.blueprints.len() - 1;
        Ok(&self.blueprints[index])
    }

    fn connect(&self, paint: &PaintState, world: &WorldGrid) -> Result<Vec<GridPos>, PlanningError> {
        let mut network: AHashSet<GridPos> = self
            .nests
            .iter()
            .filter(|(c, _)| *c == paint.colony)
            .map(|(_, nest)| *nest)
            .collect();
        if network.is_empty() {
            return Err(PlanningError::NoNetwork {
                colony: paint.colony,
            });
        }
        network.extend(
            self.blueprints
                .iter()
                .filter(|bp| bp.colony == paint.colony)
                .flat_map(|bp| bp.planned_cells().copied()),
        );

        find_connection_path(
            world,
            &paint.cells,
            |p| network.contains(&p),
            self.max_expansions,
        )
        .map_err(|e| match e {
            PathError::Exhausted { cap } => PlanningError::SearchExhausted { expanded: cap },
            PathError::Unreachable => PlanningError::NoPath,
            other => PlanningError::Path(other),
        })
    }

    pub fn blueprints(&self) -> &[RoomBlueprint] {
        &self.blueprints
    }

    pub fn blueprints_mut(&mut self) -> &mut [RoomBlueprint] {
        &mut self.blueprints
    }

    pub fn get(&self, id: BlueprintId) -> Option<&RoomBlueprint> {
        self.blueprints.iter().find(|bp| bp.id == id)
    }

    /// Blueprints not yet fully dug
    pub fn in_flight(&self) -> impl Iterator<Item = &RoomBlueprint> {
        self.blueprints.iter().filter(|bp| !bp.completed)
    }

    /// Fraction of planned cells already dug. None for unknown ids.
    pub fn build_progress(&self, id: BlueprintId, world: &WorldGrid) -> Option<f32> {
        self.get(id).map(|bp| bp.build_progress(world))
    }

    pub fn next_dig_target(&self, id: BlueprintId, world: &WorldGrid) -> Option<GridPos> {
        self.get(id).and_then(|bp| bp.next_dig_target(world))
    }

    /// Drop a blueprint. Returns false for unknown ids.
    pub fn cancel(&mut self, id: BlueprintId) -> bool {
        let before = self.blueprints.len();
        self.blueprints.retain(|bp| bp.id != id);
        before != self.blueprints.len()
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }
}
