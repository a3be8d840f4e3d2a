//! WorldGrid - canonical terrain and pheromone storage
//!
//! Cells are stored row-major; `index(x, y) = y * cols + x`. Brush operations
//! (dig, place_*) quietly skip anything off-grid because player gestures
//! routinely stray past the edges.

use crate::core::error::SnapshotError;
use crate::core::types::GridPos;
use crate::world::pheromone::PheromoneField;
use crate::world::terrain::Terrain;

/// Longest side a grid may have; cell coordinates are `i32`
pub const MAX_SIDE: usize = i32::MAX as usize;

/// Number of cells in a `cols` x `rows` grid, or `None` when either side is
/// zero or too long, or the product overflows
pub fn cell_count(cols: usize, rows: usize) -> Option<usize> {
    if cols == 0 || rows == 0 || cols > MAX_SIDE || rows > MAX_SIDE {
        return None;
    }
    cols.checked_mul(rows)
}

#[derive(Debug, Clone)]
pub struct WorldGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Terrain>,
    pheromones: PheromoneField,
    terrain_version: u64,
}

impl WorldGrid {
    pub fn new(cols: usize, rows: usize, fill: Terrain) -> Self {
        Self {
            cols,
            rows,
            cells: vec![fill; cols * rows],
            pheromones: PheromoneField::new(cols, rows),
            terrain_version: 0,
        }
    }

    /// Reassemble a grid from stored parts
    pub fn from_parts(
        cols: usize,
        rows: usize,
        cells: Vec<Terrain>,
        pheromones: PheromoneField,
        terrain_version: u64,
    ) -> Result<Self, SnapshotError> {
        if cell_count(cols, rows) != Some(cells.len()) {
            return Err(SnapshotError::Dimensions {
                field: "cells",
                cols,
                rows,
                len: cells.len(),
            });
        }
        Ok(Self {
            cols,
            rows,
            cells,
            pheromones,
            terrain_version,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Length of the world diagonal in cells
    pub fn diagonal(&self) -> f32 {
        ((self.cols * self.cols + self.rows * self.rows) as f32).sqrt()
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    #[inline]
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.cols + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn pos_of(&self, index: usize) -> GridPos {
        GridPos::new((index % self.cols) as i32, (index / self.cols) as i32)
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<Terrain> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn is_passable(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|t| t.is_passable())
    }

    /// Set one cell; returns whether anything changed
    pub fn set(&mut self, pos: GridPos, terrain: Terrain) -> bool {
        let Some(i) = self.index(pos) else {
            return false;
        };
        self.write(i, terrain)
    }

    fn write(&mut self, index: usize, terrain: Terrain) -> bool {
        if self.cells[index] == terrain {
            return false;
        }
        self.cells[index] = terrain;
        if !terrain.is_passable() {
            self.pheromones.clear_cell(index);
        }
        self.terrain_version += 1;
        true
    }

    /// Apply `terrain` to every in-bounds cell within `radius` of `center`
    /// whose current terrain satisfies `accept`. Returns cells changed.
    pub fn paint(
        &mut self,
        center: GridPos,
        radius: i32,
        terrain: Terrain,
        accept: impl Fn(Terrain) -> bool,
    ) -> usize {
        let radius = radius.max(0);
        let mut changed = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let Some(i) = self.index(center.offset(dx, dy)) else {
                    continue;
                };
                if accept(self.cells[i]) && self.write(i, terrain) {
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Convert dirt to air within a circle
    pub fn dig(&mut self, center: GridPos, radius: i32) -> usize {
        self.paint(center, radius, Terrain::Air, |t| t.is_diggable())
    }

    pub fn dig_cell(&mut self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|t| t.is_diggable()) && self.set(pos, Terrain::Air)
    }

    /// Food goes onto open ground or dirt, never into rock
    pub fn place_food(&mut self, center: GridPos, radius: i32) -> usize {
        self.paint(center, radius, Terrain::Food, |t| {
            matches!(t, Terrain::Air | Terrain::Dirt)
        })
    }

    pub fn place_rock(&mut self, center: GridPos, radius: i32) -> usize {
        self.paint(center, radius, Terrain::Rock, |t| t != Terrain::Hardite)
    }

    pub fn place_hardite(&mut self, center: GridPos, radius: i32) -> usize {
        self.paint(center, radius, Terrain::Hardite, |_| true)
    }

    /// Consume a food cell, leaving air. Returns false if it held no food.
    pub fn take_food(&mut self, pos: GridPos) -> bool {
        self.get(pos) == Some(Terrain::Food) && self.set(pos, Terrain::Air)
    }

    pub fn cells(&self) -> &[Terrain] {
        &self.cells
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|t| **t == terrain).count()
    }

    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    pub fn pheromones_mut(&mut self) -> &mut PheromoneField {
        &mut self.pheromones
    }

    /// Split borrow for the field step, which reads terrain while writing trails
    pub fn cells_and_pheromones_mut(&mut self) -> (&[Terrain], &mut PheromoneField) {
        (&self.cells, &mut self.pheromones)
    }

    /// Bumped on every terrain change; renderers compare it to decide
    /// whether cached terrain imagery is stale
    pub fn terrain_version(&self) -> u64 {
        self.terrain_version
    }

    /// Text rendering, one glyph per cell (debugging and the CLI)
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols) {
            out.extend(row.iter().map(|t| t.glyph()));
            out.push('\n');
        }
        out
    }
}
