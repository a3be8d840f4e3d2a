//! Terrain tags stored per grid cell

use serde::{Deserialize, Serialize};

/// Material of one grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Terrain {
    Air = 0,
    #[default]
    Dirt = 1,
    Rock = 2,
    Food = 3,
    Hardite = 4,
}

impl Terrain {
    /// Ants may only stand in air
    pub fn is_passable(&self) -> bool {
        matches!(self, Terrain::Air)
    }

    /// Convertible to air by a dig action
    pub fn is_diggable(&self) -> bool {
        matches!(self, Terrain::Dirt)
    }

    /// Cells a connection path may run through: already open or diggable
    pub fn is_routable(&self) -> bool {
        matches!(self, Terrain::Air | Terrain::Dirt)
    }

    pub fn glyph(&self) -> char {
        match self {
            Terrain::Air => ' ',
            Terrain::Dirt => '.',
            Terrain::Rock => '#',
            Terrain::Food => '*',
            Terrain::Hardite => '@',
        }
    }
}
