//! World grid, terrain, pheromone trails and procedural generation

pub mod generation;
pub mod grid;
pub mod pheromone;
pub mod terrain;

pub use generation::{generate, Anchor};
pub use grid::WorldGrid;
pub use pheromone::{Deposit, PheromoneField, Trail};
pub use terrain::Terrain;
