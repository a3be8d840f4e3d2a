//! World generation
//!
//! A pure function of (seed, config, anchors). Every random draw comes from a
//! single `ChaCha8Rng` seeded here, in a fixed order, so the same inputs always
//! produce a bit-identical grid.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::GenerationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::GridPos;
use crate::world::grid::WorldGrid;
use crate::world::terrain::Terrain;

/// Attempts per food cluster before giving up on the distance constraint
const FOOD_PLACEMENT_ATTEMPTS: u32 = 64;

/// A scripted feature for structured levels
///
/// Any anchor of a kind (rock, cavern, food cluster) replaces random
/// placement of that kind entirely. Hardite and tunnel anchors have no
/// random counterpart and are simply added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anchor {
    Rock { center: GridPos, radius: i32 },
    Cavern { center: GridPos, radius: i32 },
    FoodCluster { center: GridPos, radius: i32 },
    Hardite { center: GridPos, radius: i32 },
    Tunnel { from: GridPos, to: GridPos },
}

impl Anchor {
    fn is_rock(&self) -> bool {
        matches!(self, Anchor::Rock { .. })
    }

    fn is_cavern(&self) -> bool {
        matches!(self, Anchor::Cavern { .. })
    }

    fn is_food(&self) -> bool {
        matches!(self, Anchor::FoodCluster { .. })
    }
}

/// Generate the initial world grid
pub fn generate(seed: u64, config: &GenerationConfig, anchors: &[Anchor]) -> Result<WorldGrid> {
    config.validate().map_err(SimError::Generation)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = WorldGrid::new(config.cols, config.rows, Terrain::Dirt);

    open_surface(&mut grid, config.surface_rows);
    if config.hardite_border {
        place_border(&mut grid);
    }

    // Rock formations
    if anchors.iter().any(Anchor::is_rock) {
        for anchor in anchors {
            if let Anchor::Rock { center, radius } = anchor {
                place_formation(&mut grid, *center, *radius, config.hardness_bias, &mut rng);
            }
        }
    } else {
        for _ in 0..config.rock_formations {
            let center = random_underground(config, &mut rng);
            let radius = rng.gen_range(config.min_rock_radius..=config.max_rock_radius);
            place_formation(&mut grid, center, radius, config.hardness_bias, &mut rng);
        }
    }

    // Caverns
    if anchors.iter().any(Anchor::is_cavern) {
        for anchor in anchors {
            if let Anchor::Cavern { center, radius } = anchor {
                grid.dig(*center, *radius);
            }
        }
    } else {
        for _ in 0..config.caverns {
            let center = random_underground(config, &mut rng);
            let radius = rng.gen_range(config.min_cavern_radius..=config.max_cavern_radius);
            grid.dig(center, radius);
        }
    }

    for anchor in anchors {
        match anchor {
            Anchor::Hardite { center, radius } => {
                grid.place_hardite(*center, *radius);
            }
            Anchor::Tunnel { from, to } => carve_line(&mut grid, *from, *to),
            _ => {}
        }
    }

    for nest in &config.nests {
        carve_nest(&mut grid, *nest, config);
    }

    // Food clusters, randomly placed ones along the surface band
    if anchors.iter().any(Anchor::is_food) {
        for anchor in anchors {
            if let Anchor::FoodCluster { center, radius } = anchor {
                place_food_cluster(&mut grid, *center, *radius);
            }
        }
    } else {
        let min_distance = config.min_food_distance_factor * grid.diagonal();
        for _ in 0..config.food_clusters {
            for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
                let candidate = GridPos::new(
                    rng.gen_range(1..config.cols as i32 - 1),
                    rng.gen_range(1..config.surface_rows.max(2) as i32),
                );
                if far_from_nests(candidate, &config.nests, min_distance) {
                    place_food_cluster(&mut grid, candidate, config.food_cluster_radius);
                    break;
                }
            }
        }
    }

    tracing::debug!(
        seed,
        cols = config.cols,
        rows = config.rows,
        food = grid.count(Terrain::Food),
        rock = grid.count(Terrain::Rock),
        "generated world"
    );

    Ok(grid)
}

/// Whether `pos` keeps at least `min_distance` from every nest
pub fn far_from_nests(pos: GridPos, nests: &[GridPos], min_distance: f32) -> bool {
    nests.iter().all(|nest| nest.distance(&pos) >= min_distance)
}

fn open_surface(grid: &mut WorldGrid, surface_rows: usize) {
    for y in 0..surface_rows.min(grid.rows()) {
        for x in 0..grid.cols() {
            grid.set(GridPos::new(x as i32, y as i32), Terrain::Air);
        }
    }
}

fn place_border(grid: &mut WorldGrid) {
    let (cols, rows) = (grid.cols() as i32, grid.rows() as i32);
    for y in 0..rows {
        grid.set(GridPos::new(0, y), Terrain::Hardite);
        grid.set(GridPos::new(cols - 1, y), Terrain::Hardite);
    }
    for x in 0..cols {
        grid.set(GridPos::new(x, rows - 1), Terrain::Hardite);
    }
}

fn random_underground(config: &GenerationConfig, rng: &mut ChaCha8Rng) -> GridPos {
    GridPos::new(
        rng.gen_range(1..config.cols as i32 - 1),
        rng.gen_range(config.surface_rows as i32..config.rows as i32 - 1),
    )
}

/// Each dirt cell in the circle turns to rock with probability `hardness_bias`
fn place_formation(
    grid: &mut WorldGrid,
    center: GridPos,
    radius: i32,
    hardness_bias: f32,
    rng: &mut ChaCha8Rng,
) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let pos = center.offset(dx, dy);
            if grid.get(pos) != Some(Terrain::Dirt) {
                continue;
            }
            if rng.gen::<f32>() < hardness_bias {
                grid.set(pos, Terrain::Rock);
            }
        }
    }
}

/// Open every non-hardite cell in a circle
fn carve(grid: &mut WorldGrid, center: GridPos, radius: i32) {
    grid.paint(center, radius, Terrain::Air, |t| t != Terrain::Hardite);
}

/// Straight tunnel, one cell wide, stepping along the longer axis
fn carve_line(grid: &mut WorldGrid, from: GridPos, to: GridPos) {
    let steps = (to.x - from.x).abs().max((to.y - from.y).abs()).max(1);
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = from.x as f32 + (to.x - from.x) as f32 * t;
        let y = from.y as f32 + (to.y - from.y) as f32 * t;
        carve(grid, GridPos::new(x.round() as i32, y.round() as i32), 0);
    }
}

fn carve_nest(grid: &mut WorldGrid, nest: GridPos, config: &GenerationConfig) {
    carve(grid, nest, config.nest_chamber_radius);
    let surface = GridPos::new(nest.x, config.surface_rows as i32 - 1);
    if nest.y > surface.y {
        carve_line(grid, nest, surface);
    }
}

/// Food sits in an air pocket so it can be reached from adjacent open cells
fn place_food_cluster(grid: &mut WorldGrid, center: GridPos, radius: i32) {
    carve(grid, center, radius + 1);
    grid.place_food(center, radius);
}
