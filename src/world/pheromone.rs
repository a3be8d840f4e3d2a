//! Pheromone trails: decay, diffusion and deposition
//!
//! Two dense `f32` layers (food-trail, home-trail) share the grid's
//! row-major indexing. Each layer tracks the indices that currently hold a
//! value, so a step only touches the cells a trail actually covers plus their
//! neighbors.
//!
//! The step is an explicit, conservative scheme: a cell keeps
//! `(1 - share)` of its decayed value and splits `share` evenly across its air
//! neighbors. With `share` clamped to [0, 1] nothing can go negative and total
//! mass never grows, so the scheme is stable for any `dt`.

use serde::{Deserialize, Serialize};

use crate::core::config::{Neighborhood, PheromoneConfig};
use crate::core::error::SnapshotError;
use crate::core::types::{NEIGHBORS_4, NEIGHBORS_8};
use crate::world::grid::cell_count;
use crate::world::terrain::Terrain;

/// Which of the two trail layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trail {
    /// Leads toward food; laid by returning ants, followed by foragers
    Food,
    /// Leads toward the nest; laid by foragers, followed by returning ants
    Home,
}

/// A buffered pheromone drop, applied after the agent pass of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deposit {
    pub index: usize,
    pub trail: Trail,
    pub amount: f32,
}

#[derive(Debug, Clone, Default)]
struct TrailLayer {
    values: Vec<f32>,
    /// Every index with a value > 0 is listed here (possibly with extras)
    active: Vec<u32>,
    next: Vec<f32>,
    touched: Vec<u32>,
}

impl TrailLayer {
    fn new(len: usize) -> Self {
        Self::from_values(vec![0.0; len])
    }

    fn from_values(values: Vec<f32>) -> Self {
        let active = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, _)| i as u32)
            .collect();
        Self {
            next: vec![0.0; values.len()],
            values,
            active,
            touched: Vec::new(),
        }
    }

    fn deposit(&mut self, index: usize, amount: f32, max_strength: f32) {
        let Some(value) = self.values.get_mut(index) else {
            return;
        };
        if !(amount > 0.0) {
            return;
        }
        if *value <= 0.0 {
            self.active.push(index as u32);
        }
        *value = (*value + amount).min(max_strength);
    }

    fn clear(&mut self, index: usize) {
        if let Some(value) = self.values.get_mut(index) {
            *value = 0.0;
        }
    }

    fn mass(&self) -> f64 {
        self.values.iter().map(|v| *v as f64).sum()
    }

    fn step(&mut self, cells: &[Terrain], cols: usize, params: &StepParams) {
        self.active.sort_unstable();
        self.active.dedup();
        self.touched.clear();

        let rows = cells.len() / cols.max(1);
        let active = std::mem::take(&mut self.active);

        for &i in &active {
            let i = i as usize;
            let value = self.values[i];
            self.values[i] = 0.0;
            if value < params.threshold || !cells[i].is_passable() {
                continue;
            }

            let decayed = value * params.decay;
            let (x, y) = ((i % cols) as i32, (i / cols) as i32);

            let mut neighbors = [0usize; 8];
            let mut count = 0;
            for &(dx, dy) in params.offsets {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx as usize >= cols || ny as usize >= rows {
                    continue;
                }
                let n = ny as usize * cols + nx as usize;
                if cells[n].is_passable() {
                    neighbors[count] = n;
                    count += 1;
                }
            }

            self.touched.push(i as u32);
            if count == 0 || params.share <= 0.0 {
                self.next[i] += decayed;
                continue;
            }

            let spread = decayed * params.share;
            let each = spread / count as f32;
            self.next[i] += decayed - spread;
            for &n in &neighbors[..count] {
                self.next[n] += each;
                self.touched.push(n as u32);
            }
        }

        self.touched.sort_unstable();
        self.touched.dedup();

        let mut active = active;
        active.clear();
        for &j in &self.touched {
            let j = j as usize;
            let value = std::mem::take(&mut self.next[j]);
            if value >= params.threshold {
                self.values[j] = value;
                active.push(j as u32);
            } else {
                self.values[j] = 0.0;
            }
        }
        self.active = active;
    }
}

struct StepParams {
    decay: f32,
    share: f32,
    threshold: f32,
    offsets: &'static [(i32, i32)],
}

/// Food-trail and home-trail layers over one grid
#[derive(Debug, Clone)]
pub struct PheromoneField {
    cols: usize,
    rows: usize,
    food: TrailLayer,
    home: TrailLayer,
}

impl PheromoneField {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            food: TrailLayer::new(cols * rows),
            home: TrailLayer::new(cols * rows),
        }
    }

    /// Rebuild a field from stored arrays, rejecting wrong lengths and
    /// negative or non-finite values
    pub fn from_arrays(
        cols: usize,
        rows: usize,
        food: Vec<f32>,
        home: Vec<f32>,
    ) -> Result<Self, SnapshotError> {
        let expected = cell_count(cols, rows);
        for (field, values) in [("food_trail", &food), ("home_trail", &home)] {
            if expected != Some(values.len()) {
                return Err(SnapshotError::Dimensions {
                    field,
                    cols,
                    rows,
                    len: values.len(),
                });
            }
            if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(SnapshotError::Malformed(format!(
                    "{} holds invalid value {}",
                    field, bad
                )));
            }
        }
        Ok(Self {
            cols,
            rows,
            food: TrailLayer::from_values(food),
            home: TrailLayer::from_values(home),
        })
    }

    fn layer(&self, trail: Trail) -> &TrailLayer {
        match trail {
            Trail::Food => &self.food,
            Trail::Home => &self.home,
        }
    }

    fn layer_mut(&mut self, trail: Trail) -> &mut TrailLayer {
        match trail {
            Trail::Food => &mut self.food,
            Trail::Home => &mut self.home,
        }
    }

    /// Raw values of one trail, row-major
    pub fn trail(&self, trail: Trail) -> &[f32] {
        &self.layer(trail).values
    }

    pub fn value(&self, trail: Trail, index: usize) -> f32 {
        self.layer(trail).values.get(index).copied().unwrap_or(0.0)
    }

    pub fn deposit(&mut self, deposit: Deposit, max_strength: f32) {
        self.layer_mut(deposit.trail)
            .deposit(deposit.index, deposit.amount, max_strength);
    }

    /// Wipe both trails at a cell (called when the cell stops being air)
    pub fn clear_cell(&mut self, index: usize) {
        self.food.clear(index);
        self.home.clear(index);
    }

    /// Sum of one trail over the whole grid
    pub fn total_mass(&self, trail: Trail) -> f64 {
        self.layer(trail).mass()
    }

    /// Number of cells currently holding a value for a trail
    pub fn active_cells(&self, trail: Trail) -> usize {
        self.layer(trail).values.iter().filter(|v| **v > 0.0).count()
    }

    /// Decay then diffuse both trails by one step of length `dt`
    pub fn step(&mut self, cells: &[Terrain], config: &PheromoneConfig, dt: f32) {
        debug_assert_eq!(cells.len(), self.cols * self.rows);
        let params = StepParams {
            decay: (-config.decay_rate * dt.max(0.0)).exp(),
            share: (config.diffusion_rate * dt.max(0.0)).clamp(0.0, 1.0),
            threshold: config.negligible_threshold,
            offsets: match config.neighborhood {
                Neighborhood::Four => &NEIGHBORS_4,
                Neighborhood::Eight => &NEIGHBORS_8,
            },
        };
        self.food.step(cells, self.cols, &params);
        self.home.step(cells, self.cols, &params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_cells(cols: usize, rows: usize) -> Vec<Terrain> {
        vec![Terrain::Air; cols * rows]
    }

    fn lay(field: &mut PheromoneField, index: usize, trail: Trail, amount: f32) {
        field.deposit(Deposit { index, trail, amount }, 1.0);
    }

    #[test]
    fn test_deposit_clamps_to_max() {
        let mut field = PheromoneField::new(4, 4);
        lay(&mut field, 5, Trail::Food, 0.8);
        lay(&mut field, 5, Trail::Food, 0.8);
        assert_eq!(field.value(Trail::Food, 5), 1.0);
        assert_eq!(field.value(Trail::Home, 5), 0.0);
    }

    #[test]
    fn test_step_decays_and_spreads() {
        let cells = open_cells(5, 5);
        let mut field = PheromoneField::new(5, 5);
        lay(&mut field, 12, Trail::Home, 1.0);

        let config = PheromoneConfig {
            diffusion_rate: 0.4,
            ..PheromoneConfig::default()
        };
        let before = field.total_mass(Trail::Home);
        field.step(&cells, &config, 1.0);

        assert!(field.total_mass(Trail::Home) < before);
        assert!(field.value(Trail::Home, 12) < 1.0);
        // 4-neighborhood: N, E, S, W each received a share
        for n in [7, 13, 17, 11] {
            assert!(field.value(Trail::Home, n) > 0.0);
        }
        // Diagonals did not
        assert_eq!(field.value(Trail::Home, 6), 0.0);
    }

    #[test]
    fn test_eight_neighborhood_reaches_diagonals() {
        let cells = open_cells(5, 5);
        let mut field = PheromoneField::new(5, 5);
        lay(&mut field, 12, Trail::Food, 1.0);

        let config = PheromoneConfig {
            diffusion_rate: 0.4,
            neighborhood: Neighborhood::Eight,
            ..PheromoneConfig::default()
        };
        field.step(&cells, &config, 1.0);
        assert!(field.value(Trail::Food, 6) > 0.0);
    }

    #[test]
    fn test_no_diffusion_into_solid_cells() {
        let mut cells = open_cells(3, 3);
        for i in [1, 3, 5, 7] {
            cells[i] = Terrain::Rock;
        }
        let mut field = PheromoneField::new(3, 3);
        lay(&mut field, 4, Trail::Food, 1.0);
        field.step(&cells, &PheromoneConfig::default(), 1.0);

        for i in [1, 3, 5, 7] {
            assert_eq!(field.value(Trail::Food, i), 0.0);
        }
        // Enclosed cell keeps its whole decayed value
        let expected = (-PheromoneConfig::default().decay_rate).exp();
        assert!((field.value(Trail::Food, 4) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_negligible_values_are_dropped() {
        let cells = open_cells(3, 3);
        let mut field = PheromoneField::new(3, 3);
        let config = PheromoneConfig::default();
        lay(&mut field, 4, Trail::Food, config.negligible_threshold / 2.0);

        field.step(&cells, &config, 1.0);
        assert_eq!(field.total_mass(Trail::Food), 0.0);
        assert_eq!(field.active_cells(Trail::Food), 0);
    }

    #[test]
    fn test_trail_fades_out_completely() {
        let cells = open_cells(8, 8);
        let mut field = PheromoneField::new(8, 8);
        lay(&mut field, 27, Trail::Home, 1.0);
        let config = PheromoneConfig {
            decay_rate: 0.5,
            ..PheromoneConfig::default()
        };

        for _ in 0..200 {
            field.step(&cells, &config, 1.0);
        }
        assert_eq!(field.total_mass(Trail::Home), 0.0);
    }

    #[test]
    fn test_from_arrays_rebuilds_identical_dynamics() {
        let cells = open_cells(6, 6);
        let config = PheromoneConfig::default();
        let mut original = PheromoneField::new(6, 6);
        lay(&mut original, 8, Trail::Food, 0.9);
        lay(&mut original, 20, Trail::Home, 0.5);
        original.step(&cells, &config, 1.0);

        let mut restored = PheromoneField::from_arrays(
            6,
            6,
            original.trail(Trail::Food).to_vec(),
            original.trail(Trail::Home).to_vec(),
        )
        .unwrap();

        for _ in 0..10 {
            original.step(&cells, &config, 1.0);
            restored.step(&cells, &config, 1.0);
        }
        assert_eq!(original.trail(Trail::Food), restored.trail(Trail::Food));
        assert_eq!(original.trail(Trail::Home), restored.trail(Trail::Home));
    }

    #[test]
    fn test_from_arrays_rejects_bad_input() {
        assert!(matches!(
            PheromoneField::from_arrays(2, 2, vec![0.0; 3], vec![0.0; 4]),
            Err(SnapshotError::Dimensions { .. })
        ));
        assert!(matches!(
            PheromoneField::from_arrays(2, 2, vec![0.0, -1.0, 0.0, 0.0], vec![0.0; 4]),
            Err(SnapshotError::Malformed(_))
        ));
        // 2^32 x 2^32 wraps to zero in unchecked arithmetic
        assert!(matches!(
            PheromoneField::from_arrays(1 << 32, 1 << 32, Vec::new(), Vec::new()),
            Err(SnapshotError::Dimensions { field: "food_trail", .. })
        ));
    }
}
