//! ColonyOrchestrator - owns the world and drives one tick at a time
//!
//! Tick order is fixed: pheromone field, ants (in spawn order), queued
//! actions, then housekeeping. Every random draw after world generation
//! comes from one `ChaCha8Rng` on a dedicated stream, and its word position
//! is part of the snapshot, so a restored session replays exactly.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::blueprints::manager::RoomBlueprintManager;
use crate::blueprints::room::RoomBlueprint;
use crate::core::calendar::Calendar;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError, SnapshotError};
use crate::core::types::{AntId, BlueprintId, ColonyId, GridPos, Vec2};
use crate::entity::ant::{Ant, AntContext, AntOutcome, Caste};
use crate::entity::colony::Colony;
use crate::simulation::actions::{ActionQueue, GodAction};
use crate::simulation::events::{EventQueue, SimEvent};
use crate::simulation::snapshot::{SimulationSnapshot, SNAPSHOT_VERSION};
use crate::world::generation::{far_from_nests, generate};
use crate::world::grid::WorldGrid;
use crate::world::pheromone::{Deposit, PheromoneField, Trail};
use crate::world::terrain::Terrain;

/// ChaCha stream used by the tick RNG (stream 0 belongs to world generation)
const TICK_STREAM: u64 = 1;

/// Attempts to find a spot for a seasonal food cluster
const FOOD_SPAWN_ATTEMPTS: u32 = 64;

pub struct ColonyOrchestrator {
    config: SimulationConfig,
    world: WorldGrid,
    colonies: Vec<Colony>,
    /// Living ants in spawn order, which is also update order
    ants: Vec<Ant>,
    rooms: RoomBlueprintManager,
    actions: ActionQueue,
    calendar: Calendar,
    elapsed: f64,
    seed: u64,
    rng: ChaCha8Rng,
    next_ant_id: u32,
    events: EventQueue,
    deposits: Vec<Deposit>,
}

impl ColonyOrchestrator {
    /// Generate a fresh world and populate one colony per configured nest
    pub fn new(seed: u64, config: SimulationConfig) -> Result<Self> {
        config.validate().map_err(SimError::Config)?;
        let world = generate(seed, &config.world, &config.anchors)?;

        let mut rooms = RoomBlueprintManager::new(config.planning.max_path_expansions);
        let colonies: Vec<Colony> = config
            .world
            .nests
            .iter()
            .enumerate()
            .map(|(i, nest)| {
                let name = config
                    .colony
                    .names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Colony {}", i + 1));
                let colony = Colony::new(ColonyId::new(i as u32), name, *nest);
                rooms.register_nest(colony.id, colony.nest);
                colony
            })
            .collect();

        let calendar = Calendar::new(config.calendar.ticks_per_day, config.calendar.days_per_season);
        let mut sim = Self {
            world,
            colonies,
            ants: Vec::new(),
            rooms,
            actions: ActionQueue::new(),
            calendar,
            elapsed: 0.0,
            seed,
            rng: tick_rng(seed),
            next_ant_id: 0,
            events: EventQueue::new(),
            deposits: Vec::new(),
            config,
        };

        for i in 0..sim.colonies.len() {
            for _ in 0..sim.config.colony.initial_ants {
                sim.spawn_ant(i);
            }
        }

        info!(
            "Started session with seed {}: {} colonies, {} ants on a {}x{} grid",
            seed,
            sim.colonies.len(),
            sim.ants.len(),
            sim.world.cols(),
            sim.world.rows()
        );
        Ok(sim)
    }

    /// Build a session directly from a stored snapshot
    pub fn from_snapshot(config: SimulationConfig, snapshot: SimulationSnapshot) -> Result<Self> {
        config.validate().map_err(SimError::Config)?;
        let state = RestoredState::build(&config, snapshot)?;
        let mut sim = Self {
            world: WorldGrid::new(1, 1, Terrain::Dirt),
            colonies: Vec::new(),
            ants: Vec::new(),
            rooms: RoomBlueprintManager::new(config.planning.max_path_expansions),
            actions: ActionQueue::new(),
            calendar: Calendar::default(),
            elapsed: 0.0,
            seed: 0,
            rng: tick_rng(0),
            next_ant_id: 0,
            events: EventQueue::new(),
            deposits: Vec::new(),
            config,
        };
        sim.install(state);
        Ok(sim)
    }

    fn spawn_ant(&mut self, colony_index: usize) -> Option<AntId> {
        let colony = self.colonies.get_mut(colony_index)?;
        let caste = if self.rng.gen_bool(self.config.colony.scout_ratio as f64) {
            Caste::Scout
        } else {
            Caste::Worker
        };
        let heading = Vec2::from_angle(self.rng.gen::<f32>() * TAU);
        let id = AntId(self.next_ant_id);
        self.next_ant_id += 1;

        self.ants
            .push(Ant::new(id, colony.id, caste, colony.nest, heading));
        colony.roster.push(id);
        Some(id)
    }

    /// Advance the simulation by one tick of length `dt`
    pub fn tick(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            warn!("Ignoring tick with invalid dt {}", dt);
            return;
        }
        let tick_no = self.calendar.current_tick() + 1;

        // 1. Field: decay + diffusion on last tick's values
        let (cells, field) = self.world.cells_and_pheromones_mut();
        field.step(cells, &self.config.pheromone, dt);

        // 2. Agents
        self.update_ants(dt);

        // 3. External actions
        self.actions
            .apply_pending(&mut self.world, &mut self.colonies, &self.config.actions);

        // 4. Housekeeping
        self.remove_dead();
        if tick_no % self.config.colony.birth_interval == 0 {
            self.run_births();
        }
        self.check_milestones();
        self.check_blueprints();

        let change = self.calendar.advance();
        if let Some(day) = change.day_advanced {
            info!("Day {} begins", day);
            self.events.push(SimEvent::DayAdvanced { day });
        }
        if let Some(season) = change.season_changed {
            info!("Season changed to {:?}", season);
            self.events.push(SimEvent::SeasonChanged { season });
        }

        if tick_no % self.config.colony.food_spawn_interval == 0 {
            self.spawn_food();
        }
        self.actions.tick_cooldowns();
        self.elapsed += dt as f64;

        debug!(
            tick = tick_no,
            ants = self.ants.len(),
            food_trail = self.world.pheromones().active_cells(Trail::Food),
            home_trail = self.world.pheromones().active_cells(Trail::Home),
            "tick complete"
        );
    }

    fn update_ants(&mut self, dt: f32) {
        let config = &self.config.ants;
        let mut deposits = std::mem::take(&mut self.deposits);

        for ant in self.ants.iter_mut() {
            let Some(nest) = self
                .colonies
                .iter()
                .find(|c| c.id == ant.colony)
                .map(|c| c.nest)
            else {
                continue;
            };
            let ctx = AntContext { nest, config, dt };

            match ant.step(&mut self.world, &ctx, &mut self.rng, &mut deposits) {
                AntOutcome::Delivered(amount) if amount > 0.0 => {
                    if let Some(colony) = self.colonies.iter_mut().find(|c| c.id == ant.colony) {
                        colony.deliver(amount);
                    }
                    self.events.push(SimEvent::FoodCollected {
                        colony: ant.colony,
                        ant: ant.id,
                        amount,
                    });
                }
                AntOutcome::Dug(cell) => debug!("{} dug {}", ant.id, cell),
                _ => {}
            }
        }

        let max_strength = self.config.pheromone.max_strength;
        for deposit in deposits.drain(..) {
            if self.world.is_passable(self.world.pos_of(deposit.index)) {
                self.world.pheromones_mut().deposit(deposit, max_strength);
            }
        }
        self.deposits = deposits;
    }

    fn remove_dead(&mut self) {
        let (alive, dead): (Vec<Ant>, Vec<Ant>) =
            std::mem::take(&mut self.ants).into_iter().partition(Ant::is_alive);
        self.ants = alive;

        for ant in dead {
            if let Some(colony) = self.colonies.iter_mut().find(|c| c.id == ant.colony) {
                colony.remove_ant(ant.id);
            }
            self.events.push(SimEvent::AntDied {
                colony: ant.colony,
                ant: ant.id,
            });
        }
    }

    fn run_births(&mut self) {
        let cost = self.config.colony.birth_cost;
        let cap = self.config.colony.max_population;
        for i in 0..self.colonies.len() {
            let colony = &mut self.colonies[i];
            if colony.population() >= cap || !colony.try_spend(cost) {
                continue;
            }
            if let Some(ant) = self.spawn_ant(i) {
                let colony = &self.colonies[i];
                info!("{} hatched in {} (population {})", ant, colony.name, colony.population());
                self.events.push(SimEvent::AntBorn {
                    colony: colony.id,
                    ant,
                });
            }
        }
    }

    fn check_milestones(&mut self) {
        for colony in &mut self.colonies {
            for milestone in colony.take_reached_milestones() {
                info!("{} reached {} food collected", colony.name, milestone);
                self.events.push(SimEvent::MilestoneReached {
                    colony: colony.id,
                    milestone,
                });
            }
        }
    }

    fn check_blueprints(&mut self) {
        let built: Vec<BlueprintId> = self
            .rooms
            .in_flight()
            .filter(|bp| bp.is_built(&self.world))
            .map(|bp| bp.id)
            .collect();
        if built.is_empty() {
            return;
        }
        for bp in self.rooms.blueprints_mut() {
            if !built.contains(&bp.id) {
                continue;
            }
            bp.completed = true;
            info!("{} {} completed for {}", bp.room_type, bp.id, bp.colony);
            self.events.push(SimEvent::BlueprintCompleted {
                blueprint: bp.id,
                colony: bp.colony,
            });
        }
    }

    /// Drop a food cluster on open surface far from every nest
    fn spawn_food(&mut self) {
        let season = self.calendar.current_season();
        let multiplier = season.food_spawn_multiplier();
        if multiplier <= 0.0 {
            debug!("No food spawn in {:?}", season);
            return;
        }

        let radius = (self.config.colony.food_spawn_radius as f32 * multiplier).round() as i32;
        let nests: Vec<GridPos> = self.colonies.iter().map(|c| c.nest).collect();
        let min_distance = self.config.world.min_food_distance_factor * self.world.diagonal();
        let max_x = self.world.cols() as i32 - 1;
        let max_y = (self.config.world.surface_rows as i32).clamp(2, self.world.rows() as i32);

        for _ in 0..FOOD_SPAWN_ATTEMPTS {
            let candidate = GridPos::new(self.rng.gen_range(1..max_x.max(2)), self.rng.gen_range(1..max_y));
            if self.world.get(candidate) != Some(Terrain::Air)
                || !far_from_nests(candidate, &nests, min_distance)
            {
                continue;
            }
            let placed = self
                .world
                .paint(candidate, radius, Terrain::Food, |t| t == Terrain::Air);
            debug!("Spawned {} food cells around {}", placed, candidate);
            return;
        }
        debug!("No room found for a food spawn");
    }

    /// Queue an action for the next tick
    pub fn submit_action(&mut self, action: GodAction) {
        self.actions.submit(action);
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn terrain_version(&self) -> u64 {
        self.world.terrain_version()
    }

    pub fn rooms(&self) -> &RoomBlueprintManager {
        &self.rooms
    }

    /// Lend the room planner together with the grid it validates against.
    /// Borrowing `self` mutably keeps planning and ticking from overlapping.
    pub fn planner(&mut self) -> (&mut RoomBlueprintManager, &WorldGrid) {
        (&mut self.rooms, &self.world)
    }

    pub fn to_snapshot(&self) -> SimulationSnapshot {
        let field = self.world.pheromones();
        SimulationSnapshot {
            version: SNAPSHOT_VERSION,
            cols: self.world.cols(),
            rows: self.world.rows(),
            cells: self.world.cells().to_vec(),
            food_trail: field.trail(Trail::Food).to_vec(),
            home_trail: field.trail(Trail::Home).to_vec(),
            terrain_version: self.world.terrain_version(),
            ants: self.ants.clone(),
            colonies: self.colonies.clone(),
            rng_seed: self.seed,
            rng_word_pos: self.rng.get_word_pos(),
            calendar: self.calendar.clone(),
            elapsed: self.elapsed,
            next_ant_id: self.next_ant_id,
            next_blueprint_id: self.rooms.next_id(),
            blueprints: self.rooms.blueprints().to_vec(),
            cooldowns: self.actions.cooldowns(),
            pending_actions: self.actions.pending().to_vec(),
        }
    }

    /// Replace the whole session with a snapshot's contents.
    ///
    /// Nothing changes unless the snapshot validates completely. Events not
    /// yet drained are discarded on success.
    pub fn restore_from_snapshot(&mut self, snapshot: SimulationSnapshot) -> Result<()> {
        match RestoredState::build(&self.config, snapshot) {
            Ok(state) => {
                self.install(state);
                info!(
                    "Restored snapshot at tick {} with {} ants",
                    self.calendar.current_tick(),
                    self.ants.len()
                );
                Ok(())
            }
            Err(e) => {
                warn!("Rejected snapshot: {}", e);
                Err(e.into())
            }
        }
    }

    fn install(&mut self, state: RestoredState) {
        let mut rooms = RoomBlueprintManager::with_blueprints(
            self.config.planning.max_path_expansions,
            state.blueprints,
            state.next_blueprint_id,
        );
        for colony in &state.colonies {
            rooms.register_nest(colony.id, colony.nest);
        }

        self.world = state.world;
        self.colonies = state.colonies;
        self.ants = state.ants;
        self.rooms = rooms;
        self.actions = state.actions;
        self.calendar = state.calendar;
        self.elapsed = state.elapsed;
        self.seed = state.seed;
        self.rng = state.rng;
        self.next_ant_id = state.next_ant_id;
        self.events = EventQueue::new();
        self.deposits.clear();
    }
}

/// Fully validated session state, ready to swap in
struct RestoredState {
    world: WorldGrid,
    colonies: Vec<Colony>,
    ants: Vec<Ant>,
    blueprints: Vec<RoomBlueprint>,
    next_blueprint_id: u32,
    actions: ActionQueue,
    calendar: Calendar,
    elapsed: f64,
    seed: u64,
    rng: ChaCha8Rng,
    next_ant_id: u32,
}

impl RestoredState {
    fn build(
        config: &SimulationConfig,
        snapshot: SimulationSnapshot,
    ) -> std::result::Result<Self, SnapshotError> {
        snapshot.validate(config.ants.max_carry)?;

        let field = PheromoneField::from_arrays(
            snapshot.cols,
            snapshot.rows,
            snapshot.food_trail,
            snapshot.home_trail,
        )?;
        let world = WorldGrid::from_parts(
            snapshot.cols,
            snapshot.rows,
            snapshot.cells,
            field,
            snapshot.terrain_version,
        )?;

        let mut rng = tick_rng(snapshot.rng_seed);
        rng.set_word_pos(snapshot.rng_word_pos);

        Ok(Self {
            world,
            colonies: snapshot.colonies,
            ants: snapshot.ants,
            blueprints: snapshot.blueprints,
            next_blueprint_id: snapshot.next_blueprint_id,
            actions: ActionQueue::from_parts(snapshot.pending_actions, snapshot.cooldowns),
            calendar: snapshot.calendar,
            elapsed: snapshot.elapsed,
            seed: snapshot.rng_seed,
            rng,
            next_ant_id: snapshot.next_ant_id,
        })
    }
}

fn tick_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(TICK_STREAM);
    rng
}
