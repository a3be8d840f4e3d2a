//! Ant agent - sensing, steering and the forage/return state machine
//!
//! An ant reads the trail that matches its state from its passable
//! neighbors, blends the strongest direction with a random exploration term,
//! its own heading and (when carrying food) a pull toward the nest, then
//! steps toward the best-aligned open neighbor. Pheromone it lays is pushed
//! into a buffer so every ant in a tick senses the same field.

use std::f32::consts::TAU;

use ordered_float::OrderedFloat;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::AntConfig;
use crate::core::types::{AntId, ColonyId, GridPos, Vec2, NEIGHBORS_8};
use crate::world::grid::WorldGrid;
use crate::world::pheromone::{Deposit, Trail};
use crate::world::terrain::Terrain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Caste {
    Worker,
    Scout,
}

impl Caste {
    /// Share of `max_carry` this caste can hold
    pub fn capacity_factor(&self) -> f32 {
        match self {
            Caste::Worker => 1.0,
            Caste::Scout => 0.5,
        }
    }

    pub fn exploration_factor(&self) -> f32 {
        match self {
            Caste::Worker => 1.0,
            Caste::Scout => 2.5,
        }
    }

    pub fn lifespan(&self, config: &AntConfig) -> u64 {
        match self {
            Caste::Worker => config.worker_lifespan,
            Caste::Scout => config.scout_lifespan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AntState {
    /// Following food-trail away from the nest
    Foraging,
    /// Carrying food, following home-trail back
    Returning,
    /// No food-trail in range; wandering
    Idle,
    Dead,
}

impl AntState {
    /// The trail this state steers by
    pub fn followed_trail(&self) -> Trail {
        match self {
            AntState::Returning => Trail::Home,
            _ => Trail::Food,
        }
    }

    /// The trail this state leaves behind (the one the opposite state follows)
    pub fn laid_trail(&self) -> Trail {
        match self {
            AntState::Returning => Trail::Food,
            _ => Trail::Home,
        }
    }
}

/// What happened to an ant during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AntOutcome {
    Moved,
    /// No valid move this tick (enclosed or blocked)
    Stayed,
    PickedUp(f32),
    Delivered(f32),
    Dug(GridPos),
    Died,
}

/// Per-tick inputs shared by all ants of one colony
#[derive(Debug, Clone, Copy)]
pub struct AntContext<'a> {
    pub nest: GridPos,
    pub config: &'a AntConfig,
    pub dt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ant {
    pub id: AntId,
    pub colony: ColonyId,
    pub caste: Caste,
    /// Continuous position in cell units
    pub position: Vec2,
    /// Unit vector of the last move
    pub heading: Vec2,
    pub carry: f32,
    pub state: AntState,
    /// Multiplier on deposits; reset at nest/food, decays every step
    pub trail_strength: f32,
    pub age: u64,
    /// Cell the ant is currently stepping toward
    pub target: Option<GridPos>,
}

impl Ant {
    pub fn new(id: AntId, colony: ColonyId, caste: Caste, cell: GridPos, heading: Vec2) -> Self {
        Self {
            id,
            colony,
            caste,
            position: cell.center(),
            heading: heading.normalize(),
            carry: 0.0,
            state: AntState::Foraging,
            trail_strength: 1.0,
            age: 0,
            target: None,
        }
    }

    pub fn cell(&self) -> GridPos {
        self.position.cell()
    }

    pub fn capacity(&self, config: &AntConfig) -> f32 {
        config.max_carry * self.caste.capacity_factor()
    }

    pub fn is_alive(&self) -> bool {
        self.state != AntState::Dead
    }

    /// Advance this ant by one tick
    pub fn step(
        &mut self,
        world: &mut WorldGrid,
        ctx: &AntContext<'_>,
        rng: &mut ChaCha8Rng,
        deposits: &mut Vec<Deposit>,
    ) -> AntOutcome {
        if !self.is_alive() {
            return AntOutcome::Stayed;
        }

        self.age += 1;
        if self.age >= self.caste.lifespan(ctx.config) {
            self.state = AntState::Dead;
            self.target = None;
            return AntOutcome::Died;
        }

        let cell = self.cell();

        if self.state == AntState::Returning {
            if cell.chebyshev(&ctx.nest) <= ctx.config.nest_arrival_radius {
                let delivered = self.carry;
                self.carry = 0.0;
                self.state = AntState::Foraging;
                self.trail_strength = 1.0;
                self.target = None;
                return AntOutcome::Delivered(delivered);
            }
        } else if let Some(food) = adjacent_food(world, cell) {
            if world.take_food(food) {
                self.carry = ctx.config.food_per_cell.min(self.capacity(ctx.config));
                self.state = AntState::Returning;
                self.trail_strength = 1.0;
                self.target = None;
                return AntOutcome::PickedUp(self.carry);
            }
        }

        let gradient = sense_gradient(
            world,
            cell,
            self.state.followed_trail(),
            ctx.config.sense_threshold,
        );
        match (self.state, gradient) {
            (AntState::Foraging, None) => self.state = AntState::Idle,
            (AntState::Idle, Some(_)) => self.state = AntState::Foraging,
            _ => {}
        }

        let desired = self.desired_direction(gradient, ctx, rng);

        if ctx.config.autonomous_dig && self.state != AntState::Returning {
            let facing = best_aligned(cell, desired, |p| world.in_bounds(p));
            if let Some(facing) = facing.filter(|p| world.get(*p) == Some(Terrain::Dirt)) {
                if rng.gen::<f32>() < ctx.config.dig_chance && world.dig_cell(facing) {
                    return AntOutcome::Dug(facing);
                }
            }
        }

        let Some(target) = best_aligned(cell, desired, |p| world.is_passable(p)) else {
            return AntOutcome::Stayed;
        };
        self.target = Some(target);

        let goal = target.center();
        let delta = goal - self.position;
        let distance = delta.length();
        let stride = ctx.config.speed * ctx.dt;
        let next = if distance <= stride {
            goal
        } else {
            self.position + delta * (stride / distance)
        };

        // The straight line may clip a corner cell; treat that as a wasted tick
        if !world.is_passable(next.cell()) {
            return AntOutcome::Stayed;
        }
        self.position = next;
        self.heading = delta.normalize();

        if let Some(index) = world.index(next.cell()) {
            deposits.push(Deposit {
                index,
                trail: self.state.laid_trail(),
                amount: ctx.config.deposit_amount * self.trail_strength,
            });
        }
        self.trail_strength *= ctx.config.trail_strength_decay;

        AntOutcome::Moved
    }

    fn desired_direction(
        &self,
        gradient: Option<Vec2>,
        ctx: &AntContext<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Vec2 {
        let config = ctx.config;
        let mut exploration = config.exploration_weight * self.caste.exploration_factor();
        if self.state == AntState::Idle {
            exploration *= 2.0;
        }

        let random = Vec2::from_angle(rng.gen::<f32>() * TAU);
        let mut desired = self.heading * config.persistence_weight + random * exploration;

        if let Some(gradient) = gradient {
            desired = desired + gradient * config.gradient_weight;
        }
        if self.state == AntState::Returning {
            let home = (ctx.nest.center() - self.position).normalize();
            desired = desired + home * config.homing_weight;
        }
        desired
    }
}

fn offset_direction(dx: i32, dy: i32) -> Vec2 {
    Vec2::new(dx as f32, dy as f32).normalize()
}

/// First food cell in the ant's own cell or its 8-neighborhood
fn adjacent_food(world: &WorldGrid, cell: GridPos) -> Option<GridPos> {
    std::iter::once(cell)
        .chain(cell.neighbors8())
        .find(|p| world.get(*p) == Some(Terrain::Food))
}

/// Direction to the passable neighbor with the strongest trail, if any
/// neighbor beats the threshold
fn sense_gradient(world: &WorldGrid, cell: GridPos, trail: Trail, threshold: f32) -> Option<Vec2> {
    let field = world.pheromones();
    NEIGHBORS_8
        .iter()
        .filter_map(|&(dx, dy)| {
            let pos = cell.offset(dx, dy);
            if !world.is_passable(pos) {
                return None;
            }
            let index = world.index(pos)?;
            Some(((dx, dy), field.value(trail, index)))
        })
        .filter(|(_, value)| *value > threshold)
        .max_by_key(|(_, value)| OrderedFloat(*value))
        .map(|((dx, dy), _)| offset_direction(dx, dy))
}

/// Neighbor whose direction best matches `desired`, among those `allowed`
fn best_aligned(cell: GridPos, desired: Vec2, allowed: impl Fn(GridPos) -> bool) -> Option<GridPos> {
    NEIGHBORS_8
        .iter()
        .map(|&(dx, dy)| (cell.offset(dx, dy), offset_direction(dx, dy).dot(&desired)))
        .filter(|(pos, _)| allowed(*pos))
        .max_by_key(|(_, score)| OrderedFloat(*score))
        .map(|(pos, _)| pos)
}
