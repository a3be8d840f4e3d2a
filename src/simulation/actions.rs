//! Player/AI actions applied between the agent pass and housekeeping
//!
//! Actions are queued by the caller at any time and applied once each, in
//! submission order, during the next tick. Each kind has its own cooldown.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::ActionConfig;
use crate::core::types::{ColonyId, GridPos};
use crate::entity::colony::Colony;
use crate::world::grid::WorldGrid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GodAction {
    /// Add food straight to a colony's stock
    DropFood { colony: ColonyId, amount: f32 },
    /// Turn dirt in a disc to air
    Dig { center: GridPos, radius: i32 },
    /// Turn a disc to rock (hardite is left alone)
    RockWall { center: GridPos, radius: i32 },
}

impl GodAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            GodAction::DropFood { .. } => ActionKind::DropFood,
            GodAction::Dig { .. } => ActionKind::Dig,
            GodAction::RockWall { .. } => ActionKind::RockWall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    DropFood,
    Dig,
    RockWall,
}

impl ActionKind {
    pub const COUNT: usize = 3;
    pub const ALL: [ActionKind; ActionKind::COUNT] =
        [ActionKind::DropFood, ActionKind::Dig, ActionKind::RockWall];

    pub fn index(self) -> usize {
        self as usize
    }

    fn cooldown(self, config: &ActionConfig) -> u32 {
        match self {
            ActionKind::DropFood => config.drop_food_cooldown,
            ActionKind::Dig => config.dig_cooldown,
            ActionKind::RockWall => config.rock_wall_cooldown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionQueue {
    pending: Vec<GodAction>,
    cooldowns: [u32; ActionKind::COUNT],
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(pending: Vec<GodAction>, cooldowns: [u32; ActionKind::COUNT]) -> Self {
        Self { pending, cooldowns }
    }

    pub fn submit(&mut self, action: GodAction) {
        self.pending.push(action);
    }

    pub fn pending(&self) -> &[GodAction] {
        &self.pending
    }

    pub fn cooldowns(&self) -> [u32; ActionKind::COUNT] {
        self.cooldowns
    }

    pub fn cooldown(&self, kind: ActionKind) -> u32 {
        self.cooldowns[kind.index()]
    }

    /// Apply every queued action once and empty the queue.
    ///
    /// Returns how many were applied. Actions whose kind is cooling down,
    /// and DropFood for an unknown colony or a bad amount, are dropped.
    pub fn apply_pending(
        &mut self,
        world: &mut WorldGrid,
        colonies: &mut [Colony],
        config: &ActionConfig,
    ) -> usize {
        let mut applied = 0;
        for action in std::mem::take(&mut self.pending) {
            let kind = action.kind();
            if self.cooldowns[kind.index()] > 0 {
                warn!(
                    "Dropping {:?}: cooling down for {} more ticks",
                    kind,
                    self.cooldowns[kind.index()]
                );
                continue;
            }

            let radius_cap = config.max_brush_radius;
            let done = match action {
                GodAction::DropFood { colony, amount } => {
                    match colonies.iter_mut().find(|c| c.id == colony) {
                        Some(target) if amount.is_finite() && amount > 0.0 => {
                            target.food_stock += amount;
                            true
                        }
                        Some(_) => {
                            warn!("Dropping food drop of invalid amount {}", amount);
                            false
                        }
                        None => {
                            warn!("Dropping food drop for unknown {}", colony);
                            false
                        }
                    }
                }
                GodAction::Dig { center, radius } => {
                    world.dig(center, radius.clamp(0, radius_cap));
                    true
                }
                GodAction::RockWall { center, radius } => {
                    world.place_rock(center, radius.clamp(0, radius_cap));
                    true
                }
            };

            if done {
                self.cooldowns[kind.index()] = kind.cooldown(config);
                applied += 1;
            }
        }
        applied
    }

    /// Count every cooldown down by one tick
    pub fn tick_cooldowns(&mut self) {
        for remaining in &mut self.cooldowns {
            *remaining = remaining.saturating_sub(1);
        }
    }
}
