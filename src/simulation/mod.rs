//! Tick orchestration, external actions, events and snapshots

pub mod actions;
pub mod events;
pub mod orchestrator;
pub mod snapshot;

pub use actions::{ActionKind, ActionQueue, GodAction};
pub use events::{EventQueue, SimEvent};
pub use orchestrator::ColonyOrchestrator;
pub use snapshot::{SimulationSnapshot, SNAPSHOT_VERSION};
