use thiserror::Error;

use crate::blueprints::RoomType;
use crate::core::types::{BlueprintId, ColonyId, GridPos};

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("World generation failed: {0}")]
    Generation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Room planning failures. Committed blueprints are never touched when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("not painting: call start_painting first")]
    NotPainting,

    #[error("room too small: {painted} cells painted, {room_type} needs at least {minimum}")]
    TooSmall {
        room_type: RoomType,
        painted: usize,
        minimum: usize,
    },

    #[error("painted cell {cell} would overlap committed {blueprint}")]
    Overlap { cell: GridPos, blueprint: BlueprintId },

    #[error("painted cell {cell} would overlap non-diggable terrain")]
    OverlapTerrain { cell: GridPos },

    #[error("no path found: {colony} has no nest or rooms to connect to")]
    NoNetwork { colony: ColonyId },

    #[error("no path found: region is walled off from the tunnel network")]
    NoPath,

    #[error("no path found: search gave up after expanding {expanded} cells")]
    SearchExhausted { expanded: usize },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Explicit failures of path queries (brush actions absorb these silently instead)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("path query cell {cell} is outside the {cols}x{rows} grid")]
    OutOfBounds { cell: GridPos, cols: usize, rows: usize },

    #[error("path search exceeded its cap of {cap} expanded cells")]
    Exhausted { cap: usize },

    #[error("no path between the given cells")]
    Unreachable,
}

/// Reasons a snapshot cannot be restored
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("grid {cols}x{rows} does not match {field} length {len}")]
    Dimensions {
        field: &'static str,
        cols: usize,
        rows: usize,
        len: usize,
    },

    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
