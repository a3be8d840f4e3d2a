//! Room blueprints: painting, validation, tunnel planning and build progress

pub mod manager;
pub mod pathfinding;
pub mod room;

pub use manager::RoomBlueprintManager;
pub use pathfinding::find_connection_path;
pub use room::{RoomBlueprint, RoomType};
