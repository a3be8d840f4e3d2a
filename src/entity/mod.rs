//! Ants and colonies

pub mod ant;
pub mod colony;

pub use ant::{Ant, AntContext, AntOutcome, AntState, Caste};
pub use colony::{Colony, MILESTONES};
