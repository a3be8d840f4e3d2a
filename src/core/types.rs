//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Simulation tick counter
pub type Tick = u64;

/// Unique identifier for ants (sequential, so ids are reproducible from a seed)
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "ant#{}", _0)]
pub struct AntId(pub u32);

/// Unique identifier for colonies
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "colony#{}", _0)]
pub struct ColonyId(pub u32);

impl ColonyId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for committed room blueprints
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "blueprint#{}", _0)]
pub struct BlueprintId(pub u32);

/// Integer cell coordinate on the world grid
///
/// Signed so that brush centers and neighbor offsets may fall off-grid;
/// the grid decides what is in bounds.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "({}, {})", x, y)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

/// 4-neighborhood offsets in a fixed order (N, E, S, W)
pub const NEIGHBORS_4: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// 8-neighborhood offsets in a fixed order, clockwise from north
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn neighbors4(&self) -> impl Iterator<Item = GridPos> + '_ {
        NEIGHBORS_4.iter().map(move |&(dx, dy)| self.offset(dx, dy))
    }

    pub fn neighbors8(&self) -> impl Iterator<Item = GridPos> + '_ {
        NEIGHBORS_8.iter().map(move |&(dx, dy)| self.offset(dx, dy))
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Continuous position of the cell center
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

/// 2D continuous position in cell units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(radians: f32) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Grid cell containing this position
    pub fn cell(&self) -> GridPos {
        GridPos::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display() {
        assert_eq!(AntId(7).to_string(), "ant#7");
        assert_eq!(ColonyId(1).to_string(), "colony#1");
        assert_eq!(GridPos::new(3, -2).to_string(), "(3, -2)");
    }

    #[test]
    fn test_vec2_cell_floors_negative() {
        assert_eq!(Vec2::new(2.7, 0.1).cell(), GridPos::new(2, 0));
        assert_eq!(Vec2::new(-0.2, 1.0).cell(), GridPos::new(-1, 1));
    }

    #[test]
    fn test_neighbor_order_is_stable() {
        let p = GridPos::new(5, 5);
        let n4: Vec<_> = p.neighbors4().collect();
        assert_eq!(n4[0], GridPos::new(5, 4));
        assert_eq!(n4[3], GridPos::new(4, 5));
        assert_eq!(p.neighbors8().count(), 8);
    }

    #[test]
    fn test_chebyshev() {
        let a = GridPos::new(0, 0);
        assert_eq!(a.chebyshev(&GridPos::new(3, -1)), 3);
        assert_eq!(a.chebyshev(&a), 0);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
