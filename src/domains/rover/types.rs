use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_WORLD_SIZE: i32 = 20;

/// A cell on the toroidal grid. Values held by the rover and the obstacle
/// field are always wrapped into `[0, size)` by their `World`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub fn left(self) -> Self {
        match self {
            Orientation::North => Orientation::West,
            Orientation::West => Orientation::South,
            Orientation::South => Orientation::East,
            Orientation::East => Orientation::North,
        }
    }

    pub fn right(self) -> Self {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
        }
    }

    /// Unit step taken when moving forward while facing this way.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Orientation::North => (0, 1),
            Orientation::East => (1, 0),
            Orientation::South => (0, -1),
            Orientation::West => (-1, 0),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Orientation::North => 'N',
            Orientation::East => 'E',
            Orientation::South => 'S',
            Orientation::West => 'W',
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Square torus of side `size`. Both axes wrap independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    size: i32,
}

impl World {
    pub fn new(size: i32) -> DomainResult<Self> {
        if size < 1 {
            return Err(DomainError::InvalidWorld {
                reason: format!("World size must be at least 1, got {}", size),
            });
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn wrap(&self, position: Position) -> Position {
        Position {
            x: position.x.rem_euclid(self.size),
            y: position.y.rem_euclid(self.size),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.size).contains(&position.x) && (0..self.size).contains(&position.y)
    }

    /// Raw step first, wrap second, so a step off one edge lands on the opposite one.
    pub fn step(&self, from: Position, (dx, dy): (i32, i32)) -> Position {
        self.wrap(Position::new(from.x + dx, from.y + dy))
    }

    /// Squared distance on the torus, taking the shorter way round on each axis.
    pub fn distance_squared(&self, a: Position, b: Position) -> i64 {
        let a = self.wrap(a);
        let b = self.wrap(b);
        let axis = |p: i32, q: i32| {
            let direct = (p - q).abs() as i64;
            direct.min(self.size as i64 - direct)
        };
        let dx = axis(a.x, b.x);
        let dy = axis(a.y, b.y);
        dx * dx + dy * dy
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            size: DEFAULT_WORLD_SIZE,
        }
    }
}
