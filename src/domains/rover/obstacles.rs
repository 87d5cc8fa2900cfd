use super::types::{Position, World};
use crate::common::{DomainError, DomainResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: Uuid,
    pub position: Position,
    pub size: u32,
    pub discovered: bool,
}

/// Placement of an obstacle before it is admitted to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSeed {
    pub x: i32,
    pub y: i32,
    pub size: u32,
}

/// The initial survey, expressed in centred coordinates. Wrapped onto the grid
/// when a field is built.
pub const DEFAULT_SEEDS: [ObstacleSeed; 5] = [
    ObstacleSeed { x: 3, y: 4, size: 2 },
    ObstacleSeed { x: -2, y: 5, size: 3 },
    ObstacleSeed { x: 7, y: -1, size: 1 },
    ObstacleSeed { x: 1, y: 2, size: 1 },
    ObstacleSeed { x: -1, y: -1, size: 2 },
];

/// Fixed obstacles on the torus. Obstacles are never moved or removed; the only
/// mutation is the one-way `discovered` flag.
#[derive(Debug, Clone)]
pub struct ObstacleField {
    world: World,
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(world: World) -> Self {
        Self {
            world,
            obstacles: Vec::new(),
        }
    }

    pub fn with_seeds(world: World, seeds: &[ObstacleSeed]) -> DomainResult<Self> {
        let mut field = Self::new(world);
        for seed in seeds {
            field.add(Position::new(seed.x, seed.y), seed.size)?;
        }
        Ok(field)
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn hidden_count(&self) -> usize {
        self.obstacles.iter().filter(|o| !o.discovered).count()
    }

    /// Appends a new, undiscovered obstacle.
    pub fn add(&mut self, position: Position, size: u32) -> DomainResult<Uuid> {
        if size == 0 {
            return Err(DomainError::InvalidCommand {
                reason: "Obstacle size must be at least 1".to_string(),
            });
        }

        let id = Uuid::new_v4();
        self.obstacles.push(Obstacle {
            id,
            position: self.world.wrap(position),
            size,
            discovered: false,
        });
        Ok(id)
    }

    /// Scatters `count` obstacles on free cells, keeping `reserved` clear.
    /// Stops early when the grid has no free cell left.
    pub fn scatter<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        reserved: Position,
        rng: &mut R,
    ) -> DomainResult<usize> {
        let size = self.world.size();
        let cells = (size as usize) * (size as usize);
        let reserved = self.world.wrap(reserved);
        let mut placed = 0;

        while placed < count && self.len() + 1 < cells {
            let candidate = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if candidate == reserved || !self.is_path_clear(candidate) {
                continue;
            }
            self.add(candidate, rng.gen_range(1..=3))?;
            placed += 1;
        }

        Ok(placed)
    }

    pub fn is_path_clear(&self, target: Position) -> bool {
        let target = self.world.wrap(target);
        !self.obstacles.iter().any(|o| o.position == target)
    }

    /// Probing a cell reveals whatever sits there.
    pub fn check_obstacle_at(&mut self, position: Position) -> Option<Obstacle> {
        let position = self.world.wrap(position);
        let obstacle = self.obstacles.iter_mut().find(|o| o.position == position)?;
        obstacle.discovered = true;
        Some(obstacle.clone())
    }

    /// Returns how many obstacles were newly revealed.
    pub fn discover_all(&mut self) -> usize {
        let mut revealed = 0;
        for obstacle in self.obstacles.iter_mut().filter(|o| !o.discovered) {
            obstacle.discovered = true;
            revealed += 1;
        }
        revealed
    }

    pub fn discover_in_radius(&mut self, center: Position, radius: i32) -> Vec<Obstacle> {
        let world = self.world;
        let limit = (radius as i64) * (radius as i64);

        self.obstacles
            .iter_mut()
            .filter(|o| world.distance_squared(o.position, center) <= limit)
            .map(|o| {
                o.discovered = true;
                o.clone()
            })
            .collect()
    }

    /// Discovered obstacles only. Never mutates, so polling it is idempotent.
    pub fn scan(&self) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.discovered)
            .cloned()
            .collect()
    }
}
