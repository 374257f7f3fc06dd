//! # Collision
//!
//! Movement rules for the hero: terrain, map edges and closed chests.

use crate::{Position, TerrainKind, World};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a cell cannot be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    OutOfBounds,
    /// A chest that has not been opened yet
    Chest,
    Terrain(TerrainKind),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::OutOfBounds => write!(f, "edge of the world"),
            BlockReason::Chest => write!(f, "a treasure chest"),
            BlockReason::Terrain(kind) => write!(f, "{}", kind.name()),
        }
    }
}

/// Stateless collision queries against a [`World`].
///
/// Opened chests no longer block; closed ones do.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionSystem;

impl CollisionSystem {
    /// Returns what blocks `pos`, or `None` if the hero may stand there.
    pub fn blocking_reason(world: &World, pos: Position) -> Option<BlockReason> {
        let cell = match world.terrain_at(pos.x, pos.y) {
            Some(cell) => cell,
            None => return Some(BlockReason::OutOfBounds),
        };

        if world.chest_at(pos).map_or(false, |chest| !chest.opened) {
            return Some(BlockReason::Chest);
        }

        if cell.blocks_movement() {
            return Some(BlockReason::Terrain(cell.kind));
        }

        None
    }

    pub fn is_blocked(world: &World, pos: Position) -> bool {
        Self::blocking_reason(world, pos).is_some()
    }

    /// Single-step moves only, in any of the 8 directions.
    pub fn can_move(world: &World, from: Position, to: Position) -> bool {
        from.chebyshev_distance(to) == 1 && !Self::is_blocked(world, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Equipment, EquipmentSlot, EquipmentStats, GenerationReport, Grid, TreasureChest};

    fn small_world() -> World {
        let mut grid = Grid::new(6, 6);
        grid.set(Position::new(4, 1), TerrainKind::River);
        let chest = TreasureChest::new(
            Position::new(2, 3),
            Equipment::new("Iron Sword", EquipmentSlot::Weapon, EquipmentStats::default()),
        );
        World {
            width: 6,
            height: 6,
            grid,
            spawn: Position::new(2, 2),
            chests: vec![chest],
            report: GenerationReport::default(),
        }
    }

    #[test]
    fn test_blocking_reasons() {
        let world = small_world();
        assert_eq!(
            CollisionSystem::blocking_reason(&world, Position::new(-1, 0)),
            Some(BlockReason::OutOfBounds)
        );
        assert_eq!(
            CollisionSystem::blocking_reason(&world, Position::new(4, 1)),
            Some(BlockReason::Terrain(TerrainKind::River))
        );
        assert_eq!(
            CollisionSystem::blocking_reason(&world, Position::new(2, 3)),
            Some(BlockReason::Chest)
        );
        assert_eq!(CollisionSystem::blocking_reason(&world, Position::new(1, 1)), None);
    }

    #[test]
    fn test_opened_chest_does_not_block() {
        let mut world = small_world();
        if let Some(chest) = world.chest_at_mut(Position::new(2, 3)) {
            chest.open();
        }
        assert!(!CollisionSystem::is_blocked(&world, Position::new(2, 3)));
    }

    #[test]
    fn test_can_move_single_steps() {
        let world = small_world();
        let from = Position::new(2, 2);
        assert!(CollisionSystem::can_move(&world, from, Position::new(3, 3)));
        assert!(!CollisionSystem::can_move(&world, from, Position::new(2, 3)));
        assert!(!CollisionSystem::can_move(&world, from, Position::new(4, 2)));
        assert!(!CollisionSystem::can_move(&world, from, from));
    }
}
