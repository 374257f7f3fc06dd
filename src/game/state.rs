//! # Game State Module
//!
//! Playable state on top of a generated world.
//!
//! The [`GameState`] owns the current [`World`] and the [`Hero`], applies
//! movement through the collision rules and loots adjacent chests. Whole
//! states can be snapshotted to JSON and restored.

use crate::{
    CollisionSystem, Direction, Equipment, GenerationConfig, Hero, ItemFactory, Position,
    RandomSource, VerdantError, VerdantResult, World, WorldGenerator,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Something that happened as the result of a player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh world replaced the previous one
    WorldGenerated { spawn: Position, chests: usize },
    HeroMoved { from: Position, to: Position },
    ChestOpened {
        position: Position,
        item: Equipment,
        /// The item went straight into an empty slot
        equipped: bool,
    },
    ItemEquipped {
        item: Equipment,
        /// Previously worn item, now back in the inventory
        replaced: Option<Equipment>,
    },
}

/// Counters for a single play session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub steps_taken: u64,
    pub chests_opened: u32,
    pub worlds_generated: u32,
}

impl GameStatistics {
    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::WorldGenerated { .. } => self.worlds_generated += 1,
            GameEvent::HeroMoved { .. } => self.steps_taken += 1,
            GameEvent::ChestOpened { .. } => self.chests_opened += 1,
            GameEvent::ItemEquipped { .. } => {}
        }
    }
}

/// Central game state: the world, the hero and session bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub world: World,
    pub hero: Hero,
    /// Configuration the current world was generated with
    pub config: GenerationConfig,
    /// Number of successful player actions
    pub turn_number: u64,
    pub statistics: GameStatistics,
}

impl GameState {
    /// Generates a world and places a new hero on its spawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdant::{GameState, GenerationConfig, WorldGenerator};
    ///
    /// let mut generator = WorldGenerator::from_config(GenerationConfig::for_testing(3)).unwrap();
    /// let state = GameState::new_game(&mut generator);
    /// assert_eq!(state.hero.position, state.world.spawn);
    /// ```
    pub fn new_game<R: RandomSource, I: ItemFactory>(generator: &mut WorldGenerator<R, I>) -> Self {
        let world = generator.generate();
        let hero = Hero::new("Hero", world.spawn);
        let mut state = Self {
            world,
            hero,
            config: generator.config().clone(),
            turn_number: 0,
            statistics: GameStatistics::default(),
        };
        state.record_world();
        state
    }

    /// Discards the current world and drops the hero on a freshly generated one.
    ///
    /// The hero keeps inventory and equipment.
    pub fn regenerate<R: RandomSource, I: ItemFactory>(
        &mut self,
        generator: &mut WorldGenerator<R, I>,
    ) -> GameEvent {
        self.world = generator.generate();
        self.config = generator.config().clone();
        self.hero.position = self.world.spawn;
        self.record_world()
    }

    fn record_world(&mut self) -> GameEvent {
        info!("World ready: {}", self.world.report);
        for warning in &self.world.report.warnings {
            warn!("{}", warning);
        }

        let event = GameEvent::WorldGenerated {
            spawn: self.world.spawn,
            chests: self.world.chests.len(),
        };
        self.statistics.update_from_event(&event);
        event
    }

    /// Moves the hero one step.
    ///
    /// Fails with [`VerdantError::InvalidAction`] when the target is blocked.
    pub fn move_hero(&mut self, direction: Direction) -> VerdantResult<GameEvent> {
        let from = self.hero.position;
        let to = from + direction.to_delta();

        if let Some(reason) = CollisionSystem::blocking_reason(&self.world, to) {
            debug!("Move {:?} from {} blocked by {}", direction, from, reason);
            return Err(VerdantError::InvalidAction(format!(
                "Cannot move to {}: blocked by {}",
                to, reason
            )));
        }

        self.hero.position = to;
        Ok(self.finish_turn(GameEvent::HeroMoved { from, to }))
    }

    /// Opens the first unopened chest next to the hero (4 directions).
    ///
    /// The item is equipped if its slot is free, otherwise it goes into the
    /// inventory.
    pub fn try_open_chest(&mut self) -> VerdantResult<GameEvent> {
        let hero_position = self.hero.position;
        let opened = hero_position
            .cardinal_adjacent_positions()
            .into_iter()
            .find_map(|pos| {
                self.world
                    .chest_at_mut(pos)
                    .and_then(|chest| chest.open().map(|item| (pos, item)))
            });

        let (position, item) = opened.ok_or_else(|| {
            VerdantError::InvalidAction(format!("No closed chest next to {}", hero_position))
        })?;

        let equipped = self.hero.take_item(item.clone());
        info!(
            "Opened chest at {} and found {}{}",
            position,
            item,
            if equipped { " (equipped)" } else { "" }
        );

        Ok(self.finish_turn(GameEvent::ChestOpened {
            position,
            item,
            equipped,
        }))
    }

    /// Wears the inventory item at `index`, swapping out whatever held its slot.
    pub fn equip_from_inventory(&mut self, index: usize) -> VerdantResult<GameEvent> {
        let slot = self
            .hero
            .inventory
            .get(index)
            .map(|item| item.slot)
            .ok_or_else(|| {
                VerdantError::InvalidAction(format!("No inventory item at index {}", index))
            })?;
        let replaced = self.hero.equipment.get_equipped(slot).cloned();

        let item = self
            .hero
            .equip_from_inventory(index)
            .cloned()
            .ok_or_else(|| VerdantError::InvalidState(format!("Slot {} left empty", slot.name())))?;
        info!("Equipped {}", item);

        Ok(self.finish_turn(GameEvent::ItemEquipped { item, replaced }))
    }

    /// Chests that are still closed, as positions.
    pub fn closed_chests(&self) -> Vec<Position> {
        self.world
            .chests
            .iter()
            .filter(|chest| !chest.opened)
            .map(|chest| chest.position)
            .collect()
    }

    fn finish_turn(&mut self, event: GameEvent) -> GameEvent {
        self.turn_number += 1;
        self.statistics.update_from_event(&event);
        event
    }

    /// Serializes the game state to JSON.
    pub fn save_to_json(&self) -> VerdantResult<String> {
        serde_json::to_string_pretty(self).map_err(VerdantError::from)
    }

    /// Deserializes game state from JSON.
    pub fn load_from_json(json: &str) -> VerdantResult<Self> {
        let state: Self = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> VerdantResult<()> {
        let path = path.as_ref();
        fs::write(path, self.save_to_json()?)?;
        info!("Saved game to {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> VerdantResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let state = Self::load_from_json(&json)?;
        info!("Loaded game from {}", path.display());
        Ok(state)
    }

    /// Rejects snapshots whose hero stands somewhere impossible.
    fn validate(&self) -> VerdantResult<()> {
        let world = &self.world;
        if world.grid.width() != world.width || world.grid.height() != world.height {
            return Err(VerdantError::InvalidState(
                "World size does not match its grid".to_string(),
            ));
        }
        if !world.is_walkable(self.hero.position.x, self.hero.position.y) {
            return Err(VerdantError::InvalidState(format!(
                "Hero stands on blocked cell {}",
                self.hero.position
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        EquipmentSlot, EquipmentStats, GenerationReport, Grid, TerrainKind, TreasureChest,
    };

    /// A 7x7 meadow with a river on the right edge and one chest.
    fn scripted_state() -> GameState {
        let mut grid = Grid::new(7, 7);
        for y in 0..7 {
            grid.set(Position::new(6, y), TerrainKind::River);
        }
        let helmet = Equipment::new(
            "Iron Helmet",
            EquipmentSlot::Head,
            EquipmentStats {
                defense: 5,
                ..Default::default()
            },
        );
        let world = World {
            width: 7,
            height: 7,
            grid,
            spawn: Position::new(3, 3),
            chests: vec![TreasureChest::new(Position::new(3, 4), helmet)],
            report: GenerationReport::default(),
        };

        GameState {
            hero: Hero::new("Tester", world.spawn),
            world,
            config: GenerationConfig::for_testing(0),
            turn_number: 0,
            statistics: GameStatistics::default(),
        }
    }

    #[test]
    fn test_new_game_places_hero_on_spawn() {
        let mut generator = WorldGenerator::from_config(GenerationConfig::for_testing(11)).unwrap();
        let state = GameState::new_game(&mut generator);

        assert_eq!(state.hero.position, state.world.spawn);
        assert_eq!(state.statistics.worlds_generated, 1);
        assert_eq!(state.turn_number, 0);
    }

    #[test]
    fn test_move_hero() {
        let mut state = scripted_state();

        let event = state.move_hero(Direction::East).unwrap();
        assert_eq!(
            event,
            GameEvent::HeroMoved {
                from: Position::new(3, 3),
                to: Position::new(4, 3)
            }
        );
        assert_eq!(state.turn_number, 1);

        state.move_hero(Direction::East).unwrap();
        // River at x = 6
        let blocked = state.move_hero(Direction::East);
        assert!(matches!(blocked, Err(VerdantError::InvalidAction(_))));
        assert_eq!(state.hero.position, Position::new(5, 3));
        assert_eq!(state.statistics.steps_taken, 2);
    }

    #[test]
    fn test_closed_chest_blocks_until_opened() {
        let mut state = scripted_state();
        assert!(state.move_hero(Direction::South).is_err());

        let event = state.try_open_chest().unwrap();
        match event {
            GameEvent::ChestOpened {
                position,
                item,
                equipped,
            } => {
                assert_eq!(position, Position::new(3, 4));
                assert_eq!(item.name, "Iron Helmet");
                assert!(equipped);
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert_eq!(state.hero.equipment.total_stats().defense, 5);
        assert!(state.closed_chests().is_empty());
        assert!(state.move_hero(Direction::South).is_ok());
    }

    #[test]
    fn test_chest_opens_only_once() {
        let mut state = scripted_state();
        state.try_open_chest().unwrap();
        assert!(state.try_open_chest().is_err());
        assert_eq!(state.statistics.chests_opened, 1);
    }

    #[test]
    fn test_no_chest_nearby() {
        let mut state = scripted_state();
        state.move_hero(Direction::North).unwrap();
        state.move_hero(Direction::North).unwrap();
        assert!(matches!(
            state.try_open_chest(),
            Err(VerdantError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_regenerate_replaces_world() {
        let mut generator = WorldGenerator::from_config(GenerationConfig::for_testing(5)).unwrap();
        let mut state = GameState::new_game(&mut generator);
        let first = state.world.clone();

        let event = state.regenerate(&mut generator);
        assert!(matches!(event, GameEvent::WorldGenerated { .. }));
        assert_ne!(state.world.grid, first.grid);
        assert_eq!(state.hero.position, state.world.spawn);
        assert_eq!(state.statistics.worlds_generated, 2);
    }

    #[test]
    fn test_game_state_serialization() {
        let mut state = scripted_state();
        state.try_open_chest().unwrap();

        let json = state.save_to_json().unwrap();
        let _: serde_json::Value = serde_json::from_str(&json).unwrap();

        let loaded = GameState::load_from_json(&json).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_equip_from_inventory_swaps_items() {
        let mut state = scripted_state();
        state.try_open_chest().unwrap();
        let visor = Equipment::new("Iron Visor", EquipmentSlot::Head, EquipmentStats::default());
        state.hero.inventory.push(visor.clone());

        let event = state.equip_from_inventory(0).unwrap();
        match event {
            GameEvent::ItemEquipped { item, replaced } => {
                assert_eq!(item, visor);
                assert_eq!(replaced.map(|i| i.name), Some("Iron Helmet".to_string()));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(state.hero.inventory.len(), 1);
        assert_eq!(state.hero.inventory[0].name, "Iron Helmet");
        assert_eq!(state.hero.equipment.total_stats().defense, 0);

        assert!(matches!(
            state.equip_from_inventory(3),
            Err(VerdantError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_load_rejects_grid_with_missing_cells() {
        let state = scripted_state();
        let mut value: serde_json::Value =
            serde_json::from_str(&state.save_to_json().unwrap()).unwrap();
        value["world"]["grid"]["cells"] = serde_json::Value::Array(Vec::new());
        let json = serde_json::to_string(&value).unwrap();

        assert!(matches!(
            GameState::load_from_json(&json),
            Err(VerdantError::Serde(_))
        ));
    }

    #[test]
    fn test_load_rejects_hero_in_river() {
        let mut state = scripted_state();
        state.hero.position = Position::new(6, 0);
        let json = state.save_to_json().unwrap();

        assert!(matches!(
            GameState::load_from_json(&json),
            Err(VerdantError::InvalidState(_))
        ));
    }
}
