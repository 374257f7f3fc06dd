//! # Hero
//!
//! The player character and the equipment it wears.

use crate::{config, Equipment, EquipmentSlot, EquipmentStats, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tracks which item sits in which slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentManager {
    equipped: BTreeMap<EquipmentSlot, Equipment>,
}

impl EquipmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `item` into its slot and returns whatever was there before.
    ///
    /// With `auto_equip` set the item is only worn when the slot is empty;
    /// otherwise it is handed straight back.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdant::{Equipment, EquipmentManager, EquipmentSlot, EquipmentStats};
    ///
    /// let mut manager = EquipmentManager::new();
    /// let old = Equipment::new("Old Sword", EquipmentSlot::Weapon, EquipmentStats::default());
    /// let new = Equipment::new("New Sword", EquipmentSlot::Weapon, EquipmentStats::default());
    ///
    /// assert!(manager.equip(old.clone(), true).is_none());
    /// // Auto mode leaves the occupied slot alone
    /// assert_eq!(manager.equip(new.clone(), true), Some(new.clone()));
    /// // Manual mode swaps
    /// assert_eq!(manager.equip(new, false), Some(old));
    /// ```
    pub fn equip(&mut self, item: Equipment, auto_equip: bool) -> Option<Equipment> {
        if auto_equip && !self.is_slot_empty(item.slot) {
            return Some(item);
        }
        self.equipped.insert(item.slot, item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Equipment> {
        self.equipped.remove(&slot)
    }

    pub fn get_equipped(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        self.equipped.get(&slot)
    }

    pub fn is_slot_empty(&self, slot: EquipmentSlot) -> bool {
        !self.equipped.contains_key(&slot)
    }

    /// Sum of the stats of every worn item.
    pub fn total_stats(&self) -> EquipmentStats {
        self.equipped.values().map(|item| item.stats).sum()
    }

    /// Worn items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.equipped.values()
    }
}

/// The player-controlled character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    /// Items carried but not worn
    pub inventory: Vec<Equipment>,
    pub equipment: EquipmentManager,
}

impl Hero {
    /// Creates a hero at full health with nothing equipped.
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            hp: config::DEFAULT_HERO_HEALTH,
            max_hp: config::DEFAULT_HERO_HEALTH,
            inventory: Vec::new(),
            equipment: EquipmentManager::new(),
        }
    }

    /// Wears `item` if its slot is free, otherwise stores it.
    ///
    /// Returns `true` when the item was equipped.
    pub fn take_item(&mut self, item: Equipment) -> bool {
        match self.equipment.equip(item, true) {
            None => true,
            Some(rejected) => {
                self.inventory.push(rejected);
                false
            }
        }
    }

    /// Moves an inventory item into its slot. A replaced item goes back into
    /// the inventory.
    pub fn equip_from_inventory(&mut self, index: usize) -> Option<&Equipment> {
        if index >= self.inventory.len() {
            return None;
        }
        let item = self.inventory.remove(index);
        let slot = item.slot;
        if let Some(previous) = self.equipment.equip(item, false) {
            self.inventory.push(previous);
        }
        self.equipment.get_equipped(slot)
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self::new("Hero", Position::origin())
    }
}
