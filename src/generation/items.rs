//! # Item Generation
//!
//! Equipment found in treasure chests and the factory that rolls it.
//!
//! The world generator only passes items through; stats follow a simple
//! additive contract used by the hero's equipment manager.

use crate::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Body slot an item is worn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Head,
    Body,
    Legs,
    Feet,
    Weapon,
    Shield,
    Accessory,
}

impl EquipmentSlot {
    /// All slots in display order.
    pub fn all() -> [EquipmentSlot; 7] {
        [
            EquipmentSlot::Head,
            EquipmentSlot::Body,
            EquipmentSlot::Legs,
            EquipmentSlot::Feet,
            EquipmentSlot::Weapon,
            EquipmentSlot::Shield,
            EquipmentSlot::Accessory,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            EquipmentSlot::Head => "head",
            EquipmentSlot::Body => "body",
            EquipmentSlot::Legs => "legs",
            EquipmentSlot::Feet => "feet",
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Shield => "shield",
            EquipmentSlot::Accessory => "accessory",
        }
    }
}

/// Stat bonuses granted by a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquipmentStats {
    pub attack: i32,
    pub defense: i32,
    pub magic_attack: i32,
    pub magic_defense: i32,
    pub speed: i32,
    pub hp_bonus: i32,
    pub mp_bonus: i32,
    pub evasion: i32,
    pub accuracy: i32,
}

impl Add for EquipmentStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            attack: self.attack + other.attack,
            defense: self.defense + other.defense,
            magic_attack: self.magic_attack + other.magic_attack,
            magic_defense: self.magic_defense + other.magic_defense,
            speed: self.speed + other.speed,
            hp_bonus: self.hp_bonus + other.hp_bonus,
            mp_bonus: self.mp_bonus + other.mp_bonus,
            evasion: self.evasion + other.evasion,
            accuracy: self.accuracy + other.accuracy,
        }
    }
}

impl AddAssign for EquipmentStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for EquipmentStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// An equippable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub slot: EquipmentSlot,
    pub stats: EquipmentStats,
    pub description: String,
    pub required_level: u32,
}

impl Equipment {
    /// Creates a level-1 item without description.
    pub fn new(name: impl Into<String>, slot: EquipmentSlot, stats: EquipmentStats) -> Self {
        Self {
            name: name.into(),
            slot,
            stats,
            description: String::new(),
            required_level: 1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.slot.name())
    }
}

/// Produces the item stored in each freshly placed chest.
pub trait ItemFactory {
    fn create_item(&mut self, rng: &mut dyn RandomSource) -> Equipment;
}

/// Rolls items uniformly from a fixed catalogue.
#[derive(Debug, Clone)]
pub struct ItemGenerator {
    catalogue: Vec<Equipment>,
}

impl ItemGenerator {
    /// Creates a generator over the standard chest catalogue.
    pub fn new() -> Self {
        Self {
            catalogue: Self::standard_catalogue(),
        }
    }

    /// Creates a generator over a custom catalogue. An empty catalogue falls
    /// back to the standard one.
    pub fn with_catalogue(catalogue: Vec<Equipment>) -> Self {
        if catalogue.is_empty() {
            Self::new()
        } else {
            Self { catalogue }
        }
    }

    pub fn catalogue(&self) -> &[Equipment] {
        &self.catalogue
    }

    /// The items that can drop from chests.
    pub fn standard_catalogue() -> Vec<Equipment> {
        vec![
            Equipment::new(
                "Iron Helmet",
                EquipmentSlot::Head,
                EquipmentStats {
                    defense: 5,
                    hp_bonus: 10,
                    ..Default::default()
                },
            )
            .with_description("A sturdy iron helmet"),
            Equipment::new(
                "Leather Armor",
                EquipmentSlot::Body,
                EquipmentStats {
                    defense: 8,
                    hp_bonus: 15,
                    ..Default::default()
                },
            )
            .with_description("Well-crafted leather armor"),
            Equipment::new(
                "Chainmail Leggings",
                EquipmentSlot::Legs,
                EquipmentStats {
                    defense: 6,
                    speed: -1,
                    ..Default::default()
                },
            )
            .with_description("Heavy but dependable leg protection"),
            Equipment::new(
                "Swift Boots",
                EquipmentSlot::Feet,
                EquipmentStats {
                    speed: 5,
                    evasion: 3,
                    ..Default::default()
                },
            )
            .with_description("Boots that increase movement speed"),
            Equipment::new(
                "Iron Sword",
                EquipmentSlot::Weapon,
                EquipmentStats {
                    attack: 10,
                    accuracy: 5,
                    ..Default::default()
                },
            )
            .with_description("A reliable iron blade"),
            Equipment::new(
                "Wooden Shield",
                EquipmentSlot::Shield,
                EquipmentStats {
                    defense: 2,
                    evasion: 5,
                    ..Default::default()
                },
            )
            .with_description("A simple wooden shield"),
            Equipment::new(
                "Ring of Strength",
                EquipmentSlot::Accessory,
                EquipmentStats {
                    attack: 3,
                    defense: 2,
                    ..Default::default()
                },
            )
            .with_description("A ring that enhances strength"),
        ]
    }
}

impl Default for ItemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemFactory for ItemGenerator {
    fn create_item(&mut self, rng: &mut dyn RandomSource) -> Equipment {
        let index = rng.pick_index(self.catalogue.len());
        self.catalogue[index].clone()
    }
}
