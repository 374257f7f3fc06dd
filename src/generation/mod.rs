//! # Generation Module
//!
//! Procedural content generation for overworlds and the loot found in them.
//!
//! The [`WorldGenerator`] is the heart of the crate: it builds terrain in
//! ordered passes, enforces connectivity, picks a safe spawn and places
//! reachable chests. All randomness flows through [`RandomSource`] so a seeded
//! generator always reproduces the same world.

pub mod items;
pub mod overworld;
pub mod report;

pub use items::*;
pub use overworld::*;
pub use report::*;

use crate::{config, VerdantError, VerdantResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls world size, seeding and every tuning constant of the terrain,
/// connectivity and chest placement passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// World width in tiles
    pub width: u32,
    /// World height in tiles
    pub height: u32,
    /// Number of chests to place (placement may yield fewer)
    pub chest_count: usize,
    /// Minimum number of rivers
    pub min_rivers: u32,
    /// Maximum number of rivers
    pub max_rivers: u32,
    /// Widest river segment in tiles
    pub max_river_width: u32,
    /// Per-step probability that a river shifts sideways (0.0 to 1.0)
    pub meander_chance: f64,
    /// Distance from the edges kept clear of river starts, forest centers and chests
    pub edge_margin: i32,
    /// Distance from the edges a meandering river centerline must keep
    pub meander_margin: i32,
    /// Minimum number of forest patches
    pub min_tree_patches: u32,
    /// Maximum number of forest patches
    pub max_tree_patches: u32,
    /// Smallest forest patch radius
    pub min_patch_radius: i32,
    /// Largest forest patch radius
    pub max_patch_radius: i32,
    /// Probability of a tree inside a patch (0.0 to 1.0)
    pub tree_density: f64,
    /// Probability of a rock on any open cell (0.0 to 1.0)
    pub rock_density: f64,
    /// Walkable regions smaller than this are flooded
    pub min_island_size: usize,
    /// Cells sampled from each landmass when looking for a bridge site
    pub bridge_sample_size: usize,
    /// Landmasses at least this far apart (Manhattan) are left unbridged
    pub max_bridge_distance: u32,
    /// Random placement attempts per chest before falling back
    pub chest_attempts: u32,
    /// Distance from the spawn of the fallback chest offsets
    pub chest_fallback_distance: i32,
    /// Maximum cells a reachability search may visit
    pub reachability_budget: usize,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdant::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.seed, 42);
    /// assert_eq!(config.min_island_size, 20);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_WORLD_WIDTH,
            height: config::DEFAULT_WORLD_HEIGHT,
            chest_count: config::DEFAULT_CHEST_COUNT,
            min_rivers: 1,
            max_rivers: 3,
            max_river_width: 3,
            meander_chance: 0.3,
            edge_margin: 5,
            meander_margin: 2,
            min_tree_patches: 3,
            max_tree_patches: 7,
            min_patch_radius: 3,
            max_patch_radius: 8,
            tree_density: 0.15,
            rock_density: 0.05,
            min_island_size: 20,
            bridge_sample_size: 50,
            max_bridge_distance: 30,
            chest_attempts: 100,
            chest_fallback_distance: 3,
            reachability_budget: 1000,
        }
    }

    /// Creates a configuration for testing with a smaller world.
    pub fn for_testing(seed: u64) -> Self {
        Self::new(seed).with_dimensions(30, 20)
    }

    /// Creates a configuration for large worlds with several chests.
    pub fn for_large_world(seed: u64) -> Self {
        Self::new(seed)
            .with_dimensions(160, 100)
            .with_chest_count(5)
            .with_area_scaled_budget()
    }

    /// Sets the world size.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the requested chest count.
    pub fn with_chest_count(mut self, chest_count: usize) -> Self {
        self.chest_count = chest_count;
        self
    }

    /// Lets reachability checks visit the whole map instead of the fixed cap.
    pub fn with_area_scaled_budget(mut self) -> Self {
        self.reachability_budget = self.area().max(self.reachability_budget);
        self
    }

    /// Number of tiles in the configured world.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks dimensions and tuning values.
    pub fn validate(&self) -> VerdantResult<()> {
        if self.width < config::MIN_DIMENSION
            || self.height < config::MIN_DIMENSION
            || self.width > i32::MAX as u32
            || self.height > i32::MAX as u32
        {
            return Err(VerdantError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        for (name, value) in [
            ("meander_chance", self.meander_chance),
            ("tree_density", self.tree_density),
            ("rock_density", self.rock_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(VerdantError::InvalidConfig(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, value
                )));
            }
        }

        if self.min_rivers > self.max_rivers {
            return Err(VerdantError::InvalidConfig(
                "min_rivers exceeds max_rivers".to_string(),
            ));
        }
        if self.min_tree_patches > self.max_tree_patches {
            return Err(VerdantError::InvalidConfig(
                "min_tree_patches exceeds max_tree_patches".to_string(),
            ));
        }
        if self.min_patch_radius < 0 || self.min_patch_radius > self.max_patch_radius {
            return Err(VerdantError::InvalidConfig(
                "patch radius range is empty or negative".to_string(),
            ));
        }
        if self.max_river_width == 0 {
            return Err(VerdantError::InvalidConfig(
                "max_river_width must be at least 1".to_string(),
            ));
        }
        if self.edge_margin < 0 || self.meander_margin < 0 || self.chest_fallback_distance < 0 {
            return Err(VerdantError::InvalidConfig(
                "margins and distances must not be negative".to_string(),
            ));
        }
        if self.max_river_width > self.width.max(self.height) {
            return Err(VerdantError::InvalidConfig(format!(
                "max_river_width {} is wider than the world",
                self.max_river_width
            )));
        }

        // Counts are drawn as i32 ranges
        let max_count = i32::MAX as u32;
        for (name, value) in [
            ("max_rivers", self.max_rivers),
            ("max_river_width", self.max_river_width),
            ("max_tree_patches", self.max_tree_patches),
        ] {
            if value > max_count {
                return Err(VerdantError::InvalidConfig(format!(
                    "{} must not exceed {}, got {}",
                    name, max_count, value
                )));
            }
        }
        if self.bridge_sample_size > max_count as usize {
            return Err(VerdantError::InvalidConfig(format!(
                "bridge_sample_size must not exceed {}, got {}",
                max_count, self.bridge_sample_size
            )));
        }
        if self.chest_count > self.area() {
            return Err(VerdantError::InvalidConfig(format!(
                "chest_count {} exceeds the {} tiles of the world",
                self.chest_count,
                self.area()
            )));
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Source of randomness injected into every generation pass.
///
/// Blanket-implemented for every [`rand::Rng`], so `StdRng` and friends work
/// directly; tests can supply scripted sources.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[low, high]`. `low` must not exceed `high`.
    fn range_inclusive(&mut self, low: i32, high: i32) -> i32;

    /// Returns true with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Fair coin.
    fn coin_flip(&mut self) -> bool {
        self.range_inclusive(0, 1) == 1
    }

    /// Uniform index into a non-empty collection of `len` items.
    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on an empty collection");
        self.range_inclusive(0, len.saturating_sub(1) as i32) as usize
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..=high)
    }
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use crate::World;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Inclusive coordinate range keeping `margin` cells from both edges.
    ///
    /// Falls back to the whole axis when the extent is too small for the margin.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdant::generation::utils::inset_range;
    ///
    /// assert_eq!(inset_range(60, 5), (5, 55));
    /// assert_eq!(inset_range(10, 5), (5, 5));
    /// assert_eq!(inset_range(6, 5), (0, 5));
    /// ```
    pub fn inset_range(extent: i32, margin: i32) -> (i32, i32) {
        let (low, high) = (margin, extent - margin);
        if low <= high && high < extent {
            (low, high)
        } else {
            (0, extent - 1)
        }
    }

    /// Checks the structural guarantees of a generated world.
    pub fn validate_world(world: &World) -> VerdantResult<()> {
        let grid = &world.grid;

        if grid.width() != world.width
            || grid.height() != world.height
            || grid.len() != world.width as usize * world.height as usize
        {
            return Err(VerdantError::InvalidState(format!(
                "Grid holds {} cells for a {}x{} world",
                grid.len(),
                world.width,
                world.height
            )));
        }

        if !grid.is_area_walkable(world.spawn) {
            return Err(VerdantError::InvalidState(format!(
                "Spawn {} is boxed in",
                world.spawn
            )));
        }

        for chest in &world.chests {
            if !grid.is_walkable_at(chest.position) {
                return Err(VerdantError::InvalidState(format!(
                    "Chest at {} stands on blocking terrain",
                    chest.position
                )));
            }
        }

        Ok(())
    }
}
