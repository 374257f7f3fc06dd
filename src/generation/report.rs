//! # Generation Report
//!
//! Structured account of what a single `generate()` call did. The generator
//! never logs; callers decide what to do with the report.

use crate::VerdantError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the hero spawn point was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnStrategy {
    /// The exact grid center was already safe
    #[default]
    Center,
    /// Found on the square ring at this Chebyshev radius around the center
    Ring { radius: u32 },
    /// No safe cell existed; a 3x3 grass block was cleared at the center
    ForcedClear,
}

/// Non-fatal problems recorded during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationWarning {
    ChestPlacementExhausted { chest_index: usize, attempts: u32 },
}

impl GenerationWarning {
    /// Converts the warning into the matching error value for callers that
    /// want to surface it.
    pub fn to_error(&self) -> VerdantError {
        match *self {
            GenerationWarning::ChestPlacementExhausted {
                chest_index,
                attempts,
            } => VerdantError::ChestPlacementExhausted {
                chest_index,
                attempts,
            },
        }
    }
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error())
    }
}

/// Counters collected across all generation passes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Rivers carved
    pub rivers: u32,
    /// River cells after the river pass
    pub river_cells: usize,
    /// Forest patches scattered
    pub tree_patches: u32,
    /// Trees placed
    pub trees: usize,
    /// Rocks placed
    pub rocks: usize,
    /// Walkable regions flooded for being too small
    pub islands_pruned: usize,
    /// Cells those regions covered
    pub island_cells_pruned: usize,
    /// Walkable regions left after pruning
    pub landmasses: usize,
    /// Paths carved toward the main landmass
    pub bridges_built: usize,
    /// River cells turned into bridge
    pub bridge_cells: usize,
    /// Landmasses too far away to bridge
    pub disconnected_landmasses: usize,
    /// How the spawn point was found
    pub spawn: SpawnStrategy,
    /// Random chest positions tried across all chests
    pub chest_attempts: u32,
    /// Chests actually placed
    pub chests_placed: usize,
    /// Chests placed next to the spawn after random attempts ran out
    pub chest_fallbacks: usize,
    pub warnings: Vec<GenerationWarning>,
}

impl GenerationReport {
    /// Whether every requested chest found a home.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rivers={} river_cells={} patches={} trees={} rocks={} \
             islands_pruned={} ({} cells) landmasses={} bridges={} ({} cells) \
             disconnected={} spawn={:?} chests={} attempts={} fallbacks={}",
            self.rivers,
            self.river_cells,
            self.tree_patches,
            self.trees,
            self.rocks,
            self.islands_pruned,
            self.island_cells_pruned,
            self.landmasses,
            self.bridges_built,
            self.bridge_cells,
            self.disconnected_landmasses,
            self.spawn,
            self.chests_placed,
            self.chest_attempts,
            self.chest_fallbacks,
        )
    }
}
