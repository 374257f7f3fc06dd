//! # Verdant
//!
//! A small tile-based exploration game built around a procedurally generated
//! overworld of grass, forests, rocks, rivers and bridges.
//!
//! ## Architecture Overview
//!
//! - **Generation System**: the [`WorldGenerator`] lays terrain down in several
//!   randomized passes, prunes unreachable islands, bridges the remaining
//!   landmasses, finds a safe spawn and places reachable treasure chests
//! - **Game State**: hero movement, collision and chest looting on top of a
//!   generated [`World`]
//! - **Rendering System**: plain-text map output for terminals and logs
//!
//! Randomness is always injected through [`RandomSource`], so a fixed seed
//! reproduces the exact same world.

pub mod game;
pub mod generation;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Verdant game engine.
#[derive(thiserror::Error, Debug)]
pub enum VerdantError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// World dimensions cannot hold a playable map
    #[error("Invalid world dimensions {width}x{height} (minimum is {min}x{min})", min = config::MIN_DIMENSION)]
    InvalidDimensions { width: u32, height: u32 },

    /// Generation tuning values are out of range
    #[error("Invalid generation config: {0}")]
    InvalidConfig(String),

    /// Neither random attempts nor fallback offsets produced a chest position
    #[error("Could not place chest #{chest_index} after {attempts} attempts and all fallback offsets")]
    ChestPlacementExhausted { chest_index: usize, attempts: u32 },

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Result type used throughout the Verdant codebase.
pub type VerdantResult<T> = Result<T, VerdantError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default world width in tiles
    pub const DEFAULT_WORLD_WIDTH: u32 = 80;

    /// Default world height in tiles
    pub const DEFAULT_WORLD_HEIGHT: u32 = 50;

    /// Smallest accepted world edge; the spawn block is 3x3
    pub const MIN_DIMENSION: u32 = 3;

    /// Default hero starting health
    pub const DEFAULT_HERO_HEALTH: u32 = 100;

    /// Default number of chests per world
    pub const DEFAULT_CHEST_COUNT: usize = 1;
}
