//! # Utilities Module
//!
//! Grid traversal helpers shared by generation and gameplay code.

pub mod pathfinding;

pub use pathfinding::*;
