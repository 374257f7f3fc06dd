//! # Rendering Module
//!
//! Plain-text output of generated worlds for terminals, logs and tests.

pub mod ascii;

pub use ascii::*;
