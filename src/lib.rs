//! Layered height map synthesis library
//!
//! Re-exports modules for use by the CLI binary and tools.

pub mod error;
pub mod export;
pub mod grid;
pub mod heightmap;
pub mod methods;
pub mod settings;
pub mod stats;
