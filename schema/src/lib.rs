// Daylight Chronicles Schema - Shared type definitions
// This crate contains the static data types that describe the roster and the
// battle field. The engine crate builds its runtime state on top of them.

// Re-export the main types
pub use battle_data::*;
pub use creature_data::*;
pub use creature_types::*;

pub mod battle_data;
pub mod creature_data;
pub mod creature_types;
