//! Daylight Chronicles Battle Engine
//!
//! A turn-based duel between two creatures: hit and critical rolls, type
//! effectiveness, limited move uses, weather, lingering statuses and a simple
//! computer opponent. The engine is synchronous and deterministic given its
//! random rolls, so any front end can drive it.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod roster;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{BaseStats, CreatureData, ElementType, ImageRefs, MoveData, StatusKind, Weather};

// --- From this crate's modules (`src/`) ---

// Core engine operations and state.
pub use battle::calculators::AttackOutcome;
pub use battle::engine::{pass_turn, reset_match, resolve_attack, roll_weather, tick_status, tick_statuses};
pub use battle::state::{BattleEvent, CombatantState, EventBus, MatchState, Side, TurnRng, MAX_HP};

// Match driving.
pub use battle::ai::{Behavior, RandomChoice, TacticalAI};
pub use battle::runner::{BattleRunner, ExecutionResult};

// Configuration and data.
pub use config::{BattleRules, GameMode, MatchConfig};
pub use roster::{builtin_roster, Roster};

// Crate-specific error and result types.
pub use errors::{ActionError, BattleEngineError, BattleResult, ConfigResult, ConfigurationError};
