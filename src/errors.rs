use crate::battle::state::Side;
use thiserror::Error;

/// Main error type for the Daylight Chronicles battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// An action was rejected; the match state is unchanged
    #[error("Invalid action: {0}")]
    InvalidAction(#[from] ActionError),
    /// The match could not be configured; no match state was created
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The acting side does not hold the turn
    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),
    /// Move index is out of bounds
    #[error("invalid move index: {0}")]
    InvalidMoveIndex(usize),
    /// The selected move has no uses left
    #[error("move {0} has no uses remaining")]
    MoveExhausted(usize),
    /// A winner has been decided
    #[error("the match is already over")]
    MatchOver,
    /// Neither side has a usable move
    #[error("neither side has any moves left")]
    MatchStalled,
    /// The side is driven by the computer and cannot take manual input
    #[error("{0} is not controlled by a human player")]
    NotHumanControlled(Side),
    /// A side may only pass when it has nothing left to use
    #[error("{0} still has usable moves")]
    MovesStillAvailable(Side),
    /// The side acting via the computer is not computer controlled
    #[error("{0} is not controlled by the computer")]
    NotComputerControlled(Side),
}

/// Errors raised while building a match or loading its data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The requested creature id is not in the roster
    #[error("unknown creature: {0}")]
    UnknownCreature(String),
    /// A side that needs an explicit choice was left empty
    #[error("no creature selected for {0}")]
    MissingSelection(Side),
    #[error("the roster contains no creatures")]
    EmptyRoster,
    #[error("creature {0} has no moves")]
    CreatureWithoutMoves(String),
    #[error("creature id {0} appears more than once")]
    DuplicateCreature(String),
    #[error("failed to parse roster: {0}")]
    RosterParse(String),
    #[error("failed to parse rules: {0}")]
    RulesParse(String),
    #[error("invalid rules: {0}")]
    InvalidRules(String),
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ConfigurationError
pub type ConfigResult<T> = Result<T, ConfigurationError>;
