//! Match configuration and tunable battle rules.
//!
//! Rules are plain data loaded from RON. Every field has a default, so a rules
//! file only needs to name what it changes.

use crate::battle::state::Side;
use crate::errors::{ConfigResult, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    VsComputer,
    TwoPlayer,
}

impl GameMode {
    /// Label used for a side in log lines and banners.
    pub fn side_label(self, side: Side) -> &'static str {
        match (self, side) {
            (GameMode::VsComputer, Side::Player) => "Player",
            (GameMode::VsComputer, Side::Opponent) => "Computer",
            (GameMode::TwoPlayer, Side::Player) => "Player 1",
            (GameMode::TwoPlayer, Side::Opponent) => "Player 2",
        }
    }

    pub fn is_computer_controlled(self, side: Side) -> bool {
        self == GameMode::VsComputer && side == Side::Opponent
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::VsComputer => write!(f, "VS Computer"),
            GameMode::TwoPlayer => write!(f, "1v1"),
        }
    }
}

/// Choices made on the selection screens before a match starts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub mode: GameMode,
    pub player_creature: Option<String>,
    /// May be left empty in [`GameMode::VsComputer`]; a random creature is drawn.
    pub opponent_creature: Option<String>,
}

impl MatchConfig {
    pub fn vs_computer(player: &str, opponent: Option<&str>) -> Self {
        Self {
            mode: GameMode::VsComputer,
            player_creature: Some(player.to_string()),
            opponent_creature: opponent.map(str::to_string),
        }
    }

    pub fn two_player(player_one: &str, player_two: &str) -> Self {
        Self {
            mode: GameMode::TwoPlayer,
            player_creature: Some(player_one.to_string()),
            opponent_creature: Some(player_two.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BattleRules {
    pub uses_per_move: u8,
    pub default_accuracy: u8,
    pub base_crit_chance: f64,
    /// Added to the crit chance for every critical hit in the current streak.
    pub combo_crit_bonus: f64,
    pub crit_multiplier: f64,
    pub weather_boost: f64,
    /// Percent chance per action that the weather is rerolled.
    pub weather_change_chance: u8,
    pub status_duration: u8,
    pub burn_chance: u8,
    pub poison_chance: u8,
    pub status_damage_min: u16,
    pub status_damage_max: u16,
    pub log_capacity: usize,
    pub turn_time_limit_secs: u64,
    pub ai_action_delay_ms: u64,
    /// Let the speed comparison pick who opens the match instead of the player.
    pub roll_initiative: bool,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            uses_per_move: 3,
            default_accuracy: schema::DEFAULT_ACCURACY,
            base_crit_chance: 0.10,
            combo_crit_bonus: 0.05,
            crit_multiplier: 1.8,
            weather_boost: 1.3,
            weather_change_chance: 10,
            status_duration: 3,
            burn_chance: 30,
            poison_chance: 25,
            status_damage_min: 3,
            status_damage_max: 10,
            log_capacity: 4,
            turn_time_limit_secs: 30,
            ai_action_delay_ms: 1500,
            roll_initiative: false,
        }
    }
}

impl BattleRules {
    /// The reduced critical-hit variant of the rules.
    pub fn reduced_crits() -> Self {
        Self {
            crit_multiplier: 1.5,
            ..Self::default()
        }
    }

    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        let rules: BattleRules = ron::from_str(content)
            .map_err(|e| ConfigurationError::RulesParse(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ron_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason: &str| Err(ConfigurationError::InvalidRules(reason.to_string()));

        if self.uses_per_move == 0 {
            return invalid("uses_per_move must be at least 1");
        }
        if self.default_accuracy == 0 || self.default_accuracy > 100 {
            return invalid("default_accuracy must be within 1..=100");
        }
        if !(0.0..=1.0).contains(&self.base_crit_chance) || self.combo_crit_bonus < 0.0 {
            return invalid("crit chances must be non-negative probabilities");
        }
        if self.crit_multiplier < 1.0 || self.weather_boost < 1.0 {
            return invalid("multipliers must be at least 1.0");
        }
        if self.weather_change_chance > 100 || self.burn_chance > 100 || self.poison_chance > 100 {
            return invalid("percent chances must be within 0..=100");
        }
        if self.status_duration == 0 {
            return invalid("status_duration must be at least 1");
        }
        if self.status_damage_min > self.status_damage_max {
            return invalid("status_damage_min exceeds status_damage_max");
        }
        if self.log_capacity == 0 {
            return invalid("log_capacity must be at least 1");
        }
        Ok(())
    }

    pub fn turn_time_limit(&self) -> Duration {
        Duration::from_secs(self.turn_time_limit_secs)
    }

    pub fn ai_action_delay(&self) -> Duration {
        Duration::from_millis(self.ai_action_delay_ms)
    }
}
