use crate::config::{BattleRules, GameMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{CreatureData, StatusKind, Weather};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Health every combatant starts with; HP never leaves `0..=MAX_HP`.
pub const MAX_HP: u16 = 100;

/// One side of the match. Provides type safety over raw indices.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCondition {
    pub kind: StatusKind,
    pub turns_remaining: u8,
}

/// Remaining uses for each move slot of one combatant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MoveUses {
    remaining: Vec<u8>,
}

impl MoveUses {
    pub fn new(move_count: usize, uses_per_move: u8) -> Self {
        Self {
            remaining: vec![uses_per_move; move_count],
        }
    }

    pub fn remaining(&self, move_index: usize) -> Option<u8> {
        self.remaining.get(move_index).copied()
    }

    pub fn is_available(&self, move_index: usize) -> bool {
        self.remaining(move_index).is_some_and(|uses| uses > 0)
    }

    /// Indices of every move that can still be selected.
    pub fn available_indices(&self) -> Vec<usize> {
        self.remaining
            .iter()
            .enumerate()
            .filter(|(_, uses)| **uses > 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn consume(&mut self, move_index: usize) {
        if let Some(uses) = self.remaining.get_mut(move_index) {
            *uses = uses.saturating_sub(1);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.remaining
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CombatantState {
    pub creature: CreatureData,
    hp: u16,
    pub status: Option<StatusCondition>,
    pub move_uses: MoveUses,
}

impl CombatantState {
    pub fn new(creature: CreatureData, uses_per_move: u8) -> Self {
        let move_uses = MoveUses::new(creature.moves.len(), uses_per_move);
        Self {
            creature,
            hp: MAX_HP,
            status: None,
            move_uses,
        }
    }

    pub fn hp(&self) -> u16 {
        self.hp
    }

    pub fn set_hp(&mut self, hp: u16) {
        self.hp = hp.min(MAX_HP);
    }

    /// Applies damage, flooring at 0, and returns the new HP.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn available_moves(&self) -> Vec<usize> {
        self.move_uses.available_indices()
    }

    pub fn has_usable_move(&self) -> bool {
        !self.move_uses.available_indices().is_empty()
    }
}

/// Most-recent-first list of log lines that evicts the oldest past capacity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl BattleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: String) {
        self.entries.push_front(line);
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchState {
    pub mode: GameMode,
    pub combatants: [CombatantState; 2],
    pub turn: Side,
    pub combo_streak: u32,
    pub weather: Option<Weather>,
    pub winner: Option<Side>,
    pub log: BattleLog,
}

impl MatchState {
    pub fn new(
        mode: GameMode,
        player: CreatureData,
        opponent: CreatureData,
        rules: &BattleRules,
    ) -> Self {
        Self {
            mode,
            combatants: [
                CombatantState::new(player, rules.uses_per_move),
                CombatantState::new(opponent, rules.uses_per_move),
            ],
            turn: Side::Player,
            combo_streak: 0,
            weather: None,
            winner: None,
            log: BattleLog::new(rules.log_capacity),
        }
    }

    pub fn combatant(&self, side: Side) -> &CombatantState {
        &self.combatants[side.to_index()]
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut CombatantState {
        &mut self.combatants[side.to_index()]
    }

    pub fn label(&self, side: Side) -> &'static str {
        self.mode.side_label(side)
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// No winner, and neither side can select a move any more.
    pub fn is_stalled(&self) -> bool {
        self.winner.is_none() && self.combatants.iter().all(|c| !c.has_usable_move())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        side: Side,
    },
    TurnPassed {
        side: Side,
    },

    // Attacks
    MoveUsed {
        side: Side,
        move_name: String,
    },
    MoveMissed {
        side: Side,
        move_name: String,
    },
    CriticalHit {
        side: Side,
        combo_streak: u32,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    WeatherBoost {
        weather: Weather,
    },
    DamageDealt {
        target: Side,
        damage: u16,
        remaining_hp: u16,
    },

    // Status Effects
    StatusApplied {
        target: Side,
        status: StatusKind,
    },
    StatusDamage {
        target: Side,
        status: StatusKind,
        damage: u16,
        remaining_hp: u16,
    },
    StatusExpired {
        target: Side,
        status: StatusKind,
    },

    // Field
    WeatherChanged {
        weather: Option<Weather>,
    },

    // Match End
    CreatureFainted {
        side: Side,
    },
    BattleEnded {
        winner: Side,
    },
    MatchStalled,
    MatchReset,
}

impl BattleEvent {
    /// Formats the event into a human-readable string using match context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, state: &MatchState) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { .. } => None,
            BattleEvent::TurnPassed { side } => Some(format!(
                "{} has no moves left and passes the turn.",
                state.label(*side)
            )),

            BattleEvent::MoveUsed { side, move_name } => {
                Some(format!("{} used {}!", state.label(*side), move_name))
            }
            BattleEvent::MoveMissed { side, move_name } => Some(format!(
                "{} tried {} but missed!",
                state.label(*side),
                move_name
            )),
            BattleEvent::CriticalHit { combo_streak, .. } => match combo_streak {
                0 | 1 => Some("A critical hit!".to_string()),
                n => Some(format!("A critical hit! ({}x combo)", n)),
            },
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                _ => None,
            },
            BattleEvent::WeatherBoost { weather } => {
                Some(format!("The attack was powered up by {}!", weather))
            }
            BattleEvent::DamageDealt { target, damage, .. } => Some(format!(
                "{} took {} damage!",
                Self::creature_name(state, *target),
                damage
            )),

            BattleEvent::StatusApplied { target, status } => Some(format!(
                "{} {}",
                Self::creature_name(state, *target),
                Self::format_status_applied(*status)
            )),
            BattleEvent::StatusDamage { target, status, damage, .. } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                Self::creature_name(state, *target),
                status,
                damage
            )),
            BattleEvent::StatusExpired { target, status } => Some(format!(
                "{}'s {} wore off.",
                Self::creature_name(state, *target),
                status
            )),

            BattleEvent::WeatherChanged { weather } => match weather {
                Some(weather) => Some(format!("The weather changed to {}!", weather)),
                None => Some("The weather cleared up.".to_string()),
            },

            BattleEvent::CreatureFainted { side } => {
                Some(format!("{} fainted!", Self::creature_name(state, *side)))
            }
            BattleEvent::BattleEnded { winner } => {
                Some(format!("{} Wins!", state.label(*winner)))
            }
            BattleEvent::MatchStalled => {
                Some("Neither side has any moves left. The match is stalled.".to_string())
            }
            BattleEvent::MatchReset => None,
        }
    }

    // --- Private Helper Functions ---

    fn creature_name(state: &MatchState, side: Side) -> &str {
        &state.combatant(side).creature.name
    }

    fn format_status_applied(status: StatusKind) -> &'static str {
        match status {
            StatusKind::Burned => "was burned!",
            StatusKind::Poisoned => "was poisoned!",
        }
    }
}

/// Event bus for collecting the events of a single engine operation.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Source of random draws for one engine operation.
///
/// Every roll is a value in `1..=100`. Tests script the exact sequence of
/// rolls; play draws from a live generator, which also picks indices and
/// ranges directly so every value is equally likely.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u8>,
    index: usize,
    live: Option<StdRng>,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self { outcomes, index: 0, live: None }
    }

    pub fn new_random() -> Self {
        Self::from_generator(StdRng::from_rng(&mut rand::rng()))
    }

    /// Live generator with a fixed seed, for reproducible runs.
    pub fn new_seeded(seed: u64) -> Self {
        Self::from_generator(StdRng::seed_from_u64(seed))
    }

    fn from_generator(rng: StdRng) -> Self {
        Self { outcomes: Vec::new(), index: 0, live: Some(rng) }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = if let Some(rng) = self.live.as_mut() {
            rng.random_range(1..=100)
        } else {
            match self.outcomes.get(self.index) {
                Some(&outcome) => outcome.clamp(1, 100),
                None => {
                    tracing::warn!(
                        "TurnRng exhausted after {} values while rolling for '{}'; drawing a fresh value",
                        self.outcomes.len(),
                        reason
                    );
                    rand::rng().random_range(1..=100)
                }
            }
        };
        tracing::trace!("[RNG] Consumed {} for: {}", outcome, reason);
        self.index += 1;
        outcome
    }

    /// Index in `0..len`. A live generator picks it uniformly; a scripted roll
    /// is scaled from `1..=100` onto the indices.
    pub fn next_index(&mut self, len: usize, reason: &str) -> usize {
        let len = len.max(1);
        if let Some(rng) = self.live.as_mut() {
            let index = rng.random_range(0..len);
            tracing::trace!("[RNG] Picked index {} of {} for: {}", index, len, reason);
            self.index += 1;
            return index;
        }
        let outcome = self.next_outcome(reason) as usize;
        ((outcome - 1) * len / 100).min(len - 1)
    }

    /// Value in `min..=max`, drawn like [`TurnRng::next_index`].
    pub fn next_in_range(&mut self, min: u16, max: u16, reason: &str) -> u16 {
        let span = max.saturating_sub(min) as usize + 1;
        min + self.next_index(span, reason) as u16
    }

    /// True with the given percent chance.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        self.next_outcome(reason) <= percent
    }

    pub fn consumed(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::builtin_roster;
    use pretty_assertions::assert_eq;

    fn create_test_match_state() -> MatchState {
        let roster = builtin_roster().unwrap();
        MatchState::new(
            GameMode::VsComputer,
            roster.find("pikachu").unwrap().clone(),
            roster.find("charmander").unwrap().clone(),
            &BattleRules::default(),
        )
    }

    #[test]
    fn test_new_match_state() {
        let state = create_test_match_state();

        assert_eq!(state.turn, Side::Player);
        assert_eq!(state.combo_streak, 0);
        assert_eq!(state.winner, None);
        assert!(state.log.is_empty());
        for combatant in &state.combatants {
            assert_eq!(combatant.hp(), MAX_HP);
            assert_eq!(combatant.move_uses.as_slice(), &[3, 3, 3, 3, 3]);
        }
    }

    #[test]
    fn test_hp_is_clamped() {
        let mut state = create_test_match_state();
        let combatant = state.combatant_mut(Side::Opponent);

        combatant.set_hp(250);
        assert_eq!(combatant.hp(), MAX_HP);
        assert_eq!(combatant.take_damage(130), 0);
        assert!(combatant.is_fainted());
    }

    #[test]
    fn test_log_evicts_oldest() {
        let mut log = BattleLog::new(4);
        for i in 1..=6 {
            log.push(format!("line {}", i));
        }

        assert_eq!(log.len(), 4);
        assert_eq!(log.latest(), Some("line 6"));
        assert_eq!(
            log.entries().collect::<Vec<_>>(),
            vec!["line 6", "line 5", "line 4", "line 3"]
        );
    }

    #[test]
    fn test_move_uses_exhaustion() {
        let mut uses = MoveUses::new(2, 1);
        uses.consume(0);

        assert!(!uses.is_available(0));
        assert!(uses.is_available(1));
        assert!(!uses.is_available(7));
        assert_eq!(uses.available_indices(), vec![1]);

        uses.consume(0);
        assert_eq!(uses.remaining(0), Some(0));
    }

    #[test]
    fn test_stalled_only_without_winner() {
        let mut state = create_test_match_state();
        for combatant in state.combatants.iter_mut() {
            combatant.move_uses = MoveUses::new(5, 0);
        }
        assert!(state.is_stalled());

        state.winner = Some(Side::Player);
        assert!(!state.is_stalled());
    }

    #[test]
    fn test_event_text_samples() {
        let state = create_test_match_state();

        let miss = BattleEvent::MoveMissed {
            side: Side::Opponent,
            move_name: "flame burst".to_string(),
        };
        assert_eq!(
            miss.format(&state),
            Some("Computer tried flame burst but missed!".to_string())
        );

        let status = BattleEvent::StatusDamage {
            target: Side::Player,
            status: StatusKind::Burned,
            damage: 4,
            remaining_hp: 60,
        };
        assert_eq!(
            status.format(&state),
            Some("Pikachu is hurt by its burn! (4 damage)".to_string())
        );

        let ended = BattleEvent::BattleEnded { winner: Side::Player };
        assert_eq!(ended.format(&state), Some("Player Wins!".to_string()));

        assert!(BattleEvent::AttackTypeEffectiveness { multiplier: 1.0 }
            .format(&state)
            .is_none());
        assert!(BattleEvent::TurnStarted { side: Side::Player }.format(&state).is_none());
    }

    #[test]
    fn test_turn_rng_ranges() {
        let mut rng = TurnRng::new_for_test(vec![1, 100, 1, 100, 50, 51]);

        assert_eq!(rng.next_in_range(3, 10, "low"), 3);
        assert_eq!(rng.next_in_range(3, 10, "high"), 10);
        assert_eq!(rng.next_index(4, "first"), 0);
        assert_eq!(rng.next_index(4, "last"), 3);
        assert!(rng.chance(50, "at threshold"));
        assert!(!rng.chance(50, "above threshold"));
        assert_eq!(rng.consumed(), 6);
    }

    #[test]
    fn test_turn_rng_exhaustion_does_not_panic() {
        let mut rng = TurnRng::new_for_test(vec![]);
        let outcome = rng.next_outcome("exhausted");
        assert!((1..=100).contains(&outcome));
    }

    #[test]
    fn test_live_rng_reaches_every_index() {
        let mut rng = TurnRng::new_seeded(7);
        let mut seen = vec![false; 150];

        for _ in 0..20_000 {
            seen[rng.next_index(150, "coverage")] = true;
        }

        assert_eq!(seen.iter().filter(|&&hit| hit).count(), 150);
        assert_eq!(rng.consumed(), 20_000);
    }

    #[test]
    fn test_live_rng_ranges_are_even() {
        let mut rng = TurnRng::new_seeded(11);
        let mut counts = [0u32; 15];

        for _ in 0..30_000 {
            let value = rng.next_in_range(5, 19, "fallback damage");
            assert!((5..=19).contains(&value));
            counts[(value - 5) as usize] += 1;
        }

        // 2000 expected per value
        for count in counts {
            assert!((1700..=2300).contains(&count), "count {} out of band", count);
        }
    }
}
