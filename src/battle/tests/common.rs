use crate::battle::runner::BattleRunner;
use crate::battle::state::{CombatantState, MatchState, MoveUses, Side, StatusCondition, TurnRng};
use crate::config::{BattleRules, GameMode};
use crate::roster::builtin_roster;
use schema::{BaseStats, CreatureData, ElementType, ImageRefs, MoveData, StatusKind, Weather};

/// Looks up a creature from the built-in roster, panicking on a typo in a test.
pub fn creature(id: &str) -> CreatureData {
    let roster = match builtin_roster() {
        Ok(roster) => roster,
        Err(err) => panic!("Failed to load the built-in roster: {}", err),
    };
    match roster.find(id) {
        Ok(creature) => creature.clone(),
        Err(err) => panic!("Failed to find {}: {}", id, err),
    }
}

/// A creature outside the shipped roster, for moves the roster does not carry.
pub fn custom_creature(id: &str, types: Vec<ElementType>, moves: Vec<MoveData>) -> CreatureData {
    CreatureData {
        id: id.to_string(),
        name: format!("{}{}", id[..1].to_uppercase(), &id[1..]),
        types,
        stats: BaseStats {
            power: 50,
            skills: 50,
            intelligence: 50,
            physical: 50,
            magic: 50,
            speed: None,
        },
        moves,
        description: String::new(),
        images: ImageRefs {
            selection: String::new(),
            player1: String::new(),
            player2: String::new(),
        },
    }
}

/// A fresh vs-computer match under the default rules.
pub fn create_test_match(player_id: &str, opponent_id: &str) -> MatchState {
    MatchState::new(
        GameMode::VsComputer,
        creature(player_id),
        creature(opponent_id),
        &BattleRules::default(),
    )
}

/// A runner whose opening turn belongs to the player.
pub fn create_test_runner(mode: GameMode, player_id: &str, opponent_id: &str) -> BattleRunner {
    BattleRunner::from_creatures_with_rng(
        mode,
        creature(player_id),
        creature(opponent_id),
        BattleRules::default(),
        TurnRng::new_for_test(vec![]),
    )
}

/// Rolls that hit, never crit, never inflict a status and never change the weather.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// A builder for tweaking one combatant of a test match.
///
/// # Example
/// ```ignore
/// let state = TestMatchBuilder::new("charmander", "bulbasaur")
///     .with_hp(Side::Opponent, 12)
///     .with_status(Side::Player, StatusKind::Poisoned, 2)
///     .build();
/// ```
pub struct TestMatchBuilder {
    state: MatchState,
}

impl TestMatchBuilder {
    pub fn new(player_id: &str, opponent_id: &str) -> Self {
        Self {
            state: create_test_match(player_id, opponent_id),
        }
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.state.mode = mode;
        self
    }

    pub fn with_hp(mut self, side: Side, hp: u16) -> Self {
        self.state.combatant_mut(side).set_hp(hp);
        self
    }

    pub fn with_status(mut self, side: Side, kind: StatusKind, turns_remaining: u8) -> Self {
        self.state.combatant_mut(side).status = Some(StatusCondition { kind, turns_remaining });
        self
    }

    /// Sets the remaining uses of every move slot at once.
    pub fn with_uses(mut self, side: Side, uses: u8) -> Self {
        let combatant: &mut CombatantState = self.state.combatant_mut(side);
        combatant.move_uses = MoveUses::new(combatant.creature.moves.len(), uses);
        self
    }

    /// Drains a single move slot.
    pub fn with_exhausted_move(mut self, side: Side, move_index: usize) -> Self {
        let uses = &mut self.state.combatant_mut(side).move_uses;
        while uses.is_available(move_index) {
            uses.consume(move_index);
        }
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.state.weather = Some(weather);
        self
    }

    pub fn with_combo(mut self, streak: u32) -> Self {
        self.state.combo_streak = streak;
        self
    }

    pub fn with_turn(mut self, side: Side) -> Self {
        self.state.turn = side;
        self
    }

    pub fn build(self) -> MatchState {
        self.state
    }
}

/// Wraps a prepared match in a runner under the default rules.
pub fn resume_runner(state: MatchState) -> BattleRunner {
    BattleRunner::resume(state, BattleRules::default())
}
