use crate::battle::ai::{Behavior, RandomChoice, TacticalAI};
use crate::battle::calculators::AttackOutcome;
use crate::battle::commands::{announce, execute_command_batch};
use crate::battle::engine::{opening_side, pass_turn, reset_match, resolve_attack, roll_weather, tick_statuses};
use crate::battle::state::{BattleEvent, EventBus, MatchState, Side, TurnRng};
use crate::config::{BattleRules, GameMode, MatchConfig};
use crate::errors::{ActionError, BattleResult, ConfigurationError};
use crate::roster::Roster;
use schema::CreatureData;
use serde::Serialize;
use std::time::Duration;

/// High-level match management interface on top of the engine functions.
/// Owns the match, sequences turns and keeps the event history for renderers.
#[derive(Debug)]
pub struct BattleRunner {
    state: MatchState,
    rules: BattleRules,
    ai: Box<dyn Behavior>,
    /// Actions taken since statuses last ticked; a turn-cycle is two actions.
    actions_this_cycle: u8,
    accumulated_events: Vec<BattleEvent>,
}

/// Result of executing one action
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// `None` for actions that did not resolve an attack, such as a reset.
    pub outcome: Option<AttackOutcome>,
    pub events: Vec<BattleEvent>,
    pub next_turn: Side,
    pub battle_ended: bool,
    pub winner: Option<Side>,
    pub stalled: bool,
    pub next_action_delay: Duration,
}

impl BattleRunner {
    /// Build a match from selection-screen choices.
    pub fn new(config: &MatchConfig, roster: &Roster, rules: BattleRules) -> BattleResult<Self> {
        Self::new_with_rng(config, roster, rules, TurnRng::new_random())
    }

    pub fn new_with_rng(
        config: &MatchConfig,
        roster: &Roster,
        rules: BattleRules,
        mut rng: TurnRng,
    ) -> BattleResult<Self> {
        rules.validate()?;

        let player_key = config
            .player_creature
            .as_deref()
            .ok_or(ConfigurationError::MissingSelection(Side::Player))?;
        let player = roster.find(player_key)?.clone();

        let opponent = match (config.opponent_creature.as_deref(), config.mode) {
            (Some(key), _) => roster.find(key)?.clone(),
            (None, GameMode::VsComputer) => roster.random(&mut rng).clone(),
            (None, GameMode::TwoPlayer) => {
                return Err(ConfigurationError::MissingSelection(Side::Opponent).into())
            }
        };

        Ok(Self::from_creatures_with_rng(config.mode, player, opponent, rules, rng))
    }

    /// Build a match around two creatures that were already picked.
    pub fn from_creatures(mode: GameMode, player: CreatureData, opponent: CreatureData, rules: BattleRules) -> Self {
        Self::from_creatures_with_rng(mode, player, opponent, rules, TurnRng::new_random())
    }

    pub fn from_creatures_with_rng(
        mode: GameMode,
        player: CreatureData,
        opponent: CreatureData,
        rules: BattleRules,
        mut rng: TurnRng,
    ) -> Self {
        let mut state = MatchState::new(mode, player, opponent, &rules);
        if rules.roll_initiative {
            state.turn = opening_side(&state, &mut rng);
        }

        tracing::info!(
            "{} match: {} ({}) vs {} ({}), {} opens",
            mode,
            state.combatant(Side::Player).creature.name,
            state.label(Side::Player),
            state.combatant(Side::Opponent).creature.name,
            state.label(Side::Opponent),
            state.label(state.turn)
        );

        let accumulated_events = vec![BattleEvent::TurnStarted { side: state.turn }];
        Self {
            state,
            rules,
            ai: Box::new(TacticalAI::new()),
            actions_this_cycle: 0,
            accumulated_events,
        }
    }

    /// Pick up a match from a snapshot, starting a fresh turn-cycle.
    pub fn resume(state: MatchState, rules: BattleRules) -> Self {
        let accumulated_events = vec![BattleEvent::TurnStarted { side: state.turn }];
        Self {
            state,
            rules,
            ai: Box::new(TacticalAI::new()),
            actions_this_cycle: 0,
            accumulated_events,
        }
    }

    /// Replace the policy that drives computer-controlled sides.
    pub fn with_behavior(mut self, ai: Box<dyn Behavior>) -> Self {
        self.ai = ai;
        self
    }

    /// Read-only view of the match for rendering.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    pub fn is_battle_ended(&self) -> bool {
        self.state.is_over()
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner
    }

    pub fn is_stalled(&self) -> bool {
        self.state.is_stalled()
    }

    pub fn whose_turn(&self) -> Side {
        self.state.turn
    }

    /// True when the match waits on keyboard input rather than the computer.
    pub fn is_awaiting_human(&self) -> bool {
        !self.state.is_over()
            && !self.state.is_stalled()
            && !self.state.mode.is_computer_controlled(self.state.turn)
    }

    /// Nominal pause before the next party acts. Only a hint; nothing here sleeps.
    pub fn next_action_delay(&self) -> Duration {
        if self.state.is_over() || self.state.is_stalled() {
            return Duration::ZERO;
        }
        if self.state.mode.is_computer_controlled(self.state.turn) {
            self.rules.ai_action_delay()
        } else {
            Duration::ZERO
        }
    }

    /// Submit a move for a human-controlled side.
    pub fn submit_move(&mut self, side: Side, move_index: usize) -> BattleResult<ExecutionResult> {
        self.submit_move_with_rng(side, move_index, TurnRng::new_random())
    }

    pub fn submit_move_with_rng(
        &mut self,
        side: Side,
        move_index: usize,
        mut rng: TurnRng,
    ) -> BattleResult<ExecutionResult> {
        if self.state.mode.is_computer_controlled(side) {
            return Err(ActionError::NotHumanControlled(side).into());
        }
        self.execute_attack(side, move_index, &mut rng)
    }

    /// Let the computer take its turn.
    pub fn run_ai_turn(&mut self) -> BattleResult<ExecutionResult> {
        self.run_ai_turn_with_rng(TurnRng::new_random())
    }

    pub fn run_ai_turn_with_rng(&mut self, mut rng: TurnRng) -> BattleResult<ExecutionResult> {
        let side = self.ensure_actionable()?;
        if !self.state.mode.is_computer_controlled(side) {
            return Err(ActionError::NotComputerControlled(side).into());
        }

        let move_index = self.ai.choose_move(
            self.state.combatant(side),
            self.state.combatant(side.opponent()),
            &mut rng,
        );
        self.execute_attack(side, move_index, &mut rng)
    }

    /// Act on behalf of a human whose turn timer ran out: a random usable move.
    pub fn handle_turn_timeout(&mut self) -> BattleResult<ExecutionResult> {
        self.handle_turn_timeout_with_rng(TurnRng::new_random())
    }

    pub fn handle_turn_timeout_with_rng(&mut self, mut rng: TurnRng) -> BattleResult<ExecutionResult> {
        let side = self.ensure_actionable()?;
        if self.state.mode.is_computer_controlled(side) {
            return Err(ActionError::NotHumanControlled(side).into());
        }

        let move_index = RandomChoice.choose_move(
            self.state.combatant(side),
            self.state.combatant(side.opponent()),
            &mut rng,
        );
        tracing::info!("{} ran out of time", self.state.label(side));
        self.execute_attack(side, move_index, &mut rng)
    }

    /// Start over with the same creatures.
    pub fn reset(&mut self) -> ExecutionResult {
        self.reset_with_rng(TurnRng::new_random())
    }

    pub fn reset_with_rng(&mut self, mut rng: TurnRng) -> ExecutionResult {
        reset_match(&mut self.state, &self.rules, &mut rng);
        self.actions_this_cycle = 0;

        let mut bus = EventBus::new();
        bus.push(BattleEvent::MatchReset);
        bus.push(BattleEvent::TurnStarted { side: self.state.turn });
        tracing::info!("Match reset, {} opens", self.state.label(self.state.turn));

        self.finish(None, bus)
    }

    /// Get all events that have occurred in the match so far
    pub fn get_all_events(&self) -> &[BattleEvent] {
        &self.accumulated_events
    }

    /// Get events since a certain index (for incremental updates)
    pub fn get_events_since(&self, index: usize) -> &[BattleEvent] {
        self.accumulated_events.get(index..).unwrap_or(&[])
    }

    // --- Private Helper Functions ---

    fn ensure_actionable(&self) -> Result<Side, ActionError> {
        if self.state.is_over() {
            return Err(ActionError::MatchOver);
        }
        if self.state.is_stalled() {
            return Err(ActionError::MatchStalled);
        }
        Ok(self.state.turn)
    }

    fn execute_attack(
        &mut self,
        side: Side,
        move_index: usize,
        rng: &mut TurnRng,
    ) -> BattleResult<ExecutionResult> {
        let mut bus = EventBus::new();
        let outcome = resolve_attack(&mut self.state, side, move_index, &self.rules, rng, &mut bus)?;

        self.end_action(rng, &mut bus);
        self.settle_exhausted_sides(rng, &mut bus);

        Ok(self.finish(Some(outcome), bus))
    }

    /// Weather churn and the turn-cycle clock, run after every attack or pass.
    fn end_action(&mut self, rng: &mut TurnRng, bus: &mut EventBus) {
        if self.state.is_over() {
            return;
        }

        roll_weather(&mut self.state, &self.rules, rng, bus);

        self.actions_this_cycle += 1;
        if self.actions_this_cycle >= 2 {
            self.actions_this_cycle = 0;
            tick_statuses(&mut self.state, &self.rules, rng, bus);
        }
    }

    /// Pass for a side that has nothing left to use, and flag the stall when
    /// neither side does.
    fn settle_exhausted_sides(&mut self, rng: &mut TurnRng, bus: &mut EventBus) {
        loop {
            if self.state.is_over() {
                return;
            }
            if self.state.is_stalled() {
                let commands = announce(BattleEvent::MatchStalled, &self.state);
                execute_command_batch(commands, &mut self.state, bus);
                tracing::info!("Match stalled with no winner");
                return;
            }

            let side = self.state.turn;
            if self.state.combatant(side).has_usable_move() {
                return;
            }
            if let Err(e) = pass_turn(&mut self.state, side, bus) {
                tracing::warn!("Could not pass for {}: {}", side, e);
                return;
            }
            self.end_action(rng, bus);
        }
    }

    fn finish(&mut self, outcome: Option<AttackOutcome>, bus: EventBus) -> ExecutionResult {
        let events = bus.into_events();
        self.accumulated_events.extend(events.iter().cloned());

        ExecutionResult {
            outcome,
            events,
            next_turn: self.state.turn,
            battle_ended: self.state.is_over(),
            winner: self.state.winner,
            stalled: self.state.is_stalled(),
            next_action_delay: self.next_action_delay(),
        }
    }
}
