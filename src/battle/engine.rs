use crate::battle::calculators::{calculate_attack_outcome, AttackOutcome};
use crate::battle::commands::{announce, execute_command_batch, BattleCommand};
use crate::battle::state::{
    BattleEvent, CombatantState, EventBus, MatchState, Side, TurnRng,
};
use crate::battle::stats::{determine_first_actor, status_tick_damage};
use crate::config::BattleRules;
use crate::errors::{ActionError, BattleResult};
use schema::{StatusKind, Weather};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Result of one status tick on a single combatant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTick {
    pub status: StatusKind,
    pub damage_applied: u16,
    pub remaining_hp: u16,
    pub expired: bool,
}

/// Checks every precondition of an attack without touching the state.
pub fn validate_attack(state: &MatchState, attacker: Side, move_index: usize) -> Result<(), ActionError> {
    if state.is_over() {
        return Err(ActionError::MatchOver);
    }
    if state.is_stalled() {
        return Err(ActionError::MatchStalled);
    }
    if state.turn != attacker {
        return Err(ActionError::NotYourTurn(attacker));
    }

    let combatant = state.combatant(attacker);
    if move_index >= combatant.creature.moves.len() {
        return Err(ActionError::InvalidMoveIndex(move_index));
    }
    if !combatant.move_uses.is_available(move_index) {
        return Err(ActionError::MoveExhausted(move_index));
    }

    Ok(())
}

/// Resolves one attack and applies it to the match.
///
/// Rejected actions return `InvalidAction` and leave the state untouched. On
/// success the move use is consumed (hit or miss), the log gains one line, and
/// the turn passes to the defender unless the attack decided the match.
pub fn resolve_attack(
    state: &mut MatchState,
    attacker: Side,
    move_index: usize,
    rules: &BattleRules,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<AttackOutcome> {
    validate_attack(state, attacker, move_index)?;

    let plan = calculate_attack_outcome(state, attacker, move_index, rules, rng);
    execute_command_batch(plan.commands, state, bus);

    if plan.outcome.match_ended {
        tracing::info!("{} won the match", state.label(attacker));
    }

    Ok(plan.outcome)
}

/// Advances the status of one combatant by a single turn.
///
/// Deals `status_damage_min..=status_damage_max` damage, decrements the
/// remaining turns and clears the status once it reaches zero. Returns `None`
/// when the combatant carries no status.
pub fn tick_status(combatant: &mut CombatantState, rules: &BattleRules, rng: &mut TurnRng) -> Option<StatusTick> {
    let mut status = combatant.status?;

    let damage = status_tick_damage(rules, rng);
    let remaining_hp = combatant.take_damage(damage);

    status.turns_remaining = status.turns_remaining.saturating_sub(1);
    let expired = status.turns_remaining == 0;
    combatant.status = if expired { None } else { Some(status) };

    Some(StatusTick {
        status: status.kind,
        damage_applied: damage,
        remaining_hp,
        expired,
    })
}

/// Ticks both sides' statuses at the end of a turn-cycle, player first.
///
/// A tick that knocks out its bearer hands the win to the other side, and no
/// further ticks run after that.
pub fn tick_statuses(
    state: &mut MatchState,
    rules: &BattleRules,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> Vec<(Side, StatusTick)> {
    let mut ticks = Vec::new();

    for side in [Side::Player, Side::Opponent] {
        if state.is_over() {
            break;
        }
        let Some(tick) = tick_status(state.combatant_mut(side), rules, rng) else {
            continue;
        };

        let name = state.combatant(side).creature.name.clone();
        let damage = BattleEvent::StatusDamage {
            target: side,
            status: tick.status,
            damage: tick.damage_applied,
            remaining_hp: tick.remaining_hp,
        };
        let mut commands = announce(damage, state);
        if tick.expired {
            commands.push(BattleCommand::EmitEvent(BattleEvent::StatusExpired {
                target: side,
                status: tick.status,
            }));
        }
        if tick.remaining_hp == 0 {
            let winner = side.opponent();
            commands.push(BattleCommand::SetWinner(winner));
            commands.push(BattleCommand::EmitEvent(BattleEvent::CreatureFainted { side }));
            commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner }));
            tracing::info!("{} fainted from its {}", name, tick.status);
        }
        execute_command_batch(commands, state, bus);

        ticks.push((side, tick));
    }

    ticks
}

/// With `weather_change_chance` percent, rerolls the weather uniformly among
/// rain, sun, sandstorm and clear skies. Returns the new weather if it changed.
pub fn roll_weather(
    state: &mut MatchState,
    rules: &BattleRules,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> Option<Option<Weather>> {
    if !rng.chance(rules.weather_change_chance, "weather change") {
        return None;
    }

    let options: Vec<Option<Weather>> = Weather::iter().map(Some).chain([None]).collect();
    let new_weather = options[rng.next_index(options.len(), "weather kind")];
    if new_weather == state.weather {
        return None;
    }

    let mut commands = vec![BattleCommand::SetWeather(new_weather)];
    commands.extend(announce(BattleEvent::WeatherChanged { weather: new_weather }, state));
    execute_command_batch(commands, state, bus);
    tracing::debug!("Weather is now {:?}", new_weather);

    Some(new_weather)
}

/// Forfeits the turn of a side that has no usable move left.
pub fn pass_turn(state: &mut MatchState, side: Side, bus: &mut EventBus) -> Result<(), ActionError> {
    if state.is_over() {
        return Err(ActionError::MatchOver);
    }
    if state.turn != side {
        return Err(ActionError::NotYourTurn(side));
    }
    if state.combatant(side).has_usable_move() {
        return Err(ActionError::MovesStillAvailable(side));
    }

    let mut commands = announce(BattleEvent::TurnPassed { side }, state);
    commands.push(BattleCommand::SetTurn(side.opponent()));
    commands.push(BattleCommand::EmitEvent(BattleEvent::TurnStarted { side: side.opponent() }));
    execute_command_batch(commands, state, bus);

    Ok(())
}

/// Rebuilds the match around the same two creatures: full HP, fresh move uses,
/// no status, no weather, empty log and combo. The player opens unless the
/// rules ask for rolled initiative.
pub fn reset_match(state: &mut MatchState, rules: &BattleRules, rng: &mut TurnRng) {
    let [player, opponent] = &state.combatants;
    let mut fresh = MatchState::new(
        state.mode,
        player.creature.clone(),
        opponent.creature.clone(),
        rules,
    );
    if rules.roll_initiative {
        fresh.turn = opening_side(&fresh, rng);
    }
    *state = fresh;
}

/// Side that opens a match when initiative is rolled.
pub fn opening_side(state: &MatchState, rng: &mut TurnRng) -> Side {
    determine_first_actor(
        &state.combatant(Side::Player).creature.stats,
        &state.combatant(Side::Opponent).creature.stats,
        rng,
    )
}
