use crate::battle::state::{BattleEvent, EventBus, MatchState, Side, StatusCondition};
use schema::Weather;

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Combatant modifications
    DealDamage {
        target: Side,
        amount: u16,
    },
    ConsumeMoveUse {
        target: Side,
        move_index: usize,
    },
    SetStatus {
        target: Side,
        status: Option<StatusCondition>,
    },

    // Match state changes
    SetComboStreak(u32),
    SetWeather(Option<Weather>),
    SetTurn(Side),
    SetWinner(Side),
    AppendLog(String),

    // Battle flow
    EmitEvent(BattleEvent),
}

/// Emit the event and append its formatted text, if any, to the match log.
pub fn announce(event: BattleEvent, state: &MatchState) -> Vec<BattleCommand> {
    let mut commands = Vec::with_capacity(2);
    if let Some(line) = event.format(state) {
        commands.push(BattleCommand::AppendLog(line));
    }
    commands.push(BattleCommand::EmitEvent(event));
    commands
}

/// Execute a batch of commands in order
pub fn execute_command_batch(commands: Vec<BattleCommand>, state: &mut MatchState, bus: &mut EventBus) {
    for command in commands {
        execute_command(command, state, bus);
    }
}

pub fn execute_command(command: BattleCommand, state: &mut MatchState, bus: &mut EventBus) {
    match command {
        BattleCommand::DealDamage { target, amount } => {
            state.combatant_mut(target).take_damage(amount);
        }
        BattleCommand::ConsumeMoveUse { target, move_index } => {
            state.combatant_mut(target).move_uses.consume(move_index);
        }
        BattleCommand::SetStatus { target, status } => {
            state.combatant_mut(target).status = status;
        }
        BattleCommand::SetComboStreak(streak) => {
            state.combo_streak = streak;
        }
        BattleCommand::SetWeather(weather) => {
            state.weather = weather;
        }
        BattleCommand::SetTurn(side) => {
            state.turn = side;
        }
        BattleCommand::SetWinner(side) => {
            // The first winner sticks; a decided match never changes hands.
            if state.winner.is_none() {
                state.winner = Some(side);
            }
        }
        BattleCommand::AppendLog(line) => {
            state.log.push(line);
        }
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
        }
    }
}
