use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, MatchState, Side, StatusCondition, TurnRng};
use crate::battle::stats::{
    base_damage, final_damage, is_critical_hit, move_hits, status_inflicted, type_effectiveness,
    weather_multiplier,
};
use crate::config::BattleRules;
use schema::StatusKind;
use serde::{Deserialize, Serialize};

/// What the rendering layer needs to know about one resolved attack.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub attacker: Side,
    pub move_index: usize,
    pub move_name: String,
    pub hit: bool,
    pub damage: u16,
    pub is_critical: bool,
    pub effectiveness_multiplier: f64,
    pub weather_multiplier: f64,
    pub status_inflicted: Option<StatusKind>,
    pub log_text: String,
    pub defender_new_hp: u16,
    pub match_ended: bool,
}

/// The outcome of an attack together with the commands that apply it.
#[derive(Debug, Clone)]
pub struct AttackPlan {
    pub outcome: AttackOutcome,
    pub commands: Vec<BattleCommand>,
}

/// Calculate the outcome of an attack attempt without touching the state.
///
/// The caller has already validated the action. Rolls are consumed in a fixed
/// order: accuracy, then (on a hit) critical hit, fallback damage when the move
/// declares none, and the status roll when the move can inflict one.
pub fn calculate_attack_outcome(
    state: &MatchState,
    attacker: Side,
    move_index: usize,
    rules: &BattleRules,
    rng: &mut TurnRng,
) -> AttackPlan {
    let defender = attacker.opponent();
    let attacker_label = state.label(attacker);
    let defender_state = state.combatant(defender);
    let move_data = &state.combatant(attacker).creature.moves[move_index];

    let mut commands = vec![BattleCommand::ConsumeMoveUse {
        target: attacker,
        move_index,
    }];

    if !move_hits(move_data, rules, rng) {
        let log_text = format!("{} tried {} but missed!", attacker_label, move_data.name);
        tracing::debug!("{} missed with {}", attacker_label, move_data.name);

        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed {
            side: attacker,
            move_name: move_data.name.clone(),
        }));
        commands.push(BattleCommand::AppendLog(log_text.clone()));
        commands.push(BattleCommand::SetTurn(defender));
        commands.push(BattleCommand::EmitEvent(BattleEvent::TurnStarted { side: defender }));

        return AttackPlan {
            outcome: AttackOutcome {
                attacker,
                move_index,
                move_name: move_data.name.clone(),
                hit: false,
                damage: 0,
                is_critical: false,
                effectiveness_multiplier: 1.0,
                weather_multiplier: 1.0,
                status_inflicted: None,
                log_text,
                defender_new_hp: defender_state.hp(),
                match_ended: false,
            },
            commands,
        };
    }

    commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        side: attacker,
        move_name: move_data.name.clone(),
    }));

    // --- Critical hit and combo streak ---
    let is_critical = is_critical_hit(state.combo_streak, rules, rng);
    let new_streak = if is_critical { state.combo_streak + 1 } else { 0 };
    commands.push(BattleCommand::SetComboStreak(new_streak));
    if is_critical {
        commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit {
            side: attacker,
            combo_streak: new_streak,
        }));
    }

    // --- Damage ---
    let base = base_damage(move_data, rng);
    let effectiveness = type_effectiveness(move_data.move_type, &defender_state.creature.types);
    let weather = weather_multiplier(state.weather, move_data.move_type, rules);
    let crit = if is_critical { rules.crit_multiplier } else { 1.0 };
    let damage = final_damage(base, effectiveness, weather, crit);
    let defender_new_hp = defender_state.hp().saturating_sub(damage);
    let match_ended = defender_new_hp == 0;

    tracing::debug!(
        base,
        effectiveness,
        weather,
        crit,
        damage,
        "{} hit with {}",
        attacker_label,
        move_data.name
    );

    if effectiveness != 1.0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::AttackTypeEffectiveness {
            multiplier: effectiveness,
        }));
    }
    if let Some(active_weather) = state.weather.filter(|_| weather > 1.0) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::WeatherBoost {
            weather: active_weather,
        }));
    }
    commands.push(BattleCommand::DealDamage {
        target: defender,
        amount: damage,
    });
    commands.push(BattleCommand::EmitEvent(BattleEvent::DamageDealt {
        target: defender,
        damage,
        remaining_hp: defender_new_hp,
    }));

    // --- Status infliction ---
    // A fainted defender has nothing left to afflict, so no roll is spent.
    let status = match move_data.status_trigger() {
        Some(kind) if !match_ended && status_inflicted(kind, rules, rng) => Some(kind),
        _ => None,
    };
    if let Some(kind) = status {
        commands.push(BattleCommand::SetStatus {
            target: defender,
            status: Some(StatusCondition {
                kind,
                turns_remaining: rules.status_duration,
            }),
        });
        commands.push(BattleCommand::EmitEvent(BattleEvent::StatusApplied {
            target: defender,
            status: kind,
        }));
    }

    // --- Log line ---
    let mut log_text = format!("{} used {}! ", attacker_label, move_data.name);
    if is_critical {
        log_text.push_str("Critical hit! ");
    }
    if effectiveness > 1.0 {
        log_text.push_str("It's super effective! ");
    }
    log_text.push_str(&format!("Dealt {} damage.", damage));
    if let Some(kind) = status {
        let verb = match kind {
            StatusKind::Burned => "was burned!",
            StatusKind::Poisoned => "was poisoned!",
        };
        log_text.push_str(&format!(" {} {}", defender_state.creature.name, verb));
    }
    commands.push(BattleCommand::AppendLog(log_text.clone()));

    // --- Turn transition or match end ---
    if match_ended {
        commands.push(BattleCommand::SetWinner(attacker));
        commands.push(BattleCommand::EmitEvent(BattleEvent::CreatureFainted { side: defender }));
        commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner: attacker }));
    } else {
        commands.push(BattleCommand::SetTurn(defender));
        commands.push(BattleCommand::EmitEvent(BattleEvent::TurnStarted { side: defender }));
    }

    AttackPlan {
        outcome: AttackOutcome {
            attacker,
            move_index,
            move_name: move_data.name.clone(),
            hit: true,
            damage,
            is_critical,
            effectiveness_multiplier: effectiveness,
            weather_multiplier: weather,
            status_inflicted: status,
            log_text,
            defender_new_hp,
            match_ended,
        },
        commands,
    }
}
