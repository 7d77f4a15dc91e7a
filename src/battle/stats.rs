use crate::battle::state::{Side, TurnRng};
use crate::config::BattleRules;
use schema::{BaseStats, ElementType, MoveData, StatusKind, Weather};

/// Calculate if a move hits. The roll misses when it exceeds the move's accuracy.
pub fn move_hits(move_data: &MoveData, rules: &BattleRules, rng: &mut TurnRng) -> bool {
    let accuracy = move_data.accuracy_or(rules.default_accuracy).min(100);
    let roll = rng.next_outcome("accuracy");
    roll <= accuracy
}

/// Probability of a critical hit given the current combo streak, clamped to [0, 1].
pub fn critical_hit_chance(combo_streak: u32, rules: &BattleRules) -> f64 {
    (rules.base_crit_chance + rules.combo_crit_bonus * combo_streak as f64).clamp(0.0, 1.0)
}

pub fn is_critical_hit(combo_streak: u32, rules: &BattleRules, rng: &mut TurnRng) -> bool {
    let threshold = (critical_hit_chance(combo_streak, rules) * 100.0).round() as u8;
    rng.next_outcome("critical hit") <= threshold
}

/// The move's declared damage, or `5 + floor(r * 15)` when it declares none.
pub fn base_damage(move_data: &MoveData, rng: &mut TurnRng) -> u16 {
    match move_data.base_damage() {
        Some(damage) => damage,
        None => rng.next_in_range(5, 19, "fallback damage"),
    }
}

pub fn type_effectiveness(move_type: ElementType, defender_types: &[ElementType]) -> f64 {
    ElementType::effectiveness_against(move_type, defender_types)
}

/// Rain powers up water moves, sun powers up fire moves. Sandstorm changes nothing.
pub fn weather_multiplier(weather: Option<Weather>, move_type: ElementType, rules: &BattleRules) -> f64 {
    match (weather, move_type) {
        (Some(Weather::Rain), ElementType::Water) => rules.weather_boost,
        (Some(Weather::Sun), ElementType::Fire) => rules.weather_boost,
        _ => 1.0,
    }
}

/// floor(base × effectiveness × weather × crit), saturating at `u16::MAX`.
pub fn final_damage(base: u16, effectiveness: f64, weather: f64, crit: f64) -> u16 {
    let raw = base as f64 * effectiveness * weather * crit;
    // Absorb representation error such as 35 * 1.8 = 62.999...
    (raw + 1e-9).floor().clamp(0.0, u16::MAX as f64) as u16
}

pub fn status_chance(status: StatusKind, rules: &BattleRules) -> u8 {
    match status {
        StatusKind::Burned => rules.burn_chance,
        StatusKind::Poisoned => rules.poison_chance,
    }
}

pub fn status_inflicted(status: StatusKind, rules: &BattleRules, rng: &mut TurnRng) -> bool {
    rng.chance(status_chance(status, rules), "status infliction")
}

pub fn status_tick_damage(rules: &BattleRules, rng: &mut TurnRng) -> u16 {
    rng.next_in_range(rules.status_damage_min, rules.status_damage_max, "status damage")
}

/// Higher speed acts first. Equal or missing speeds are a coin flip.
pub fn determine_first_actor(player: &BaseStats, opponent: &BaseStats, rng: &mut TurnRng) -> Side {
    match (player.speed, opponent.speed) {
        (Some(a), Some(b)) if a > b => Side::Player,
        (Some(a), Some(b)) if a < b => Side::Opponent,
        _ => {
            if rng.chance(50, "turn order tie-break") {
                Side::Player
            } else {
                Side::Opponent
            }
        }
    }
}
