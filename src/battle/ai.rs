//! Move selection policies for computer-driven sides.

use crate::battle::state::{CombatantState, TurnRng, MAX_HP};

/// Below this share of `MAX_HP` (in percent) a combatant counts as low on health.
const LOW_HP_PERCENT: u16 = 30;

/// Anything declaring more damage than this is a "strong" move.
const STRONG_MOVE_DAMAGE: u16 = 25;

/// A trait for any system that can pick a move on behalf of a side.
pub trait Behavior: std::fmt::Debug {
    /// Returns the index of the move to use. Implementations only return
    /// indices with uses left, falling back to 0 when nothing is usable.
    fn choose_move(&self, own: &CombatantState, opponent: &CombatantState, rng: &mut TurnRng) -> usize;
}

fn is_low(combatant: &CombatantState) -> bool {
    combatant.hp() * 100 < LOW_HP_PERCENT * MAX_HP
}

/// The computer opponent: finishes a weakened target, turtles when hurt,
/// otherwise swings with something strong.
#[derive(Debug, Clone, Copy, Default)]
pub struct TacticalAI;

impl TacticalAI {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for TacticalAI {
    fn choose_move(&self, own: &CombatantState, opponent: &CombatantState, rng: &mut TurnRng) -> usize {
        let available = own.available_moves();
        if available.is_empty() {
            return 0;
        }
        let moves = &own.creature.moves;

        if is_low(opponent) {
            let finisher = available.iter().copied().find(|&i| {
                moves[i]
                    .base_damage()
                    .is_some_and(|damage| damage >= opponent.hp())
            });
            if let Some(index) = finisher {
                tracing::debug!("AI goes for the finish with {}", moves[index].name);
                return index;
            }
        }

        if is_low(own) {
            if let Some(index) = available.iter().copied().find(|&i| moves[i].is_defensive()) {
                tracing::debug!("AI plays defensively with {}", moves[index].name);
                return index;
            }
        }

        let strong: Vec<usize> = available
            .iter()
            .copied()
            .filter(|&i| moves[i].base_damage().is_some_and(|d| d > STRONG_MOVE_DAMAGE))
            .collect();
        let pool = if strong.is_empty() { &available } else { &strong };
        let index = pool[rng.next_index(pool.len(), "ai move choice")];

        tracing::debug!("AI picked {} from {} candidates", moves[index].name, pool.len());
        index
    }
}

/// Uniform pick among the usable moves. Stands in for a human who let the
/// turn timer run out.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChoice;

impl Behavior for RandomChoice {
    fn choose_move(&self, own: &CombatantState, _opponent: &CombatantState, rng: &mut TurnRng) -> usize {
        let available = own.available_moves();
        if available.is_empty() {
            return 0;
        }
        available[rng.next_index(available.len(), "random move choice")]
    }
}
