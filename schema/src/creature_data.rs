use crate::{ElementType, StatusKind};
use serde::{Deserialize, Serialize};

/// Accuracy used when a move does not declare one.
pub const DEFAULT_ACCURACY: u8 = 90;

/// Flavor stats shown on the selection screen. Only `speed` takes part in
/// combat, and the shipped roster leaves it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub power: u16,
    pub skills: u16,
    pub intelligence: u16,
    pub physical: u16,
    pub magic: u16,
    #[serde(default)]
    pub speed: Option<u16>,
}

/// Sprite references keyed by the role the creature is displayed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRefs {
    pub selection: String,
    pub player1: String,
    pub player2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    #[serde(default)]
    pub damage: Option<u16>,
    pub move_type: ElementType,
    #[serde(default)]
    pub accuracy: Option<u8>,
}

impl MoveData {
    pub fn new(name: &str, damage: Option<u16>, move_type: ElementType) -> Self {
        Self {
            name: name.to_string(),
            damage,
            move_type,
            accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: u8) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Hit threshold in percent, falling back to `default` when undeclared.
    pub fn accuracy_or(&self, default: u8) -> u8 {
        self.accuracy.unwrap_or(default)
    }

    /// Declared damage, or `None` when the move takes the random fallback path.
    /// A declared 0 counts as undeclared.
    pub fn base_damage(&self) -> Option<u16> {
        self.damage.filter(|&damage| damage > 0)
    }

    /// Status this move may inflict, inferred from its name.
    pub fn status_trigger(&self) -> Option<StatusKind> {
        let name = self.name.to_lowercase();
        if name.contains("burn") {
            Some(StatusKind::Burned)
        } else if name.contains("poison") {
            Some(StatusKind::Poisoned)
        } else {
            None
        }
    }

    pub fn is_defensive(&self) -> bool {
        self.name.to_lowercase().contains("defense") || self.base_damage().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureData {
    pub id: String,
    pub name: String,
    pub types: Vec<ElementType>,
    pub stats: BaseStats,
    pub moves: Vec<MoveData>,
    pub description: String,
    pub images: ImageRefs,
}

impl CreatureData {
    /// Type line as displayed in the roster, e.g. `Grass/Poison`.
    pub fn type_line(&self) -> String {
        ElementType::format_tags(&self.types)
    }
}
