use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Type tag carried by creatures and by moves.
///
/// Creature tags are the elemental ones (`Fire`, `Grass`, ...). Moves also use
/// the non-elemental tags (`Escape`, `Defense`, `Status`) to describe utility
/// moves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Poison,
    Fighting,
    Dark,
    Status,
    Defense,
    Escape,
}

impl ElementType {
    /// Damage multiplier for an attacking move type against one defending type tag.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal
    pub fn type_effectiveness(attacking: ElementType, defending: ElementType) -> f64 {
        use ElementType::*;

        match (attacking, defending) {
            (Fire, Grass) => 2.0,
            (Water, Fire) => 2.0,
            (Grass, Water) => 2.0,
            _ => 1.0,
        }
    }

    /// Combined multiplier against every type tag of the defender.
    pub fn effectiveness_against(attacking: ElementType, defending: &[ElementType]) -> f64 {
        defending
            .iter()
            .map(|&tag| Self::type_effectiveness(attacking, tag))
            .product()
    }

    /// Parses a slash separated tag list such as `"Grass/Poison"`.
    pub fn parse_tags(tags: &str) -> Result<Vec<ElementType>, strum::ParseError> {
        tags.split('/')
            .map(|tag| tag.trim().parse::<ElementType>())
            .collect()
    }

    /// Inverse of [`ElementType::parse_tags`], using title case like the roster does.
    pub fn format_tags(tags: &[ElementType]) -> String {
        tags.iter()
            .map(|tag| {
                let lower = tag.to_string();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join("/")
    }
}
