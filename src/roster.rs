//! The read-only creature catalog.

use crate::battle::state::TurnRng;
use crate::errors::{ConfigResult, ConfigurationError};
use schema::CreatureData;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static BUILTIN_ROSTER: LazyLock<ConfigResult<Roster>> =
    LazyLock::new(|| Roster::from_ron_str(include_str!("../data/roster.ron")));

/// The roster compiled into the binary.
pub fn builtin_roster() -> ConfigResult<&'static Roster> {
    BUILTIN_ROSTER.as_ref().map_err(Clone::clone)
}

#[derive(Debug, Clone)]
pub struct Roster {
    creatures: Vec<CreatureData>,
}

impl Roster {
    pub fn new(creatures: Vec<CreatureData>) -> ConfigResult<Self> {
        if creatures.is_empty() {
            return Err(ConfigurationError::EmptyRoster);
        }

        let mut seen = HashSet::new();
        for creature in &creatures {
            if creature.moves.is_empty() {
                return Err(ConfigurationError::CreatureWithoutMoves(creature.id.clone()));
            }
            if !seen.insert(creature.id.as_str()) {
                return Err(ConfigurationError::DuplicateCreature(creature.id.clone()));
            }
        }

        Ok(Self { creatures })
    }

    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        let creatures: Vec<CreatureData> = ron::from_str(content)
            .map_err(|e| ConfigurationError::RosterParse(e.to_string()))?;
        Self::new(creatures)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ron_str(&content)
    }

    pub fn creatures(&self) -> &[CreatureData] {
        &self.creatures
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&CreatureData> {
        self.creatures.iter().find(|creature| creature.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn get_by_name(&self, name: &str) -> Option<&CreatureData> {
        self.creatures
            .iter()
            .find(|creature| creature.name.eq_ignore_ascii_case(name))
    }

    /// Lookup by id first, then by display name.
    pub fn find(&self, key: &str) -> ConfigResult<&CreatureData> {
        self.get_by_id(key)
            .or_else(|| self.get_by_name(key))
            .ok_or_else(|| ConfigurationError::UnknownCreature(key.to_string()))
    }

    pub fn all_names(&self) -> Vec<&str> {
        self.creatures.iter().map(|creature| creature.name.as_str()).collect()
    }

    /// Uniformly random creature, used for the computer's pick.
    pub fn random(&self, rng: &mut TurnRng) -> &CreatureData {
        let index = rng.next_index(self.creatures.len(), "random opponent");
        &self.creatures[index]
    }
}
