//! Static catalog data consumed by the engine
//!
//! The engine only ever reads from the catalog while populating the combatant
//! tables at setup, through the [`RosterLookup`] and [`SkillLookup`] traits.

pub mod creatures;
pub mod skills;

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{EncounterError, Result};
use crate::core::types::SIDE_SIZE;

pub use creatures::{builtin_creatures, BaseStats, CreatureId, CreatureKind, CreatureSheet};
pub use skills::{builtin_skill, SkillDef, SkillId};

/// Maps a creature identifier to its sheet
pub trait RosterLookup {
    fn creature(&self, id: CreatureId) -> Option<&CreatureSheet>;
}

/// Maps a skill identifier to its behaviour pair
pub trait SkillLookup {
    fn skill(&self, id: SkillId) -> Option<&SkillDef>;
}

/// Up to five creature ids in board-position order; `None` is an empty slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roster {
    pub slots: [Option<CreatureId>; SIDE_SIZE],
}

impl Roster {
    /// Fill positions from the front; extra ids beyond five are ignored
    pub fn new(ids: &[u32]) -> Self {
        let mut slots = [None; SIDE_SIZE];
        for (slot, id) in slots.iter_mut().zip(ids) {
            *slot = Some(CreatureId(*id));
        }
        Self { slots }
    }

    pub fn with_slot(mut self, position: usize, id: Option<u32>) -> Self {
        if position < SIDE_SIZE {
            self.slots[position] = id.map(CreatureId);
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "creature", default)]
    creatures: Vec<CreatureSheet>,
}

/// Immutable creature + skill catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    creatures: AHashMap<CreatureId, CreatureSheet>,
    skills: AHashMap<SkillId, SkillDef>,
}

impl Catalog {
    /// Catalog with every built-in skill and no creatures
    pub fn empty() -> Self {
        let skills = SkillId::ALL
            .iter()
            .map(|id| (*id, builtin_skill(*id)))
            .collect();
        Self {
            creatures: AHashMap::new(),
            skills,
        }
    }

    /// Built-in skills and bestiary
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for creature in builtin_creatures() {
            catalog.insert_creature(creature);
        }
        catalog
    }

    /// Parse creatures from TOML (`[[creature]]` tables); skills are built in
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents)?;
        let mut catalog = Self::empty();
        for creature in file.creatures {
            catalog.insert_creature(creature);
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Add or replace a creature
    pub fn insert_creature(&mut self, sheet: CreatureSheet) {
        self.creatures.insert(sheet.id, sheet);
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Strict lookup for callers that treat a missing creature as an error
    pub fn require_creature(&self, id: CreatureId) -> Result<&CreatureSheet> {
        self.creatures
            .get(&id)
            .ok_or(EncounterError::UnknownCreature(id.0))
    }

    /// Fail on the first roster slot naming a creature this catalog lacks
    pub fn check_roster(&self, roster: &Roster) -> Result<()> {
        for id in roster.slots.iter().flatten() {
            self.require_creature(*id)?;
        }
        Ok(())
    }
}

impl RosterLookup for Catalog {
    fn creature(&self, id: CreatureId) -> Option<&CreatureSheet> {
        self.creatures.get(&id)
    }
}

impl SkillLookup for Catalog {
    fn skill(&self, id: SkillId) -> Option<&SkillDef> {
        self.skills.get(&id)
    }
}
