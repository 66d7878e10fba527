//! Passive registries: standing reactive abilities, per side and category
//!
//! A side's registries only ever react to events caused by the opposing side.

use serde::{Deserialize, Serialize};

use crate::combat::event::EffectMask;
use crate::combat::intent::Intent;
use crate::combat::table::CombatantTable;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{Side, TableIndex};

/// Resolution tier of a passive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveCategory {
    /// Cancels the triggering event; only the fastest fires
    Negate,
    /// May rewrite the triggering event; only the fastest fires
    Intercept,
    /// Every qualifying react fires
    React,
}

impl PassiveCategory {
    pub fn name(self) -> &'static str {
        match self {
            PassiveCategory::Negate => "negate",
            PassiveCategory::Intercept => "intercept",
            PassiveCategory::React => "react",
        }
    }
}

/// Which caster or target index a passive watches for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Observed {
    /// Wildcard: any index matches
    Any,
    /// Only this table index matches
    Index(TableIndex),
    /// Never matches, so the other field alone decides
    Ignored,
}

impl Observed {
    pub fn matches(self, index: TableIndex) -> bool {
        match self {
            Observed::Any => true,
            Observed::Index(i) => i == index,
            Observed::Ignored => false,
        }
    }
}

/// Extra condition: (reacting side's table, opposing table, triggering intent)
pub type PassiveGuard = fn(&CombatantTable, &CombatantTable, &Intent) -> bool;

/// Guard that always passes
pub fn always(_: &CombatantTable, _: &CombatantTable, _: &Intent) -> bool {
    true
}

/// One registry of standing passives, stored as parallel arrays
#[derive(Debug, Clone)]
pub struct PassiveTable {
    side: Side,
    category: PassiveCategory,
    capacity: usize,
    /// Reacting owner + skill slot, fixed at registration
    pub intent: Vec<Intent>,
    pub observed_effects: Vec<EffectMask>,
    /// Compared against the caster's index on the opposing table
    pub observed_caster: Vec<Observed>,
    /// Compared against the target's index on this side's table
    pub observed_target: Vec<Observed>,
    pub guard: Vec<PassiveGuard>,
}

impl PassiveTable {
    pub fn new(side: Side, category: PassiveCategory, capacity: usize) -> Self {
        Self {
            side,
            category,
            capacity,
            intent: Vec::with_capacity(capacity),
            observed_effects: Vec::with_capacity(capacity),
            observed_caster: Vec::with_capacity(capacity),
            observed_target: Vec::with_capacity(capacity),
            guard: Vec::with_capacity(capacity),
        }
    }

    pub fn register(
        &mut self,
        intent: Intent,
        observed_effects: EffectMask,
        observed_caster: Observed,
        observed_target: Observed,
        guard: PassiveGuard,
    ) -> Result<()> {
        if self.len() >= self.capacity {
            return Err(EncounterError::RegistryFull {
                side: self.side,
                category: self.category.name(),
                capacity: self.capacity,
            });
        }

        self.intent.push(intent);
        self.observed_effects.push(observed_effects);
        self.observed_caster.push(observed_caster);
        self.observed_target.push(observed_target);
        self.guard.push(guard);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.intent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intent.is_empty()
    }

    pub fn category(&self) -> PassiveCategory {
        self.category
    }

    pub fn clear(&mut self) {
        self.intent.clear();
        self.observed_effects.clear();
        self.observed_caster.clear();
        self.observed_target.clear();
        self.guard.clear();
    }
}

/// Negate, intercept and react registries of one side
#[derive(Debug, Clone)]
pub struct SideRegistries {
    pub negate: PassiveTable,
    pub intercept: PassiveTable,
    pub react: PassiveTable,
}

impl SideRegistries {
    pub fn new(side: Side, capacity: usize) -> Self {
        Self {
            negate: PassiveTable::new(side, PassiveCategory::Negate, capacity),
            intercept: PassiveTable::new(side, PassiveCategory::Intercept, capacity),
            react: PassiveTable::new(side, PassiveCategory::React, capacity),
        }
    }

    pub fn get(&self, category: PassiveCategory) -> &PassiveTable {
        match category {
            PassiveCategory::Negate => &self.negate,
            PassiveCategory::Intercept => &self.intercept,
            PassiveCategory::React => &self.react,
        }
    }

    pub fn get_mut(&mut self, category: PassiveCategory) -> &mut PassiveTable {
        match category {
            PassiveCategory::Negate => &mut self.negate,
            PassiveCategory::Intercept => &mut self.intercept,
            PassiveCategory::React => &mut self.react,
        }
    }

    pub fn clear(&mut self) {
        self.negate.clear();
        self.intercept.clear();
        self.react.clear();
    }

    pub fn total_len(&self) -> usize {
        self.negate.len() + self.intercept.len() + self.react.len()
    }
}

/// Registries for both sides, indexed by `Side::index`
#[derive(Debug, Clone)]
pub struct PassiveRegistries {
    sides: [SideRegistries; 2],
}

impl PassiveRegistries {
    pub fn new(capacity: usize) -> Self {
        Self {
            sides: [
                SideRegistries::new(Side::Ally, capacity),
                SideRegistries::new(Side::Opponent, capacity),
            ],
        }
    }

    pub fn side(&self, side: Side) -> &SideRegistries {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideRegistries {
        &mut self.sides[side.index()]
    }

    pub fn clear(&mut self) {
        for side in &mut self.sides {
            side.clear();
        }
    }
}
