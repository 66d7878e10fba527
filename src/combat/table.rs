//! Combatant table: struct-of-arrays storage for one side
//!
//! Dense arrays are addressed by a stable table index. Board positions map to
//! table indices through `pos_to_index` / `index_to_pos`, so reordering the
//! board never moves combatant data.

use crate::catalog::{CreatureId, CreatureKind, CreatureSheet, SkillId, SkillLookup};
use crate::combat::builders::{ActiveSkill, PassiveSkill};
use crate::core::error::{EncounterError, Result};
use crate::core::types::{BoardPos, Side, TableIndex, MAX_SKILLS, SIDE_SIZE};

/// Resolved behaviours for each equipped skill slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkillLoadout {
    pub ids: [Option<SkillId>; MAX_SKILLS],
    pub active: [Option<ActiveSkill>; MAX_SKILLS],
    pub passive: [Option<PassiveSkill>; MAX_SKILLS],
}

impl SkillLoadout {
    /// Resolve equipped skill ids against the skill catalog
    ///
    /// Ids the catalog does not know leave their slot empty. Skills beyond
    /// MAX_SKILLS are dropped.
    pub fn resolve(skills: &[SkillId], lookup: &impl SkillLookup) -> Self {
        let mut loadout = Self::default();
        for (slot, id) in skills.iter().take(MAX_SKILLS).enumerate() {
            match lookup.skill(*id) {
                Some(def) => {
                    loadout.ids[slot] = Some(*id);
                    loadout.active[slot] = def.active;
                    loadout.passive[slot] = def.passive;
                }
                None => tracing::warn!("Skill {:?} missing from catalog; slot {} left empty", id, slot),
            }
        }
        loadout
    }
}

/// Runtime state of one side's combatants
#[derive(Debug, Clone, PartialEq)]
pub struct CombatantTable {
    pub side: Side,

    pub occupied: [bool; SIDE_SIZE],
    pub creature_id: [Option<CreatureId>; SIDE_SIZE],
    pub kind: [CreatureKind; SIDE_SIZE],

    pub life: [f32; SIDE_SIZE],
    pub max_life: [f32; SIDE_SIZE],
    /// `life / max_life`, kept for presentation
    pub life_fraction: [f32; SIDE_SIZE],
    /// Initiative meter in [0, 1]
    pub meter: [f32; SIDE_SIZE],

    pub attack: [u32; SIDE_SIZE],
    pub defense: [u32; SIDE_SIZE],
    pub magic: [u32; SIDE_SIZE],
    pub critical: [u32; SIDE_SIZE],
    pub speed: [f32; SIDE_SIZE],

    pub skills: [SkillLoadout; SIDE_SIZE],

    pub pos_to_index: [TableIndex; SIDE_SIZE],
    pub index_to_pos: [BoardPos; SIDE_SIZE],
}

impl CombatantTable {
    /// An all-empty table with the identity position mapping
    pub fn new(side: Side) -> Self {
        let identity: [usize; SIDE_SIZE] = std::array::from_fn(|i| i);
        Self {
            side,
            occupied: [false; SIDE_SIZE],
            creature_id: [None; SIDE_SIZE],
            kind: [CreatureKind::default(); SIDE_SIZE],
            life: [0.0; SIDE_SIZE],
            max_life: [0.0; SIDE_SIZE],
            life_fraction: [1.0; SIDE_SIZE],
            meter: [0.0; SIDE_SIZE],
            attack: [0; SIDE_SIZE],
            defense: [0; SIDE_SIZE],
            magic: [0; SIDE_SIZE],
            critical: [0; SIDE_SIZE],
            speed: [0.0; SIDE_SIZE],
            skills: [SkillLoadout::default(); SIDE_SIZE],
            pos_to_index: identity,
            index_to_pos: identity,
        }
    }

    /// Snapshot a creature sheet into the slot at `index`
    ///
    /// Fails fast on stats the scheduler or damage formulas cannot divide by.
    pub fn place(&mut self, index: TableIndex, sheet: &CreatureSheet, loadout: SkillLoadout) -> Result<()> {
        let stats = &sheet.stats;
        let position = self.index_to_pos[index];
        let invalid = |stat: &'static str, value: f32| EncounterError::InvalidStat {
            side: self.side,
            position,
            stat,
            value,
        };

        if !(stats.speed.is_finite() && stats.speed > 0.0) {
            return Err(invalid("speed", stats.speed));
        }
        if !(stats.life.is_finite() && stats.life > 0.0) {
            return Err(invalid("life", stats.life));
        }
        if stats.defense == 0 {
            return Err(invalid("defense", 0.0));
        }

        self.occupied[index] = true;
        self.creature_id[index] = Some(sheet.id);
        self.kind[index] = sheet.kind;
        self.life[index] = stats.life;
        self.max_life[index] = stats.life;
        self.life_fraction[index] = 1.0;
        self.meter[index] = 0.0;
        self.attack[index] = stats.attack;
        self.defense[index] = stats.defense;
        self.magic[index] = stats.magic;
        self.critical[index] = stats.critical;
        self.speed[index] = stats.speed;
        self.skills[index] = loadout;
        Ok(())
    }

    pub fn index_of(&self, position: BoardPos) -> TableIndex {
        self.pos_to_index[position]
    }

    pub fn position_of(&self, index: TableIndex) -> BoardPos {
        self.index_to_pos[index]
    }

    /// Occupied and not defeated
    pub fn is_alive(&self, index: TableIndex) -> bool {
        self.occupied[index] && self.life[index] > 0.0
    }

    pub fn is_occupied_at(&self, position: BoardPos) -> bool {
        self.occupied[self.index_of(position)]
    }

    pub fn living_count(&self) -> usize {
        (0..SIDE_SIZE).filter(|i| self.is_alive(*i)).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }

    /// Exchange two board positions; combatant data stays where it is
    pub fn swap_positions(&mut self, a: BoardPos, b: BoardPos) {
        let (ia, ib) = (self.pos_to_index[a], self.pos_to_index[b]);
        self.pos_to_index[a] = ib;
        self.pos_to_index[b] = ia;
        self.index_to_pos[ia] = b;
        self.index_to_pos[ib] = a;
    }

    /// Meters to 0 and life fractions recomputed for a fresh initiative roll
    ///
    /// Fresh from `place` every occupied slot is at full life, so this yields 1.
    pub fn reset_bars(&mut self) {
        self.meter = [0.0; SIDE_SIZE];
        for index in 0..SIDE_SIZE {
            self.life_fraction[index] = if self.occupied[index] {
                self.life[index] / self.max_life[index]
            } else {
                1.0
            };
        }
    }

    /// Subtract damage, clamped to [0, max_life]; returns life actually lost
    pub fn apply_damage(&mut self, index: TableIndex, amount: f32) -> f32 {
        if !self.occupied[index] || amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }

        let before = self.life[index];
        let life = (before - amount).clamp(0.0, self.max_life[index]);
        self.life[index] = life;
        self.life_fraction[index] = life / self.max_life[index];
        before - life
    }
}
