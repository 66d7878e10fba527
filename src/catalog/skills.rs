//! Skill table: maps a skill identifier to its active/passive behaviour pair

use serde::{Deserialize, Serialize};

use crate::combat::builders::{ActiveSkill, PassiveSkill};

/// Enumerated skill identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillId {
    Strike,
    Cleave,
    Evade,
    Bodyguard,
    Thorns,
    Riposte,
}

impl SkillId {
    pub const ALL: [SkillId; 6] = [
        SkillId::Strike,
        SkillId::Cleave,
        SkillId::Evade,
        SkillId::Bodyguard,
        SkillId::Thorns,
        SkillId::Riposte,
    ];
}

/// A skill as registered in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDef {
    pub id: SkillId,
    pub name: &'static str,
    pub description: &'static str,
    pub active: Option<ActiveSkill>,
    pub passive: Option<PassiveSkill>,
}

/// Definition of a built-in skill
pub fn builtin_skill(id: SkillId) -> SkillDef {
    match id {
        SkillId::Strike => SkillDef {
            id,
            name: "Strike",
            description: "Attacks a single target.",
            active: Some(ActiveSkill::Strike),
            passive: None,
        },
        SkillId::Cleave => SkillDef {
            id,
            name: "Cleave",
            description: "Attacks all opponents.",
            active: Some(ActiveSkill::Cleave),
            passive: None,
        },
        SkillId::Evade => SkillDef {
            id,
            name: "Evade",
            description: "Dodges an attack aimed at this combatant.",
            active: None,
            passive: Some(PassiveSkill::Evade),
        },
        SkillId::Bodyguard => SkillDef {
            id,
            name: "Bodyguard",
            description: "Steps in front of a badly wounded ally.",
            active: None,
            passive: Some(PassiveSkill::Bodyguard),
        },
        SkillId::Thorns => SkillDef {
            id,
            name: "Thorns",
            description: "Reflects damage back at whoever strikes this combatant.",
            active: None,
            passive: Some(PassiveSkill::Thorns),
        },
        SkillId::Riposte => SkillDef {
            id,
            name: "Riposte",
            description: "Answers an attack with a counter strike.",
            active: None,
            passive: Some(PassiveSkill::Riposte),
        },
    }
}
