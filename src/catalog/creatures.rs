//! Creature sheets: static base stats and equipped skills

use serde::{Deserialize, Serialize};

use crate::catalog::skills::SkillId;

/// Catalog identifier of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureId(pub u32);

/// Creature type, used by type-effectiveness multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CreatureKind {
    #[default]
    Monster,
    Undead,
}

/// Base stats snapshotted into the combatant table at setup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub life: f32,
    pub attack: u32,
    pub defense: u32,
    pub magic: u32,
    pub critical: u32,
    pub speed: f32,
}

/// Static description of a creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSheet {
    pub id: CreatureId,
    pub name: String,
    #[serde(default)]
    pub kind: CreatureKind,
    pub stats: BaseStats,
    /// Equipped skills in slot order
    #[serde(default)]
    pub skills: Vec<SkillId>,
}

impl CreatureSheet {
    pub fn new(
        id: u32,
        name: &str,
        kind: CreatureKind,
        stats: BaseStats,
        skills: &[SkillId],
    ) -> Self {
        Self {
            id: CreatureId(id),
            name: name.to_string(),
            kind,
            stats,
            skills: skills.to_vec(),
        }
    }
}

fn stats(life: f32, attack: u32, defense: u32, magic: u32, critical: u32, speed: f32) -> BaseStats {
    BaseStats {
        life,
        attack,
        defense,
        magic,
        critical,
        speed,
    }
}

/// Built-in bestiary
///
/// Bat, Skeleton and Orc fight with actives only; the passives live on the
/// Knight, Wraith and Thornback.
pub fn builtin_creatures() -> Vec<CreatureSheet> {
    use SkillId::*;

    vec![
        CreatureSheet::new(
            0,
            "Bat",
            CreatureKind::Monster,
            stats(1000.0, 100, 100, 100, 100, 180.0),
            &[Strike, Cleave],
        ),
        CreatureSheet::new(
            1,
            "Skeleton",
            CreatureKind::Undead,
            stats(1200.0, 120, 100, 100, 100, 140.0),
            &[Strike, Cleave],
        ),
        CreatureSheet::new(
            2,
            "Orc",
            CreatureKind::Monster,
            stats(1400.0, 140, 100, 100, 100, 100.0),
            &[Strike, Cleave],
        ),
        CreatureSheet::new(
            3,
            "Knight",
            CreatureKind::Monster,
            stats(1600.0, 110, 140, 60, 80, 90.0),
            &[Strike, Cleave, Riposte, Bodyguard],
        ),
        CreatureSheet::new(
            4,
            "Wraith",
            CreatureKind::Undead,
            stats(900.0, 110, 90, 120, 60, 160.0),
            &[Strike, Evade],
        ),
        CreatureSheet::new(
            5,
            "Thornback",
            CreatureKind::Monster,
            stats(1500.0, 90, 120, 40, 40, 70.0),
            &[Strike, Cleave, Thorns],
        ),
    ]
}
