use thiserror::Error;

use crate::core::types::{BoardPos, Side};

#[derive(Error, Debug)]
pub enum EncounterError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown creature id: {0}")]
    UnknownCreature(u32),

    #[error("{side:?} position {position}: {stat} must be positive, got {value}")]
    InvalidStat {
        side: Side,
        position: BoardPos,
        stat: &'static str,
        value: f32,
    },

    #[error("{0:?} roster has no combatants")]
    EmptyRoster(Side),

    #[error("Event queue '{queue}' is full (capacity {capacity})")]
    QueueFull { queue: &'static str, capacity: usize },

    #[error("{side:?} {category} registry is full (capacity {capacity})")]
    RegistryFull {
        side: Side,
        category: &'static str,
        capacity: usize,
    },

    #[error("Skill slot {0} is out of range or empty")]
    InvalidSkillSlot(usize),

    #[error("Skill slot {0} has no active behaviour")]
    SkillNotActive(usize),

    #[error("Target position {0} is out of range")]
    InvalidTarget(BoardPos),

    #[error("Encounter has not started; call roll_initiative first")]
    NotStarted,

    #[error("Initiative already rolled; set up the encounter again for a new fight")]
    AlreadyStarted,

    #[error("Encounter is over")]
    EncounterOver,

    #[error("No combatant is able to act")]
    NoEligibleActor,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EncounterError>;
