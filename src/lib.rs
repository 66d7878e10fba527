//! Skirmish - deterministic 5v5 turn-based combat resolution

pub mod catalog;
pub mod combat;
pub mod core;

pub use crate::catalog::{Catalog, CreatureId, Roster, RosterLookup, SkillId, SkillLookup};
pub use crate::combat::{CombatState, Encounter, EncounterSnapshot, TurnReport};
pub use crate::core::config::EncounterConfig;
pub use crate::core::error::{EncounterError, Result};
pub use crate::core::types::{ActorRef, Side};
