//! Combat engine: tables, events, passives and the turn pipeline

pub mod builders;
pub mod constants;
pub mod encounter;
pub mod event;
pub mod intent;
pub mod passive;
pub mod pipeline;
pub mod resolver;
pub mod scheduler;
pub mod snapshot;
pub mod table;

pub use builders::{ActiveSkill, PassiveContext, PassiveSkill};
pub use encounter::Encounter;
pub use event::{EffectMask, Event, EventQueue, ReactionQueues, ReactionTier, TargetMask};
pub use intent::Intent;
pub use passive::{Observed, PassiveCategory, PassiveRegistries, PassiveTable};
pub use pipeline::{CombatState, DamageDealt, EventOutcome, TurnReport};
pub use resolver::PassiveOutcome;
pub use snapshot::{EncounterSnapshot, SideSnapshot};
pub use table::{CombatantTable, SkillLoadout};
