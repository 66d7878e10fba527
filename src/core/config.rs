//! Encounter configuration with documented limits
//!
//! Every fixed capacity in the engine is collected here. Capacities are hard
//! limits: exceeding one is reported as an error, never silently truncated.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EncounterError, Result};

/// Capacities of the five per-encounter event queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueCapacities {
    /// Reactions resolved before the fast tier
    pub fast_plus: usize,
    /// Reactions resolved before the main event
    pub fast: usize,
    /// Events declared by the acting combatant's skill
    ///
    /// A skill declares one event per use, so a handful is plenty.
    pub main: usize,
    /// Reactions resolved right after the main event
    pub slow_plus: usize,
    /// Reactions resolved last
    pub slow: usize,
}

impl Default for QueueCapacities {
    fn default() -> Self {
        Self {
            fast_plus: 4,
            fast: 16,
            main: 4,
            slow_plus: 4,
            slow: 16,
        }
    }
}

/// Configuration for one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Seed for the tie-break RNG
    ///
    /// The same seed, rosters and turn inputs always replay the same fight.
    pub seed: u64,

    /// Entries per passive registry (per side, per category)
    ///
    /// With five combatants and one passive each, 5 covers every roster
    /// where passives of the same category are not stacked.
    pub registry_capacity: usize,

    /// Event queue capacities
    pub queues: QueueCapacities,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            registry_capacity: 5,
            queues: QueueCapacities::default(),
        }
    }
}

impl EncounterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.registry_capacity == 0 {
            return Err(EncounterError::Config(
                "registry_capacity must be at least 1".into(),
            ));
        }

        let q = &self.queues;
        for (name, capacity) in [
            ("fast_plus", q.fast_plus),
            ("fast", q.fast),
            ("main", q.main),
            ("slow_plus", q.slow_plus),
            ("slow", q.slow),
        ] {
            if capacity == 0 {
                return Err(EncounterError::Config(format!(
                    "queue capacity '{}' must be at least 1",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EncounterConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
