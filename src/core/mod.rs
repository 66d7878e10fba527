pub mod config;
pub mod error;
pub mod types;

pub use config::{EncounterConfig, QueueCapacities};
pub use error::{EncounterError, Result};
