//! Combat tuning constants - all skill numbers in one place

// Initiative
pub const METER_FULL: f32 = 1.0;

// Strike: scale * attack / defense
pub const STRIKE_SCALE: u64 = 200;
pub const STRIKE_UNDEAD_SCALE: u64 = 400;

// Cleave hits everyone for half a strike
pub const CLEAVE_SCALE: u64 = 100;
pub const CLEAVE_UNDEAD_SCALE: u64 = 200;

// Passives
pub const BODYGUARD_LIFE_THRESHOLD: f32 = 0.5;
pub const THORNS_REFLECT_RATIO: f32 = 0.5;
