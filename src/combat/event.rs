//! Events and the fixed-capacity queues that hold them

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::combat::intent::Intent;
use crate::core::config::QueueCapacities;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{BoardPos, SIDE_SIZE};

/// Effect kinds carried by an event; passives observe these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EffectMask(pub u8);

impl EffectMask {
    pub const NONE: EffectMask = EffectMask(0);
    pub const DAMAGE: EffectMask = EffectMask(1 << 0);
    pub const HEAL: EffectMask = EffectMask(1 << 1);
    pub const NEGATE: EffectMask = EffectMask(1 << 2);
    pub const DEBUFF: EffectMask = EffectMask(1 << 3);

    pub fn intersects(self, other: EffectMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: EffectMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EffectMask {
    type Output = EffectMask;

    fn bitor(self, rhs: EffectMask) -> EffectMask {
        EffectMask(self.0 | rhs.0)
    }
}

/// One bit per board position on the opposing side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TargetMask(pub u8);

impl TargetMask {
    pub const ALL: TargetMask = TargetMask((1 << SIDE_SIZE) - 1);

    pub fn single(position: BoardPos) -> Self {
        TargetMask(1 << position)
    }

    pub fn contains(self, position: BoardPos) -> bool {
        self.0 & (1 << position) != 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

/// The mutable record of one action: declared shape first, numbers later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub intent: Intent,
    pub target_mask: TargetMask,
    pub effects: EffectMask,
    pub is_negated: bool,
    pub is_aoe: bool,
    /// Pending damage against the opposing side, by board position
    pub other_damage: [f32; SIDE_SIZE],
    /// Pending damage against the owner's own side, by board position
    pub own_damage: [f32; SIDE_SIZE],
}

impl Event {
    pub fn new(intent: Intent, target_mask: TargetMask, effects: EffectMask) -> Self {
        Self {
            intent,
            target_mask,
            effects,
            is_negated: false,
            is_aoe: false,
            other_damage: [0.0; SIDE_SIZE],
            own_damage: [0.0; SIDE_SIZE],
        }
    }

    /// Aimed at the intent's target position only
    pub fn single(intent: Intent, effects: EffectMask) -> Self {
        Self::new(intent, TargetMask::single(intent.target_pos), effects)
    }

    /// Aimed at every opposing position
    pub fn area(intent: Intent, effects: EffectMask) -> Self {
        Self {
            is_aoe: true,
            ..Self::new(intent, TargetMask::ALL, effects)
        }
    }

    /// Point a single-target event at another position
    pub fn retarget(&mut self, position: BoardPos) {
        self.intent = self.intent.retargeted(position);
        if !self.is_aoe {
            self.target_mask = TargetMask::single(position);
        }
    }

    pub fn total_other_damage(&self) -> f32 {
        self.other_damage.iter().sum()
    }

    pub fn total_own_damage(&self) -> f32 {
        self.own_damage.iter().sum()
    }
}

/// Fixed-capacity FIFO of events
///
/// Declaration order is resolution order. Events are never removed one by
/// one; the whole queue is cleared between uses.
#[derive(Debug, Clone)]
pub struct EventQueue {
    name: &'static str,
    events: Vec<Event>,
    capacity: usize,
}

impl EventQueue {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, or report the overflow; the queue is left unchanged on error
    pub fn push(&mut self, event: Event) -> Result<()> {
        if self.events.len() >= self.capacity {
            return Err(EncounterError::QueueFull {
                queue: self.name,
                capacity: self.capacity,
            });
        }
        self.events.push(event);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

/// Priority tiers for events raised by passives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionTier {
    FastPlus,
    Fast,
    SlowPlus,
    Slow,
}

/// Per-event scratch queues, cleared before each main event's passives run
///
/// Nothing drains these yet; they hold secondary events for abilities that
/// will fire independently of the main event's resolution.
#[derive(Debug, Clone)]
pub struct ReactionQueues {
    pub fast_plus: EventQueue,
    pub fast: EventQueue,
    pub slow_plus: EventQueue,
    pub slow: EventQueue,
}

impl ReactionQueues {
    pub fn new(capacities: &QueueCapacities) -> Self {
        Self {
            fast_plus: EventQueue::new("fast_plus", capacities.fast_plus),
            fast: EventQueue::new("fast", capacities.fast),
            slow_plus: EventQueue::new("slow_plus", capacities.slow_plus),
            slow: EventQueue::new("slow", capacities.slow),
        }
    }

    pub fn push(&mut self, tier: ReactionTier, event: Event) -> Result<()> {
        self.tier_mut(tier).push(event)
    }

    pub fn tier(&self, tier: ReactionTier) -> &EventQueue {
        match tier {
            ReactionTier::FastPlus => &self.fast_plus,
            ReactionTier::Fast => &self.fast,
            ReactionTier::SlowPlus => &self.slow_plus,
            ReactionTier::Slow => &self.slow,
        }
    }

    fn tier_mut(&mut self, tier: ReactionTier) -> &mut EventQueue {
        match tier {
            ReactionTier::FastPlus => &mut self.fast_plus,
            ReactionTier::Fast => &mut self.fast,
            ReactionTier::SlowPlus => &mut self.slow_plus,
            ReactionTier::Slow => &mut self.slow,
        }
    }

    pub fn clear_all(&mut self) {
        self.fast_plus.clear();
        self.fast.clear();
        self.slow_plus.clear();
        self.slow.clear();
    }

    pub fn total_len(&self) -> usize {
        self.fast_plus.len() + self.fast.len() + self.slow_plus.len() + self.slow.len()
    }
}
