//! Damage application and per-turn reporting

use serde::Serialize;

use crate::catalog::SkillId;
use crate::combat::event::Event;
use crate::combat::intent::Intent;
use crate::combat::resolver::PassiveOutcome;
use crate::combat::table::CombatantTable;
use crate::core::types::{ActorRef, Side, SIDE_SIZE};

/// Whether the encounter is waiting, in progress or decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatState {
    /// Set up but initiative not rolled
    Idle,
    Running,
    Ended { winner: Side },
}

impl CombatState {
    pub fn is_running(self) -> bool {
        matches!(self, CombatState::Running)
    }
}

/// Life actually removed, by board position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DamageDealt {
    /// Against the side opposing the event's caster
    pub other: [f32; SIDE_SIZE],
    /// Against the caster's own side
    pub own: [f32; SIDE_SIZE],
}

impl DamageDealt {
    pub fn total(&self) -> f32 {
        self.other.iter().chain(self.own.iter()).sum()
    }
}

/// What happened to one main-queue event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOutcome {
    /// Intent as finally resolved, after any intercept
    pub intent: Intent,
    pub is_aoe: bool,
    pub negated: bool,
    pub passives: PassiveOutcome,
    pub dealt: DamageDealt,
}

/// Result of one submitted turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    pub actor: ActorRef,
    pub skill: SkillId,
    pub events: Vec<EventOutcome>,
    /// `None` once the encounter has ended
    pub next_actor: Option<ActorRef>,
    pub state: CombatState,
}

impl TurnReport {
    pub fn total_damage(&self) -> f32 {
        self.events.iter().map(|e| e.dealt.total()).sum()
    }
}

/// Subtract one event's pending damage from both tables
///
/// Opposing and own damage are applied independently, each clamped to the
/// target's [0, max_life]. Negated events apply nothing.
pub fn apply_event_damage(tables: &mut [CombatantTable; 2], event: &Event) -> DamageDealt {
    let mut dealt = DamageDealt::default();
    if event.is_negated {
        return dealt;
    }

    let caster_side = event.intent.side;
    for (side, amounts, out) in [
        (caster_side.opposite(), &event.other_damage, &mut dealt.other),
        (caster_side, &event.own_damage, &mut dealt.own),
    ] {
        let table = &mut tables[side.index()];
        for pos in 0..SIDE_SIZE {
            let index = table.index_of(pos);
            out[pos] = table.apply_damage(index, amounts[pos]);
        }
    }

    dealt
}

/// Winner if one side has nobody left standing
///
/// When a turn wipes out both sides (a killing blow answered by lethal
/// thorns), the side that was acting wins.
pub fn decided_winner(tables: &[CombatantTable; 2], acting: Side) -> Option<Side> {
    let standing = |side: Side| tables[side.index()].living_count() > 0;
    match (standing(acting), standing(acting.opposite())) {
        (true, true) => None,
        (_, false) => Some(acting),
        (false, true) => Some(acting.opposite()),
    }
}
