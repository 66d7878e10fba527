//! Intent: one proposed action before any numbers are computed

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorRef, BoardPos, Side, TableIndex};
use crate::combat::table::CombatantTable;

/// Acting side, acting combatant, chosen skill slot and target position
///
/// Active builders consume it when declaring and resolving; passive entries
/// store one fixed at registration to identify the reacting skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intent {
    pub side: Side,
    pub owner_index: TableIndex,
    pub skill_slot: usize,
    pub target_pos: BoardPos,
}

impl Intent {
    pub fn new(side: Side, owner_index: TableIndex, skill_slot: usize, target_pos: BoardPos) -> Self {
        Self {
            side,
            owner_index,
            skill_slot,
            target_pos,
        }
    }

    /// Same actor and skill aimed at a different position
    pub fn retargeted(self, target_pos: BoardPos) -> Self {
        Self { target_pos, ..self }
    }

    /// The acting combatant as side + board position
    pub fn actor(&self, owner_table: &CombatantTable) -> ActorRef {
        ActorRef::new(self.side, owner_table.position_of(self.owner_index))
    }
}
