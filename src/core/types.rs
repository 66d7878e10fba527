//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Combatants per side
pub const SIDE_SIZE: usize = 5;

/// Equipped skill slots per combatant
pub const MAX_SKILLS: usize = 4;

/// Board position (0..SIDE_SIZE), the externally visible slot
pub type BoardPos = usize;

/// Dense storage index into a combatant table
pub type TableIndex = usize;

/// Which side of the encounter a combatant fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Ally,
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Ally, Side::Opponent];

    /// 0 for allies, 1 for opponents
    pub fn index(self) -> usize {
        match self {
            Side::Ally => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Ally => Side::Opponent,
            Side::Opponent => Side::Ally,
        }
    }
}

/// A combatant as seen from outside: side plus board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    pub side: Side,
    pub position: BoardPos,
}

impl ActorRef {
    pub fn new(side: Side, position: BoardPos) -> Self {
        Self { side, position }
    }
}
