//! Read-only views of encounter state for presentation

use serde::Serialize;

use crate::catalog::CreatureId;
use crate::combat::pipeline::CombatState;
use crate::combat::table::CombatantTable;
use crate::core::types::{ActorRef, Side, SIDE_SIZE};

/// One side's visible state, indexed by board position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideSnapshot {
    pub side: Side,
    pub creature_ids: [Option<CreatureId>; SIDE_SIZE],
    pub life: [f32; SIDE_SIZE],
    pub life_fraction: [f32; SIDE_SIZE],
    pub meter: [f32; SIDE_SIZE],
}

impl SideSnapshot {
    pub fn capture(table: &CombatantTable) -> Self {
        let by_pos = |values: &[f32; SIDE_SIZE]| -> [f32; SIDE_SIZE] {
            std::array::from_fn(|pos| values[table.index_of(pos)])
        };

        Self {
            side: table.side,
            creature_ids: std::array::from_fn(|pos| {
                let index = table.index_of(pos);
                if table.occupied[index] {
                    table.creature_id[index]
                } else {
                    None
                }
            }),
            life: by_pos(&table.life),
            life_fraction: by_pos(&table.life_fraction),
            meter: by_pos(&table.meter),
        }
    }
}

/// Both sides plus whose turn it is
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterSnapshot {
    pub state: CombatState,
    pub current_actor: Option<ActorRef>,
    pub ally: SideSnapshot,
    pub opponent: SideSnapshot,
}

impl EncounterSnapshot {
    pub fn side(&self, side: Side) -> &SideSnapshot {
        match side {
            Side::Ally => &self.ally,
            Side::Opponent => &self.opponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BaseStats, CreatureKind, CreatureSheet, SkillId};
    use crate::combat::table::SkillLoadout;

    #[test]
    fn test_capture_orders_by_board_position() {
        let mut table = CombatantTable::new(Side::Ally);
        let sheet = CreatureSheet::new(
            9,
            "Test",
            CreatureKind::Monster,
            BaseStats {
                life: 100.0,
                attack: 1,
                defense: 1,
                magic: 0,
                critical: 0,
                speed: 1.0,
            },
            &[SkillId::Strike],
        );
        table.place(0, &sheet, SkillLoadout::default()).unwrap();
        table.apply_damage(0, 25.0);
        table.swap_positions(0, 2);

        let snapshot = SideSnapshot::capture(&table);
        assert_eq!(snapshot.creature_ids[2], Some(CreatureId(9)));
        assert_eq!(snapshot.creature_ids[0], None);
        assert_eq!(snapshot.life[2], 75.0);
        assert_eq!(snapshot.life_fraction[2], 0.75);
    }
}
