//! Initiative scheduler
//!
//! Meters fill continuously at a rate proportional to speed. When nobody is
//! ready the board jumps forward by the smallest step that fills at least one
//! meter; among the ready combatants the fastest acts, ties broken at random.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::combat::constants::METER_FULL;
use crate::combat::table::CombatantTable;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{Side, TableIndex, SIDE_SIZE};

/// A combatant picked to act, by side and table index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub side: Side,
    pub index: TableIndex,
}

/// Among `(candidate, speed)` pairs pick the fastest; equal speeds are a coin toss
pub fn pick_fastest<T: Copy, R: Rng + ?Sized>(candidates: &[(T, f32)], rng: &mut R) -> Option<T> {
    let highest = candidates
        .iter()
        .map(|(_, speed)| *speed)
        .fold(f32::NEG_INFINITY, f32::max);

    let tied: Vec<T> = candidates
        .iter()
        .filter(|(_, speed)| *speed == highest)
        .map(|(candidate, _)| *candidate)
        .collect();

    tied.choose(rng).copied()
}

/// Eligible to take turns: present and still standing
fn eligible(table: &CombatantTable, index: TableIndex) -> bool {
    table.is_alive(index)
}

/// Ready combatants in board order, with their speeds
fn collect_ready(tables: &[CombatantTable; 2]) -> Vec<(Selection, f32)> {
    let mut ready = Vec::new();
    for table in tables {
        for pos in 0..SIDE_SIZE {
            let index = table.index_of(pos);
            if eligible(table, index) && table.meter[index] >= METER_FULL {
                ready.push((
                    Selection {
                        side: table.side,
                        index,
                    },
                    table.speed[index],
                ));
            }
        }
    }
    ready
}

/// Advance every not-yet-ready meter by the smallest step that fills one
///
/// Combatants whose own step equals the minimum land on exactly 1.0, so the
/// re-scan never misses them to rounding.
fn advance_meters(tables: &mut [CombatantTable; 2]) -> Result<()> {
    let mut min_step = f32::INFINITY;
    for table in tables.iter() {
        for index in 0..SIDE_SIZE {
            if eligible(table, index) && table.meter[index] < METER_FULL {
                let step = (METER_FULL - table.meter[index]) / table.speed[index];
                min_step = min_step.min(step);
            }
        }
    }

    if !min_step.is_finite() {
        return Err(EncounterError::NoEligibleActor);
    }

    for table in tables.iter_mut() {
        for index in 0..SIDE_SIZE {
            if !eligible(table, index) || table.meter[index] >= METER_FULL {
                continue;
            }
            let step = (METER_FULL - table.meter[index]) / table.speed[index];
            table.meter[index] = if step <= min_step {
                METER_FULL
            } else {
                (table.meter[index] + min_step * table.speed[index]).min(METER_FULL)
            };
        }
    }

    tracing::trace!("Advanced initiative by {:.5}", min_step);
    Ok(())
}

/// Select the next combatant to act
///
/// Does not reset the chosen combatant's meter; that happens once its turn
/// has fully resolved.
pub fn select_next_actor<R: Rng + ?Sized>(tables: &mut [CombatantTable; 2], rng: &mut R) -> Result<Selection> {
    let mut ready = collect_ready(tables);

    if ready.is_empty() {
        advance_meters(tables)?;
        ready = collect_ready(tables);
    }

    pick_fastest(&ready, rng).ok_or(EncounterError::NoEligibleActor)
}
