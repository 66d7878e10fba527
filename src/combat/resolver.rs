//! Passive trigger resolution
//!
//! For each declared event the opposing side's registries are consulted in a
//! fixed order: negate, then intercept, then react.

use rand::Rng;
use serde::Serialize;

use crate::combat::builders::PassiveContext;
use crate::combat::event::{Event, ReactionQueues};
use crate::combat::intent::Intent;
use crate::combat::passive::{PassiveRegistries, PassiveTable};
use crate::combat::scheduler::pick_fastest;
use crate::combat::table::CombatantTable;
use crate::core::error::Result;
use crate::core::types::SIDE_SIZE;

/// Which passives fired for one event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassiveOutcome {
    pub negated_by: Option<Intent>,
    pub intercepted_by: Option<Intent>,
    pub reactions: Vec<Intent>,
}

impl PassiveOutcome {
    pub fn fired_count(&self) -> usize {
        self.negated_by.is_some() as usize + self.intercepted_by.is_some() as usize + self.reactions.len()
    }
}

/// Does registry entry `entry` respond to `event`?
///
/// Caster and target are matched with OR: either one matching is enough.
/// Entries whose passive could not act on the event never qualify.
pub fn is_valid(
    reactor_table: &CombatantTable,
    caster_table: &CombatantTable,
    registry: &PassiveTable,
    entry: usize,
    event: &Event,
) -> bool {
    let reactor = registry.intent[entry].owner_index;

    if !reactor_table.is_alive(reactor) {
        return false;
    }
    let position = reactor_table.position_of(reactor);
    if position >= SIDE_SIZE || reactor_table.index_of(position) != reactor {
        return false;
    }
    if !registry.observed_effects[entry].intersects(event.effects) {
        return false;
    }

    let caster_match = registry.observed_caster[entry].matches(event.intent.owner_index);
    let target_match = registry.observed_target[entry].matches(reactor_table.index_of(event.intent.target_pos));
    if !(caster_match || target_match) {
        return false;
    }

    let intent = registry.intent[entry];
    let applies = reactor_table.skills[reactor].passive[intent.skill_slot].map_or(true, |p| p.applies_to(event));

    applies && (registry.guard[entry])(reactor_table, caster_table, &event.intent)
}

/// Fastest valid entry, random among equal speeds
fn scan_fastest<R: Rng + ?Sized>(
    reactor_table: &CombatantTable,
    caster_table: &CombatantTable,
    registry: &PassiveTable,
    event: &Event,
    rng: &mut R,
) -> Option<Intent> {
    let candidates: Vec<(Intent, f32)> = (0..registry.len())
        .filter(|i| is_valid(reactor_table, caster_table, registry, *i, event))
        .map(|i| {
            let intent = registry.intent[i];
            (intent, reactor_table.speed[intent.owner_index])
        })
        .collect();

    pick_fastest(&candidates, rng)
}

/// Every valid entry, in registry order
fn scan_all(
    reactor_table: &CombatantTable,
    caster_table: &CombatantTable,
    registry: &PassiveTable,
    event: &Event,
) -> Vec<Intent> {
    (0..registry.len())
        .filter(|i| is_valid(reactor_table, caster_table, registry, *i, event))
        .map(|i| registry.intent[i])
        .collect()
}

/// Run the reacting intent's passive builder against the event
fn fire(
    reactor_table: &CombatantTable,
    caster_table: &CombatantTable,
    intent: Intent,
    event: &mut Event,
    reactions: &mut ReactionQueues,
) -> Result<()> {
    let Some(passive) = reactor_table.skills[intent.owner_index].passive[intent.skill_slot] else {
        tracing::warn!("Registered passive {:?} has no behaviour", intent);
        return Ok(());
    };

    passive.trigger(PassiveContext {
        owner: reactor_table,
        other: caster_table,
        intent,
        event,
        reactions,
    })
}

/// Let the opposing side's passives respond to a freshly declared event
pub fn trigger_passives<R: Rng + ?Sized>(
    tables: &[CombatantTable; 2],
    registries: &PassiveRegistries,
    reactions: &mut ReactionQueues,
    event: &mut Event,
    rng: &mut R,
) -> Result<PassiveOutcome> {
    reactions.clear_all();

    let caster_side = event.intent.side;
    let reactor_side = caster_side.opposite();
    let caster_table = &tables[caster_side.index()];
    let reactor_table = &tables[reactor_side.index()];
    let registry = registries.side(reactor_side);

    let mut outcome = PassiveOutcome::default();

    if let Some(negate) = scan_fastest(reactor_table, caster_table, &registry.negate, event, rng) {
        event.is_negated = true;
        outcome.negated_by = Some(negate);
        tracing::debug!("Event from {:?} negated by {:?}", event.intent, negate);
    }

    if let Some(intercept) = scan_fastest(reactor_table, caster_table, &registry.intercept, event, rng) {
        fire(reactor_table, caster_table, intercept, event, reactions)?;
        outcome.intercepted_by = Some(intercept);
        tracing::debug!("Event from {:?} intercepted by {:?}", event.intent, intercept);
    }

    for react in scan_all(reactor_table, caster_table, &registry.react, event) {
        fire(reactor_table, caster_table, react, event, reactions)?;
        outcome.reactions.push(react);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BaseStats, Catalog, CreatureKind, CreatureSheet, SkillId};
    use crate::combat::builders::PassiveSkill;
    use crate::combat::event::{EffectMask, ReactionTier, TargetMask};
    use crate::combat::passive::{always, Observed, PassiveCategory};
    use crate::combat::table::SkillLoadout;
    use crate::core::config::QueueCapacities;
    use crate::core::types::Side;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn place(table: &mut CombatantTable, index: usize, speed: f32, skills: &[SkillId]) {
        let sheet = CreatureSheet::new(
            index as u32,
            "Test",
            CreatureKind::Monster,
            BaseStats {
                life: 1000.0,
                attack: 100,
                defense: 100,
                magic: 0,
                critical: 0,
                speed,
            },
            skills,
        );
        let loadout = SkillLoadout::resolve(skills, &Catalog::builtin());
        table.place(index, &sheet, loadout).unwrap();
    }

    fn fixture() -> ([CombatantTable; 2], PassiveRegistries) {
        let mut ally = CombatantTable::new(Side::Ally);
        place(&mut ally, 0, 100.0, &[SkillId::Strike]);

        let mut opponent = CombatantTable::new(Side::Opponent);
        place(&mut opponent, 0, 90.0, &[SkillId::Evade]);
        place(&mut opponent, 1, 120.0, &[SkillId::Evade]);
        place(&mut opponent, 2, 80.0, &[SkillId::Thorns]);
        place(&mut opponent, 3, 70.0, &[SkillId::Thorns]);

        ([ally, opponent], PassiveRegistries::new(5))
    }

    fn register(
        registries: &mut PassiveRegistries,
        category: PassiveCategory,
        index: usize,
        caster: Observed,
        target: Observed,
    ) {
        registries
            .side_mut(Side::Opponent)
            .get_mut(category)
            .register(
                Intent::new(Side::Opponent, index, 0, index),
                EffectMask::DAMAGE,
                caster,
                target,
                always,
            )
            .unwrap();
    }

    fn strike_at(position: usize) -> Event {
        Event::single(Intent::new(Side::Ally, 0, 0, position), EffectMask::DAMAGE)
    }

    #[test]
    fn test_no_passives_no_reaction() {
        let (tables, registries) = fixture();
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = strike_at(0);

        let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        assert_eq!(outcome, PassiveOutcome::default());
        assert!(!event.is_negated);
    }

    #[test]
    fn test_only_fastest_negate_fires() {
        let (tables, mut registries) = fixture();
        register(&mut registries, PassiveCategory::Negate, 0, Observed::Any, Observed::Any);
        register(&mut registries, PassiveCategory::Negate, 1, Observed::Any, Observed::Any);
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = strike_at(0);

        let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        assert!(event.is_negated);
        assert_eq!(outcome.negated_by.map(|i| i.owner_index), Some(1));
        assert_eq!(outcome.fired_count(), 1);
    }

    /// Wounded target at position 0, bodyguards at 1 and 2
    fn bodyguard_fixture(speeds: (f32, f32)) -> ([CombatantTable; 2], PassiveRegistries) {
        let mut ally = CombatantTable::new(Side::Ally);
        place(&mut ally, 0, 100.0, &[SkillId::Strike, SkillId::Cleave]);

        let mut opponent = CombatantTable::new(Side::Opponent);
        place(&mut opponent, 0, 50.0, &[SkillId::Strike]);
        place(&mut opponent, 1, speeds.0, &[SkillId::Bodyguard]);
        place(&mut opponent, 2, speeds.1, &[SkillId::Bodyguard]);
        opponent.apply_damage(0, 700.0);

        let mut registries = PassiveRegistries::new(5);
        for index in [1, 2] {
            let (caster, target) = PassiveSkill::Bodyguard.observers(index);
            registries
                .side_mut(Side::Opponent)
                .intercept
                .register(
                    Intent::new(Side::Opponent, index, 0, index),
                    EffectMask::DAMAGE,
                    caster,
                    target,
                    PassiveSkill::Bodyguard.guard(),
                )
                .unwrap();
        }
        ([ally, opponent], registries)
    }

    #[test]
    fn test_only_fastest_intercept_fires() {
        let (tables, registries) = bodyguard_fixture((80.0, 130.0));
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = strike_at(0);

        let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        assert_eq!(outcome.intercepted_by.map(|i| i.owner_index), Some(2));
        assert_eq!(outcome.fired_count(), 1);
        assert_eq!(event.intent.target_pos, 2);
        assert_eq!(event.target_mask, TargetMask::single(2));
    }

    #[test]
    fn test_intercept_tie_fires_once_per_event() {
        let (tables, registries) = bodyguard_fixture((110.0, 110.0));
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let mut winners = [0usize; SIDE_SIZE];
        for _ in 0..400 {
            let mut event = strike_at(0);
            let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
            let winner = outcome.intercepted_by.map(|i| i.owner_index).unwrap();
            // a second bodyguard firing would have moved the target again
            assert_eq!(event.intent.target_pos, winner);
            winners[winner] += 1;
        }
        assert!(winners[1] > 100 && winners[2] > 100, "{:?}", winners);
    }

    #[test]
    fn test_area_event_not_claimed_by_bodyguard() {
        let (tables, registries) = bodyguard_fixture((80.0, 130.0));
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = Event::area(Intent::new(Side::Ally, 0, 1, 0), EffectMask::DAMAGE);

        let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        assert!(outcome.intercepted_by.is_none());
        assert_eq!(event.intent.target_pos, 0);
    }

    #[test]
    fn test_all_valid_reacts_fire_in_registry_order() {
        let (tables, mut registries) = fixture();
        register(&mut registries, PassiveCategory::React, 3, Observed::Any, Observed::Ignored);
        register(&mut registries, PassiveCategory::React, 2, Observed::Any, Observed::Ignored);
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = strike_at(4);

        let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        let order: Vec<usize> = outcome.reactions.iter().map(|i| i.owner_index).collect();
        assert_eq!(order, vec![3, 2]);
        // both thorns reflected at the caster
        assert_eq!(event.own_damage[0], 100.0);
    }

    #[test]
    fn test_target_or_caster_match_is_enough() {
        let (tables, mut registries) = fixture();
        // watches caster 3 (wrong) or target 2 (right)
        register(&mut registries, PassiveCategory::React, 2, Observed::Index(3), Observed::Index(2));
        let registry = &registries.side(Side::Opponent).react;

        assert!(is_valid(&tables[1], &tables[0], registry, 0, &strike_at(2)));
        assert!(!is_valid(&tables[1], &tables[0], registry, 0, &strike_at(1)));
    }

    #[test]
    fn test_ignored_fields_never_match() {
        let (tables, mut registries) = fixture();
        register(&mut registries, PassiveCategory::React, 2, Observed::Ignored, Observed::Ignored);
        let registry = &registries.side(Side::Opponent).react;
        assert!(!is_valid(&tables[1], &tables[0], registry, 0, &strike_at(2)));
    }

    #[test]
    fn test_effect_mask_must_intersect() {
        let (tables, mut registries) = fixture();
        register(&mut registries, PassiveCategory::React, 2, Observed::Any, Observed::Any);
        let registry = &registries.side(Side::Opponent).react;

        let heal = Event::single(Intent::new(Side::Ally, 0, 0, 2), EffectMask::HEAL);
        assert!(!is_valid(&tables[1], &tables[0], registry, 0, &heal));
    }

    #[test]
    fn test_defeated_reactor_does_not_fire() {
        let (mut tables, mut registries) = fixture();
        register(&mut registries, PassiveCategory::Negate, 1, Observed::Any, Observed::Any);
        tables[1].apply_damage(1, 5000.0);
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = strike_at(1);

        let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        assert!(outcome.negated_by.is_none());
        assert!(!event.is_negated);
    }

    #[test]
    fn test_own_side_registries_ignore_own_events() {
        let (tables, mut registries) = fixture();
        registries
            .side_mut(Side::Ally)
            .negate
            .register(Intent::new(Side::Ally, 0, 0, 0), EffectMask::DAMAGE, Observed::Any, Observed::Any, always)
            .unwrap();
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = strike_at(0);

        trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        assert!(!event.is_negated);
    }

    #[test]
    fn test_reaction_queues_cleared_per_event() {
        let (tables, registries) = fixture();
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        reactions.push(ReactionTier::Fast, strike_at(0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut event = strike_at(0);

        trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
        assert_eq!(reactions.total_len(), 0);
    }

    #[test]
    fn test_negate_tie_break_varies_with_seed() {
        let (mut tables, mut registries) = fixture();
        tables[1].speed[0] = 120.0;
        register(&mut registries, PassiveCategory::Negate, 0, Observed::Any, Observed::Any);
        register(&mut registries, PassiveCategory::Negate, 1, Observed::Any, Observed::Any);
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let mut winners = [0usize; 2];
        for _ in 0..400 {
            let mut event = strike_at(0);
            let outcome = trigger_passives(&tables, &registries, &mut reactions, &mut event, &mut rng).unwrap();
            let winner = outcome.negated_by.map(|i| i.owner_index).unwrap_or(99);
            winners[winner] += 1;
        }
        assert!(winners[0] > 100 && winners[1] > 100, "{:?}", winners);
    }
}
