//! Event builders: the only place skill math lives
//!
//! Active skills run in two phases. `declare` shapes an event so passives can
//! react to it before any numbers exist; `resolve` later fills in damage from
//! the board as it stands then, which may differ after an intercept.
//! Passive skills have a single `trigger` phase.

use crate::catalog::CreatureKind;
use crate::combat::constants::{
    BODYGUARD_LIFE_THRESHOLD, CLEAVE_SCALE, CLEAVE_UNDEAD_SCALE, STRIKE_SCALE, STRIKE_UNDEAD_SCALE,
    THORNS_REFLECT_RATIO,
};
use crate::combat::event::{EffectMask, Event, ReactionQueues, ReactionTier};
use crate::combat::intent::Intent;
use crate::combat::passive::{always, Observed, PassiveCategory, PassiveGuard};
use crate::combat::table::CombatantTable;
use crate::core::error::Result;
use crate::core::types::{TableIndex, SIDE_SIZE};

/// `scale * attack / defense` in integer arithmetic
fn ratio_damage(scale: u64, attack: u32, defense: u32) -> f32 {
    (scale * attack as u64 / defense.max(1) as u64) as f32
}

/// Skills that act on the acting combatant's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveSkill {
    /// Single target
    Strike,
    /// Every opposing position
    Cleave,
}

impl ActiveSkill {
    /// Shape the event; no numbers yet
    pub fn declare(self, _owner: &CombatantTable, _other: &CombatantTable, intent: &Intent) -> Event {
        match self {
            ActiveSkill::Strike => Event::single(*intent, EffectMask::DAMAGE),
            ActiveSkill::Cleave => Event::area(*intent, EffectMask::DAMAGE),
        }
    }

    /// Write per-position damage into the event
    ///
    /// Reads the event's own intent, not the one it was declared with, so a
    /// redirect by an intercept is honoured.
    pub fn resolve(self, owner: &CombatantTable, other: &CombatantTable, event: &mut Event) {
        let attack = owner.attack[event.intent.owner_index];

        match self {
            ActiveSkill::Strike => {
                let target_pos = event.intent.target_pos;
                let target = other.index_of(target_pos);
                if !other.occupied[target] {
                    return;
                }

                let scale = match other.kind[target] {
                    CreatureKind::Undead => STRIKE_UNDEAD_SCALE,
                    _ => STRIKE_SCALE,
                };
                event.other_damage[target_pos] = ratio_damage(scale, attack, other.defense[target]);
            }
            ActiveSkill::Cleave => {
                for pos in 0..SIDE_SIZE {
                    let target = other.index_of(pos);
                    if !other.occupied[target] {
                        continue;
                    }

                    let scale = match other.kind[target] {
                        CreatureKind::Undead => CLEAVE_UNDEAD_SCALE,
                        _ => CLEAVE_SCALE,
                    };
                    event.other_damage[pos] = ratio_damage(scale, attack, other.defense[target]);
                }
            }
        }
    }
}

/// Everything a passive may look at or touch when it fires
pub struct PassiveContext<'a> {
    /// Table of the reacting side
    pub owner: &'a CombatantTable,
    /// Table of the side that caused the event
    pub other: &'a CombatantTable,
    /// The reacting owner and skill slot
    pub intent: Intent,
    /// The triggering event, still unresolved
    pub event: &'a mut Event,
    pub reactions: &'a mut ReactionQueues,
}

/// Still standing, but below the bodyguard threshold
fn target_badly_wounded(owner: &CombatantTable, _other: &CombatantTable, intent: &Intent) -> bool {
    let target = owner.index_of(intent.target_pos);
    owner.is_alive(target) && owner.life_fraction[target] < BODYGUARD_LIFE_THRESHOLD
}

fn caster_alive(_owner: &CombatantTable, other: &CombatantTable, intent: &Intent) -> bool {
    other.is_alive(intent.owner_index)
}

/// Standing reactive skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassiveSkill {
    /// Negates damage aimed at its owner
    Evade,
    /// Takes a single-target hit meant for a badly wounded ally
    Bodyguard,
    /// Reflects part of its owner's defense at the attacker
    Thorns,
    /// Queues a counter strike against the attacker
    Riposte,
}

impl PassiveSkill {
    pub fn category(self) -> PassiveCategory {
        match self {
            PassiveSkill::Evade => PassiveCategory::Negate,
            PassiveSkill::Bodyguard => PassiveCategory::Intercept,
            PassiveSkill::Thorns | PassiveSkill::Riposte => PassiveCategory::React,
        }
    }

    pub fn observed_effects(self) -> EffectMask {
        EffectMask::DAMAGE
    }

    /// (observed caster, observed target) for a passive owned by `owner_index`
    pub fn observers(self, owner_index: TableIndex) -> (Observed, Observed) {
        match self {
            PassiveSkill::Bodyguard => (Observed::Any, Observed::Ignored),
            PassiveSkill::Evade | PassiveSkill::Thorns | PassiveSkill::Riposte => {
                (Observed::Ignored, Observed::Index(owner_index))
            }
        }
    }

    /// Whether firing against `event` would do anything at all
    ///
    /// Checked alongside the guard, so a passive that cannot act never takes
    /// a single-fire slot.
    pub fn applies_to(self, event: &Event) -> bool {
        match self {
            PassiveSkill::Bodyguard => !event.is_aoe,
            PassiveSkill::Evade | PassiveSkill::Thorns | PassiveSkill::Riposte => true,
        }
    }

    pub fn guard(self) -> PassiveGuard {
        match self {
            PassiveSkill::Evade | PassiveSkill::Thorns => always,
            PassiveSkill::Bodyguard => target_badly_wounded,
            PassiveSkill::Riposte => caster_alive,
        }
    }

    /// Fire the passive against the in-flight event
    pub fn trigger(self, ctx: PassiveContext<'_>) -> Result<()> {
        let owner_index = ctx.intent.owner_index;
        let owner_pos = ctx.owner.position_of(owner_index);
        let caster_pos = ctx.other.position_of(ctx.event.intent.owner_index);

        match self {
            // The resolver marks the event negated; nothing else to do
            PassiveSkill::Evade => {}
            PassiveSkill::Bodyguard => {
                if self.applies_to(ctx.event) && ctx.event.intent.target_pos != owner_pos {
                    tracing::debug!(
                        "{:?} position {} shields position {}",
                        ctx.intent.side,
                        owner_pos,
                        ctx.event.intent.target_pos
                    );
                    ctx.event.retarget(owner_pos);
                }
            }
            PassiveSkill::Thorns => {
                let reflected = ctx.owner.defense[owner_index] as f32 * THORNS_REFLECT_RATIO;
                ctx.event.own_damage[caster_pos] += reflected;
            }
            PassiveSkill::Riposte => {
                let counter = Intent::new(ctx.intent.side, owner_index, ctx.intent.skill_slot, caster_pos);
                ctx.reactions
                    .push(ReactionTier::Slow, Event::single(counter, EffectMask::DAMAGE))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BaseStats, CreatureSheet, SkillId};
    use crate::combat::table::SkillLoadout;
    use crate::core::config::QueueCapacities;
    use crate::core::types::Side;

    fn table(side: Side, members: &[(usize, CreatureKind, u32, u32)]) -> CombatantTable {
        let mut table = CombatantTable::new(side);
        for (index, kind, attack, defense) in members {
            let sheet = CreatureSheet::new(
                *index as u32,
                "Test",
                *kind,
                BaseStats {
                    life: 1000.0,
                    attack: *attack,
                    defense: *defense,
                    magic: 0,
                    critical: 0,
                    speed: 100.0,
                },
                &[SkillId::Strike],
            );
            table.place(*index, &sheet, SkillLoadout::default()).unwrap();
        }
        table
    }

    #[test]
    fn test_strike_declare_has_no_numbers() {
        let owner = table(Side::Ally, &[(0, CreatureKind::Monster, 100, 100)]);
        let other = table(Side::Opponent, &[(0, CreatureKind::Monster, 100, 100)]);
        let intent = Intent::new(Side::Ally, 0, 0, 0);

        let event = ActiveSkill::Strike.declare(&owner, &other, &intent);
        assert!(!event.is_aoe);
        assert_eq!(event.effects, EffectMask::DAMAGE);
        assert_eq!(event.total_other_damage(), 0.0);
    }

    #[test]
    fn test_strike_damage_formula() {
        let owner = table(Side::Ally, &[(0, CreatureKind::Monster, 100, 100)]);
        let other = table(
            Side::Opponent,
            &[(0, CreatureKind::Monster, 100, 100), (1, CreatureKind::Undead, 100, 100)],
        );

        let intent = Intent::new(Side::Ally, 0, 0, 0);
        let mut event = ActiveSkill::Strike.declare(&owner, &other, &intent);
        ActiveSkill::Strike.resolve(&owner, &other, &mut event);
        assert_eq!(event.other_damage, [200.0, 0.0, 0.0, 0.0, 0.0]);

        let intent = Intent::new(Side::Ally, 0, 0, 1);
        let mut event = ActiveSkill::Strike.declare(&owner, &other, &intent);
        ActiveSkill::Strike.resolve(&owner, &other, &mut event);
        assert_eq!(event.other_damage[1], 400.0);
    }

    #[test]
    fn test_strike_uses_integer_division() {
        let owner = table(Side::Ally, &[(0, CreatureKind::Monster, 10, 100)]);
        let other = table(Side::Opponent, &[(0, CreatureKind::Monster, 100, 30)]);
        let intent = Intent::new(Side::Ally, 0, 0, 0);

        let mut event = ActiveSkill::Strike.declare(&owner, &other, &intent);
        ActiveSkill::Strike.resolve(&owner, &other, &mut event);
        // 200 * 10 / 30 = 66 (truncated)
        assert_eq!(event.other_damage[0], 66.0);
    }

    #[test]
    fn test_strike_on_empty_slot_deals_nothing() {
        let owner = table(Side::Ally, &[(0, CreatureKind::Monster, 100, 100)]);
        let other = table(Side::Opponent, &[(0, CreatureKind::Monster, 100, 100)]);
        let intent = Intent::new(Side::Ally, 0, 0, 3);

        let mut event = ActiveSkill::Strike.declare(&owner, &other, &intent);
        ActiveSkill::Strike.resolve(&owner, &other, &mut event);
        assert_eq!(event.total_other_damage(), 0.0);
    }

    #[test]
    fn test_cleave_hits_only_occupied_positions() {
        let owner = table(Side::Ally, &[(0, CreatureKind::Monster, 100, 100)]);
        let other = table(
            Side::Opponent,
            &[(0, CreatureKind::Monster, 100, 100), (2, CreatureKind::Undead, 100, 100), (4, CreatureKind::Monster, 100, 50)],
        );
        let intent = Intent::new(Side::Ally, 0, 1, 0);

        let mut event = ActiveSkill::Cleave.declare(&owner, &other, &intent);
        assert!(event.is_aoe);
        ActiveSkill::Cleave.resolve(&owner, &other, &mut event);
        assert_eq!(event.other_damage, [100.0, 0.0, 200.0, 0.0, 200.0]);
    }

    #[test]
    fn test_bodyguard_redirects_single_target() {
        let owner = table(
            Side::Opponent,
            &[(0, CreatureKind::Monster, 100, 100), (3, CreatureKind::Monster, 100, 100)],
        );
        let other = table(Side::Ally, &[(1, CreatureKind::Monster, 100, 100)]);
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut event = Event::single(Intent::new(Side::Ally, 1, 0, 0), EffectMask::DAMAGE);

        PassiveSkill::Bodyguard
            .trigger(PassiveContext {
                owner: &owner,
                other: &other,
                intent: Intent::new(Side::Opponent, 3, 2, 3),
                event: &mut event,
                reactions: &mut reactions,
            })
            .unwrap();

        assert_eq!(event.intent.target_pos, 3);
        assert!(event.target_mask.contains(3));
    }

    #[test]
    fn test_thorns_reflects_at_caster_position() {
        let owner = table(Side::Opponent, &[(0, CreatureKind::Monster, 100, 80)]);
        let other = table(Side::Ally, &[(2, CreatureKind::Monster, 100, 100)]);
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut event = Event::single(Intent::new(Side::Ally, 2, 0, 0), EffectMask::DAMAGE);

        PassiveSkill::Thorns
            .trigger(PassiveContext {
                owner: &owner,
                other: &other,
                intent: Intent::new(Side::Opponent, 0, 2, 0),
                event: &mut event,
                reactions: &mut reactions,
            })
            .unwrap();

        assert_eq!(event.own_damage[2], 40.0);
        assert_eq!(event.total_other_damage(), 0.0);
    }

    #[test]
    fn test_riposte_queues_counter_on_slow_tier() {
        let owner = table(Side::Opponent, &[(1, CreatureKind::Monster, 100, 100)]);
        let other = table(Side::Ally, &[(4, CreatureKind::Monster, 100, 100)]);
        let mut reactions = ReactionQueues::new(&QueueCapacities::default());
        let mut event = Event::single(Intent::new(Side::Ally, 4, 0, 1), EffectMask::DAMAGE);

        PassiveSkill::Riposte
            .trigger(PassiveContext {
                owner: &owner,
                other: &other,
                intent: Intent::new(Side::Opponent, 1, 2, 1),
                event: &mut event,
                reactions: &mut reactions,
            })
            .unwrap();

        let slow = reactions.tier(ReactionTier::Slow);
        assert_eq!(slow.len(), 1);
        assert_eq!(slow.events()[0].intent.side, Side::Opponent);
        assert_eq!(slow.events()[0].intent.target_pos, 4);
    }

    #[test]
    fn test_bodyguard_ignores_defeated_ally() {
        let mut owner = table(
            Side::Opponent,
            &[(0, CreatureKind::Monster, 100, 100), (1, CreatureKind::Monster, 100, 100)],
        );
        let other = table(Side::Ally, &[(0, CreatureKind::Monster, 100, 100)]);
        owner.apply_damage(0, 5000.0);
        assert!(!owner.is_alive(0));

        let guard = PassiveSkill::Bodyguard.guard();
        assert!(!guard(&owner, &other, &Intent::new(Side::Ally, 0, 0, 0)));
    }

    #[test]
    fn test_bodyguard_does_not_apply_to_area_events() {
        let intent = Intent::new(Side::Ally, 0, 1, 0);
        assert!(!PassiveSkill::Bodyguard.applies_to(&Event::area(intent, EffectMask::DAMAGE)));
        assert!(PassiveSkill::Bodyguard.applies_to(&Event::single(intent, EffectMask::DAMAGE)));
        assert!(PassiveSkill::Thorns.applies_to(&Event::area(intent, EffectMask::DAMAGE)));
    }

    #[test]
    fn test_bodyguard_guard_checks_target_life() {
        let mut owner = table(Side::Opponent, &[(0, CreatureKind::Monster, 100, 100)]);
        let other = table(Side::Ally, &[(0, CreatureKind::Monster, 100, 100)]);
        let intent = Intent::new(Side::Ally, 0, 0, 0);

        let guard = PassiveSkill::Bodyguard.guard();
        assert!(!guard(&owner, &other, &intent));

        owner.apply_damage(0, 600.0);
        assert!(guard(&owner, &other, &intent));
    }
}
