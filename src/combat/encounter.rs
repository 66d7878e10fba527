//! Encounter: owns all per-fight state and drives the turn pipeline
//!
//! Lifecycle is `setup` -> `roll_initiative` -> repeated `submit_turn` until a
//! side has nobody standing. Every turn either applies completely or not at
//! all: the tables are checkpointed before the first event is declared.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{CreatureId, Roster, RosterLookup, SkillLookup};
use crate::combat::builders::ActiveSkill;
use crate::combat::event::{EventQueue, ReactionQueues};
use crate::combat::intent::Intent;
use crate::combat::passive::PassiveRegistries;
use crate::combat::pipeline::{apply_event_damage, decided_winner, CombatState, DamageDealt, EventOutcome, TurnReport};
use crate::combat::resolver::trigger_passives;
use crate::combat::scheduler::{select_next_actor, Selection};
use crate::combat::snapshot::{EncounterSnapshot, SideSnapshot};
use crate::combat::table::{CombatantTable, SkillLoadout};
use crate::core::config::EncounterConfig;
use crate::core::error::{EncounterError, Result};
use crate::core::types::{ActorRef, BoardPos, Side, MAX_SKILLS, SIDE_SIZE};

/// One 5v5 fight
#[derive(Debug)]
pub struct Encounter {
    config: EncounterConfig,
    tables: [CombatantTable; 2],
    passives: PassiveRegistries,
    main: EventQueue,
    reactions: ReactionQueues,
    rng: ChaCha8Rng,
    current: Option<Selection>,
    state: CombatState,
}

/// Outcome of the fallible part of a turn, committed only on success
struct TurnResult {
    events: Vec<EventOutcome>,
    state: CombatState,
    next: Option<Selection>,
}

impl Encounter {
    /// Validate `config` and build an empty encounter seeded from it
    pub fn new(config: EncounterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Default capacities with the given tie-break seed
    pub fn with_seed(seed: u64) -> Self {
        Self::build(EncounterConfig::default().with_seed(seed))
    }

    fn build(config: EncounterConfig) -> Self {
        Self {
            tables: [CombatantTable::new(Side::Ally), CombatantTable::new(Side::Opponent)],
            passives: PassiveRegistries::new(config.registry_capacity),
            main: EventQueue::new("main", config.queues.main),
            reactions: ReactionQueues::new(&config.queues),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            current: None,
            state: CombatState::Idle,
            config,
        }
    }

    /// Populate both tables from the rosters and register every passive
    ///
    /// Creature ids the catalog does not know leave their slot empty. Any
    /// previous fight on this encounter is discarded.
    pub fn setup<C>(&mut self, catalog: &C, allies: &Roster, opponents: &Roster) -> Result<()>
    where
        C: RosterLookup + SkillLookup,
    {
        let mut tables = [CombatantTable::new(Side::Ally), CombatantTable::new(Side::Opponent)];

        for (table, roster) in tables.iter_mut().zip([allies, opponents]) {
            populate(table, catalog, roster)?;
            if table.occupied_count() == 0 {
                return Err(EncounterError::EmptyRoster(table.side));
            }
        }

        let mut passives = PassiveRegistries::new(self.config.registry_capacity);
        for table in &tables {
            register_passives(&mut passives, table)?;
        }

        tracing::info!(
            "Encounter set up: {} allies vs {} opponents, {} + {} passives",
            tables[0].occupied_count(),
            tables[1].occupied_count(),
            passives.side(Side::Ally).total_len(),
            passives.side(Side::Opponent).total_len()
        );

        self.tables = tables;
        self.passives = passives;
        self.main.clear();
        self.reactions.clear_all();
        self.current = None;
        self.state = CombatState::Idle;
        Ok(())
    }

    /// Zero every meter, reset life fractions and pick the first actor
    ///
    /// Only valid once per `setup`: a running or finished fight must be set
    /// up again before initiative can be rolled.
    pub fn roll_initiative(&mut self) -> Result<ActorRef> {
        match self.state {
            CombatState::Running => return Err(EncounterError::AlreadyStarted),
            CombatState::Ended { .. } => return Err(EncounterError::EncounterOver),
            CombatState::Idle => {}
        }
        if self.tables.iter().all(|t| t.occupied_count() == 0) {
            return Err(EncounterError::NotStarted);
        }

        for table in &mut self.tables {
            table.reset_bars();
        }

        let selection = select_next_actor(&mut self.tables, &mut self.rng)?;
        self.current = Some(selection);
        self.state = CombatState::Running;

        let actor = self.actor_ref(selection);
        tracing::info!("Initiative rolled; {:?} position {} acts first", actor.side, actor.position);
        Ok(actor)
    }

    /// Run the current actor's skill in `skill_slot` against `target_pos`
    pub fn submit_turn(&mut self, skill_slot: usize, target_pos: BoardPos) -> Result<TurnReport> {
        match self.state {
            CombatState::Idle => return Err(EncounterError::NotStarted),
            CombatState::Ended { .. } => return Err(EncounterError::EncounterOver),
            CombatState::Running => {}
        }
        let selection = self.current.ok_or(EncounterError::NotStarted)?;

        if target_pos >= SIDE_SIZE {
            return Err(EncounterError::InvalidTarget(target_pos));
        }
        if skill_slot >= MAX_SKILLS {
            return Err(EncounterError::InvalidSkillSlot(skill_slot));
        }
        let loadout = self.tables[selection.side.index()].skills[selection.index];
        let skill = loadout.ids[skill_slot].ok_or(EncounterError::InvalidSkillSlot(skill_slot))?;
        let active = loadout.active[skill_slot].ok_or(EncounterError::SkillNotActive(skill_slot))?;

        let actor = self.actor_ref(selection);
        let intent = Intent::new(selection.side, selection.index, skill_slot, target_pos);
        tracing::debug!("{:?} position {} uses {:?} on {}", actor.side, actor.position, skill, target_pos);

        let tables_checkpoint = self.tables.clone();
        let rng_checkpoint = self.rng.clone();

        let result = match self.run_turn(active, intent) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Turn by {:?} position {} rolled back: {}", actor.side, actor.position, e);
                self.tables = tables_checkpoint;
                self.rng = rng_checkpoint;
                self.main.clear();
                self.reactions.clear_all();
                return Err(e);
            }
        };

        self.state = result.state;
        self.current = result.next;
        let next_actor = result.next.map(|s| self.actor_ref(s));

        if let CombatState::Ended { winner } = result.state {
            tracing::info!("Encounter over; {:?} wins", winner);
        }

        Ok(TurnReport {
            actor,
            skill,
            events: result.events,
            next_actor,
            state: result.state,
        })
    }

    /// Declare, react, resolve and apply; mutates tables, so callers restore on error
    fn run_turn(&mut self, active: ActiveSkill, intent: Intent) -> Result<TurnResult> {
        let caster = intent.side.index();
        let defender = intent.side.opposite().index();

        self.main.clear();
        let declared = active.declare(&self.tables[caster], &self.tables[defender], &intent);
        self.main.push(declared)?;

        let mut events = Vec::with_capacity(self.main.len());
        for event in self.main.events_mut() {
            let passives = trigger_passives(&self.tables, &self.passives, &mut self.reactions, event, &mut self.rng)?;

            let dealt = if event.is_negated {
                DamageDealt::default()
            } else {
                active.resolve(&self.tables[caster], &self.tables[defender], event);
                apply_event_damage(&mut self.tables, event)
            };

            tracing::debug!(
                "Event {:?}: negated={} dealt={:.0}",
                event.intent,
                event.is_negated,
                dealt.total()
            );

            events.push(EventOutcome {
                intent: event.intent,
                is_aoe: event.is_aoe,
                negated: event.is_negated,
                passives,
                dealt,
            });
        }

        self.tables[caster].meter[intent.owner_index] = 0.0;

        if let Some(winner) = decided_winner(&self.tables, intent.side) {
            return Ok(TurnResult {
                events,
                state: CombatState::Ended { winner },
                next: None,
            });
        }

        let next = select_next_actor(&mut self.tables, &mut self.rng)?;
        Ok(TurnResult {
            events,
            state: CombatState::Running,
            next: Some(next),
        })
    }

    fn actor_ref(&self, selection: Selection) -> ActorRef {
        ActorRef::new(selection.side, self.tables[selection.side.index()].position_of(selection.index))
    }

    /// Creature ids by board position; `None` for empty slots
    pub fn creature_ids(&self, side: Side) -> [Option<CreatureId>; SIDE_SIZE] {
        SideSnapshot::capture(&self.tables[side.index()]).creature_ids
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            state: self.state,
            current_actor: self.current_actor(),
            ally: SideSnapshot::capture(&self.tables[0]),
            opponent: SideSnapshot::capture(&self.tables[1]),
        }
    }

    /// Whose turn it is, once initiative has been rolled
    pub fn current_actor(&self) -> Option<ActorRef> {
        self.current.map(|s| self.actor_ref(s))
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    /// Secondary events raised by passives during the last main event
    pub fn pending_reactions(&self) -> &ReactionQueues {
        &self.reactions
    }

    pub fn table(&self, side: Side) -> &CombatantTable {
        &self.tables[side.index()]
    }

    pub fn passives(&self) -> &PassiveRegistries {
        &self.passives
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }
}

/// Fill one table from a roster; unknown creatures become empty slots
fn populate<C>(table: &mut CombatantTable, catalog: &C, roster: &Roster) -> Result<()>
where
    C: RosterLookup + SkillLookup,
{
    for (pos, slot) in roster.slots.iter().enumerate() {
        let Some(id) = slot else { continue };
        match catalog.creature(*id) {
            Some(sheet) => {
                let loadout = SkillLoadout::resolve(&sheet.skills, catalog);
                table.place(table.index_of(pos), sheet, loadout)?;
            }
            None => {
                tracing::warn!("Unknown creature {:?} at {:?} position {}; slot left empty", id, table.side, pos);
            }
        }
    }
    Ok(())
}

/// Register every equipped passive of a table into its side's registries
fn register_passives(passives: &mut PassiveRegistries, table: &CombatantTable) -> Result<()> {
    for index in 0..SIDE_SIZE {
        if !table.occupied[index] {
            continue;
        }
        let position = table.position_of(index);

        for (slot, passive) in table.skills[index].passive.iter().enumerate() {
            let Some(passive) = passive else { continue };
            let (caster, target) = passive.observers(index);
            passives.side_mut(table.side).get_mut(passive.category()).register(
                Intent::new(table.side, index, slot, position),
                passive.observed_effects(),
                caster,
                target,
                passive.guard(),
            )?;
        }
    }
    Ok(())
}
