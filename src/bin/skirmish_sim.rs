//! Headless Skirmish Runner
//!
//! Plays a scripted 5v5 encounter and prints every turn report as JSON.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use skirmish::core::types::SIDE_SIZE;
use skirmish::{
    Catalog, CombatState, Encounter, EncounterConfig, EncounterError, EncounterSnapshot, Roster, Side,
    TurnReport,
};

/// Headless Skirmish Runner - scripted encounters with JSON output
#[derive(Parser, Debug)]
#[command(name = "skirmish_sim")]
#[command(about = "Run a scripted 5v5 encounter and print turn reports")]
struct Args {
    /// Encounter config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Creature catalog (TOML); the built-in bestiary when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Tie-break seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Ally creature ids in board order
    #[arg(long, value_delimiter = ',', default_values_t = [0u32, 2])]
    allies: Vec<u32>,

    /// Opponent creature ids in board order
    #[arg(long, value_delimiter = ',', default_values_t = [1u32, 3])]
    opponents: Vec<u32>,

    /// Turn script as skill_slot:target_pos pairs, e.g. "0:0,1:0"
    ///
    /// Once the script runs out every actor strikes the first standing target.
    #[arg(long, value_delimiter = ',')]
    turns: Vec<String>,

    /// Stop after this many submitted turns, skipped ones included
    #[arg(long, default_value_t = 200)]
    max_turns: usize,

    /// Reject rosters naming creatures missing from the catalog
    #[arg(long)]
    strict: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct SimResult {
    seed: u64,
    turns: Vec<TurnReport>,
    final_state: EncounterSnapshot,
    winner: Option<Side>,
}

fn parse_turn(raw: &str) -> Result<(usize, usize), String> {
    let (slot, target) = raw
        .split_once(':')
        .ok_or_else(|| format!("turn '{}' is not skill_slot:target_pos", raw))?;
    let slot = slot.trim().parse().map_err(|e| format!("bad skill slot in '{}': {}", raw, e))?;
    let target = target.trim().parse().map_err(|e| format!("bad target in '{}': {}", raw, e))?;
    Ok((slot, target))
}

/// First standing position on the side opposing the current actor
fn default_target(encounter: &Encounter) -> usize {
    let Some(actor) = encounter.current_actor() else {
        return 0;
    };
    let table = encounter.table(actor.side.opposite());
    (0..SIDE_SIZE)
        .find(|pos| table.is_alive(table.index_of(*pos)))
        .unwrap_or(0)
}

fn run(args: &Args) -> Result<SimResult, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EncounterConfig::load(path)?,
        None => EncounterConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    let script = args
        .turns
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| parse_turn(t))
        .collect::<Result<Vec<_>, _>>()?;

    let allies = Roster::new(&args.allies);
    let opponents = Roster::new(&args.opponents);
    if args.strict {
        catalog.check_roster(&allies)?;
        catalog.check_roster(&opponents)?;
    }

    let mut encounter = Encounter::new(config)?;
    encounter.setup(&catalog, &allies, &opponents)?;
    encounter.roll_initiative()?;

    let mut turns = Vec::new();
    let mut scripted = script.into_iter();
    let mut attempts = 0;

    while encounter.state().is_running() && attempts < args.max_turns {
        attempts += 1;
        let (slot, target) = scripted.next().unwrap_or_else(|| (0, default_target(&encounter)));

        match encounter.submit_turn(slot, target) {
            Ok(report) => turns.push(report),
            // a bad scripted entry is skipped, the actor keeps its turn
            Err(e @ (EncounterError::InvalidSkillSlot(_)
            | EncounterError::SkillNotActive(_)
            | EncounterError::InvalidTarget(_))) => {
                tracing::warn!("Skipping scripted turn {}:{}: {}", slot, target, e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let winner = match encounter.state() {
        CombatState::Ended { winner } => Some(winner),
        _ => None,
    };

    Ok(SimResult {
        seed,
        turns,
        final_state: encounter.snapshot(),
        winner,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!("Starting skirmish simulation");

    let result = match run(&args) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };

    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
