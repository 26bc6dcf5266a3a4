use std::env;

use serde::Serialize;

use crate::combat::{resolve_battle_traced, BattleLog, CombatEntity, Rng};
use crate::data::{catalog, load_scenario, MonsterProfile};
use crate::parallel::WorkerPool;
use crate::trial::{render_json, render_text, run_trial, run_trial_parallel, CombatTrial, TrialMode};

const USAGE: &str = "usage: blu <simulate|battle|catalog|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Battle,
    Catalog,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("battle") => Some(Command::Battle),
        Some("catalog") => Some(Command::Catalog),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run() -> i32 {
    let args: Vec<String> = env::args().collect();
    run_with_args(&args)
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(&args[2..]),
        Some(Command::Battle) => handle_battle(&args[2..]),
        Some(Command::Catalog) => handle_catalog(),
        Some(Command::Validate) => handle_validate(&args[2..]),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Flags shared by `simulate` and `battle`. Unknown flags are a usage error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub samples: Option<usize>,
    pub seed: Option<u64>,
    pub monsters: Vec<String>,
    pub scenario: Option<String>,
    pub gauntlet: bool,
    pub parallel: bool,
    pub workers: Option<usize>,
    pub json: bool,
}

pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--samples" => options.samples = parse_number(iter.next(), "samples"),
            "--seed" => options.seed = parse_number(iter.next(), "seed"),
            "--workers" => options.workers = parse_number(iter.next(), "workers"),
            "--monster" => match iter.next() {
                Some(name) => options.monsters.push(name.clone()),
                None => return Err("--monster needs a name".to_string()),
            },
            "--scenario" => match iter.next() {
                Some(path) => options.scenario = Some(path.clone()),
                None => return Err("--scenario needs a path".to_string()),
            },
            "--gauntlet" => options.gauntlet = true,
            "--parallel" => options.parallel = true,
            "--json" => options.json = true,
            other => return Err(format!("unknown option '{other}'")),
        }
    }
    Ok(options)
}

/// `battle` runs a single fight: only the flags that pick the fight and its seed apply.
pub fn parse_battle_options(args: &[String]) -> Result<RunOptions, String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" | "--monster" | "--scenario" => {
                iter.next();
            }
            other => return Err(format!("option '{other}' does not apply to battle")),
        }
    }
    parse_run_options(args)
}

/// Parse a numeric flag value. A missing or malformed value is reported and ignored so the
/// default applies.
fn parse_number<T: std::str::FromStr>(raw: Option<&String>, name: &str) -> Option<T> {
    match raw {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                eprintln!("invalid {name} '{value}', using default");
                None
            }
        },
        None => {
            eprintln!("missing value for --{name}, using default");
            None
        }
    }
}

/// Assemble the trial from a scenario file (if any), the catalog, and command-line overrides.
fn build_trial(options: &RunOptions) -> Result<CombatTrial, String> {
    let mut trial = match &options.scenario {
        Some(path) => {
            let scenario = load_scenario(path).map_err(|err| err.to_string())?;
            CombatTrial::from_scenario(scenario)
        }
        None => CombatTrial::new(catalog::level_one_player(), vec![catalog::bat()]),
    };

    if !options.monsters.is_empty() {
        trial.monsters = options
            .monsters
            .iter()
            .map(|name| resolve_monster(name, &trial.monsters))
            .collect::<Result<Vec<_>, _>>()?;
    }
    if let Some(samples) = options.samples {
        trial.sample_size = samples;
    }
    if options.seed.is_some() {
        trial.seed = options.seed;
    }
    if options.gauntlet {
        trial.mode = TrialMode::Gauntlet;
    }
    Ok(trial)
}

/// Scenario monsters shadow catalog presets of the same name.
fn resolve_monster(name: &str, loaded: &[MonsterProfile]) -> Result<MonsterProfile, String> {
    loaded
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .cloned()
        .or_else(|| catalog::find_monster(name))
        .ok_or_else(|| format!("unknown monster '{name}'"))
}

fn handle_simulate(args: &[String]) -> i32 {
    let options = match parse_run_options(args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: blu simulate [--samples N] [--seed S] [--monster NAME]... [--scenario PATH] [--gauntlet] [--parallel] [--workers N] [--json]");
            return 2;
        }
    };
    let trial = match build_trial(&options) {
        Ok(trial) => trial,
        Err(err) => {
            eprintln!("simulate failed: {err}");
            return 1;
        }
    };

    let report = if options.parallel {
        let pool = options.workers.map_or_else(WorkerPool::from_env, WorkerPool::with_workers);
        run_trial_parallel(&trial, &pool)
    } else {
        run_trial(&trial)
    };

    if options.json {
        match render_json(&report) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize trial report: {err}");
                return 1;
            }
        }
    } else {
        print!("{}", render_text(&trial, &report));
    }
    0
}

#[derive(Debug, Serialize)]
struct BattleOutput<'a> {
    monster: &'a str,
    seed: Option<u64>,
    player_hp: u32,
    monster_hp: u32,
    battle: BattleLog,
}

fn handle_battle(args: &[String]) -> i32 {
    let options = match parse_battle_options(args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: blu battle [--seed S] [--monster NAME] [--scenario PATH]");
            return 2;
        }
    };
    let trial = match build_trial(&options) {
        Ok(trial) => trial,
        Err(err) => {
            eprintln!("battle failed: {err}");
            return 1;
        }
    };
    let Some(monster) = trial.monsters.first() else {
        eprintln!("battle failed: no monster to fight");
        return 1;
    };

    let mut rng = Rng::from_optional_seed(trial.seed);
    let mut player = CombatEntity::from_profile(trial.player.clone());
    let mut foe = CombatEntity::from_profile(monster.stats.clone());
    let log = resolve_battle_traced(&mut player, &mut foe, &mut rng);

    let payload = BattleOutput {
        monster: &monster.name,
        seed: trial.seed,
        player_hp: player.cur_hp,
        monster_hp: foe.cur_hp,
        battle: log,
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize battle log: {err}");
            1
        }
    }
}

fn handle_catalog() -> i32 {
    match serde_json::to_string_pretty(&catalog::listing()) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize catalog: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.first() else {
        eprintln!("usage: blu validate <scenario.json|scenario.yaml>");
        return 2;
    };

    match load_scenario(path) {
        Ok(scenario) => {
            println!(
                "validation passed: {path} (monsters={}, player skills={})",
                scenario.monsters.len(),
                scenario.player.kit.len()
            );
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}
