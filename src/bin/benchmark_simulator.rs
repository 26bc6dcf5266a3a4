//! Measure battle throughput and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv
//!        (date, battles_per_sec, battles_per_min, turns_per_sec, turns_per_battle).

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use blu::combat::{resolve_battle, CombatEntity, Rng};
use blu::data::catalog;

const LOG_PATH: &str = "benchmark_log.csv";
const LOG_HEADER: &str = "date,battles_per_sec,battles_per_min,turns_per_sec,turns_per_battle\n";

fn main() {
    blu::logging::init();
    let log = std::env::args().any(|a| a == "--log");

    let player = catalog::level_one_player();
    let bat = catalog::bat();
    let mut rng = Rng::new(7);

    // Run for at least this long or this many battles
    const MIN_DURATION_MS: u128 = 2000;
    const MIN_BATTLES: u64 = 10_000;

    let start = Instant::now();
    let mut battles: u64 = 0;
    let mut turns: u64 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || battles < MIN_BATTLES {
        let mut hero = CombatEntity::from_profile(Arc::clone(&player));
        let mut foe = CombatEntity::from_profile(Arc::clone(&bat.stats));
        turns += u64::from(resolve_battle(&mut hero, &mut foe, &mut rng));
        battles += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let battles_per_sec = battles as f64 / elapsed_secs;
    let battles_per_min = battles_per_sec * 60.0;
    let turns_per_sec = turns as f64 / elapsed_secs;
    let turns_per_battle = turns as f64 / battles as f64;

    println!("Simulator benchmark (level-one player vs {}):", bat.name);
    println!("  Battles:      {}", battles);
    println!("  Duration:     {:.2} s", elapsed_secs);
    println!("  Battles/s:    {:.2}", battles_per_sec);
    println!("  Battles/min:  {:.2}", battles_per_min);
    println!("  Turns/s:      {:.2}", turns_per_sec);
    println!("  Turns/battle: {:.3}", turns_per_battle);

    if log {
        let line = log_row(
            Utc::now(),
            battles_per_sec,
            battles_per_min,
            turns_per_sec,
            turns_per_battle,
        );
        if let Err(err) = append_log_line(&line) {
            eprintln!("failed to append {LOG_PATH}: {err}");
            std::process::exit(1);
        }
        println!("Appended to {LOG_PATH}");
    }
}

fn log_row(
    date: DateTime<Utc>,
    battles_per_sec: f64,
    battles_per_min: f64,
    turns_per_sec: f64,
    turns_per_battle: f64,
) -> String {
    format!(
        "{},{:.4},{:.4},{:.4},{:.4}\n",
        date.format("%Y-%m-%dT%H:%M:%SZ"),
        battles_per_sec,
        battles_per_min,
        turns_per_sec,
        turns_per_battle
    )
}

fn append_log_line(line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(LOG_HEADER.as_bytes())?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}
