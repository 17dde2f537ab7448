//! Headless autoplay runner
//!
//! Drives the engine through full game cycles at a chosen setting,
//! optionally persisting session and history to a data directory so a
//! run can be resumed and its slump graph inspected.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ps_engine::{GameEngine, GameState, REEL_COUNT};
use ps_store::{HistoryRecord, SlotStore};

#[derive(Parser)]
#[command(name = "ps-sim", about = "Pachislot autoplay simulator")]
struct Cli {
    /// Number of games to play
    #[arg(short, long, default_value_t = 1000)]
    games: u64,

    /// Probability-table setting (1-6); defaults to the saved or
    /// factory setting when omitted
    #[arg(short, long)]
    setting: Option<u8>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Persist session and history under this directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Skip frame-accurate pumping and jump the clock between events
    #[arg(long)]
    turbo: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut engine = GameEngine::new();
    if let Some(seed) = cli.seed {
        engine.seed(seed);
    }
    let store = match &cli.data_dir {
        Some(dir) => {
            let store = SlotStore::open(dir)
                .with_context(|| format!("opening store at {}", dir.display()))?;
            if let Some(snapshot) = store.load_snapshot()? {
                log::info!(
                    "resuming session: {} games, credit {}",
                    snapshot.total_games,
                    snapshot.credit
                );
                engine.restore(&snapshot);
            }
            Some(store)
        }
        None => None,
    };

    // An explicit setting overrides whatever the snapshot restored
    if let Some(setting) = cli.setting {
        if !engine.change_setting(setting) {
            anyhow::bail!("setting must be 1-6, got {setting}");
        }
    }

    let played = run(&mut engine, cli.games, cli.turbo, store.as_ref())?;

    if let Some(store) = &store {
        store.save_snapshot(&engine.snapshot())?;
    }

    report(&engine, played);
    Ok(())
}

/// Play up to `games` full cycles; stops early when the credit runs dry
fn run(
    engine: &mut GameEngine,
    games: u64,
    turbo: bool,
    store: Option<&SlotStore>,
) -> Result<u64> {
    let mut played = 0;
    for _ in 0..games {
        if !engine.place_bet() {
            log::warn!("credit exhausted after {played} games");
            break;
        }
        if !engine.pull_lever() {
            anyhow::bail!("lever refused in state {:?}", engine.game_state());
        }

        pump(engine, 400.0, turbo);
        for reel in 0..REEL_COUNT {
            if !engine.stop_reel(reel) {
                anyhow::bail!("reel {reel} refused to stop");
            }
            pump(engine, 100.0, turbo);
        }
        if engine.game_state() != GameState::Ready {
            anyhow::bail!("game did not settle: {:?}", engine.game_state());
        }
        played += 1;

        if engine.take_history_due() {
            if let Some(store) = store {
                store.append_history(HistoryRecord::from_snapshot(&engine.snapshot()))?;
            }
        }
    }
    Ok(played)
}

/// Advance the engine clock by `total_ms`, frame by frame unless turbo
fn pump(engine: &mut GameEngine, total_ms: f64, turbo: bool) {
    if turbo {
        engine.advance(total_ms);
        return;
    }
    let frame = 1000.0 / 60.0;
    let mut elapsed = 0.0;
    while elapsed < total_ms {
        engine.advance(frame);
        elapsed += frame;
    }
}

fn report(engine: &GameEngine, played: u64) {
    println!("games played       {played}");
    println!("total games        {}", engine.total_games());
    println!("credit             {}", engine.credit());
    println!("coin difference    {}", engine.coin_difference());
    println!("BIG bonuses        {}", engine.big_count());
    println!("REG bonuses        {}", engine.reg_count());
    if engine.total_games() > 0 {
        let bonuses = (engine.big_count() + engine.reg_count()) as f64;
        if bonuses > 0.0 {
            println!(
                "bonus interval     1/{:.1}",
                engine.total_games() as f64 / bonuses
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_flag_is_optional() {
        let cli = Cli::try_parse_from(["ps-sim", "--games", "10"]).unwrap();
        assert_eq!(cli.setting, None);

        let cli = Cli::try_parse_from(["ps-sim", "--setting", "4"]).unwrap();
        assert_eq!(cli.setting, Some(4));
    }

    #[test]
    fn test_run_plays_requested_games() {
        let mut engine = GameEngine::new();
        engine.seed(1);
        let played = run(&mut engine, 50, true, None).unwrap();
        assert_eq!(played, 50);
        assert_eq!(engine.total_games(), 50);
        assert_eq!(engine.game_state(), GameState::Ready);
    }

    #[test]
    fn test_run_persists_history_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        let mut engine = GameEngine::new();
        engine.seed(2);
        run(&mut engine, 90, true, Some(&store)).unwrap();

        let records = store.load_history().unwrap();
        assert!(!records.is_empty());
        // Interval records land on multiples of 30 unless a bonus queued one
        assert!(records.iter().any(|r| r.game_number % 30 == 0));
    }
}
