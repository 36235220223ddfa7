//! Runs the solver against the built-in simulated game and prints each
//! intermediate board.

mod sim;
mod theme;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweepbot_core::{Driver, Outcome};

use crate::sim::{SharedSim, SimGame};
use crate::theme::Theme;

#[derive(Parser)]
#[command(name = "sweepbot", about = "Plays a simulated mine-clearing game by reading its pixels")]
struct Args {
    /// Board height in cells.
    #[arg(long, default_value_t = 9)]
    rows: u16,

    /// Board width in cells.
    #[arg(long, default_value_t = 9)]
    cols: u16,

    /// Number of mines to place.
    #[arg(long, default_value_t = 10)]
    mines: u32,

    /// Seed for the mine layout.
    #[arg(long, default_value_t = 0)]
    layout_seed: u64,

    /// Seed for the fallback guesser.
    #[arg(long, default_value_t = 0)]
    guess_seed: u64,

    /// Pause between iterations, for watching the solve.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Give up after this many iterations without a terminal board.
    #[arg(long, default_value_t = 1000)]
    max_iterations: u32,

    /// TOML theme file; defaults to the classic skin.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Write the final board as JSON to this path.
    #[arg(long)]
    dump: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let total = u32::from(args.rows) * u32::from(args.cols);
    if args.mines > total {
        bail!("{} mines do not fit on a {}x{} board", args.mines, args.rows, args.cols);
    }

    let theme = match &args.theme {
        Some(path) => Theme::load(path)?,
        None => Theme::default(),
    };

    log::info!(
        "playing {}x{} with {} mines, layout seed {}, guess seed {}",
        args.rows,
        args.cols,
        args.mines,
        args.layout_seed,
        args.guess_seed
    );

    let game = SharedSim::new(
        SimGame::new(args.rows, args.cols, args.mines, args.layout_seed)
            .themed(theme.geometry, theme.palette.clone())?,
    );
    let mut driver = Driver::new(
        game.clone(),
        game,
        SmallRng::seed_from_u64(args.guess_seed),
        theme.geometry,
        theme.palette,
    );

    let mut outcome = None;
    let mut final_board = None;
    for iteration in 1..=args.max_iterations {
        let step = driver.step()?;
        log::debug!(
            "iteration {iteration}: {} revealed, {} flagged, fallback {:?}",
            step.revealed.len(),
            step.flagged.len(),
            step.fallback
        );
        println!("iteration {iteration}:\n{}", step.board);
        outcome = step.outcome;
        final_board = Some(step.board);
        if outcome.is_some() {
            break;
        }
        if args.delay_ms > 0 {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    match outcome {
        Some(Outcome::Won) => println!("cleared the board"),
        Some(Outcome::Lost) => println!("hit a mine"),
        None => println!("gave up after {} iterations", args.max_iterations),
    }

    if let (Some(path), Some(board)) = (&args.dump, &final_board) {
        let file = File::create(path)
            .with_context(|| format!("creating dump file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), board)
            .context("writing board dump")?;
    }

    Ok(())
}
