mod game;
mod term;

use std::{fs::File, path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};

use game::{Settings, SnakeGame};

#[derive(Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Terminal snake on a fixed grid")]
struct Cli {
    /// Compressed board description, e.g. "B3x4|W4|W1S1E1W1|W4"
    #[arg(long)]
    board: Option<String>,

    /// Grow by one segment for every food eaten
    #[arg(long)]
    growing: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between game ticks
    #[arg(long, default_value = "120")]
    tick_ms: u64,

    /// Write logs (filtered by RUST_LOG, default "info") to this file.
    /// Logging is off without it, since the game owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let settings = Settings {
        board: cli.board,
        growing: cli.growing,
        seed: cli.seed,
        tick: Duration::from_millis(cli.tick_ms),
    };

    let mut game = SnakeGame::new(settings)?;
    game.run()
}
