mod config;
mod food;
mod game;
mod input;
mod logger;
mod render;
mod session;
mod snake;
mod term;
mod ticker;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::Config;

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser, Debug)]
#[command(name = "snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// TOML config file (defaults to ./snake.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Snake length at the start of each game
    #[arg(long)]
    initial_length: Option<u16>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Terminal columns per grid cell
    #[arg(long)]
    cell_width: Option<u16>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write the log here instead of the default location
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width { config.width = width; }
        if let Some(height) = self.height { config.height = height; }
        if let Some(length) = self.initial_length { config.initial_length = length; }
        if let Some(tick_ms) = self.tick_ms { config.tick_ms = tick_ms; }
        if let Some(cell_width) = self.cell_width { config.cell_width = cell_width; }
        if self.seed.is_some() { config.seed = self.seed; }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_file = logger::init(cli.log_file.as_deref())?;
    log::info!("Starting snake, logging to {}", log_file.display());

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;
    log::info!("Using {:?}", config);

    game::run(&config).await?;

    log::info!("Exiting snake");
    Ok(())
}
