//! Deckswap CLI
//!
//! Command-line tooling for card-swap carousel configurations.
//!
//! # Commands
//!
//! - `deckswap init` - Write a default carousel configuration
//! - `deckswap check` - Validate a configuration file
//! - `deckswap slots` - Print the resting slot of every depth
//! - `deckswap simulate` - Run a carousel headlessly and report its rotations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deckswap_carousel::{CarouselConfig, Slot};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod simulate;

use simulate::{HoverWindow, ScriptedDrag, SimulationPlan};

#[derive(Parser)]
#[command(name = "deckswap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and simulate card-swap carousels", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Destination file
        #[arg(default_value = "carousel.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file
        path: PathBuf,
    },

    /// Print the resting slot of every depth
    Slots {
        /// Configuration file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of cards in the stack
        #[arg(short = 'n', long, default_value = "4")]
        cards: usize,
    },

    /// Run a carousel headlessly and report its rotations
    Simulate {
        /// Configuration file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of cards in the stack
        #[arg(short = 'n', long, default_value = "4")]
        cards: usize,

        /// Simulated time in milliseconds
        #[arg(short, long, default_value = "20000")]
        duration_ms: f32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Release a drag on the front card at this time
        #[arg(long, requires = "drag_dx")]
        drag_at: Option<f32>,

        /// Horizontal drag displacement in pixels
        #[arg(long, requires = "drag_at", allow_hyphen_values = true)]
        drag_dx: Option<f32>,

        /// Horizontal release velocity in px/ms
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        drag_velocity: f32,

        /// Pointer enters the carousel at this time
        #[arg(long, requires = "hover_to")]
        hover_from: Option<f32>,

        /// Pointer leaves the carousel at this time
        #[arg(long, requires = "hover_from")]
        hover_to: Option<f32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Check { path } => cmd_check(&path),
        Commands::Slots { config, cards } => cmd_slots(config.as_deref(), cards),
        Commands::Simulate {
            config,
            cards,
            duration_ms,
            fps,
            drag_at,
            drag_dx,
            drag_velocity,
            hover_from,
            hover_to,
            json,
        } => {
            let plan = SimulationPlan {
                cards,
                duration_ms,
                fps,
                drag: drag_at.zip(drag_dx).map(|(at_ms, dx)| ScriptedDrag {
                    at_ms,
                    dx,
                    velocity: drag_velocity,
                }),
                hover: hover_from
                    .zip(hover_to)
                    .map(|(from_ms, to_ms)| HoverWindow { from_ms, to_ms }),
            };
            cmd_simulate(config.as_deref(), &plan, json)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CarouselConfig> {
    match path {
        Some(path) => CarouselConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => Ok(CarouselConfig::default()),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    CarouselConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    let timing = config.timing();

    info!("{} is valid", path.display());
    info!(
        "  profile: {} (drop {}ms, move {}ms, return {}ms)",
        config.easing.name(),
        timing.drop_ms,
        timing.move_ms,
        timing.return_ms
    );
    if config.delay_ms == 0 {
        warn!("  delay_ms is 0; the carousel only rotates on drag");
    } else {
        info!("  auto-advance every {}ms", config.delay_ms);
    }

    Ok(())
}

fn cmd_slots(config: Option<&Path>, cards: usize) -> Result<()> {
    let config = load_config(config)?;

    println!(
        "{:>5} {:>9} {:>9} {:>9} {:>7} {:>7}",
        "depth", "x", "y", "z", "scale", "z-index"
    );
    for depth in 0..cards {
        let slot = Slot::at(depth, cards, &config);
        println!(
            "{:>5} {:>9.1} {:>9.1} {:>9.1} {:>7.3} {:>7}",
            depth, slot.x, slot.y, slot.z, slot.scale, slot.z_index
        );
    }

    Ok(())
}

fn cmd_simulate(config: Option<&Path>, plan: &SimulationPlan, json: bool) -> Result<()> {
    let config = load_config(config)?;
    if plan.cards < 2 {
        warn!("Fewer than two cards; nothing will rotate");
    }

    let report = simulate::run(config, plan);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
        return Ok(());
    }

    for rotation in &report.rotations {
        println!(
            "#{:<3} {:>8.0}ms  {:?}",
            rotation.index, rotation.at_ms, rotation.order
        );
    }
    if let Some(triggered) = report.drag_triggered {
        println!("drag: {}", if triggered { "swapped" } else { "returned" });
    }
    println!(
        "{} rotations over {} frames ({} surface updates), final order {:?}, {}",
        report.rotations.len(),
        report.frames,
        report.surface_updates,
        report.final_order,
        report.final_state
    );
    if let Some(topmost) = report.topmost {
        println!("on top: card {}", topmost);
    }

    Ok(())
}
