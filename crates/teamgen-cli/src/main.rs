mod cmd;
mod output;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, Context, TeamArgs};
use std::path::PathBuf;
use teamgen_core::config::Config;

#[derive(Parser)]
#[command(
    name = "teamgen",
    about = "Split a roster into teams: instant split, sequential draft, or spinning wheel",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (team count default, wheel timings)
    #[arg(long, global = true, env = "TEAMGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Seed the shuffler for a reproducible draw
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log allocation steps to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split every member into teams in one go
    Instant {
        #[command(flatten)]
        team: TeamArgs,
    },

    /// Draft members from a shuffled queue into the smallest team, one at a time
    Sequential {
        #[command(flatten)]
        team: TeamArgs,

        /// Wait for Enter before each assignment
        #[arg(long)]
        step: bool,
    },

    /// Spin a wheel for each pick; every winner joins the smallest team
    Wheel {
        #[command(flatten)]
        team: TeamArgs,

        /// Wait for Enter before each spin
        #[arg(long)]
        step: bool,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = Config::load_or_default(cli.config.as_deref())
        .context("failed to load config")
        .and_then(|config| {
            let ctx = Context {
                config,
                json: cli.json,
                seed: cli.seed,
            };
            match cli.command {
                Commands::Instant { team } => cmd::instant::run(&ctx, team),
                Commands::Sequential { team, step } => cmd::sequential::run(&ctx, team, step),
                Commands::Wheel { team, step } => cmd::wheel::run(&ctx, team, step),
                Commands::Config { subcommand } => cmd::config::run(&ctx, subcommand),
            }
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
