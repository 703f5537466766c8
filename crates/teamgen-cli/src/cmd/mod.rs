pub mod config;
pub mod instant;
pub mod sequential;
pub mod wheel;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::BufRead;
use teamgen_core::config::Config;
use teamgen_core::roster::Roster;

/// Settings shared by every subcommand.
pub struct Context {
    pub config: Config,
    pub json: bool,
    pub seed: Option<u64>,
}

impl Context {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Args)]
pub struct TeamArgs {
    /// Number of teams (defaults to `teams` from the config, 2 out of the box)
    #[arg(long, short = 't', allow_negative_numbers = true)]
    teams: Option<i64>,

    /// Member names, in roster order
    names: Vec<String>,
}

impl TeamArgs {
    pub fn roster(&self) -> Roster {
        self.names.iter().collect()
    }

    pub fn team_count(&self, config: &Config) -> i64 {
        self.teams.unwrap_or(i64::from(config.teams))
    }
}

/// Print `prompt` to stderr and wait for a line on stdin.
///
/// Returns false when the user typed `q` or stdin is closed.
pub fn confirm_step(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} [Enter, q to quit] ");
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    Ok(read > 0 && !line.trim().eq_ignore_ascii_case("q"))
}
