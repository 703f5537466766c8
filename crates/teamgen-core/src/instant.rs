use crate::error::ValidationError;
use crate::run::{empty_teams, shuffled, validate_team_count};
use crate::types::{Member, Team};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Split `roster` into `team_count` teams in one step.
///
/// Members are shuffled and then dealt round-robin, so team sizes never
/// differ by more than one.
pub fn generate<R: Rng + ?Sized>(
    roster: &[Member],
    team_count: i64,
    rng: &mut R,
) -> Result<Vec<Team>, ValidationError> {
    let count = validate_team_count(roster.len(), team_count)?;
    let mut teams = empty_teams(count);
    for (i, member) in shuffled(roster, rng).into_iter().enumerate() {
        teams[i % count].members.push(member);
    }
    Ok(teams)
}

// ---------------------------------------------------------------------------
// InstantAllocator
// ---------------------------------------------------------------------------

/// Holds the latest instant split and the latest rejection for display.
pub struct InstantAllocator<R = StdRng> {
    rng: R,
    teams: Vec<Team>,
    error: Option<ValidationError>,
}

impl InstantAllocator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for InstantAllocator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> InstantAllocator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            teams: Vec::new(),
            error: None,
        }
    }

    /// Replace the current teams with a fresh split. On rejection the
    /// previous teams stay in place and the error is kept for display.
    pub fn generate(
        &mut self,
        roster: &[Member],
        team_count: i64,
    ) -> Result<&[Team], ValidationError> {
        match generate(roster, team_count, &mut self.rng) {
            Ok(teams) => {
                info!(members = roster.len(), teams = teams.len(), "instant split generated");
                self.teams = teams;
                self.error = None;
                Ok(&self.teams)
            }
            Err(e) => {
                warn!(team_count, members = roster.len(), error = %e, "instant split rejected");
                self.error = Some(e);
                Err(e)
            }
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
