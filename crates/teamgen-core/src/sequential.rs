use crate::error::ValidationError;
use crate::run::{empty_teams, place_in_smallest, shuffled, validate_team_count};
use crate::types::{Assignment, Member, RunPhase, Team};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Manually stepped draft: members leave a shuffled queue one at a time and
/// always join the currently smallest team.
pub struct SequentialAllocator<R = StdRng> {
    rng: R,
    phase: RunPhase,
    teams: Vec<Team>,
    queue: VecDeque<Member>,
    error: Option<ValidationError>,
}

impl SequentialAllocator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for SequentialAllocator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SequentialAllocator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            phase: RunPhase::Idle,
            teams: Vec::new(),
            queue: VecDeque::new(),
            error: None,
        }
    }

    /// Begin a run over a snapshot of `roster`. A rejected start leaves the
    /// allocator exactly as it was apart from the recorded error.
    pub fn start(&mut self, roster: &[Member], team_count: i64) -> Result<(), ValidationError> {
        let count = match validate_team_count(roster.len(), team_count) {
            Ok(count) => count,
            Err(e) => {
                warn!(team_count, members = roster.len(), error = %e, "sequential run rejected");
                self.error = Some(e);
                return Err(e);
            }
        };

        self.error = None;
        self.queue = shuffled(roster, &mut self.rng).into();
        self.teams = empty_teams(count);
        self.phase = RunPhase::Active;
        debug!(members = roster.len(), teams = count, "sequential run started");
        Ok(())
    }

    /// Move the front of the queue into the smallest team.
    ///
    /// Returns `None` when there is nothing left to assign; an active run with
    /// an empty queue drops back to idle.
    pub fn assign_next(&mut self) -> Option<Assignment> {
        if self.phase != RunPhase::Active {
            return None;
        }
        let Some(member) = self.queue.pop_front() else {
            self.phase = RunPhase::Idle;
            return None;
        };

        let assignment = place_in_smallest(&mut self.teams, member)?;
        debug!(
            member = %assignment.member.name,
            team = %assignment.team_name,
            remaining = self.queue.len(),
            "member assigned"
        );

        if self.queue.is_empty() {
            self.phase = RunPhase::Idle;
            info!(teams = self.teams.len(), "sequential run complete");
        }
        Some(assignment)
    }

    pub fn reset(&mut self) {
        self.teams.clear();
        self.queue.clear();
        self.phase = RunPhase::Idle;
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Members still waiting, front of the queue first.
    pub fn remaining(&self) -> impl Iterator<Item = &Member> {
        self.queue.iter()
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.len()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
