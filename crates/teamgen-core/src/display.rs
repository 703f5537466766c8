use crate::types::{Member, RunPhase, Team};
use serde::Serialize;
use std::fmt::Write as _;

/// Read-only snapshot of an allocator, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Board<'a> {
    pub phase: RunPhase,
    pub teams: &'a [Team],
    pub assigned: usize,
    pub remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<&'a Member>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> Board<'a> {
    pub fn new(phase: RunPhase, teams: &'a [Team], remaining: usize) -> Self {
        Self {
            phase,
            teams,
            assigned: assigned_count(teams),
            remaining,
            selected: None,
            error: None,
        }
    }

    pub fn with_selected(mut self, selected: Option<&'a Member>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

pub fn assigned_count(teams: &[Team]) -> usize {
    teams.iter().map(Team::len).sum()
}

/// Plain-text listing, one block per team:
///
/// ```text
/// Team 1 (2)
///   - Ada
///   - Grace
/// ```
///
/// Empty teams show `(no members yet)`. No teams renders as an empty string.
pub fn render_teams(teams: &[Team]) -> String {
    let mut out = String::new();
    for (i, team) in teams.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{} ({})", team.name, team.len());
        if team.is_empty() {
            out.push_str("  (no members yet)\n");
        }
        for member in &team.members {
            let _ = writeln!(out, "  - {}", member.name);
        }
    }
    out
}

/// Rows of `[team, members]` for table output.
pub fn team_rows(teams: &[Team]) -> Vec<Vec<String>> {
    teams
        .iter()
        .map(|t| {
            let names: Vec<&str> = t.members.iter().map(|m| m.name.as_str()).collect();
            vec![t.name.clone(), t.len().to_string(), names.join(", ")]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
