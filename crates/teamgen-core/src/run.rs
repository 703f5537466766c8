//! Building blocks shared by every allocation strategy.

use crate::error::ValidationError;
use crate::types::{Assignment, Member, Team};
use rand::seq::SliceRandom;
use rand::Rng;

/// Check a requested team count against the roster size.
///
/// Rules apply in order and the first failure wins: an empty roster, then a
/// non-positive count, then a count larger than the roster.
pub fn validate_team_count(
    member_count: usize,
    team_count: i64,
) -> Result<usize, ValidationError> {
    if member_count == 0 {
        return Err(ValidationError::NoMembers);
    }
    if team_count <= 0 {
        return Err(ValidationError::TeamCountTooSmall);
    }
    let teams =
        usize::try_from(team_count).map_err(|_| ValidationError::TeamCountExceedsMembers)?;
    if teams > member_count {
        return Err(ValidationError::TeamCountExceedsMembers);
    }
    Ok(teams)
}

/// `count` empty teams numbered `1..=count`.
pub fn empty_teams(count: usize) -> Vec<Team> {
    (1..=count).map(Team::numbered).collect()
}

/// Copy of `roster` in uniformly random order (Fisher–Yates).
pub fn shuffled<R: Rng + ?Sized>(roster: &[Member], rng: &mut R) -> Vec<Member> {
    let mut queue = roster.to_vec();
    queue.shuffle(rng);
    queue
}

/// Index of the team with the fewest members; ties go to the lowest index.
pub fn smallest_team(teams: &[Team]) -> Option<usize> {
    teams
        .iter()
        .enumerate()
        .min_by_key(|(i, t)| (t.len(), *i))
        .map(|(i, _)| i)
}

/// Append `member` to the smallest team and report where it went.
pub fn place_in_smallest(teams: &mut [Team], member: Member) -> Option<Assignment> {
    let index = smallest_team(teams)?;
    let team = &mut teams[index];
    team.members.push(member.clone());
    Some(Assignment {
        member,
        team_index: index,
        team_name: team.name.clone(),
    })
}
