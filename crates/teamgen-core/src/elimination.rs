//! Spinning-wheel draft.
//!
//! Each pick runs a short selection animation before one member is drawn
//! from the remaining queue. The animation is driven from outside: the host
//! calls [`EliminationAllocator::spin`] and then feeds timestamps to
//! [`EliminationAllocator::tick`] until the spin commits. Every spin gets a
//! [`SpinTicket`]; ticks carrying any other ticket are ignored, so a tick that
//! arrives after `reset` (or after the spin already committed) cannot touch
//! team state.

use crate::config::WheelConfig;
use crate::error::ValidationError;
use crate::run::{empty_teams, place_in_smallest, shuffled, validate_team_count};
use crate::types::{Assignment, Member, RunPhase, Team};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Identifies one spin. Issued by `spin`, checked by `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpinTicket(u64);

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still spinning; the highlight did not change on this tick.
    Waiting,
    /// Still spinning; a new member is highlighted.
    Highlighted(Member),
    /// The spin finished and this member was placed.
    Committed(Assignment),
    /// The ticket does not belong to the spin in flight.
    Stale,
}

#[derive(Debug, Clone)]
struct Selection {
    ticket: SpinTicket,
    started_at: Instant,
    duration: Duration,
    last_highlight_at: Option<Instant>,
}

pub struct EliminationAllocator<R = StdRng> {
    rng: R,
    wheel: WheelConfig,
    phase: RunPhase,
    teams: Vec<Team>,
    remaining: Vec<Member>,
    selection: Option<Selection>,
    highlighted: Option<Member>,
    selected: Option<Member>,
    error: Option<ValidationError>,
    next_ticket: u64,
}

impl EliminationAllocator<StdRng> {
    pub fn new(wheel: WheelConfig) -> Self {
        Self::with_rng(wheel, StdRng::from_entropy())
    }
}

impl Default for EliminationAllocator<StdRng> {
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}

impl<R: Rng> EliminationAllocator<R> {
    pub fn with_rng(wheel: WheelConfig, rng: R) -> Self {
        Self {
            rng,
            wheel,
            phase: RunPhase::Idle,
            teams: Vec::new(),
            remaining: Vec::new(),
            selection: None,
            highlighted: None,
            selected: None,
            error: None,
            next_ticket: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    pub fn start(&mut self, roster: &[Member], team_count: i64) -> Result<(), ValidationError> {
        let count = match validate_team_count(roster.len(), team_count) {
            Ok(count) => count,
            Err(e) => {
                warn!(team_count, members = roster.len(), error = %e, "elimination run rejected");
                self.error = Some(e);
                return Err(e);
            }
        };

        self.cancel_selection();
        self.error = None;
        self.remaining = shuffled(roster, &mut self.rng);
        self.teams = empty_teams(count);
        self.highlighted = None;
        self.selected = None;
        self.phase = RunPhase::Active;
        debug!(members = roster.len(), teams = count, "elimination run started");
        Ok(())
    }

    /// Begin the selection animation for the next pick.
    ///
    /// Returns `None` when idle, when a spin is already in flight, or when the
    /// queue is empty (which also ends the run).
    pub fn spin(&mut self, now: Instant) -> Option<SpinTicket> {
        match self.phase {
            RunPhase::Idle | RunPhase::Selecting => return None,
            RunPhase::Active => {}
        }
        if self.remaining.is_empty() {
            self.phase = RunPhase::Idle;
            return None;
        }

        self.next_ticket += 1;
        let ticket = SpinTicket(self.next_ticket);
        let duration = self.wheel.sample_spin_duration(&mut self.rng);
        self.selection = Some(Selection {
            ticket,
            started_at: now,
            duration,
            last_highlight_at: None,
        });
        self.selected = None;
        self.phase = RunPhase::Selecting;
        debug!(ticket = ticket.0, duration_ms = duration.as_millis() as u64, "spin started");
        Some(ticket)
    }

    /// Advance the spin identified by `ticket` to time `now`.
    pub fn tick(&mut self, ticket: SpinTicket, now: Instant) -> TickOutcome {
        let Some(selection) = self.selection.as_mut().filter(|s| s.ticket == ticket) else {
            debug!(ticket = ticket.0, "dropping stale spin tick");
            return TickOutcome::Stale;
        };

        let elapsed = now.saturating_duration_since(selection.started_at);
        if elapsed >= selection.duration {
            return self.commit();
        }

        let cadence = self.wheel.cadence_at(elapsed, selection.duration);
        let due = match selection.last_highlight_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) > cadence,
        };
        if !due {
            return TickOutcome::Waiting;
        }

        selection.last_highlight_at = Some(now);
        let index = self.rng.gen_range(0..self.remaining.len());
        let member = self.remaining[index].clone();
        self.highlighted = Some(member.clone());
        TickOutcome::Highlighted(member)
    }

    /// Cancel any spin in flight and drop all run state.
    pub fn reset(&mut self) {
        self.cancel_selection();
        self.teams.clear();
        self.remaining.clear();
        self.highlighted = None;
        self.selected = None;
        self.phase = RunPhase::Idle;
    }

    fn cancel_selection(&mut self) {
        if let Some(selection) = self.selection.take() {
            debug!(ticket = selection.ticket.0, "spin cancelled");
        }
    }

    /// Final draw. Independent of whatever was highlighted last.
    fn commit(&mut self) -> TickOutcome {
        self.selection = None;
        if self.remaining.is_empty() {
            self.phase = RunPhase::Idle;
            return TickOutcome::Stale;
        }

        let index = self.rng.gen_range(0..self.remaining.len());
        let member = self.remaining.remove(index);
        let Some(assignment) = place_in_smallest(&mut self.teams, member) else {
            self.phase = RunPhase::Idle;
            return TickOutcome::Stale;
        };

        self.highlighted = Some(assignment.member.clone());
        self.selected = Some(assignment.member.clone());
        debug!(
            member = %assignment.member.name,
            team = %assignment.team_name,
            remaining = self.remaining.len(),
            "spin committed"
        );

        if self.remaining.is_empty() {
            self.phase = RunPhase::Idle;
            info!(teams = self.teams.len(), "elimination run complete");
        } else {
            self.phase = RunPhase::Active;
        }
        TickOutcome::Committed(assignment)
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn remaining(&self) -> &[Member] {
        &self.remaining
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn is_selecting(&self) -> bool {
        self.phase == RunPhase::Selecting
    }

    pub fn highlighted(&self) -> Option<&Member> {
        self.highlighted.as_ref()
    }

    pub fn selected(&self) -> Option<&Member> {
        self.selected.as_ref()
    }

    /// Ticket of the spin in flight, if any.
    pub fn current_ticket(&self) -> Option<SpinTicket> {
        self.selection.as_ref().map(|s| s.ticket)
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }

    pub fn wheel(&self) -> &WheelConfig {
        &self.wheel
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use std::collections::HashSet;

    fn allocator(seed: u64) -> EliminationAllocator {
        EliminationAllocator::with_rng(WheelConfig::default(), StdRng::seed_from_u64(seed))
    }

    fn roster(n: usize) -> Roster {
        (1..=n).map(|i| format!("P{i}")).collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Tick every 16ms until the spin commits.
    fn run_spin(alloc: &mut EliminationAllocator, t0: Instant) -> (Assignment, Instant) {
        let ticket = alloc.spin(t0).expect("spin should start");
        let mut now = t0;
        loop {
            match alloc.tick(ticket, now) {
                TickOutcome::Committed(a) => return (a, now),
                TickOutcome::Stale => panic!("live ticket reported stale"),
                _ => now += ms(16),
            }
        }
    }

    #[test]
    fn spin_requires_active_run() {
        let mut alloc = allocator(1);
        assert!(alloc.spin(Instant::now()).is_none());
        assert!(!alloc.is_selecting());
    }

    #[test]
    fn first_tick_highlights_a_remaining_member() {
        let r = roster(4);
        let mut alloc = allocator(2);
        alloc.start(r.members(), 2).unwrap();
        let t0 = Instant::now();
        let ticket = alloc.spin(t0).unwrap();
        assert!(alloc.is_selecting());
        assert!(alloc.selected().is_none());

        match alloc.tick(ticket, t0) {
            TickOutcome::Highlighted(m) => {
                assert!(alloc.remaining().contains(&m));
                assert_eq!(alloc.highlighted(), Some(&m));
            }
            other => panic!("expected highlight, got {other:?}"),
        }
        // Same instant again: cadence not yet elapsed.
        assert_eq!(alloc.tick(ticket, t0), TickOutcome::Waiting);
    }

    #[test]
    fn commit_moves_one_member_into_smallest_team() {
        let r = roster(5);
        let mut alloc = allocator(3);
        alloc.start(r.members(), 2).unwrap();
        let mut t = Instant::now();

        while alloc.remaining_count() > 0 {
            let before_remaining = alloc.remaining_count();
            let before_sizes: Vec<usize> = alloc.teams().iter().map(Team::len).collect();
            let min = *before_sizes.iter().min().unwrap();
            let expected_team = before_sizes.iter().position(|&s| s == min).unwrap();

            let (assignment, end) = run_spin(&mut alloc, t);
            t = end + ms(1);

            assert_eq!(alloc.remaining_count(), before_remaining - 1);
            assert_eq!(assignment.team_index, expected_team);
            for (i, team) in alloc.teams().iter().enumerate() {
                let grew = if i == expected_team { 1 } else { 0 };
                assert_eq!(team.len(), before_sizes[i] + grew);
            }
            assert_eq!(alloc.selected(), Some(&assignment.member));
            assert!(!alloc.is_selecting());
        }

        assert_eq!(alloc.phase(), RunPhase::Idle);
        let ids: HashSet<&str> = alloc
            .teams()
            .iter()
            .flat_map(|t| t.members.iter().map(|m| m.id.as_str()))
            .collect();
        assert_eq!(ids.len(), 5);
        let sizes: Vec<usize> = alloc.teams().iter().map(Team::len).collect();
        assert_eq!(sizes, vec![3, 2]);
    }

    #[test]
    fn commit_waits_for_sampled_duration() {
        let wheel = WheelConfig {
            min_spin_ms: 300,
            max_spin_ms: 300,
            ..WheelConfig::default()
        };
        let r = roster(3);
        let mut alloc = EliminationAllocator::with_rng(wheel, StdRng::seed_from_u64(4));
        alloc.start(r.members(), 1).unwrap();
        let t0 = Instant::now();
        let ticket = alloc.spin(t0).unwrap();

        assert!(!matches!(alloc.tick(ticket, t0 + ms(299)), TickOutcome::Committed(_)));
        assert!(matches!(alloc.tick(ticket, t0 + ms(300)), TickOutcome::Committed(_)));
    }

    #[test]
    fn spin_while_selecting_is_noop() {
        let r = roster(3);
        let mut alloc = allocator(5);
        alloc.start(r.members(), 1).unwrap();
        let t0 = Instant::now();
        let ticket = alloc.spin(t0).unwrap();
        assert!(alloc.spin(t0 + ms(5)).is_none());
        assert_eq!(alloc.current_ticket(), Some(ticket));

        let mut now = t0;
        while !matches!(alloc.tick(ticket, now), TickOutcome::Committed(_)) {
            now += ms(16);
        }
        assert_eq!(alloc.remaining_count(), 2);
        assert_eq!(alloc.teams()[0].len(), 1);
        // The old ticket cannot commit a second time.
        assert_eq!(alloc.tick(ticket, t0 + ms(10_000)), TickOutcome::Stale);
        assert_eq!(alloc.remaining_count(), 2);
    }

    #[test]
    fn tick_after_reset_is_inert() {
        let r = roster(4);
        let mut alloc = allocator(6);
        alloc.start(r.members(), 2).unwrap();
        let t0 = Instant::now();
        let ticket = alloc.spin(t0).unwrap();
        alloc.reset();

        assert_eq!(alloc.tick(ticket, t0 + ms(10_000)), TickOutcome::Stale);
        assert!(alloc.teams().is_empty());
        assert_eq!(alloc.remaining_count(), 0);
        assert_eq!(alloc.phase(), RunPhase::Idle);
        assert!(alloc.highlighted().is_none());
        assert!(alloc.selected().is_none());
    }

    #[test]
    fn restart_invalidates_old_ticket() {
        let r = roster(4);
        let mut alloc = allocator(7);
        alloc.start(r.members(), 2).unwrap();
        let t0 = Instant::now();
        let old = alloc.spin(t0).unwrap();
        alloc.start(r.members(), 2).unwrap();

        assert_eq!(alloc.tick(old, t0 + ms(10_000)), TickOutcome::Stale);
        assert_eq!(alloc.remaining_count(), 4);
        let fresh = alloc.spin(t0).unwrap();
        assert_ne!(fresh, old);
    }

    #[test]
    fn rejected_start_keeps_run() {
        let r = roster(3);
        let mut alloc = allocator(8);
        alloc.start(r.members(), 3).unwrap();
        run_spin(&mut alloc, Instant::now());

        assert_eq!(
            alloc.start(r.members(), 4),
            Err(ValidationError::TeamCountExceedsMembers)
        );
        assert_eq!(alloc.remaining_count(), 2);
        assert_eq!(alloc.teams().len(), 3);
        assert!(alloc.is_active());
        assert_eq!(
            alloc.error_message().as_deref(),
            Some("team count exceeds member count")
        );
        assert_eq!(alloc.start(&[], 1), Err(ValidationError::NoMembers));
        assert_eq!(alloc.start(r.members(), 0), Err(ValidationError::TeamCountTooSmall));
    }

    #[test]
    fn highlights_slow_down_over_the_spin() {
        let wheel = WheelConfig {
            min_spin_ms: 2_000,
            max_spin_ms: 2_000,
            ..WheelConfig::default()
        };
        let r = roster(6);
        let mut alloc = EliminationAllocator::with_rng(wheel, StdRng::seed_from_u64(9));
        alloc.start(r.members(), 2).unwrap();
        let t0 = Instant::now();
        let ticket = alloc.spin(t0).unwrap();

        let mut highlight_times = Vec::new();
        let mut now = t0;
        loop {
            match alloc.tick(ticket, now) {
                TickOutcome::Highlighted(_) => highlight_times.push(now),
                TickOutcome::Committed(_) => break,
                _ => {}
            }
            now += ms(1);
        }

        let gaps: Vec<Duration> = highlight_times.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.len() > 3);
        assert!(gaps.first().unwrap() < gaps.last().unwrap());
        assert!(*gaps.first().unwrap() >= ms(50));
        assert!(*gaps.last().unwrap() <= ms(301));
    }

    #[test]
    fn spin_on_drained_queue_goes_idle() {
        let r = roster(1);
        let mut alloc = allocator(10);
        alloc.start(r.members(), 1).unwrap();
        run_spin(&mut alloc, Instant::now());
        assert_eq!(alloc.phase(), RunPhase::Idle);
        assert!(alloc.spin(Instant::now()).is_none());
        assert_eq!(alloc.teams()[0].len(), 1);
    }
}
