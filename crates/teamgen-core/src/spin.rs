//! Tokio timer that drives [`EliminationAllocator`] spins.
//!
//! The driver owns the allocator behind an async mutex. Each spin runs in one
//! spawned task that ticks the state machine every frame and streams
//! [`SpinEvent`]s to the caller. The task's abort handle is kept so `reset`,
//! `start` and drop can stop it before touching state.

use crate::elimination::{EliminationAllocator, TickOutcome};
use crate::error::ValidationError;
use crate::types::{Assignment, Member};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinEvent {
    Highlighted(Member),
    Committed(Assignment),
}

pub struct SpinDriver<R = StdRng> {
    allocator: Arc<Mutex<EliminationAllocator<R>>>,
    task: Option<AbortHandle>,
}

impl<R: Rng + Send + 'static> SpinDriver<R> {
    pub fn new(allocator: EliminationAllocator<R>) -> Self {
        Self {
            allocator: Arc::new(Mutex::new(allocator)),
            task: None,
        }
    }

    /// Shared handle to the allocator, for reading state while a spin runs.
    pub fn allocator(&self) -> Arc<Mutex<EliminationAllocator<R>>> {
        Arc::clone(&self.allocator)
    }

    pub async fn start(
        &mut self,
        roster: &[Member],
        team_count: i64,
    ) -> Result<(), ValidationError> {
        let result = self.allocator.lock().await.start(roster, team_count);
        // A rejected start leaves the current spin running.
        if result.is_ok() {
            self.abort_task();
        }
        result
    }

    /// Start the next spin. Returns the event stream for it, or `None` when
    /// the allocator refused to spin (idle, drained, or already selecting).
    pub async fn spin(&mut self) -> Option<mpsc::UnboundedReceiver<SpinEvent>> {
        let (ticket, frame) = {
            let mut alloc = self.allocator.lock().await;
            let ticket = alloc.spin(Instant::now().into_std())?;
            (ticket, alloc.wheel().frame_interval())
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let allocator = Arc::clone(&self.allocator);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(frame);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let outcome = allocator.lock().await.tick(ticket, Instant::now().into_std());
                match outcome {
                    TickOutcome::Waiting => {}
                    TickOutcome::Highlighted(member) => {
                        let _ = tx.send(SpinEvent::Highlighted(member));
                    }
                    TickOutcome::Committed(assignment) => {
                        let _ = tx.send(SpinEvent::Committed(assignment));
                        break;
                    }
                    TickOutcome::Stale => break,
                }
            }
            debug!(ticket = ?ticket, "spin task finished");
        });

        self.task = Some(handle.abort_handle());
        Some(rx)
    }

    /// Stop any spin in flight, then clear the allocator.
    pub async fn reset(&mut self) {
        self.abort_task();
        self.allocator.lock().await.reset();
    }

    /// True while a spin task has not yet finished.
    pub fn is_spinning(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!("aborting spin task");
            }
            task.abort();
        }
    }
}

impl<R> Drop for SpinDriver<R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
