//! Cancellable periodic tasks, one per game.
//!
//! The scheduler never calls anything itself. The front-end loop asks how
//! many periods of a task have elapsed and runs that many ticks, so every
//! tick runs to completion on the loop's thread.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::games::GameKind;

/// Upper bound on ticks reported by a single `due` call. A stalled loop
/// (suspended terminal, debugger) drops the backlog instead of replaying it.
pub const MAX_CATCH_UP: u32 = 5;

#[derive(Clone, Debug)]
struct PeriodicTask {
    period: Duration,
    next_due: Instant,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: HashMap<GameKind, PeriodicTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the task for `id`. The first fire is one period
    /// after `now`.
    pub fn arm(&mut self, id: GameKind, period: Duration, now: Instant) {
        let period = period.max(Duration::from_millis(1));
        log::debug!("arming {:?} every {:?}", id, period);
        self.tasks.insert(
            id,
            PeriodicTask {
                period,
                next_due: now + period,
            },
        );
    }

    /// Disarm the task for `id`. Safe to call when nothing is armed;
    /// returns whether a task was actually cancelled.
    pub fn cancel(&mut self, id: GameKind) -> bool {
        let removed = self.tasks.remove(&id).is_some();
        if removed {
            log::debug!("cancelled {:?}", id);
        }
        removed
    }

    pub fn is_armed(&self, id: GameKind) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Number of periods elapsed for `id` since the last call, capped at
    /// `MAX_CATCH_UP`. Zero when the task is not armed.
    pub fn due(&mut self, id: GameKind, now: Instant) -> u32 {
        let Some(task) = self.tasks.get_mut(&id) else {
            return 0;
        };
        let mut fires = 0;
        while task.next_due <= now {
            fires += 1;
            task.next_due += task.period;
            if fires == MAX_CATCH_UP {
                // Resynchronise rather than carry the backlog forward.
                if task.next_due <= now {
                    task.next_due = now + task.period;
                }
                break;
            }
        }
        fires
    }

    /// Earliest instant at which any armed task becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.values().map(|t| t.next_due).min()
    }
}
