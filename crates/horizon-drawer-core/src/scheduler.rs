//! Deferred task scheduling on a virtual clock.
//!
//! The scheduler holds payloads that should be handed back to the caller
//! once a delay has elapsed. It never runs anything itself: the owner
//! advances the clock and drains the due payloads, which keeps all work on
//! the caller's event loop.
//!
//! Every scheduled payload gets a [`TaskToken`]. Cancelling a token removes
//! the payload deterministically, so a stale completion can never fire
//! against an owner that has since gone away.
//!
//! # Example
//!
//! ```
//! use horizon_drawer_core::Scheduler;
//! use std::time::Duration;
//!
//! let mut scheduler = Scheduler::new();
//! let _done = scheduler.schedule(Duration::from_millis(300), "transition-done");
//! let cancelled = scheduler.schedule(Duration::from_millis(300), "autofocus");
//! scheduler.cancel(cancelled);
//!
//! assert!(scheduler.advance(Duration::from_millis(100)).is_empty());
//! assert_eq!(scheduler.advance(Duration::from_millis(200)), vec!["transition-done"]);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A handle to a scheduled task, used to cancel it.
    pub struct TaskToken;
}

/// Internal scheduled task data.
#[derive(Debug)]
struct ScheduledTask<T> {
    /// Virtual time at which the task is due.
    due: Duration,
    /// The payload handed back when the task fires.
    payload: T,
}

/// An entry in the scheduler queue (min-heap by due time, then insertion order).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    token: TaskToken,
    due: Duration,
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        // Tasks due at the same instant fire in the order they were scheduled.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A queue of deferred payloads keyed by cancelable tokens.
#[derive(Debug)]
pub struct Scheduler<T> {
    /// All pending tasks.
    tasks: SlotMap<TaskToken, ScheduledTask<T>>,
    /// Priority queue of pending fires.
    queue: BinaryHeap<QueueEntry>,
    /// Current virtual time.
    now: Duration,
    /// Monotonic insertion counter used as a tie-breaker.
    seq: u64,
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler with its clock at zero.
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            now: Duration::ZERO,
            seq: 0,
        }
    }

    /// The current virtual time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` to become due after `delay`.
    ///
    /// A zero delay makes the task due immediately; it is still only handed
    /// back by the next drain, never from inside this call.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TaskToken {
        let due = self.now + delay;
        let token = self.tasks.insert(ScheduledTask { due, payload });
        self.queue.push(QueueEntry {
            token,
            due,
            seq: self.seq,
        });
        self.seq += 1;

        tracing::trace!(
            target: targets::SCHEDULER,
            ?token,
            delay_ms = delay.as_millis() as u64,
            "task scheduled"
        );
        token
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was still pending. Cancelling a task that
    /// already fired or was already cancelled is a no-op.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let removed = self.tasks.remove(token).is_some();
        if removed {
            tracing::trace!(target: targets::SCHEDULER, ?token, "task cancelled");
        }
        removed
    }

    /// Check whether a task is still waiting to fire.
    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.tasks.contains_key(token)
    }

    /// Number of tasks still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Time until the next pending task is due, if any.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.queue
            .peek()
            .map(|entry| entry.due.saturating_sub(self.now))
    }

    /// Pop the earliest task due at or before `deadline`.
    ///
    /// The clock moves forward to the task's due time. Callers that may
    /// schedule new work while handling a payload should drain with this
    /// method in a loop, so that follow-up tasks falling inside the same
    /// window fire in order.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        self.discard_cancelled();

        let entry = *self.queue.peek()?;
        if entry.due > deadline {
            return None;
        }
        self.queue.pop();

        let task = self.tasks.remove(entry.token)?;
        self.now = self.now.max(task.due);
        tracing::trace!(target: targets::SCHEDULER, token = ?entry.token, "task fired");
        Some(task.payload)
    }

    /// Move the clock forward to `deadline` without firing anything.
    ///
    /// The clock never moves backwards.
    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Advance the clock by `by` and return every payload that became due, in order.
    pub fn advance(&mut self, by: Duration) -> Vec<T> {
        let deadline = self.now + by;
        let mut fired = Vec::new();
        while let Some(payload) = self.pop_due(deadline) {
            fired.push(payload);
        }
        self.advance_to(deadline);
        fired
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.queue.clear();
    }

    /// Remove cancelled entries from the front of the queue.
    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.tasks.contains_key(entry.token) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(Scheduler<u32>: Send, Sync);
