//! Delay queue for scheduled refresh actions.
//!
//! A min-heap keyed by fire time, with insertion order breaking exact-time
//! ties first-in-first-out. The queue never blocks and never runs anything
//! itself: `run_due` hands the caller the batch of due actions and the
//! caller dispatches them. Anything enqueued while a batch is being
//! dispatched becomes eligible on a later drain, so the heap is never
//! mutated mid-iteration.

use chrono::{DateTime, Duration, Utc};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::core::types::Category;

/// A pending refresh action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedAction {
    /// When the action becomes due.
    pub fire_at: DateTime<Utc>,
    /// Which refresh to run.
    pub kind: Category,
    /// Key of the schedule entry this action belongs to.
    pub key: String,
    /// Insertion sequence number; unique per queue.
    seq: u64,
}

impl Ord for QueuedAction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for QueuedAction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of delayed refresh actions.
#[derive(Debug, Default)]
pub struct DelayQueue {
    heap: BinaryHeap<Reverse<QueuedAction>>,
    next_seq: u64,
}

impl DelayQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire no earlier than `now + delay_seconds`.
    /// A delay of zero fires on the next drain.
    pub fn enter(
        &mut self,
        now: DateTime<Utc>,
        delay_seconds: u64,
        kind: Category,
        key: impl Into<String>,
    ) {
        let action = QueuedAction {
            fire_at: now + Duration::seconds(delay_seconds as i64),
            kind,
            key: key.into(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(action));
    }

    /// Pop every action due at `now`, in increasing fire-time order.
    /// Repeated calls within the same window return nothing further.
    pub fn run_due(&mut self, now: DateTime<Utc>) -> Vec<QueuedAction> {
        let mut due = Vec::new();
        while self
            .heap
            .peek()
            .is_some_and(|Reverse(action)| action.fire_at <= now)
        {
            if let Some(Reverse(action)) = self.heap.pop() {
                due.push(action);
            }
        }
        due
    }

    /// Remove a still-pending action by key. Returns false if nothing
    /// matched; the action may already have fired, which is expected.
    pub fn cancel(&mut self, key: &str) -> bool {
        let before = self.heap.len();
        self.heap.retain(|Reverse(action)| action.key != key);
        self.heap.len() != before
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue has no pending actions.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
