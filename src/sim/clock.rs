//! Virtual time, one-shot tasks and the stopwatch tick source
//!
//! Everything is driven by `SimTime` handed in by the host, so a round plays out
//! identically no matter how the frames that carried it were spaced.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Simulated time in microseconds since the controller was created
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_micros(micros: u64) -> Self {
        SimTime(micros)
    }

    pub fn from_millis(millis: u64) -> Self {
        SimTime(millis.saturating_mul(1_000))
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_secs_f32(&self) -> f32 {
        self.0 as f32 / 1_000_000.0
    }

    /// Time `micros` later
    pub fn after(&self, micros: u64) -> Self {
        SimTime(self.0.saturating_add(micros))
    }
}

/// Deferred work owned by the round controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Re-arm contact counting for the round with this generation
    ClearDebounce { generation: u64 },
    /// Stopwatch tick from the tick source with this id
    Tick { source: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: SimTime,
    seq: u64,
    task: Task,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

#[derive(Debug, Clone, Copy)]
struct TickSource {
    id: u64,
    interval: u64,
}

/// Pending tasks ordered by due time, then by scheduling order
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
    ticks: Option<TickSource>,
    next_source_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to fire once at `due`
    pub fn schedule_once(&mut self, due: SimTime, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Reverse(Scheduled { due, seq, task }));
    }

    /// Start a fresh tick source, invalidating any running one.
    /// Returns the new source id.
    pub fn start_ticks(&mut self, now: SimTime, interval_micros: u64) -> u64 {
        self.next_source_id += 1;
        let id = self.next_source_id;
        let interval = interval_micros.max(1);
        self.ticks = Some(TickSource { id, interval });
        self.schedule_once(now.after(interval), Task::Tick { source: id });
        id
    }

    /// Stop the running tick source. Returns false if none was running.
    pub fn stop_ticks(&mut self) -> bool {
        self.ticks.take().is_some()
    }

    /// Id of the running tick source
    pub fn active_tick_source(&self) -> Option<u64> {
        self.ticks.map(|t| t.id)
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<SimTime> {
        self.pending.peek().map(|Reverse(s)| s.due)
    }

    /// Number of pending tasks (including stale ones not yet fired)
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pop the earliest task due at or before `now`.
    ///
    /// A tick from the running source re-arms itself one interval later. Tasks
    /// belonging to a stopped source are still returned so the caller can
    /// report them as stale.
    pub fn pop_due(&mut self, now: SimTime) -> Option<(SimTime, Task)> {
        if self.next_due()? > now {
            return None;
        }
        let Reverse(scheduled) = self.pending.pop()?;
        if let Task::Tick { source } = scheduled.task {
            if let Some(ticks) = self.ticks.filter(|t| t.id == source) {
                self.schedule_once(scheduled.due.after(ticks.interval), scheduled.task);
            }
        }
        Some((scheduled.due, scheduled.task))
    }
}
