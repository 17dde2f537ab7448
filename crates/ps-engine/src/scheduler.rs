//! Single-threaded frame scheduler with epoch-guarded cancellation
//!
//! Models the reference machine's timer-driven deferred work (staggered
//! reel spin-up, mechanical stop latency) as explicit scheduled tasks on a
//! virtual millisecond clock. Cancellation bumps an epoch token; tasks
//! scheduled under an older epoch are dropped instead of fired, so a
//! forced reset can never be corrupted by a stale callback.

/// Work item fired by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Begin motion integration for a reel (staggered spin-up)
    StartReel(usize),
    /// Fix a reel at its resolved stop position after the stop latency
    FinalizeStop { reel: usize, position: usize },
}

#[derive(Debug, Clone, Copy)]
struct Task {
    due_ms: f64,
    epoch: u64,
    kind: TaskKind,
}

/// Virtual-clock task queue
#[derive(Debug, Default)]
pub struct FrameScheduler {
    now_ms: f64,
    epoch: u64,
    tasks: Vec<Task>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Current cancellation epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Queue a task `delay_ms` from now under the current epoch
    pub fn schedule_in(&mut self, delay_ms: f64, kind: TaskKind) {
        self.tasks.push(Task {
            due_ms: self.now_ms + delay_ms.max(0.0),
            epoch: self.epoch,
            kind,
        });
    }

    /// Cancel every queued task and invalidate in-flight handles
    pub fn cancel_all(&mut self) {
        self.epoch += 1;
        self.tasks.clear();
    }

    /// Advance the clock and return due tasks in due order.
    ///
    /// Tasks queued under an older epoch are silently discarded.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<TaskKind> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;
        let epoch = self.epoch;

        let mut due: Vec<Task> = Vec::new();
        self.tasks.retain(|task| {
            if task.epoch != epoch {
                return false;
            }
            if task.due_ms <= now {
                due.push(*task);
                return false;
            }
            true
        });

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|t| t.kind).collect()
    }

    /// True when nothing is queued
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}
