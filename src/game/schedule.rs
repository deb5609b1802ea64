//! Delayed transitions as explicit tasks.
//!
//! Tasks are owned by the round; restarting drops them all, so nothing
//! from a discarded round can fire later.

/// A delayed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Judge the two face-up cards
    Resolve,
    /// Turn a mismatched pair back over
    HideMismatch { first: usize, second: usize },
    /// Enter `Won`
    DeclareWin,
}

/// A task with the time it falls due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub due_ms: f64,
    pub task: Task,
    seq: u64,
}

/// Pending tasks, run in due-time order (insertion order on ties)
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due_ms, task, seq });
    }

    /// Remove the earliest task due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Scheduled> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        Some(self.pending.remove(index))
    }

    /// Drop every pending task, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
