//! Tick-based scheduled transitions
//!
//! Every delayed state change (explosion fade, win message, post-animation
//! resets, highlight cycling) goes through a `Scheduler` so it can be
//! cancelled by handle or wholesale when a game loses focus.

/// Handle to a scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    id: TimerId,
    due: u64,
    event: E,
}

/// Pending transitions, fired in due order as the simulation ticks
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: u64,
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current tick count
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of transitions waiting to fire
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Schedule `event` to fire `delay_ticks` from now
    ///
    /// A zero delay fires on the next `advance`.
    pub fn schedule(&mut self, delay_ticks: u32, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + u64::from(delay_ticks.max(1));
        // Keep sorted by (due, id); ids only grow so ties stay in schedule order
        let at = self.pending.partition_point(|s| s.due <= due);
        self.pending.insert(at, Scheduled { id, due, event });
        id
    }

    /// Cancel a pending transition. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|s| s.id == id) {
            Some(i) => {
                self.pending.remove(i);
                true
            }
            None => false,
        }
    }

    /// Cancel everything
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Advance one tick and return the transitions that became due, in order
    pub fn advance(&mut self) -> Vec<E> {
        self.now += 1;
        let due = self.pending.partition_point(|s| s.due <= self.now);
        self.pending.drain(..due).map(|s| s.event).collect()
    }
}
