use std::{
    collections::{BTreeMap, HashMap},
    time::{Duration, Instant},
};

use shared::{domain::TimerId, protocol::TimerKind};

/// Deadline-ordered set of pending controller timers. Ties fire in id order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    by_deadline: BTreeMap<(Instant, TimerId), TimerKind>,
    deadlines: HashMap<TimerId, Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub id: TimerId,
    pub deadline: Instant,
    pub timer: TimerKind,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescheduling an id replaces its previous deadline.
    pub fn schedule(&mut self, id: TimerId, base: Instant, delay: Duration, timer: TimerKind) {
        self.cancel(id);
        let deadline = base + delay;
        self.by_deadline.insert((deadline, id), timer);
        self.deadlines.insert(id, deadline);
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.by_deadline.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn pop_due(&mut self, now: Instant) -> Option<DueTimer> {
        let (&(deadline, id), _) = self.by_deadline.first_key_value()?;
        if deadline > now {
            return None;
        }
        let timer = self.by_deadline.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        Some(DueTimer {
            id,
            deadline,
            timer,
        })
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.by_deadline.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
