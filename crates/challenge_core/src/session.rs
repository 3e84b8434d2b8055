use std::time::Instant;

use shared::{
    domain::{Phase, Snapshot},
    error::ContractViolation,
    protocol::{Effect, Intent},
};
use tracing::{debug, warn};

use crate::{controller::ChallengeController, timers::TimerQueue};

/// A controller paired with the queue that delivers its timers.
///
/// Front-ends feed it the current time; every timer whose deadline has passed
/// is fired, in deadline order, before the call returns. Timers scheduled
/// while firing are based on the deadline of the timer that scheduled them,
/// so a late poll never stretches the playback rhythm.
pub struct Session {
    controller: ChallengeController,
    timers: TimerQueue,
}

impl Session {
    pub fn new(controller: ChallengeController) -> Self {
        Self {
            controller,
            timers: TimerQueue::new(),
        }
    }

    pub fn controller(&self) -> &ChallengeController {
        &self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.controller.snapshot()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn dispatch(&mut self, now: Instant, intent: Intent) -> Result<(), ContractViolation> {
        let effects = self.controller.dispatch(intent)?;
        self.apply(now, effects);
        self.fire_due(now);
        Ok(())
    }

    /// Fires every timer due at `now`. Returns how many fired.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(due) = self.timers.pop_due(now) {
            fired += 1;
            debug!(timer = %due.id, kind = ?due.timer, "timer due");
            match self.controller.dispatch(Intent::TimerFired { id: due.id }) {
                Ok(effects) => self.apply(due.deadline, effects),
                Err(err) => warn!(error = %err, "timer callback rejected"),
            }
        }
        fired
    }

    fn apply(&mut self, base: Instant, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Schedule { id, delay, timer } => {
                    self.timers.schedule(id, base, delay, timer);
                }
                Effect::Cancel { id } => {
                    self.timers.cancel(id);
                }
                Effect::ValidationFailed { failure } => {
                    debug!(failure = failure.label(), "validation failure");
                }
            }
        }
    }
}
