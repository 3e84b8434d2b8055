use std::{collections::BTreeMap, sync::Arc, time::Duration};

use shared::{
    domain::{NodeIndex, Phase, SessionId, Snapshot, TimerId},
    error::{ContractViolation, ValidationFailure},
    protocol::{Effect, Intent, TimerKind},
};
use tracing::{debug, info, info_span, warn};

use crate::{
    catalog::{CatalogError, ChallengeKind, MemoryChallenge, Variant},
    log::{NarrationLog, LOG_CAPACITY},
    pattern::PatternSource,
};

/// Cosmetic delays used by the controller when it schedules timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub glitch: Duration,
    pub advance: Duration,
    pub highlight: Duration,
    pub playback_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            glitch: Duration::from_millis(500),
            advance: Duration::from_millis(1000),
            highlight: Duration::from_millis(400),
            playback_interval: Duration::from_millis(800),
        }
    }
}

/// Linear challenge state machine configured by a variant's phase list.
///
/// The controller never waits: delayed work comes back out of [`dispatch`]
/// as [`Effect::Schedule`] requests and must be fed back in as
/// [`Intent::TimerFired`]. Timers that were cancelled or superseded are
/// ignored when they fire.
///
/// [`dispatch`]: ChallengeController::dispatch
pub struct ChallengeController {
    variant: Arc<Variant>,
    timings: Timings,
    patterns: Box<dyn PatternSource>,
    session_id: SessionId,
    span: tracing::Span,

    phase: Phase,
    log: NarrationLog,
    glitch: bool,
    answer: String,
    pattern: Vec<NodeIndex>,
    user_pattern: Vec<NodeIndex>,
    active_node: Option<NodeIndex>,
    active_step: Option<usize>,

    next_timer_id: u64,
    pending: BTreeMap<TimerId, TimerKind>,
    glitch_timer: Option<TimerId>,
}

impl ChallengeController {
    pub fn new(
        variant: Variant,
        timings: Timings,
        patterns: Box<dyn PatternSource>,
    ) -> Result<Self, CatalogError> {
        variant.validate()?;
        let session_id = SessionId::new();
        let span = info_span!("challenge", session = %session_id, variant = %variant.id);
        let log = boot_log(&variant);
        Ok(Self {
            variant: Arc::new(variant),
            timings,
            patterns,
            session_id,
            span,
            phase: Phase::Intro,
            log,
            glitch: false,
            answer: String::new(),
            pattern: Vec::new(),
            user_pattern: Vec::new(),
            active_node: None,
            active_step: None,
            next_timer_id: 0,
            pending: BTreeMap::new(),
            glitch_timer: None,
        })
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            log: self.log.to_vec(),
            glitch: self.glitch,
            answer: self.answer.clone(),
            pattern: self.pattern.clone(),
            user_pattern: self.user_pattern.clone(),
            active_node: self.active_node,
        }
    }

    /// Applies one intent. On `Err` the state is exactly as before the call.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Vec<Effect>, ContractViolation> {
        let span = self.span.clone();
        let _guard = span.enter();
        debug!(intent = intent.name(), phase = %self.phase, "dispatching intent");

        let mut effects = Vec::new();
        let result = match intent {
            Intent::Start => self.start(&mut effects),
            Intent::EditAnswer { text } => self.edit_answer(text),
            Intent::SubmitAnswer { raw } => self.submit_answer(&raw, &mut effects),
            Intent::SelectChoice { choice_id } => self.select_choice(&choice_id, &mut effects),
            Intent::SelectNode { index } => self.select_node(index, &mut effects),
            Intent::Reset => self.reset(&mut effects),
            Intent::TimerFired { id } => {
                self.timer_fired(id, &mut effects);
                Ok(())
            }
        };

        match result {
            Ok(()) => Ok(effects),
            Err(err) => {
                warn!(error = %err, "rejected intent");
                Err(err)
            }
        }
    }

    fn wrong_phase(&self, intent: &'static str) -> ContractViolation {
        ContractViolation::WrongPhase {
            intent,
            phase: self.phase,
        }
    }

    fn start(&mut self, effects: &mut Vec<Effect>) -> Result<(), ContractViolation> {
        if self.phase != Phase::Intro {
            return Err(self.wrong_phase("start"));
        }
        self.enter(Phase::Challenge(0), effects);
        Ok(())
    }

    fn edit_answer(&mut self, text: String) -> Result<(), ContractViolation> {
        match self.active_challenge(&self.variant) {
            Some((_, ChallengeKind::Text(_))) => {
                self.answer = text;
                Ok(())
            }
            _ => Err(self.wrong_phase("edit_answer")),
        }
    }

    fn submit_answer(
        &mut self,
        raw: &str,
        effects: &mut Vec<Effect>,
    ) -> Result<(), ContractViolation> {
        let variant = Arc::clone(&self.variant);
        let Some((index, ChallengeKind::Text(text))) = self.active_challenge(&variant) else {
            return Err(self.wrong_phase("submit_answer"));
        };

        self.answer.clear();
        if text.accepts(raw) {
            info!(phase = %self.phase, "answer accepted");
            for line in &text.success {
                self.log.echo(line.as_str());
            }
            self.advance_from(index, effects);
        } else {
            debug!(phase = %self.phase, "answer rejected");
            self.log.echo(text.failure.as_str());
            self.raise_glitch(ValidationFailure::WrongAnswer, effects);
        }
        Ok(())
    }

    fn select_choice(
        &mut self,
        choice_id: &str,
        effects: &mut Vec<Effect>,
    ) -> Result<(), ContractViolation> {
        let variant = Arc::clone(&self.variant);
        let Some((index, ChallengeKind::Choice(choices))) = self.active_challenge(&variant) else {
            return Err(self.wrong_phase("select_choice"));
        };
        let choice = choices
            .find(choice_id)
            .ok_or_else(|| ContractViolation::UnknownChoice {
                choice_id: choice_id.to_string(),
                phase: self.phase,
            })?;

        self.log.echo(choices.selection_line(&choice.label));
        if choice.correct {
            info!(phase = %self.phase, choice = choice_id, "choice accepted");
            for line in &choices.success {
                self.log.echo(line.as_str());
            }
            self.advance_from(index, effects);
        } else {
            debug!(phase = %self.phase, choice = choice_id, "choice rejected");
            self.log.echo(choices.failure.as_str());
            self.raise_glitch(ValidationFailure::WrongChoice, effects);
        }
        Ok(())
    }

    fn select_node(
        &mut self,
        node: NodeIndex,
        effects: &mut Vec<Effect>,
    ) -> Result<(), ContractViolation> {
        let variant = Arc::clone(&self.variant);
        let Some((index, ChallengeKind::Memory(memory))) = self.active_challenge(&variant) else {
            return Err(self.wrong_phase("select_node"));
        };
        if node.0 >= memory.node_count {
            return Err(ContractViolation::NodeOutOfRange {
                index: node,
                node_count: memory.node_count,
            });
        }
        if !self.pattern.is_empty() && self.user_pattern.len() == self.pattern.len() {
            // Attempt already complete, the phase advance is pending.
            debug!(node = %node, "ignoring node after completed attempt");
            return Ok(());
        }

        self.user_pattern.push(node);
        let position = self.user_pattern.len() - 1;
        if self.pattern.get(position) != Some(&node) {
            debug!(node = %node, position, "pattern mismatch");
            self.user_pattern.clear();
            self.log.echo(memory.desync.as_str());
            self.raise_glitch(ValidationFailure::PatternMismatch, effects);
        } else if self.user_pattern.len() == self.pattern.len() {
            info!(phase = %self.phase, "pattern replicated");
            for line in &memory.success {
                self.log.echo(line.as_str());
            }
            self.advance_from(index, effects);
        }
        Ok(())
    }

    fn reset(&mut self, effects: &mut Vec<Effect>) -> Result<(), ContractViolation> {
        if self.phase != Phase::Success {
            return Err(self.wrong_phase("reset"));
        }
        for id in std::mem::take(&mut self.pending).into_keys() {
            effects.push(Effect::Cancel { id });
        }
        info!("protocol reset");
        self.phase = Phase::Intro;
        self.log = boot_log(&self.variant);
        self.glitch = false;
        self.answer.clear();
        self.pattern.clear();
        self.user_pattern.clear();
        self.active_node = None;
        self.active_step = None;
        self.glitch_timer = None;
        Ok(())
    }

    fn timer_fired(&mut self, id: TimerId, effects: &mut Vec<Effect>) {
        let Some(timer) = self.pending.remove(&id) else {
            debug!(timer = %id, "ignoring stale timer");
            return;
        };

        match timer {
            TimerKind::ClearGlitch => {
                if self.glitch_timer == Some(id) {
                    self.glitch_timer = None;
                }
                self.glitch = false;
            }
            TimerKind::Advance { from, to } => {
                if self.phase == from {
                    self.enter(to, effects);
                } else {
                    debug!(from = %from, to = %to, phase = %self.phase, "advance no longer applies");
                }
            }
            TimerKind::PlaybackShow { step } => {
                if let Some(node) = self.pattern.get(step).copied() {
                    self.active_node = Some(node);
                    self.active_step = Some(step);
                }
            }
            TimerKind::PlaybackHide { step } => {
                if self.active_step == Some(step) {
                    self.active_node = None;
                    self.active_step = None;
                }
            }
        }
    }

    fn active_challenge<'v>(&self, variant: &'v Variant) -> Option<(usize, &'v ChallengeKind)> {
        let index = self.phase.challenge_index()?;
        variant.phase(index).map(|spec| (index, &spec.challenge))
    }

    fn next_phase(&self, index: usize) -> Phase {
        if index + 1 < self.variant.phase_count() {
            Phase::Challenge(index + 1)
        } else {
            Phase::Success
        }
    }

    fn advance_from(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let to = self.next_phase(index);
        let delay = self
            .variant
            .phase(index)
            .and_then(|spec| spec.advance_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(self.timings.advance);

        if delay.is_zero() {
            self.enter(to, effects);
        } else {
            self.schedule(
                TimerKind::Advance {
                    from: self.phase,
                    to,
                },
                delay,
                effects,
            );
        }
    }

    fn enter(&mut self, to: Phase, effects: &mut Vec<Effect>) {
        info!(from = %self.phase, to = %to, "phase transition");
        self.phase = to;
        self.answer.clear();

        let variant = Arc::clone(&self.variant);
        match to {
            Phase::Challenge(index) => {
                let Some(spec) = variant.phase(index) else {
                    return;
                };
                for line in &spec.entry {
                    self.log.echo(line.as_str());
                }
                if let ChallengeKind::Memory(memory) = &spec.challenge {
                    self.start_memory_round(memory, effects);
                }
            }
            Phase::Success => {
                for line in &variant.success {
                    self.log.echo(line.as_str());
                }
            }
            Phase::Intro => {}
        }
    }

    fn start_memory_round(&mut self, memory: &MemoryChallenge, effects: &mut Vec<Effect>) {
        let stale: Vec<TimerId> = self
            .pending
            .iter()
            .filter(|(_, timer)| timer.is_playback())
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            self.cancel(id, effects);
        }

        self.pattern = self
            .patterns
            .generate(memory.node_count, memory.pattern_length);
        self.user_pattern.clear();
        self.active_node = None;
        self.active_step = None;
        debug!(length = self.pattern.len(), "memory round started");

        for line in &memory.narration {
            self.log.echo(line.as_str());
        }

        let interval = self.timings.playback_interval;
        let highlight = self.timings.highlight;
        for step in 0..self.pattern.len() {
            let shown_at = interval * step as u32;
            self.schedule(TimerKind::PlaybackShow { step }, shown_at, effects);
            self.schedule(TimerKind::PlaybackHide { step }, shown_at + highlight, effects);
        }
    }

    fn raise_glitch(&mut self, failure: ValidationFailure, effects: &mut Vec<Effect>) {
        self.glitch = true;
        if let Some(previous) = self.glitch_timer.take() {
            self.cancel(previous, effects);
        }
        let id = self.schedule(TimerKind::ClearGlitch, self.timings.glitch, effects);
        self.glitch_timer = Some(id);
        effects.push(Effect::ValidationFailed { failure });
    }

    fn schedule(
        &mut self,
        timer: TimerKind,
        delay: Duration,
        effects: &mut Vec<Effect>,
    ) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.pending.insert(id, timer);
        effects.push(Effect::Schedule { id, delay, timer });
        id
    }

    fn cancel(&mut self, id: TimerId, effects: &mut Vec<Effect>) {
        if self.pending.remove(&id).is_some() {
            effects.push(Effect::Cancel { id });
        }
    }
}

fn boot_log(variant: &Variant) -> NarrationLog {
    NarrationLog::with_boot_lines(LOG_CAPACITY, variant.boot_log.iter().map(String::as_str))
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
