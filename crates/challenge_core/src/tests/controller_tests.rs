use super::*;
use crate::{catalog, pattern::FixedPattern};
use shared::domain::LogKind;

fn controller(variant_id: &str) -> ChallengeController {
    let variant = catalog::builtin(variant_id).expect("builtin variant");
    ChallengeController::new(
        variant,
        Timings::default(),
        Box::new(FixedPattern::from_indices(&[1, 3, 0, 2])),
    )
    .expect("valid variant")
}

fn dispatch(c: &mut ChallengeController, intent: Intent) -> Vec<Effect> {
    c.dispatch(intent).expect("intent accepted")
}

fn submit(c: &mut ChallengeController, raw: &str) -> Vec<Effect> {
    dispatch(c, Intent::SubmitAnswer { raw: raw.into() })
}

fn node(c: &mut ChallengeController, index: u8) -> Vec<Effect> {
    dispatch(
        c,
        Intent::SelectNode {
            index: NodeIndex(index),
        },
    )
}

fn choose(c: &mut ChallengeController, choice_id: &str) -> Vec<Effect> {
    dispatch(
        c,
        Intent::SelectChoice {
            choice_id: choice_id.into(),
        },
    )
}

fn scheduled(effects: &[Effect]) -> Vec<(TimerId, Duration, TimerKind)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Schedule { id, delay, timer } => Some((*id, *delay, *timer)),
            _ => None,
        })
        .collect()
}

fn timer_id(effects: &[Effect], wanted: impl Fn(&TimerKind) -> bool) -> TimerId {
    scheduled(effects)
        .into_iter()
        .find(|(_, _, timer)| wanted(timer))
        .map(|(id, _, _)| id)
        .expect("timer scheduled")
}

fn fire(c: &mut ChallengeController, id: TimerId) -> Vec<Effect> {
    dispatch(c, Intent::TimerFired { id })
}

fn fire_advance(c: &mut ChallengeController, effects: &[Effect]) -> Vec<Effect> {
    let id = timer_id(effects, |t| matches!(t, TimerKind::Advance { .. }));
    fire(c, id)
}

#[test]
fn fresh_controller_shows_boot_log_in_intro() {
    let c = controller("nakaminsky");
    let snapshot = c.snapshot();
    assert_eq!(snapshot.phase, Phase::Intro);
    assert!(!snapshot.glitch);
    assert!(snapshot.answer.is_empty());
    assert_eq!(snapshot.log.len(), 2);
    assert!(snapshot.log.iter().all(|e| e.kind == LogKind::System));
    assert_eq!(snapshot.log[0].text, "Initialisation du protocole Nakaminsky...");
}

#[test]
fn start_enters_first_challenge_with_narration() {
    let mut c = controller("nakaminsky");
    let effects = dispatch(&mut c, Intent::Start);
    assert!(effects.is_empty());

    let snapshot = c.snapshot();
    assert_eq!(snapshot.phase, Phase::Challenge(0));
    assert_eq!(snapshot.log.len(), 4);
    assert!(snapshot.log[2..].iter().all(|e| e.kind == LogKind::Echo));
    assert_eq!(
        snapshot.log[2].text,
        "PHASE 1 : Vérification des fondamentaux économiques."
    );
}

#[test]
fn start_outside_intro_is_rejected_without_side_effects() {
    let mut c = controller("nakaminsky");
    dispatch(&mut c, Intent::Start);
    let before = c.snapshot();

    let err = c.dispatch(Intent::Start).expect_err("second start");
    assert!(matches!(
        err,
        ContractViolation::WrongPhase {
            intent: "start",
            phase: Phase::Challenge(0)
        }
    ));
    assert_eq!(c.snapshot(), before);
}

#[test]
fn wrong_then_right_numeric_answer_scenario() {
    let mut c = controller("numeric");
    dispatch(&mut c, Intent::Start);
    let log_before = c.snapshot().log.len();

    let effects = submit(&mut c, "20");
    let snapshot = c.snapshot();
    assert_eq!(snapshot.phase, Phase::Challenge(0));
    assert!(snapshot.glitch);
    assert_eq!(snapshot.log.len(), log_before + 1);
    assert!(effects.contains(&Effect::ValidationFailed {
        failure: ValidationFailure::WrongAnswer
    }));
    let (_, delay, _) = scheduled(&effects)[0];
    assert_eq!(delay, Duration::from_millis(500));

    let effects = submit(&mut c, "21");
    assert_eq!(c.phase(), Phase::Challenge(0), "advance waits for its timer");
    let (_, delay, timer) = scheduled(&effects)[0];
    assert_eq!(delay, Duration::from_millis(1000));
    assert_eq!(
        timer,
        TimerKind::Advance {
            from: Phase::Challenge(0),
            to: Phase::Challenge(1)
        }
    );

    fire_advance(&mut c, &effects);
    assert_eq!(c.phase(), Phase::Challenge(1));
    let last = c.snapshot().log.last().cloned().expect("narration");
    assert!(last.text.contains("grande question"));
}

#[test]
fn glitch_clears_when_its_timer_fires() {
    let mut c = controller("numeric");
    dispatch(&mut c, Intent::Start);
    let effects = submit(&mut c, "nope");
    assert!(c.snapshot().glitch);

    let id = timer_id(&effects, |t| *t == TimerKind::ClearGlitch);
    fire(&mut c, id);
    assert!(!c.snapshot().glitch);
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn repeated_failures_keep_glitch_until_latest_timer() {
    let mut c = controller("numeric");
    dispatch(&mut c, Intent::Start);
    let first = submit(&mut c, "1");
    let first_id = timer_id(&first, |t| *t == TimerKind::ClearGlitch);

    let second = submit(&mut c, "2");
    assert!(second.contains(&Effect::Cancel { id: first_id }));
    let second_id = timer_id(&second, |t| *t == TimerKind::ClearGlitch);
    assert_ne!(first_id, second_id);

    fire(&mut c, first_id);
    assert!(c.snapshot().glitch, "superseded clear is ignored");

    fire(&mut c, second_id);
    assert!(!c.snapshot().glitch);
}

#[test]
fn answer_buffer_is_cleared_on_every_submit() {
    let mut c = controller("numeric");
    dispatch(&mut c, Intent::Start);

    dispatch(&mut c, Intent::EditAnswer { text: "19".into() });
    assert_eq!(c.snapshot().answer, "19");
    submit(&mut c, "19");
    assert!(c.snapshot().answer.is_empty());

    dispatch(&mut c, Intent::EditAnswer { text: "21".into() });
    submit(&mut c, "21");
    assert!(c.snapshot().answer.is_empty());
}

#[test]
fn failures_can_be_retried_without_limit() {
    let mut c = controller("numeric");
    dispatch(&mut c, Intent::Start);
    for attempt in 0..50 {
        submit(&mut c, &format!("wrong {attempt}"));
    }
    assert_eq!(c.phase(), Phase::Challenge(0));
    assert_eq!(c.snapshot().log.len(), LOG_CAPACITY);

    let effects = submit(&mut c, "21");
    fire_advance(&mut c, &effects);
    assert_eq!(c.phase(), Phase::Challenge(1));
}

#[test]
fn genesis_answer_is_trimmed_case_folded_and_immediate() {
    for accepted in ["genesis", "  GENESIS ", "Genesis Block"] {
        let mut c = controller("nakaminsky");
        dispatch(&mut c, Intent::Start);
        let effects = submit(&mut c, "21");
        fire_advance(&mut c, &effects);
        assert_eq!(c.phase(), Phase::Challenge(1));

        let effects = submit(&mut c, accepted);
        assert!(scheduled(&effects).is_empty());
        assert_eq!(c.phase(), Phase::Success, "accepted `{accepted}`");
    }
}

#[test]
fn genesis_rejects_near_misses() {
    let mut c = controller("nakaminsky");
    dispatch(&mut c, Intent::Start);
    let effects = submit(&mut c, "21");
    fire_advance(&mut c, &effects);

    for rejected in ["genesisblock", "block", "", "genèse"] {
        submit(&mut c, rejected);
        assert_eq!(c.phase(), Phase::Challenge(1), "rejected `{rejected}`");
    }
}

#[test]
fn double_correct_submit_advances_once() {
    let mut c = controller("numeric");
    dispatch(&mut c, Intent::Start);
    let first = submit(&mut c, "21");
    let second = submit(&mut c, "21");

    fire_advance(&mut c, &first);
    assert_eq!(c.phase(), Phase::Challenge(1));
    let log_len = c.snapshot().log.len();

    fire_advance(&mut c, &second);
    assert_eq!(c.phase(), Phase::Challenge(1));
    assert_eq!(c.snapshot().log.len(), log_len);
}

#[test]
fn phase_specific_intents_are_rejected_elsewhere() {
    let mut c = controller("numeric");
    let before = c.snapshot();
    assert!(c.dispatch(Intent::SubmitAnswer { raw: "21".into() }).is_err());
    assert!(c.dispatch(Intent::Reset).is_err());
    assert_eq!(c.snapshot(), before);

    dispatch(&mut c, Intent::Start);
    let err = c
        .dispatch(Intent::SelectNode {
            index: NodeIndex(0),
        })
        .expect_err("no memory board");
    assert!(matches!(
        err,
        ContractViolation::WrongPhase {
            intent: "select_node",
            ..
        }
    ));
    assert!(c
        .dispatch(Intent::SelectChoice {
            choice_id: "x".into()
        })
        .is_err());
}

#[test]
fn memory_round_schedules_playback_rhythm() {
    let mut c = controller("memory");
    let effects = dispatch(&mut c, Intent::Start);
    assert_eq!(
        c.snapshot().pattern,
        vec![NodeIndex(1), NodeIndex(3), NodeIndex(0), NodeIndex(2)]
    );

    let timers = scheduled(&effects);
    assert_eq!(timers.len(), 8);
    let shows: Vec<_> = timers
        .iter()
        .filter(|(_, _, t)| matches!(t, TimerKind::PlaybackShow { .. }))
        .map(|(_, delay, _)| delay.as_millis())
        .collect();
    let hides: Vec<_> = timers
        .iter()
        .filter(|(_, _, t)| matches!(t, TimerKind::PlaybackHide { .. }))
        .map(|(_, delay, _)| delay.as_millis())
        .collect();
    assert_eq!(shows, vec![0, 800, 1600, 2400]);
    assert_eq!(hides, vec![400, 1200, 2000, 2800]);
}

#[test]
fn playback_lights_and_clears_nodes() {
    let mut c = controller("memory");
    let effects = dispatch(&mut c, Intent::Start);

    let show = timer_id(&effects, |t| *t == TimerKind::PlaybackShow { step: 1 });
    let hide = timer_id(&effects, |t| *t == TimerKind::PlaybackHide { step: 1 });
    fire(&mut c, show);
    assert_eq!(c.snapshot().active_node, Some(NodeIndex(3)));
    fire(&mut c, hide);
    assert_eq!(c.snapshot().active_node, None);
}

#[test]
fn replaying_the_pattern_reaches_success() {
    let mut c = controller("memory");
    dispatch(&mut c, Intent::Start);
    for index in [1, 3, 0] {
        node(&mut c, index);
        assert_eq!(c.phase(), Phase::Challenge(0));
    }
    node(&mut c, 2);
    assert_eq!(c.phase(), Phase::Success);
}

#[test]
fn mismatch_resets_user_pattern_but_keeps_target() {
    let mut c = controller("memory");
    dispatch(&mut c, Intent::Start);
    let pattern = c.snapshot().pattern;

    node(&mut c, 1);
    assert_eq!(c.snapshot().user_pattern, vec![NodeIndex(1)]);
    let effects = node(&mut c, 0);

    let snapshot = c.snapshot();
    assert!(snapshot.user_pattern.is_empty());
    assert_eq!(snapshot.pattern, pattern);
    assert_eq!(snapshot.phase, Phase::Challenge(0));
    assert!(snapshot.glitch);
    assert!(effects.contains(&Effect::ValidationFailed {
        failure: ValidationFailure::PatternMismatch
    }));
    assert!(snapshot
        .log
        .last()
        .is_some_and(|e| e.text.starts_with("Désynchronisation")));
}

#[test]
fn mismatch_at_every_position_restarts_attempt() {
    let target = [1u8, 3, 0, 2];
    for wrong_at in 0..target.len() {
        let mut c = controller("memory");
        dispatch(&mut c, Intent::Start);
        for (position, expected) in target.iter().enumerate().take(wrong_at + 1) {
            let index = if position == wrong_at {
                (expected + 1) % 4
            } else {
                *expected
            };
            node(&mut c, index);
        }
        let snapshot = c.snapshot();
        assert!(snapshot.user_pattern.is_empty(), "wrong at {wrong_at}");
        assert_eq!(snapshot.phase, Phase::Challenge(0));

        for index in target {
            node(&mut c, index);
        }
        assert_eq!(c.phase(), Phase::Success);
    }
}

#[test]
fn node_clicks_are_accepted_during_playback() {
    let mut c = controller("memory");
    let effects = dispatch(&mut c, Intent::Start);
    let show = timer_id(&effects, |t| *t == TimerKind::PlaybackShow { step: 0 });
    fire(&mut c, show);
    assert!(c.snapshot().active_node.is_some());

    node(&mut c, 1);
    assert_eq!(c.snapshot().user_pattern, vec![NodeIndex(1)]);
}

#[test]
fn out_of_range_node_is_a_contract_violation() {
    let mut c = controller("memory");
    dispatch(&mut c, Intent::Start);
    let before = c.snapshot();
    let err = c
        .dispatch(Intent::SelectNode {
            index: NodeIndex(4),
        })
        .expect_err("outside board");
    assert_eq!(
        err,
        ContractViolation::NodeOutOfRange {
            index: NodeIndex(4),
            node_count: 4
        }
    );
    assert_eq!(c.snapshot(), before);
}

#[test]
fn incorrect_choices_never_advance() {
    let mut c = controller("psychology");
    dispatch(&mut c, Intent::Start);
    for _ in 0..10 {
        let effects = choose(&mut c, "average_down");
        assert!(!scheduled(&effects)
            .iter()
            .any(|(_, _, t)| matches!(t, TimerKind::Advance { .. })));
        assert_eq!(c.phase(), Phase::Challenge(0));
    }
    assert!(c.snapshot().glitch);
    assert!(c
        .snapshot()
        .log
        .iter()
        .any(|e| e.text == "Décision : Je renforce pour baisser mon prix moyen"));
}

#[test]
fn correct_choices_reach_success_in_phase_count_steps() {
    let mut c = controller("psychology");
    let phases = c.variant().phase_count();
    assert_eq!(phases, 5);
    dispatch(&mut c, Intent::Start);

    let mut steps = 0;
    for choice in ["cut", "skip", "pause", "plan", "one_percent"] {
        let effects = choose(&mut c, choice);
        steps += 1;
        fire_advance(&mut c, &effects);
    }
    assert_eq!(steps, phases);
    assert_eq!(c.phase(), Phase::Success);
    assert!(c
        .snapshot()
        .log
        .last()
        .is_some_and(|e| e.text.starts_with("Profil psychologique validé")));
}

#[test]
fn unknown_choice_is_rejected() {
    let mut c = controller("psychology");
    dispatch(&mut c, Intent::Start);
    let err = c
        .dispatch(Intent::SelectChoice {
            choice_id: "moon".into(),
        })
        .expect_err("unknown choice");
    assert!(matches!(err, ContractViolation::UnknownChoice { .. }));
}

#[test]
fn reset_from_success_restores_initial_snapshot() {
    let mut c = controller("memory");
    let initial = c.snapshot();

    dispatch(&mut c, Intent::Start);
    node(&mut c, 2);
    for index in [1, 3, 0, 2] {
        node(&mut c, index);
    }
    assert_eq!(c.phase(), Phase::Success);
    assert!(c.pending_timers() > 0);

    let effects = dispatch(&mut c, Intent::Reset);
    assert!(effects
        .iter()
        .all(|effect| matches!(effect, Effect::Cancel { .. })));
    assert_eq!(c.pending_timers(), 0);
    assert_eq!(c.snapshot(), initial);

    dispatch(&mut c, Intent::Start);
    assert_eq!(c.phase(), Phase::Challenge(0));
}

#[test]
fn timers_from_before_reset_are_ignored() {
    let mut c = controller("nakaminsky");
    dispatch(&mut c, Intent::Start);
    let effects = submit(&mut c, "21");
    fire_advance(&mut c, &effects);
    let failed = submit(&mut c, "wrong");
    submit(&mut c, "genesis");
    assert_eq!(c.phase(), Phase::Success);

    dispatch(&mut c, Intent::Reset);
    let initial = c.snapshot();
    let stale = timer_id(&failed, |t| *t == TimerKind::ClearGlitch);
    fire(&mut c, stale);
    assert_eq!(c.snapshot(), initial);
}
