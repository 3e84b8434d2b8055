use super::*;

const CUSTOM_VARIANT: &str = r#"
id = "custom"
title = "Custom gate"
boot_log = ["Booting...", "Ready."]
success = ["Unlocked."]

[[phases]]
title = "Answer"
entry = ["What is six times seven?"]
advance_delay_ms = 250

[phases.challenge]
kind = "text"
accepted = ["42", "forty-two"]
case_fold = true
failure = "Nope."

[[phases]]
title = "Pick"
entry = ["Pick wisely."]

[phases.challenge]
kind = "choice"
failure = "Wrong pick."
choices = [
  { id = "a", label = "Alpha" },
  { id = "b", label = "Beta", correct = true },
]

[[phases]]
title = "Repeat"

[phases.challenge]
kind = "memory"
desync = "Out of sync."

[offer]
price_line = "Free"
referral_url = "https://example.com/signup"
"#;

#[test]
fn every_builtin_variant_validates() {
    for id in builtin_ids() {
        let variant = builtin(id).expect("listed builtin exists");
        assert_eq!(variant.id, *id);
        variant.validate().expect("builtin is valid");
    }
}

#[test]
fn unknown_builtin_lists_available_ids() {
    let err = resolve_builtin("nope").expect_err("unknown");
    let message = err.to_string();
    assert!(message.contains("nope"));
    assert!(message.contains("nakaminsky"));
}

#[test]
fn parses_toml_variant_with_defaults() {
    let variant = parse_variant(CUSTOM_VARIANT).expect("parse");
    assert_eq!(variant.phase_count(), 3);
    assert_eq!(variant.phases[0].advance_delay_ms, Some(250));

    match &variant.phases[0].challenge {
        ChallengeKind::Text(text) => {
            assert!(text.trim, "trim defaults on");
            assert!(text.accepts(" FORTY-TWO "));
            assert_eq!(text.submit_label, "Valider");
        }
        other => panic!("expected text challenge, got {other:?}"),
    }
    match &variant.phases[1].challenge {
        ChallengeKind::Choice(choice) => {
            assert_eq!(choice.selection_line("Beta"), "Décision : Beta");
            assert!(choice.find("b").is_some_and(|c| c.correct));
            assert!(choice.find("a").is_some_and(|c| !c.correct));
        }
        other => panic!("expected choice challenge, got {other:?}"),
    }
    match &variant.phases[2].challenge {
        ChallengeKind::Memory(memory) => {
            assert_eq!(memory.node_count, 4);
            assert_eq!(memory.pattern_length, 4);
        }
        other => panic!("expected memory challenge, got {other:?}"),
    }
    assert_eq!(variant.offer.price_line, "Free");
    assert!(variant.offer.channel_invite_url.is_none());
}

#[test]
fn builtin_round_trips_through_toml() {
    let variant = builtin("psychology").expect("builtin");
    let raw = toml::to_string(&variant).expect("serialize");
    let parsed = parse_variant(&raw).expect("parse back");
    assert_eq!(parsed, variant);
}

#[test]
fn rejects_variant_without_phases() {
    let mut variant = builtin("numeric").expect("builtin");
    variant.phases.clear();
    assert!(matches!(
        variant.validate(),
        Err(CatalogError::EmptyPhases { .. })
    ));
}

#[test]
fn rejects_text_phase_without_answers() {
    let mut variant = builtin("numeric").expect("builtin");
    if let ChallengeKind::Text(text) = &mut variant.phases[1].challenge {
        text.accepted = vec!["  ".into()];
    }
    assert!(matches!(
        variant.validate(),
        Err(CatalogError::NoAcceptedAnswers { phase: 1, .. })
    ));
}

#[test]
fn rejects_choice_phase_problems() {
    let mut variant = builtin("psychology").expect("builtin");
    if let ChallengeKind::Choice(choice) = &mut variant.phases[2].challenge {
        for option in &mut choice.choices {
            option.correct = false;
        }
    }
    assert!(matches!(
        variant.validate(),
        Err(CatalogError::NoCorrectChoice { phase: 2, .. })
    ));

    let mut variant = builtin("psychology").expect("builtin");
    if let ChallengeKind::Choice(choice) = &mut variant.phases[0].challenge {
        let duplicate = choice.choices[0].clone();
        choice.choices.push(duplicate);
    }
    assert!(matches!(
        variant.validate(),
        Err(CatalogError::DuplicateChoice { phase: 0, .. })
    ));
}

#[test]
fn rejects_degenerate_memory_boards() {
    for (node_count, pattern_length) in [
        (0, 4),
        (MAX_MEMORY_NODES + 1, 4),
        (4, 0),
        (4, MAX_PATTERN_LENGTH + 1),
        (4, 5_000_000),
    ] {
        let mut variant = builtin("memory").expect("builtin");
        if let ChallengeKind::Memory(memory) = &mut variant.phases[0].challenge {
            memory.node_count = node_count;
            memory.pattern_length = pattern_length;
        }
        assert!(
            matches!(
                variant.validate(),
                Err(CatalogError::InvalidMemoryBoard { .. })
            ),
            "{node_count} nodes, length {pattern_length}"
        );
    }
}

#[test]
fn rejects_invalid_links_and_long_boot_logs() {
    let mut variant = builtin("nakaminsky").expect("builtin");
    variant.offer.referral_url = Some("not a url".into());
    assert!(matches!(
        variant.validate(),
        Err(CatalogError::InvalidLink { .. })
    ));

    let mut variant = builtin("nakaminsky").expect("builtin");
    variant.boot_log = (0..=LOG_CAPACITY).map(|i| format!("boot {i}")).collect();
    assert!(matches!(
        variant.validate(),
        Err(CatalogError::BootLogTooLong { .. })
    ));
}

#[test]
fn loads_variant_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    fs::write(&path, CUSTOM_VARIANT).expect("write variant");

    let variant = load_variant_file(&path).expect("load");
    assert_eq!(variant.id, "custom");

    let missing = load_variant_file(&dir.path().join("missing.toml")).expect_err("missing");
    assert!(matches!(missing, CatalogError::Io { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = parse_variant("id = ").expect_err("malformed");
    assert!(matches!(err, CatalogError::Parse(_)));
}
