use challenge_core::{ChallengeKind, Variant};
use shared::{
    domain::{NodeIndex, Phase},
    protocol::Intent,
};

/// What one line typed at the prompt asks the runner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    Dispatch(Vec<Intent>),
    Quit,
    Help,
    Invalid(String),
}

pub fn parse_line(variant: &Variant, phase: Phase, line: &str) -> LineCommand {
    let trimmed = line.trim();
    match trimmed {
        "quit" | "exit" | ":q" => return LineCommand::Quit,
        "help" | "?" => return LineCommand::Help,
        _ => {}
    }

    match phase {
        Phase::Intro => LineCommand::Dispatch(vec![Intent::Start]),
        Phase::Success => {
            if trimmed == "reset" {
                LineCommand::Dispatch(vec![Intent::Reset])
            } else {
                LineCommand::Invalid("type `reset` to play again or `quit` to leave".into())
            }
        }
        Phase::Challenge(index) => {
            let Some(spec) = variant.phase(index) else {
                return LineCommand::Invalid(format!("no phase at position {index}"));
            };
            match &spec.challenge {
                // The controller owns normalization, so the raw line goes through untouched.
                ChallengeKind::Text(_) => LineCommand::Dispatch(vec![Intent::SubmitAnswer {
                    raw: line.to_string(),
                }]),
                ChallengeKind::Choice(choice) => {
                    let picked = trimmed
                        .parse::<usize>()
                        .ok()
                        .and_then(|number| number.checked_sub(1))
                        .and_then(|position| choice.choices.get(position))
                        .or_else(|| choice.find(trimmed));
                    match picked {
                        Some(option) => LineCommand::Dispatch(vec![Intent::SelectChoice {
                            choice_id: option.id.clone(),
                        }]),
                        None => LineCommand::Invalid(format!(
                            "pick 1-{} or one of the listed ids",
                            choice.choices.len()
                        )),
                    }
                }
                ChallengeKind::Memory(memory) => parse_nodes(trimmed, memory.node_count),
            }
        }
    }
}

fn parse_nodes(raw: &str, node_count: u8) -> LineCommand {
    let usage = || LineCommand::Invalid(format!("enter node numbers 1-{node_count}, e.g. `1 3 2`"));

    let mut intents = Vec::new();
    for token in raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        let Ok(number) = token.parse::<u8>() else {
            return usage();
        };
        if number == 0 || number > node_count {
            return usage();
        }
        intents.push(Intent::SelectNode {
            index: NodeIndex(number - 1),
        });
    }

    if intents.is_empty() {
        usage()
    } else {
        LineCommand::Dispatch(intents)
    }
}

pub fn help_text(variant: &Variant, phase: Phase) -> String {
    let hint = match phase {
        Phase::Intro => "press Enter to start".to_string(),
        Phase::Success => "`reset` restarts the gate".to_string(),
        Phase::Challenge(index) => match variant.phase(index).map(|spec| &spec.challenge) {
            Some(ChallengeKind::Text(_)) => "type your answer and press Enter".to_string(),
            Some(ChallengeKind::Choice(_)) => "type the number or id of a choice".to_string(),
            Some(ChallengeKind::Memory(memory)) => format!(
                "repeat the sequence with node numbers 1-{}, one or more per line",
                memory.node_count
            ),
            None => String::new(),
        },
    };
    format!("{hint}; `quit` leaves at any time")
}
