use std::fmt::Write as _;

use challenge_core::{ChallengeKind, Variant};
use shared::domain::{NodeIndex, Phase, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Turns successive snapshots into terminal output, printing only what changed.
pub struct Renderer {
    mode: OutputMode,
    last: Option<Snapshot>,
}

impl Renderer {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode, last: None }
    }

    pub fn render(&mut self, variant: &Variant, snapshot: &Snapshot) -> String {
        if self.last.as_ref() == Some(snapshot) {
            return String::new();
        }
        let out = match self.mode {
            OutputMode::Json => match serde_json::to_string(snapshot) {
                Ok(line) => format!("{line}\n"),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to encode snapshot");
                    String::new()
                }
            },
            OutputMode::Text => self.render_text(variant, snapshot),
        };
        self.last = Some(snapshot.clone());
        out
    }

    fn render_text(&self, variant: &Variant, snapshot: &Snapshot) -> String {
        let mut out = String::new();
        let previous = self.last.as_ref();
        let last_seq = previous.and_then(|prev| prev.log.last()).map(|entry| entry.seq);
        let newest_seq = snapshot.log.last().map(|entry| entry.seq);
        let restarted = matches!((last_seq, newest_seq), (Some(old), Some(new)) if new < old);

        if previous.is_none() || restarted {
            if restarted {
                let _ = writeln!(out, "----");
            }
            write_header(&mut out, variant);
        }

        for entry in &snapshot.log {
            let is_new = restarted || last_seq.map_or(true, |seq| entry.seq > seq);
            if is_new {
                let _ = writeln!(out, "{entry}");
            }
        }

        let was_glitching = previous.is_some_and(|prev| prev.glitch) && !restarted;
        if snapshot.glitch && !was_glitching {
            let _ = writeln!(out, "!! SIGNAL CORROMPU !!");
        }

        if let Some(node) = snapshot.active_node {
            if previous.and_then(|prev| prev.active_node) != Some(node) {
                let _ = writeln!(out, "{}", node_strip(variant, snapshot.phase, node));
            }
        }

        let phase_changed = restarted || previous.map_or(true, |prev| prev.phase != snapshot.phase);
        if phase_changed {
            write_prompt(&mut out, variant, snapshot.phase);
        }
        out
    }
}

fn write_header(out: &mut String, variant: &Variant) {
    let offer = &variant.offer;
    let _ = writeln!(out, "== {} ==", variant.title);
    for line in [&offer.price_line, &offer.tagline] {
        if !line.is_empty() {
            let _ = writeln!(out, "{line}");
        }
    }
}

fn node_strip(variant: &Variant, phase: Phase, active: NodeIndex) -> String {
    let node_count = phase
        .challenge_index()
        .and_then(|index| variant.phase(index))
        .and_then(|spec| match &spec.challenge {
            ChallengeKind::Memory(memory) => Some(memory.node_count),
            _ => None,
        })
        .unwrap_or(active.0 + 1);
    (0..node_count)
        .map(|node| {
            if node == active.0 {
                "[#]".to_string()
            } else {
                format!("[{}]", node + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_prompt(out: &mut String, variant: &Variant, phase: Phase) {
    let offer = &variant.offer;
    match phase {
        Phase::Intro => {
            let _ = writeln!(out, "[Entrée] {}", offer.start_label);
            write_warning(out, variant);
        }
        Phase::Challenge(index) => {
            let Some(spec) = variant.phase(index) else {
                return;
            };
            let _ = writeln!(
                out,
                "-- {} ({}/{}) --",
                spec.title,
                index + 1,
                variant.phase_count()
            );
            match &spec.challenge {
                ChallengeKind::Text(text) => {
                    let _ = writeln!(out, "{} [{}]", text.placeholder, text.submit_label);
                }
                ChallengeKind::Choice(choice) => {
                    for (position, option) in choice.choices.iter().enumerate() {
                        let _ = writeln!(out, "  {}) {}", position + 1, option.label);
                    }
                }
                ChallengeKind::Memory(memory) => {
                    let _ = writeln!(
                        out,
                        "Nœuds 1-{} : reproduisez la séquence.",
                        memory.node_count
                    );
                }
            }
            write_warning(out, variant);
        }
        Phase::Success => {
            let _ = writeln!(out, "** {} **", offer.success_headline);
            if !offer.success_body.is_empty() {
                let _ = writeln!(out, "{}", offer.success_body);
            }
            if let Some(url) = &offer.channel_invite_url {
                let _ = writeln!(out, "{} : {url}", offer.channel_invite_label);
            }
            if let Some(url) = &offer.referral_url {
                let _ = writeln!(out, "{} : {url}", offer.referral_label);
            }
            let _ = writeln!(out, "[reset] {}", offer.reset_label);
            if !offer.footer.is_empty() {
                let _ = writeln!(out, "{}", offer.footer.join(" | "));
            }
        }
    }
}

fn write_warning(out: &mut String, variant: &Variant) {
    if !variant.offer.warning.is_empty() {
        let _ = writeln!(out, "{}", variant.offer.warning);
    }
}
