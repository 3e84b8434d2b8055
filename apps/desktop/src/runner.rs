use std::io::Write;

use anyhow::Result;
use challenge_core::Session;
use shared::{domain::Snapshot, protocol::Intent};
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, warn};

use crate::{
    input::{help_text, parse_line, LineCommand},
    render::{OutputMode, Renderer},
};

/// Drives a session from input lines and its own timer deadlines until the
/// player quits, or until input ends and no timer is left.
pub async fn run<W: Write>(
    mut session: Session,
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
    mode: OutputMode,
) -> Result<Snapshot> {
    let variant = session.controller().variant().clone();
    let mut renderer = Renderer::new(mode);
    write_frame(out, &renderer.render(&variant, &session.snapshot()))?;

    let mut input_open = true;
    loop {
        let deadline = session.next_deadline();
        if !input_open && deadline.is_none() {
            break;
        }

        tokio::select! {
            line = lines.recv(), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    continue;
                };
                let now = Instant::now().into_std();
                session.fire_due(now);
                match parse_line(&variant, session.phase(), &line) {
                    LineCommand::Quit => break,
                    LineCommand::Help => writeln!(out, "{}", help_text(&variant, session.phase()))?,
                    LineCommand::Invalid(message) => writeln!(out, "{message}")?,
                    LineCommand::Dispatch(intents) => {
                        dispatch_line(&mut session, now, intents);
                    }
                }
            }
            _ = sleep_until(deadline) => {
                session.fire_due(Instant::now().into_std());
            }
        }

        write_frame(out, &renderer.render(&variant, &session.snapshot()))?;
    }

    Ok(session.snapshot())
}

/// Dispatches the intents of one line until the phase it was typed in is left.
/// Returns how many were dispatched.
fn dispatch_line(session: &mut Session, now: std::time::Instant, intents: Vec<Intent>) -> usize {
    let typed_in = session.phase();
    let mut dispatched = 0;
    for intent in intents {
        if session.phase() != typed_in {
            debug!(phase = %session.phase(), "dropping rest of line after phase change");
            break;
        }
        let name = intent.name();
        if let Err(err) = session.dispatch(now, intent) {
            warn!(intent = name, error = %err, "intent rejected");
        }
        dispatched += 1;
    }
    dispatched
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn write_frame<W: Write>(out: &mut W, frame: &str) -> Result<()> {
    if !frame.is_empty() {
        out.write_all(frame.as_bytes())?;
        out.flush()?;
    }
    Ok(())
}
