//! Terminal front end.
//!
//! Two ways to talk to a [`Resolver`] from a shell: [`run_repl`] reads typed sentences and
//! prints styled narration, and [`run_json_lines`] reads one JSON [`Action`] per line and writes
//! one JSON [`ActionResult`] per line, which is how voice adapters and scripts drive the engine.

mod input;
pub mod words;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{info, warn};
use parley_data::{Action, ActionResult, Sentence, VerbName};

use crate::markup::{render_wrapped, to_plain};
use crate::resolver::Resolver;
use crate::store::SessionStore;
use crate::style::GameStyle;

use input::{InputEvent, InputManager};
use words::{Input, parse_line};

const HELP: &str = "Talk to the game in short sentences: \"look\", \"go north\", \"take the lamp\", \
                    \"give the fish to the cat\". \"inventory\" lists what you carry, \"exits\" shows the way \
                    out, \"restart\" starts over and \"quit\" leaves.";

/// Print a result's message as wrapped, styled plain text.
fn show(result: &ActionResult) {
    let width = textwrap::termwidth();
    let text = render_wrapped(&to_plain(&result.message), width);
    if result.close {
        println!("\n{}", text.farewell_style());
    } else {
        println!("\n{}", text.narration_style());
    }
}

/// Play interactively as `session_id` until the player quits or the story closes.
///
/// # Errors
/// Propagates failures of the session store.
pub fn run_repl<S: SessionStore>(resolver: &Resolver<S>, session_id: &str) -> Result<()> {
    info!("starting REPL for session '{session_id}'");
    let mut input = InputManager::new();

    let opening = resolver.resolve_action(&Action::new(session_id, VerbName::Look, Sentence::new()))?;
    show(&opening);

    loop {
        let prompt = "\n> ".prompt_style().to_string();
        let line = match input.read_line(&prompt) {
            Ok(InputEvent::Line(line)) => line,
            Ok(InputEvent::Eof) => break,
            Ok(InputEvent::Interrupted) => {
                println!("{}", "(Type \"quit\" to leave.)".hint_style());
                continue;
            },
            Err(err) => {
                warn!("failed to read input: {err}");
                println!("{}", "Failed to read input. Try again.".error_style());
                continue;
            },
        };

        let (verb, sentence) = match parse_line(&line) {
            Input::Quit => break,
            Input::Help => {
                println!("\n{}", render_wrapped(HELP, textwrap::termwidth()).hint_style());
                continue;
            },
            Input::Act(verb, sentence) => (verb, sentence),
        };

        let result = resolver.resolve_action(&Action::new(session_id, verb, sentence))?;
        show(&result);
        if result.close {
            break;
        }
    }

    info!("REPL for session '{session_id}' ended");
    println!("{}", "Goodbye.".farewell_style());
    Ok(())
}

/// Answer JSON actions read from `reader`, one per line, writing JSON results to `writer`.
///
/// Lines that aren't valid actions get an `{"error": ...}` line back; the loop carries on.
///
/// # Errors
/// Fails on I/O errors and on session store failures.
pub fn run_json_lines<S, R, W>(resolver: &Resolver<S>, reader: R, mut writer: W) -> Result<()>
where
    S: SessionStore,
    R: BufRead,
    W: Write,
{
    for line in reader.lines() {
        let line = line.context("reading action line")?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Action>(&line) {
            Ok(action) => serde_json::to_string(&resolver.resolve_action(&action)?)?,
            Err(err) => {
                warn!("rejected action line: {err}");
                serde_json::json!({ "error": err.to_string() }).to_string()
            },
        };
        writeln!(writer, "{reply}").context("writing result line")?;
        writer.flush()?;
    }
    Ok(())
}
