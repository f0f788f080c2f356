//! Terminal input handling for the Parley REPL.
//!
//! Wraps rustyline with history and word completion, and falls back to plain stdin when
//! there is no terminal (piped input, CI).

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use parley_data::VerbName;

/// Outcome of reading a line from the REPL input.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

/// Extra words offered for completion besides the verb names.
const EXTRA_TERMS: &[&str] = &[
    "back", "down", "examine", "go", "help", "north", "quit", "south", "east", "west", "up", "talk to", "look at",
    "pick up",
];

type ReplEditor = rustyline::Editor<ParleyHelper, DefaultHistory>;

#[derive(Default)]
struct ParleyHelper;

impl Helper for ParleyHelper {}

impl Completer for ParleyHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        if prefix.is_empty() || start > 0 {
            return Ok((start, Vec::new()));
        }
        let lower = prefix.to_lowercase();
        let pairs = completion_terms()
            .into_iter()
            .filter(|term| term.starts_with(&lower))
            .map(|term| Pair {
                display: term.clone(),
                replacement: term,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ParleyHelper {
    type Hint = String;
}

impl Highlighter for ParleyHelper {}

impl Validator for ParleyHelper {}

fn completion_terms() -> Vec<String> {
    let mut terms = VerbName::ALL
        .iter()
        .filter(|verb| !matches!(verb, VerbName::Fallback | VerbName::MoveTo))
        .map(|verb| verb.as_str().to_string())
        .chain(EXTRA_TERMS.iter().map(|term| (*term).to_string()))
        .collect::<Vec<_>>();
    terms.sort();
    terms.dedup();
    terms
}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let before = &line[..pos];
    let start = before.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
    (start, before[start..].to_string())
}

/// Reads REPL lines through a rustyline editor on a terminal, and from plain stdin otherwise
/// (or once the editor has failed).
pub struct InputManager {
    editor: Option<Box<LineEditor>>,
}

impl InputManager {
    pub fn new() -> Self {
        if !io::stdin().is_terminal() {
            info!("stdin is not a terminal, reading plain lines");
            return Self { editor: None };
        }
        match LineEditor::open() {
            Ok(editor) => Self { editor: Some(editor) },
            Err(err) => {
                warn!("line editor unavailable ({err}), reading plain lines");
                Self { editor: None }
            },
        }
    }

    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        if let Some(editor) = self.editor.as_mut() {
            match editor.read_line(prompt) {
                Ok(event) => return Ok(event),
                Err(err) => {
                    warn!("line editor failed ({err}), reading plain lines from now on");
                    self.editor = None;
                },
            }
        }
        read_plain_line(prompt)
    }
}

/// A rustyline editor whose history is saved after every line.
struct LineEditor {
    editor: ReplEditor,
    history: Option<PathBuf>,
}

impl LineEditor {
    fn open() -> io::Result<Box<Self>> {
        let mut editor = ReplEditor::new().map_err(io::Error::other)?;
        editor.set_helper(Some(ParleyHelper));
        let history = history_file_path();
        if let Some(path) = &history {
            load_history(&mut editor, path);
        }
        info!("line editor ready");
        Ok(Box::new(Self { editor, history }))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        let line = match self.editor.readline(prompt) {
            Ok(line) => line,
            Err(err) => return convert_readline_error(err),
        };
        if !line.trim().is_empty() {
            if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                warn!("failed to record history: {err}");
            }
            if let Some(path) = &self.history
                && let Err(err) = self.editor.save_history(path)
            {
                warn!("failed to save history to {}: {err}", path.display());
            }
        }
        Ok(InputEvent::Line(line))
    }
}

fn load_history(editor: &mut ReplEditor, path: &Path) {
    if let Some(dir) = path.parent()
        && let Err(err) = fs::create_dir_all(dir)
    {
        warn!("failed to create history directory {}: {err}", dir.display());
    }
    match editor.load_history(path) {
        Ok(()) => {},
        Err(ReadlineError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            info!("no history at {} yet", path.display());
        },
        Err(err) => warn!("failed to load history from {}: {err}", path.display()),
    }
}

fn read_plain_line(prompt: &str) -> io::Result<InputEvent> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(InputEvent::Eof);
    }
    Ok(InputEvent::Line(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        ReadlineError::Io(err) => Err(err),
        other => Err(io::Error::other(other)),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    base.join("parley").join("history.txt")
}
