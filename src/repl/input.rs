//! Terminal input handling for the Wildwood REPL.
//!
//! Wraps rustyline configuration, completion, and history tailored to the
//! game's command vocabulary and save-slot workflow, with a plain stdin
//! fallback for piped input.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::save_files;

/// Outcome of reading a line from the REPL input.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

lazy_static! {
    static ref COMMAND_TERMS: Vec<String> = build_command_terms();
}

/// Every word the parser understands, aliases included. Filtered down to
/// useful completion candidates by `should_include`.
const VOCABULARY: &[&str] = &[
    "look",
    "l",
    "examine",
    "read",
    "inspect",
    "x",
    "go",
    "move",
    "walk",
    "north",
    "n",
    "south",
    "s",
    "east",
    "e",
    "west",
    "w",
    "take",
    "get",
    "grab",
    "drop",
    "discard",
    "inventory",
    "inv",
    "i",
    "equip",
    "wear",
    "wield",
    "unequip",
    "remove",
    "equipment",
    "gear",
    "eq",
    "attack",
    "fight",
    "hit",
    "talk",
    "speak",
    "chat",
    "feed",
    "give",
    "search",
    "scan",
    "survey",
    "eat",
    "taste",
    "drink",
    "sip",
    "cook",
    "prepare",
    "camp",
    "rest",
    "relieve",
    "status",
    "stats",
    "time",
    "wait",
    "quests",
    "achievements",
    "journal",
    "save",
    "load",
    "help",
    "h",
    "?",
    "quit",
    "exit",
];

const EXCLUDED_TERMS: &[&str] = &[
    "", "a", "an", "at", "from", "in", "on", "the", "to", "using", "with",
];

type ReplEditor = rustyline::Editor<WildwoodHelper, DefaultHistory>;

#[derive(Default)]
struct WildwoodHelper;

impl Helper for WildwoodHelper {}

impl Completer for WildwoodHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }
        let lower = prefix.to_lowercase();
        if let Some((replacement_start, candidates)) = save_slot_completions(&prefix, &lower, start)
        {
            return Ok((replacement_start, candidates));
        }
        let mut pairs = Vec::new();
        for term in COMMAND_TERMS.iter() {
            if term.starts_with(&lower) {
                pairs.push(Pair {
                    display: term.clone(),
                    replacement: term.clone(),
                });
            }
        }
        Ok((start, pairs))
    }
}

impl Hinter for WildwoodHelper {
    type Hint = String;
}

impl Highlighter for WildwoodHelper {}

impl Validator for WildwoodHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let trimmed = slice.trim_start_matches(char::is_whitespace);
    let start = pos - trimmed.len();
    (start, trimmed.to_string())
}

fn build_command_terms() -> Vec<String> {
    let mut terms: Vec<String> = VOCABULARY
        .iter()
        .filter(|word| should_include(word))
        .map(|word| (*word).to_string())
        .collect();
    terms.sort_unstable();
    terms.dedup();
    terms
}

/// Single letters complete to themselves and articles never start a command,
/// so neither earns a spot in the candidate list.
fn should_include(term: &str) -> bool {
    let normalized = term.trim();
    if normalized.chars().count() < 2 {
        return false;
    }
    !EXCLUDED_TERMS.contains(&normalized.to_lowercase().as_str())
}

/// Completion for `load <slot>`: offer the slot names found on disk.
fn save_slot_completions(prefix: &str, lower: &str, start: usize) -> Option<(usize, Vec<Pair>)> {
    const KEYWORD: &str = "load";
    if !matches_keyword(lower, KEYWORD) || prefix.len() < KEYWORD.len() {
        return None;
    }

    let command_part = &prefix[..KEYWORD.len()];
    let after_keyword = &prefix[KEYWORD.len()..];
    let trimmed_after = after_keyword.trim_start();
    let insertion_offset = prefix.len() - trimmed_after.len();
    let slots = available_save_slots();

    if after_keyword.is_empty() {
        let mut pairs = Vec::new();
        for slot in slots {
            pairs.push(Pair {
                display: format!("{command_part} {slot}"),
                replacement: format!(" {slot}"),
            });
        }
        return Some((start + prefix.len(), pairs));
    }

    let lower_partial = trimmed_after.to_lowercase();
    let mut pairs = Vec::new();
    for slot in slots
        .into_iter()
        .filter(|slot| lower_partial.is_empty() || slot.starts_with(&lower_partial))
    {
        pairs.push(Pair {
            display: slot.clone(),
            replacement: slot,
        });
    }
    Some((start + insertion_offset, pairs))
}

fn matches_keyword(lower: &str, keyword: &str) -> bool {
    if lower.len() < keyword.len() {
        return false;
    }
    if lower == keyword {
        return true;
    }
    if lower.starts_with(keyword) {
        return lower
            .chars()
            .nth(keyword.len())
            .is_some_and(char::is_whitespace);
    }
    false
}

fn available_save_slots() -> Vec<String> {
    match save_files::list_saves() {
        Ok(entries) => {
            // Entries arrive sorted by slot, so consecutive dedup suffices.
            let mut names = Vec::new();
            for entry in entries {
                if names.last().is_none_or(|last| last != &entry.slot) {
                    names.push(entry.slot);
                }
            }
            names
        }
        Err(err) => {
            warn!("failed to enumerate save slots for completion: {err}");
            Vec::new()
        }
    }
}

/// Manages the interactive input backend.
///
/// Uses `rustyline` when stdin is a terminal and falls back to a bare
/// stdin reader otherwise, so scripted playthroughs keep working.
pub struct InputManager {
    backend: Backend,
}

impl InputManager {
    pub fn new() -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new() {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(editor)
                }
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), using basic stdin");
                    Backend::plain()
                }
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };

        Self { backend }
    }

    /// Read one line from the current backend. When the interactive backend
    /// reports an unrecoverable error, drop to plain stdin and retry once.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) => {
                if self.backend.is_rustyline() {
                    warn!("rustyline input failed: {err}; switching to basic stdin");
                    self.backend = Backend::plain();
                    self.backend.read_line(prompt)
                } else {
                    Err(err)
                }
            }
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

enum Backend {
    Rustyline(RustylineInput),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
    history_path: Option<PathBuf>,
}

impl RustylineInput {
    fn new() -> io::Result<Self> {
        let mut editor = rustyline::Editor::<WildwoodHelper, _>::new().map_err(map_io_err)?;
        editor.set_helper(Some(WildwoodHelper));
        let history_path = history_file_path();

        if let Some(path) = history_path.as_ref() {
            if let Some(dir) = path.parent() {
                if let Err(err) = fs::create_dir_all(dir) {
                    warn!("failed to create history directory {}: {err}", dir.display());
                }
            }

            if let Err(err) = editor.load_history(path) {
                match err {
                    ReadlineError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                        info!("no prior history at {}, starting fresh", path.display());
                    }
                    other => {
                        warn!("failed to load history from {}: {other}", path.display());
                    }
                }
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to append to history: {err}");
                    }
                    if let Some(path) = self.history_path.as_ref() {
                        if let Err(err) = self.editor.save_history(path) {
                            warn!("failed to persist history to {}: {err}", path.display());
                        }
                    }
                }
                Ok(InputEvent::Line(line))
            }
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        let bytes = io::stdin().read_line(&mut self.buffer)?;
        if bytes == 0 {
            return Ok(InputEvent::Eof);
        }

        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }

        Ok(InputEvent::Line(self.buffer.clone()))
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        ReadlineError::Io(io_err) => Err(io_err),
        other => Err(io::Error::other(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    let mut path = base.to_path_buf();
    path.push("wildwood");
    path.push("history.txt");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_readline_ctrl_c_to_interrupt() {
        let result = convert_readline_error(ReadlineError::Interrupted).unwrap();
        assert!(matches!(result, InputEvent::Interrupted));
    }

    #[test]
    fn converts_readline_ctrl_d_to_eof() {
        let result = convert_readline_error(ReadlineError::Eof).unwrap();
        assert!(matches!(result, InputEvent::Eof));
    }

    #[test]
    fn history_path_appends_components() {
        let base = PathBuf::from("/tmp/wildwood-test");
        let path = build_history_path(&base);
        assert!(path.ends_with(Path::new("wildwood/history.txt")));
    }

    #[test]
    fn command_terms_cover_the_main_verbs() {
        assert!(COMMAND_TERMS.iter().any(|term| term == "inventory"));
        assert!(COMMAND_TERMS.iter().any(|term| term == "take"));
        assert!(COMMAND_TERMS.iter().any(|term| term == "survey"));
    }

    #[test]
    fn command_terms_drop_articles_and_single_letters() {
        assert!(!COMMAND_TERMS.iter().any(|term| term == "the"));
        assert!(!COMMAND_TERMS.iter().any(|term| term == "l"));
        assert!(!COMMAND_TERMS.iter().any(|term| term == "?"));
    }

    #[test]
    fn keyword_match_requires_a_word_boundary() {
        assert!(matches_keyword("load", "load"));
        assert!(matches_keyword("load camp", "load"));
        assert!(!matches_keyword("loadout", "load"));
        assert!(!matches_keyword("loa", "load"));
    }
}
