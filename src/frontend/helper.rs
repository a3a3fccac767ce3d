//! Rustyline helper: slash-command completion, history hints and
//! backslash continuation lines

use crate::personas::PersonaKey;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};
use std::borrow::Cow;

/// Slash commands offered by tab completion
pub const SLASH_COMMANDS: &[&str] = &["/help", "/persona", "/personas", "/quit", "/exit"];

/// A line ending in `\` continues on the next line
pub fn needs_continuation(input: &str) -> bool {
    input.ends_with('\\')
}

/// Replace each `\`-newline pair with a plain newline
pub fn join_continuations(input: &str) -> String {
    input.replace("\\\n", "\n")
}

/// Completion candidates for the word under the cursor.
///
/// Returns the byte offset the candidates replace from. Command names are
/// completed at the start of the line, persona ids after `/persona `.
pub fn complete_command(line: &str, pos: usize) -> (usize, Vec<String>) {
    let head = &line[..pos];
    if !head.starts_with('/') || head.starts_with("//") {
        return (pos, Vec::new());
    }

    match head.split_once(' ') {
        None => {
            let matches = SLASH_COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(head))
                .map(|cmd| cmd.to_string())
                .collect();
            (0, matches)
        }
        Some(("/persona" | "/p", arg)) => {
            let start = pos - arg.len();
            let matches = PersonaKey::ALL
                .iter()
                .map(|key| key.id())
                .filter(|id| id.starts_with(arg))
                .map(str::to_string)
                .collect();
            (start, matches)
        }
        Some(_) => (pos, Vec::new()),
    }
}

/// Line-editing helper for the prompt
pub struct InputHelper {
    hinter: HistoryHinter,
}

impl InputHelper {
    pub fn new() -> Self {
        Self {
            hinter: HistoryHinter::new(),
        }
    }
}

impl Default for InputHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for InputHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = complete_command(line, pos);
        let pairs = matches
            .into_iter()
            .map(|m| Pair {
                display: m.clone(),
                replacement: m,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for InputHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        // History hints for questions only
        if line.starts_with('/') {
            None
        } else {
            self.hinter.hint(line, pos, ctx)
        }
    }
}

impl Highlighter for InputHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        // Dim
        Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }
}

impl Validator for InputHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        if needs_continuation(ctx.input()) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

impl Helper for InputHelper {}
