//! Interactive REPL
//!
//! Provides a readline-based interface with:
//! - Line-editing history (input lines only, never sent to the model)
//! - Persona selection via `/persona`, with tab completion
//! - Multi-line questions: end a line with `\` to continue it
//! - A spinner on stderr while the provider is working

use crate::error::Result;
use crate::frontend::helper::{join_continuations, InputHelper};
use crate::frontend::session::{render, Session};
use crate::personas::{PersonaKey, PersonaRegistry};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY: &str = "Generating answer...";

/// Slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Personas,
    /// `/persona` shows the selection, `/persona <name>` changes it
    Persona(Option<String>),
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a line starting with `/`; anything else is a question.
    ///
    /// A leading `//` escapes the slash, see [`question_text`].
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix('/')?;
        if rest.starts_with('/') {
            return None;
        }
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim().to_string())),
            None => (rest, None),
        };
        let arg = arg.filter(|a| !a.is_empty());

        Some(match name {
            "help" | "h" | "?" => Self::Help,
            "personas" => Self::Personas,
            "persona" | "p" => Self::Persona(arg),
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Text to send for a non-command line: `//text` is sent as `/text`
pub fn question_text(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        &trimmed[1..]
    } else {
        line
    }
}

/// Spinner shown while waiting for the provider. Drawing to stderr is
/// suppressed when stderr is not a terminal.
fn busy_spinner(target: ProgressDrawTarget) -> ProgressBar {
    let spinner = ProgressBar::with_draw_target(None, target);
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(BUSY);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Create the history file's directory; false if that failed
fn ensure_parent_dir(path: &Path) -> bool {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return true;
    };
    match std::fs::create_dir_all(parent) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Failed to create history directory {}: {}", parent.display(), e);
            false
        }
    }
}

/// Submit one question and render the outcome
async fn answer<W: Write>(
    session: &mut Session,
    question: &str,
    out: &mut W,
    target: ProgressDrawTarget,
) -> Result<()> {
    let spinner = busy_spinner(target);
    let outcome = session.submit(question).await;
    spinner.finish_and_clear();

    render(outcome, out)?;
    writeln!(out)?;
    Ok(())
}

/// REPL state
pub struct Repl {
    /// Readline editor with history
    editor: Editor<InputHelper, DefaultHistory>,
    session: Session,
    /// History file path (None = don't persist)
    history_path: Option<PathBuf>,
}

impl Repl {
    pub fn new(session: Session, history_path: Option<PathBuf>) -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(InputHelper::new()));
        Ok(Self {
            editor,
            session,
            history_path,
        })
    }

    fn load_history(&mut self) {
        if let Some(path) = self.history_path.as_ref().filter(|p| p.exists()) {
            if let Err(e) = self.editor.load_history(path) {
                tracing::debug!("Failed to load history {}: {}", path.display(), e);
            }
        }
    }

    fn save_history(&mut self) {
        let Some(path) = self.history_path.as_ref() else {
            return;
        };
        if !ensure_parent_dir(path) {
            return;
        }
        if let Err(e) = self.editor.save_history(path) {
            tracing::debug!("Failed to save history {}: {}", path.display(), e);
        }
    }

    /// Run the REPL loop until `/quit` or Ctrl+D
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        let mut stdout = io::stdout();
        print_banner(&mut stdout)?;
        print_personas(&mut stdout, self.session.persona())?;
        writeln!(stdout)?;

        loop {
            let prompt = format!("[{}] > ", self.session.persona().id());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.editor.add_history_entry(line.as_str())?;
                    }
                    let line = join_continuations(&line);

                    if let Some(command) = Command::parse(&line) {
                        if self.handle_command(command, &mut stdout)? {
                            break;
                        }
                        continue;
                    }

                    if line.is_empty() {
                        continue;
                    }
                    answer(
                        &mut self.session,
                        question_text(&line),
                        &mut stdout,
                        ProgressDrawTarget::stderr(),
                    )
                    .await?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    self.save_history();
                    return Err(err.into());
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Returns true when the loop should stop
    fn handle_command<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        match command {
            Command::Help => print_help(out)?,
            Command::Personas => print_personas(out, self.session.persona())?,
            Command::Persona(None) => {
                let persona = self.session.persona();
                writeln!(out, "Current persona: {} ({})", persona.label(), persona.id())?;
            }
            Command::Persona(Some(name)) => match name.parse::<PersonaKey>() {
                Ok(persona) => {
                    self.session.select(persona);
                    writeln!(out, "Persona set to {} ({})", persona.label(), persona.id())?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Quit => {
                writeln!(out, "Goodbye!")?;
                return Ok(true);
            }
            Command::Unknown(name) => {
                writeln!(out, "Unknown command: /{} (type /help)", name)?;
            }
        }
        Ok(false)
    }
}

fn print_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "# Expert LLM Answers")?;
    writeln!(out)?;
    writeln!(
        out,
        "Type a question and choose which kind of expert should answer it."
    )?;
    writeln!(
        out,
        "Switch experts with /persona <name>; /help lists commands, Ctrl+D exits."
    )?;
    writeln!(out)
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  /persona [name]  Show or change the expert persona")?;
    writeln!(out, "  /personas        List available personas")?;
    writeln!(out, "  /help            Show this help")?;
    writeln!(out, "  /quit            Exit")?;
    writeln!(out, "Any other line is sent as a question.")?;
    writeln!(out, "Start a question with // to send a leading /.")?;
    writeln!(out, "End a line with \\ to continue the question on the next line.")
}

/// List the personas, marking the selected one
pub fn print_personas<W: Write>(out: &mut W, selected: PersonaKey) -> io::Result<()> {
    writeln!(out, "Personas:")?;
    for persona in PersonaRegistry.list() {
        let marker = if persona.key == selected { "*" } else { " " };
        writeln!(
            out,
            "  {} {:<14} {:<18} {}",
            marker,
            persona.key.id(),
            persona.label,
            persona.description
        )?;
    }
    Ok(())
}
