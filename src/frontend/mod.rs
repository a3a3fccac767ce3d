//! Terminal front-end
//!
//! The input field, persona selector and output region of the application,
//! rendered as a line-editing REPL.

pub mod helper;
pub mod repl;
pub mod session;

pub use helper::InputHelper;
pub use repl::{print_personas, question_text, Command, Repl};
pub use session::{render, Outcome, Session};
