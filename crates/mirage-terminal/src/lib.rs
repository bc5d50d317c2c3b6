//! Session engine for the mirage terminal.
//!
//! A single main prompt accepts lines, resolves them against the installed
//! commands, and runs the command body on a single-threaded cooperative
//! scheduler. While a body runs the main prompt is disabled; the body may
//! open sub-prompts, print into the bounded scrollback, keep state alive in
//! the process registry, and is raced against Ctrl+C.

pub mod commands;
mod history;
mod input_mode;
mod lifecycle;
mod output;
mod presenter;
mod process;
mod prompt;
mod registry;
mod session;
mod terminal;

#[cfg(test)]
mod tests;

/// Bounded input history with up/down browsing.
pub use history::HistoryBuffer;
/// Input surface state machine.
pub use input_mode::{Action, InputController, InputMode};
/// Source of engine-level error records.
pub use lifecycle::ENGINE_SOURCE;
/// Bounded scrollback and its records.
pub use output::{OutputBuffer, OutputRecord};
/// Presentation collaborator.
pub use presenter::{Presenter, PresenterCall, RecordingPresenter};
/// Named state kept alive across invocations.
pub use process::{ProcessEntry, ProcessRegistry};
/// Sub-prompt kinds and their requests.
pub use prompt::{PromptKind, PromptReply, PromptRequest};
/// Command trait and registry.
pub use registry::{Command, CommandRegistry};
/// Command context and the capability handle.
pub use session::{CancelToken, CommandContext, SessionHandle};
/// Session driver.
pub use terminal::Terminal;
