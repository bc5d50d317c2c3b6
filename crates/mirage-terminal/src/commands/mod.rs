//! Built-in commands.

mod basic;
mod config;
mod music;
mod notes;

use std::rc::Rc;

use crate::registry::Command;
use crate::session::SessionHandle;

pub use music::{Player, Playback, MUSIC_PROCESS};

/// Every built-in command, ready to install.
pub fn builtins() -> Vec<Rc<dyn Command>> {
    vec![
        Rc::new(basic::ClearCmd),
        Rc::new(config::ConfigCmd),
        Rc::new(basic::EchoCmd),
        Rc::new(basic::HelpCmd),
        Rc::new(music::MusicCmd),
        Rc::new(notes::NotesCmd),
        Rc::new(basic::RestartCmd),
        Rc::new(basic::TimeCmd),
        Rc::new(basic::WelcomeCmd),
    ]
}

/// Print `~`-separated help sections; empty sections become blank lines.
pub(crate) fn render_help(session: &SessionHandle, text: &str) {
    for section in text.split('~') {
        let line = section.replace(['\r', '\n'], "");
        if line.trim().is_empty() {
            session.new_line();
        } else {
            session.print(line.trim_end());
        }
    }
}

/// Split leading flag from the remaining arguments.
///
/// A flag may only appear once, in first position. Returns `None` when a
/// flag shows up anywhere else.
pub(crate) fn split_flag<'a>(
    args: &'a [String],
    is_flag: impl Fn(&str) -> bool,
) -> Option<(Option<&'a str>, &'a [String])> {
    let (flag, rest) = match args.split_first() {
        Some((first, rest)) if is_flag(first) => (Some(first.as_str()), rest),
        _ => (None, args),
    };
    if rest.iter().any(|a| is_flag(a)) {
        return None;
    }
    Some((flag, rest))
}
