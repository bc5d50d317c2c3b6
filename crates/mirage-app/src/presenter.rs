//! Presenter that renders the session to a line-oriented writer.

use std::io::Write;

use mirage_terminal::{OutputRecord, Presenter, PromptKind};
use mirage_types::config::ConfigValue;

/// Writes records as plain lines. Styles have no textual rendering and are
/// only logged.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write(&mut self, text: &str, newline: bool) {
        let result = if newline {
            writeln!(self.out, "{text}")
        } else {
            write!(self.out, "{text}")
        };
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            log::warn!("Failed to write to output: {e}");
        }
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn append(&mut self, record: &OutputRecord) {
        // The echoed command line is already on screen from typing.
        if matches!(record, OutputRecord::Command { .. } | OutputRecord::Input { .. }) {
            return;
        }
        for line in record.to_lines() {
            self.write(&line, true);
        }
    }

    fn remove_oldest(&mut self) {}

    fn clear(&mut self) {
        // ANSI: clear screen, cursor home.
        self.write("\x1b[2J\x1b[H", false);
    }

    fn show_main_prompt(&mut self, user: &str, symbol: &str) {
        self.write(&format!("[{user}] {symbol} "), false);
    }

    fn hide_main_prompt(&mut self) {}

    fn open_sub_prompt(&mut self, kind: PromptKind, text: Option<&str>) {
        match (kind, text) {
            (PromptKind::Multiline, initial) => {
                if let Some(initial) = initial {
                    self.write(initial, true);
                }
                self.write("(empty line to save)", true);
            },
            (PromptKind::FilePicker, _) => {
                self.write("Select files (paths separated by spaces, empty to cancel): ", false)
            },
            (_, Some(label)) => self.write(&format!("{label} "), false),
            (_, None) => self.write("> ", false),
        }
    }

    fn close_sub_prompt(&mut self) {}

    fn scroll_to_bottom(&mut self) {}

    fn apply_style(&mut self, key: &str, value: &ConfigValue) {
        log::debug!("Style {key}={value}");
    }
}
