//! Translation of stdin lines into engine input events.

use mirage_terminal::{InputMode, PromptKind};
use mirage_types::input::{FileHandle, InputEvent, Key, KeyEvent};

/// Line that stands in for Ctrl+C.
pub const INTERRUPT_LINE: &str = "^C";

/// Events for one line of stdin, given the focal surface.
///
/// `prompt_text` is the edit buffer of an open multiline prompt; a new line
/// is started before the typed text when the buffer is not empty.
pub fn line_events(mode: InputMode, prompt_text: Option<&str>, line: &str) -> Vec<InputEvent> {
    if line.trim() == INTERRUPT_LINE {
        return vec![InputEvent::Key(KeyEvent::ctrl('c'))];
    }
    let enter = InputEvent::Key(KeyEvent::plain(Key::Enter));
    match mode {
        InputMode::MainPromptActive | InputMode::SubPromptActive(PromptKind::Line) => {
            let mut events: Vec<_> = InputEvent::typed(line).collect();
            events.push(enter);
            events
        },
        InputMode::SubPromptActive(PromptKind::Char) => line
            .chars()
            .find(|c| !c.is_whitespace())
            .map(|c| vec![InputEvent::Key(KeyEvent::plain(Key::Char(c)))])
            .unwrap_or_default(),
        InputMode::SubPromptActive(PromptKind::Multiline) => {
            if line.is_empty() {
                return vec![InputEvent::Key(KeyEvent::shift(Key::Enter))];
            }
            let mut events = Vec::new();
            if prompt_text.is_some_and(|t| !t.is_empty()) {
                events.push(enter);
            }
            events.extend(InputEvent::typed(line));
            events
        },
        InputMode::SubPromptActive(PromptKind::FilePicker) => {
            let files: Vec<FileHandle> = line.split_whitespace().map(FileHandle::from_path).collect();
            if files.is_empty() {
                vec![InputEvent::PickerDismissed]
            } else {
                vec![InputEvent::FilesSelected(files)]
            }
        },
        InputMode::MainPromptDisabled => Vec::new(),
    }
}
