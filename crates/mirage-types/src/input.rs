//! Platform-agnostic input event types.
//!
//! Every host maps its native keyboard and file-picker events to these
//! enums. The session engine never sees raw host input.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed on whichever surface holds focus.
    Key(KeyEvent),
    /// The file picker closed with a selection.
    FilesSelected(Vec<FileHandle>),
    /// The file picker closed without a selection.
    PickerDismissed,
}

impl InputEvent {
    /// Key events for typing `text` character by character (no modifiers).
    pub fn typed(text: &str) -> impl Iterator<Item = InputEvent> + '_ {
        text.chars()
            .map(|ch| InputEvent::Key(KeyEvent::plain(Key::Char(ch))))
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        InputEvent::Key(key)
    }
}

/// Keys the terminal reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Up,
    Down,
    Escape,
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// A key press with Shift held.
    pub fn shift(key: Key) -> Self {
        Self::new(
            key,
            Modifiers {
                shift: true,
                ..Modifiers::NONE
            },
        )
    }

    /// A character typed with Ctrl held.
    pub fn ctrl(ch: char) -> Self {
        Self::new(
            Key::Char(ch),
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        )
    }

    /// Ctrl+C in either case: the cancellation keystroke.
    pub fn is_interrupt(&self) -> bool {
        self.modifiers.ctrl && matches!(self.key, Key::Char('c' | 'C'))
    }

    /// The character this event types into a text surface, if any.
    pub fn text_char(&self) -> Option<char> {
        match self.key {
            Key::Char(ch) if !self.modifiers.ctrl && !self.modifiers.alt => Some(ch),
            _ => None,
        }
    }
}

/// A file chosen through the file picker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    /// Display name including the extension (e.g. `song.mp3`).
    pub name: String,
    /// Location of the file on the host.
    pub path: PathBuf,
}

impl FileHandle {
    /// Build a handle from a path, taking the name from its last component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }

    /// The name with its final extension removed.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(0) | None => &self.name,
            Some(i) => &self.name[..i],
        }
    }
}
