//! Ad-hoc prompts opened by a running command.
//!
//! A prompt is one of four closed kinds, each with its own editing rules and
//! completion trigger. Opening one hands the input controller an
//! [`ActivePrompt`] holding the reply channel; the command awaits the
//! receiving end until the trigger fires.

use futures::channel::oneshot;
use mirage_types::input::{FileHandle, InputEvent, Key, KeyEvent};

/// Which kind of sub-prompt is focal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Single line, completed by Enter.
    Line,
    /// Single alphanumeric character, completed by typing it.
    Char,
    /// Free text, completed by Shift+Enter.
    Multiline,
    /// Host file picker, completed by a selection or dismissal.
    FilePicker,
}

/// What a command asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRequest {
    Line { label: Option<String> },
    Char { label: Option<String> },
    Multiline { initial: Option<String> },
    Files { multiple: bool, accept: Vec<String> },
}

impl PromptRequest {
    pub fn kind(&self) -> PromptKind {
        match self {
            Self::Line { .. } => PromptKind::Line,
            Self::Char { .. } => PromptKind::Char,
            Self::Multiline { .. } => PromptKind::Multiline,
            Self::Files { .. } => PromptKind::FilePicker,
        }
    }

    /// Label shown next to the surface.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Line { label } | Self::Char { label } => label.as_deref(),
            Self::Multiline { .. } | Self::Files { .. } => None,
        }
    }
}

/// The value a completed prompt resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    Text(String),
    Char(char),
    Files(Vec<FileHandle>),
}

/// Outcome of feeding one event to an active prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep {
    /// Event did not apply to this surface.
    Ignored,
    /// Buffer changed.
    Edited,
    /// Completion trigger fired.
    Complete(PromptReply),
}

/// A focal sub-prompt: its request, edit buffer, and reply channel.
#[derive(Debug)]
pub struct ActivePrompt {
    request: PromptRequest,
    buffer: String,
    responder: oneshot::Sender<PromptReply>,
}

impl ActivePrompt {
    pub fn new(request: PromptRequest, responder: oneshot::Sender<PromptReply>) -> Self {
        let buffer = match &request {
            PromptRequest::Multiline {
                initial: Some(text),
            } => text.clone(),
            _ => String::new(),
        };
        Self {
            request,
            buffer,
            responder,
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.request.kind()
    }

    pub fn request(&self) -> &PromptRequest {
        &self.request
    }

    /// Current edit buffer.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Apply an event according to this prompt's kind.
    pub fn step(&mut self, event: &InputEvent, tab_size: usize) -> PromptStep {
        match (self.kind(), event) {
            (PromptKind::FilePicker, InputEvent::FilesSelected(files)) => {
                PromptStep::Complete(PromptReply::Files(files.clone()))
            },
            (PromptKind::FilePicker, InputEvent::PickerDismissed) => {
                PromptStep::Complete(PromptReply::Files(Vec::new()))
            },
            (PromptKind::FilePicker, _) => PromptStep::Ignored,
            (kind, InputEvent::Key(key)) => self.step_key(kind, key, tab_size),
            _ => PromptStep::Ignored,
        }
    }

    fn step_key(&mut self, kind: PromptKind, key: &KeyEvent, tab_size: usize) -> PromptStep {
        match kind {
            PromptKind::Char => match key.text_char() {
                Some(ch) if ch.is_ascii_alphanumeric() => {
                    PromptStep::Complete(PromptReply::Char(ch))
                },
                _ => PromptStep::Ignored,
            },
            PromptKind::Line => match key.key {
                Key::Enter => PromptStep::Complete(PromptReply::Text(self.buffer.clone())),
                _ => self.edit(key, None),
            },
            PromptKind::Multiline => match key.key {
                Key::Enter if key.modifiers.shift => {
                    PromptStep::Complete(PromptReply::Text(self.buffer.clone()))
                },
                Key::Enter => {
                    self.buffer.push('\n');
                    PromptStep::Edited
                },
                _ => self.edit(key, Some(tab_size)),
            },
            PromptKind::FilePicker => PromptStep::Ignored,
        }
    }

    fn edit(&mut self, key: &KeyEvent, tab_size: Option<usize>) -> PromptStep {
        match (key.key, tab_size) {
            (Key::Backspace, _) => {
                self.buffer.pop();
                PromptStep::Edited
            },
            (Key::Tab, Some(n)) => {
                self.buffer.push_str(&" ".repeat(n));
                PromptStep::Edited
            },
            _ => match key.text_char() {
                Some(ch) => {
                    self.buffer.push(ch);
                    PromptStep::Edited
                },
                None => PromptStep::Ignored,
            },
        }
    }

    /// Deliver the reply to the waiting command.
    pub fn resolve(self, reply: PromptReply) {
        // The receiver is gone if the command was abandoned; nothing to do then.
        let _ = self.responder.send(reply);
    }
}
