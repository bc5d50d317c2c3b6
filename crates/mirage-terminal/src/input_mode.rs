//! Input mode state machine.
//!
//! Exactly one input surface is focal at a time: the main prompt, nothing
//! (a command is running), or a sub-prompt opened by the running command.
//! The controller turns raw events into [`Action`]s for the terminal and
//! owns the main prompt's draft text and the active sub-prompt.

use futures::channel::oneshot;
use mirage_types::input::{InputEvent, Key, KeyEvent};

use crate::prompt::{ActivePrompt, PromptKind, PromptReply, PromptRequest, PromptStep};

/// Which surface currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// The main prompt accepts a new command line.
    MainPromptActive,
    /// A command is running and has not requested input.
    MainPromptDisabled,
    /// A sub-prompt of the given kind is focal.
    SubPromptActive(PromptKind),
}

/// What the terminal should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ignored,
    DraftEdited,
    /// Enter on the main prompt; the main prompt is now disabled.
    Submit(String),
    HistoryUp,
    HistoryDown,
    /// Ctrl+C while a command holds the terminal.
    Interrupt,
    PromptEdited,
    /// A sub-prompt completed and its reply was delivered.
    PromptCompleted {
        label: Option<String>,
        text: Option<String>,
    },
}

/// Owner of the focal surface.
#[derive(Debug)]
pub struct InputController {
    mode: InputMode,
    draft: String,
    prompt: Option<ActivePrompt>,
    tab_size: usize,
}

impl InputController {
    pub fn new(tab_size: usize) -> Self {
        Self {
            mode: InputMode::MainPromptActive,
            draft: String::new(),
            prompt: None,
            tab_size,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Text typed into the main prompt so far.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Edit buffer of the active sub-prompt.
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_ref().map(ActivePrompt::text)
    }

    pub fn prompt_request(&self) -> Option<&PromptRequest> {
        self.prompt.as_ref().map(ActivePrompt::request)
    }

    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.tab_size = tab_size;
    }

    /// Route one event to the focal surface.
    pub fn handle(&mut self, event: &InputEvent) -> Action {
        if let InputEvent::Key(key) = event
            && key.is_interrupt()
        {
            return match self.mode {
                InputMode::MainPromptActive => Action::Ignored,
                _ => Action::Interrupt,
            };
        }
        match self.mode {
            InputMode::MainPromptActive => match event {
                InputEvent::Key(key) => self.main_key(key),
                _ => Action::Ignored,
            },
            InputMode::MainPromptDisabled => Action::Ignored,
            InputMode::SubPromptActive(_) => self.prompt_event(event),
        }
    }

    fn main_key(&mut self, key: &KeyEvent) -> Action {
        match key.key {
            Key::Enter if !key.modifiers.shift && !key.modifiers.ctrl => {
                self.mode = InputMode::MainPromptDisabled;
                Action::Submit(std::mem::take(&mut self.draft))
            },
            Key::Tab => {
                self.draft.push_str(&" ".repeat(self.tab_size));
                Action::DraftEdited
            },
            Key::Up => Action::HistoryUp,
            Key::Down => Action::HistoryDown,
            Key::Backspace => {
                self.draft.pop();
                Action::DraftEdited
            },
            _ => match key.text_char() {
                Some(ch) => {
                    self.draft.push(ch);
                    Action::DraftEdited
                },
                None => Action::Ignored,
            },
        }
    }

    fn prompt_event(&mut self, event: &InputEvent) -> Action {
        let Some(prompt) = self.prompt.as_mut() else {
            return Action::Ignored;
        };
        match prompt.step(event, self.tab_size) {
            PromptStep::Ignored => Action::Ignored,
            PromptStep::Edited => Action::PromptEdited,
            PromptStep::Complete(reply) => {
                let Some(prompt) = self.prompt.take() else {
                    return Action::Ignored;
                };
                self.mode = InputMode::MainPromptDisabled;
                let label = prompt.request().label().map(str::to_string);
                let text = match &reply {
                    PromptReply::Text(t) => Some(t.clone()),
                    PromptReply::Char(c) => Some(c.to_string()),
                    PromptReply::Files(_) => None,
                };
                prompt.resolve(reply);
                Action::PromptCompleted { label, text }
            },
        }
    }

    /// Replace the main prompt draft (history browsing discards the draft).
    pub fn replace_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Give focus to a new sub-prompt. A prompt that was still open is dropped
    /// first, which cancels its pending read.
    pub fn open_prompt(&mut self, request: PromptRequest, responder: oneshot::Sender<PromptReply>) {
        if self.prompt.take().is_some() {
            log::debug!("Replacing an unfinished sub-prompt");
        }
        self.mode = InputMode::SubPromptActive(request.kind());
        self.prompt = Some(ActivePrompt::new(request, responder));
    }

    /// Take focus away from the main prompt while a command runs.
    pub fn disable_main(&mut self) {
        if self.mode == InputMode::MainPromptActive {
            self.mode = InputMode::MainPromptDisabled;
        }
    }

    /// Give focus back to an empty main prompt, closing any sub-prompt.
    ///
    /// Returns `true` if a sub-prompt was still open.
    pub fn restore_main(&mut self) -> bool {
        let closed = self.prompt.take().is_some();
        self.draft.clear();
        self.mode = InputMode::MainPromptActive;
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_types::input::FileHandle;

    fn key(k: Key) -> InputEvent {
        InputEvent::Key(KeyEvent::plain(k))
    }

    fn type_into(c: &mut InputController, text: &str) {
        for ev in InputEvent::typed(text) {
            c.handle(&ev);
        }
    }

    #[test]
    fn starts_on_main_prompt() {
        let c = InputController::new(2);
        assert_eq!(c.mode(), InputMode::MainPromptActive);
        assert_eq!(c.draft(), "");
    }

    #[test]
    fn enter_submits_and_disables_main() {
        let mut c = InputController::new(2);
        type_into(&mut c, "echo hi");
        assert_eq!(c.handle(&key(Key::Enter)), Action::Submit("echo hi".into()));
        assert_eq!(c.mode(), InputMode::MainPromptDisabled);
        assert_eq!(c.draft(), "");
    }

    #[test]
    fn shift_enter_does_not_submit_on_main() {
        let mut c = InputController::new(2);
        type_into(&mut c, "x");
        assert_eq!(
            c.handle(&InputEvent::Key(KeyEvent::shift(Key::Enter))),
            Action::Ignored
        );
        assert_eq!(c.mode(), InputMode::MainPromptActive);
    }

    #[test]
    fn tab_inserts_configured_spaces() {
        let mut c = InputController::new(4);
        c.handle(&key(Key::Tab));
        assert_eq!(c.draft(), "    ");
        c.set_tab_size(1);
        c.handle(&key(Key::Tab));
        assert_eq!(c.draft(), "     ");
    }

    #[test]
    fn arrows_request_history() {
        let mut c = InputController::new(2);
        assert_eq!(c.handle(&key(Key::Up)), Action::HistoryUp);
        assert_eq!(c.handle(&key(Key::Down)), Action::HistoryDown);
    }

    #[test]
    fn replace_draft_discards_typed_text() {
        let mut c = InputController::new(2);
        type_into(&mut c, "half typed");
        c.replace_draft("ls");
        assert_eq!(c.draft(), "ls");
    }

    #[test]
    fn keys_ignored_while_disabled() {
        let mut c = InputController::new(2);
        c.disable_main();
        assert_eq!(c.handle(&key(Key::Char('a'))), Action::Ignored);
        assert_eq!(c.handle(&key(Key::Enter)), Action::Ignored);
        assert_eq!(c.handle(&key(Key::Up)), Action::Ignored);
        assert_eq!(c.draft(), "");
    }

    #[test]
    fn interrupt_only_while_command_holds_terminal() {
        let mut c = InputController::new(2);
        let ctrl_c = InputEvent::Key(KeyEvent::ctrl('c'));
        assert_eq!(c.handle(&ctrl_c), Action::Ignored);
        c.disable_main();
        assert_eq!(c.handle(&ctrl_c), Action::Interrupt);
        let (tx, _rx) = oneshot::channel();
        c.open_prompt(PromptRequest::Line { label: None }, tx);
        assert_eq!(c.handle(&ctrl_c), Action::Interrupt);
    }

    #[test]
    fn line_prompt_roundtrip() {
        let mut c = InputController::new(2);
        c.disable_main();
        let (tx, mut rx) = oneshot::channel();
        c.open_prompt(
            PromptRequest::Line {
                label: Some("Name:".into()),
            },
            tx,
        );
        assert_eq!(c.mode(), InputMode::SubPromptActive(PromptKind::Line));
        type_into(&mut c, "ada");
        assert_eq!(c.prompt_text(), Some("ada"));
        let action = c.handle(&key(Key::Enter));
        assert_eq!(
            action,
            Action::PromptCompleted {
                label: Some("Name:".into()),
                text: Some("ada".into()),
            }
        );
        assert_eq!(c.mode(), InputMode::MainPromptDisabled);
        assert_eq!(rx.try_recv().unwrap(), Some(PromptReply::Text("ada".into())));
    }

    #[test]
    fn file_prompt_resolves_on_selection() {
        let mut c = InputController::new(2);
        let (tx, mut rx) = oneshot::channel();
        c.open_prompt(
            PromptRequest::Files {
                multiple: true,
                accept: vec![],
            },
            tx,
        );
        let files = vec![FileHandle::from_path("a.ogg")];
        let action = c.handle(&InputEvent::FilesSelected(files.clone()));
        assert_eq!(
            action,
            Action::PromptCompleted {
                label: None,
                text: None,
            }
        );
        assert_eq!(rx.try_recv().unwrap(), Some(PromptReply::Files(files)));
    }

    #[test]
    fn picker_events_ignored_on_main_prompt() {
        let mut c = InputController::new(2);
        assert_eq!(c.handle(&InputEvent::PickerDismissed), Action::Ignored);
    }

    #[test]
    fn opening_a_second_prompt_cancels_the_first() {
        let mut c = InputController::new(2);
        let (tx1, mut rx1) = oneshot::channel();
        c.open_prompt(PromptRequest::Line { label: None }, tx1);
        let (tx2, _rx2) = oneshot::channel();
        c.open_prompt(PromptRequest::Char { label: None }, tx2);
        assert!(rx1.try_recv().is_err());
        assert_eq!(c.mode(), InputMode::SubPromptActive(PromptKind::Char));
    }

    #[test]
    fn restore_main_closes_prompt_and_clears_draft() {
        let mut c = InputController::new(2);
        type_into(&mut c, "abc");
        c.disable_main();
        let (tx, mut rx) = oneshot::channel();
        c.open_prompt(PromptRequest::Multiline { initial: None }, tx);
        assert!(c.restore_main());
        assert_eq!(c.mode(), InputMode::MainPromptActive);
        assert_eq!(c.draft(), "");
        assert!(rx.try_recv().is_err());
        assert!(!c.restore_main());
    }
}
