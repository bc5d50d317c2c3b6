//! Presentation collaborator.
//!
//! The engine drives the visible surface only through [`Presenter`]; it never
//! inspects what the host does with the calls. [`RecordingPresenter`] keeps
//! every call in a shared log so tests and embedders can observe them.

use std::cell::RefCell;
use std::rc::Rc;

use mirage_types::config::ConfigValue;

use crate::output::OutputRecord;
use crate::prompt::PromptKind;

/// Opaque side effects on the visible terminal.
pub trait Presenter {
    /// Append a rendered record to the visible scrollback.
    fn append(&mut self, record: &OutputRecord);

    /// Remove the oldest visible record after a buffer eviction.
    fn remove_oldest(&mut self);

    /// Remove every visible record.
    fn clear(&mut self);

    /// Show and focus the main prompt.
    fn show_main_prompt(&mut self, user: &str, symbol: &str);

    /// Hide the main prompt while a command runs.
    fn hide_main_prompt(&mut self);

    /// Create and focus a sub-prompt. `text` is the label, or the initial
    /// contents of a multiline surface.
    fn open_sub_prompt(&mut self, kind: PromptKind, text: Option<&str>);

    /// Remove the focal sub-prompt.
    fn close_sub_prompt(&mut self);

    /// Scroll the bottom marker into view.
    fn scroll_to_bottom(&mut self);

    /// A configuration option changed.
    fn apply_style(&mut self, key: &str, value: &ConfigValue);
}

/// One presenter call, as seen by [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    Append(OutputRecord),
    RemoveOldest,
    Clear,
    ShowMainPrompt { user: String, symbol: String },
    HideMainPrompt,
    OpenSubPrompt { kind: PromptKind, text: Option<String> },
    CloseSubPrompt,
    ScrollToBottom,
    ApplyStyle { key: String, value: ConfigValue },
}

/// Presenter that records calls into a log shared by all its clones.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    calls: Rc<RefCell<Vec<PresenterCall>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.borrow().clone()
    }

    /// Records appended so far, in order.
    pub fn appended(&self) -> Vec<OutputRecord> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PresenterCall::Append(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of records currently visible: appends minus evictions, reset by clears.
    pub fn visible_len(&self) -> usize {
        self.calls.borrow().iter().fold(0, |n, c| match c {
            PresenterCall::Append(_) => n + 1,
            PresenterCall::RemoveOldest => n.saturating_sub(1),
            PresenterCall::Clear => 0,
            _ => n,
        })
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, call: PresenterCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn append(&mut self, record: &OutputRecord) {
        self.push(PresenterCall::Append(record.clone()));
    }

    fn remove_oldest(&mut self) {
        self.push(PresenterCall::RemoveOldest);
    }

    fn clear(&mut self) {
        self.push(PresenterCall::Clear);
    }

    fn show_main_prompt(&mut self, user: &str, symbol: &str) {
        self.push(PresenterCall::ShowMainPrompt {
            user: user.to_string(),
            symbol: symbol.to_string(),
        });
    }

    fn hide_main_prompt(&mut self) {
        self.push(PresenterCall::HideMainPrompt);
    }

    fn open_sub_prompt(&mut self, kind: PromptKind, text: Option<&str>) {
        self.push(PresenterCall::OpenSubPrompt {
            kind,
            text: text.map(str::to_string),
        });
    }

    fn close_sub_prompt(&mut self) {
        self.push(PresenterCall::CloseSubPrompt);
    }

    fn scroll_to_bottom(&mut self) {
        self.push(PresenterCall::ScrollToBottom);
    }

    fn apply_style(&mut self, key: &str, value: &ConfigValue) {
        self.push(PresenterCall::ApplyStyle {
            key: key.to_string(),
            value: value.clone(),
        });
    }
}
