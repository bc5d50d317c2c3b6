//! The terminal driver: session state plus its cooperative scheduler.

use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use mirage_storage::Storage;
use mirage_types::config::Config;
use mirage_types::error::{MirageError, Result};
use mirage_types::input::InputEvent;

use crate::commands;
use crate::input_mode::{Action, InputMode};
use crate::lifecycle;
use crate::output::OutputRecord;
use crate::presenter::Presenter;
use crate::registry::Command;
use crate::session::{SessionHandle, SessionState};

/// A single terminal session.
///
/// Every call processes its event synchronously, then runs command bodies
/// until all of them are waiting on input, so the next event always sees
/// the focus the previous one left behind.
pub struct Terminal {
    pool: LocalPool,
    spawner: LocalSpawner,
    session: SessionHandle,
}

impl Terminal {
    pub fn new(storage: Box<dyn Storage>, presenter: Box<dyn Presenter>) -> Self {
        Self::with_defaults(storage, presenter, Config::default())
    }

    /// Create a session whose factory defaults are `defaults`.
    pub fn with_defaults(
        storage: Box<dyn Storage>,
        presenter: Box<dyn Presenter>,
        defaults: Config,
    ) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        let session = SessionHandle::new(SessionState::new(storage, presenter, defaults));
        session.with(|st| st.restore_main_prompt());
        Self {
            pool,
            spawner,
            session,
        }
    }

    /// A session with every built-in command installed.
    pub fn with_builtins(storage: Box<dyn Storage>, presenter: Box<dyn Presenter>) -> Result<Self> {
        let mut terminal = Self::new(storage, presenter);
        terminal.install(commands::builtins())?;
        Ok(terminal)
    }

    /// Install a batch of commands. Fails without installing anything if a
    /// name or alias is already taken.
    pub fn install(&mut self, batch: Vec<Rc<dyn Command>>) -> Result<()> {
        let count = batch.len();
        self.session.with(|st| st.registry.install(batch))?;
        log::info!("Installed {count} commands");
        Ok(())
    }

    /// Feed one input event to the focal surface.
    pub fn handle_event(&mut self, event: InputEvent) {
        let action = self.session.with(|st| st.input.handle(&event));
        match action {
            Action::Ignored | Action::DraftEdited | Action::PromptEdited => {},
            Action::Submit(line) => self.spawn_line(line, false),
            Action::HistoryUp => self.session.with(|st| {
                if let Some(entry) = st.history.up().map(str::to_string) {
                    st.input.replace_draft(&entry);
                }
            }),
            Action::HistoryDown => self.session.with(|st| {
                if let Some(entry) = st.history.down().map(str::to_string) {
                    st.input.replace_draft(&entry);
                }
            }),
            Action::Interrupt => self.session.with(|st| st.interrupt()),
            Action::PromptCompleted { label, text } => self.session.with(|st| {
                st.presenter.close_sub_prompt();
                if let Some(text) = text {
                    st.emit(OutputRecord::Input { label, text });
                }
            }),
        }
        self.pool.run_until_stalled();
    }

    /// Feed a sequence of events in order.
    pub fn handle_events(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.handle_event(event);
        }
    }

    /// Submit a line as if typed on the main prompt. `quiet` skips the echo.
    ///
    /// Fails with `Busy` while another command holds command position.
    pub fn run_line(&mut self, raw: &str, quiet: bool) -> Result<()> {
        if self.is_busy() {
            return Err(MirageError::Busy(format!("cannot run '{raw}'")));
        }
        self.session.with(|st| st.input.disable_main());
        self.spawn_line(raw.to_string(), quiet);
        self.pool.run_until_stalled();
        Ok(())
    }

    fn spawn_line(&mut self, raw: String, quiet: bool) {
        self.session.with(|st| st.busy = true);
        let task = lifecycle::run_line(self.session.clone(), raw, quiet);
        if let Err(e) = self.spawner.spawn_local(task) {
            log::error!("Failed to schedule command: {e}");
            self.session.with(|st| {
                st.busy = false;
                st.restore_main_prompt();
            });
        }
    }

    /// Reload config from storage and clear history, output and processes.
    pub fn restart(&mut self) {
        self.session.restart();
        if !self.is_busy() {
            self.session.with(|st| st.restore_main_prompt());
        }
    }

    /// True while a command holds command position.
    pub fn is_busy(&self) -> bool {
        self.session.with(|st| st.busy)
    }

    pub fn input_mode(&self) -> InputMode {
        self.session.with(|st| st.input.mode())
    }

    /// Text typed into the main prompt.
    pub fn draft(&self) -> String {
        self.session.with(|st| st.input.draft().to_string())
    }

    /// Edit buffer of the focal sub-prompt.
    pub fn prompt_text(&self) -> Option<String> {
        self.session
            .with(|st| st.input.prompt_text().map(str::to_string))
    }

    /// True when no stored configuration existed at startup.
    pub fn is_first_launch(&self) -> bool {
        self.session.with(|st| st.first_launch)
    }

    pub fn config(&self) -> Config {
        self.session.config()
    }

    /// Scrollback records, oldest first.
    pub fn output(&self) -> Vec<OutputRecord> {
        self.session.with(|st| st.output.records().cloned().collect())
    }

    /// History entries, newest first.
    pub fn history(&self) -> Vec<String> {
        self.session
            .with(|st| st.history.entries().map(str::to_string).collect())
    }

    pub fn command_names(&self) -> Vec<String> {
        self.session.with(|st| st.registry.list_names())
    }

    pub fn process_names(&self) -> Vec<String> {
        self.session.process_names()
    }

    /// Capability handle onto this session.
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }
}
