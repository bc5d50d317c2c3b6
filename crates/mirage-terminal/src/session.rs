//! Session state and the capability handle given to commands.
//!
//! [`SessionState`] aggregates everything the terminal owns for its lifetime.
//! Commands never touch it directly: they get a [`SessionHandle`] in their
//! [`CommandContext`] and go through its methods. No borrow of the state is
//! ever held across a suspension point.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use mirage_storage::Storage;
use mirage_types::config::{self, Config, ConfigValue};
use mirage_types::error::{CommandError, CommandResult, ErrorKind, MirageError, Result};
use mirage_types::input::FileHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::history::HistoryBuffer;
use crate::input_mode::{InputController, InputMode};
use crate::lifecycle::split_command;
use crate::output::{OutputBuffer, OutputRecord};
use crate::presenter::Presenter;
use crate::process::{ProcessEntry, ProcessRegistry};
use crate::prompt::{PromptReply, PromptRequest};
use crate::registry::CommandRegistry;

/// Cooperative cancellation flag shared with a running command.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Everything a command body receives.
pub struct CommandContext {
    /// Canonical name of the command being run.
    pub name: String,
    /// Whitespace-separated arguments.
    pub args: Vec<String>,
    /// Everything after the command name, with inner spacing preserved.
    pub raw_args: String,
    pub session: SessionHandle,
    pub cancel: CancelToken,
}

/// The command currently in command position.
pub(crate) struct Running {
    pub(crate) signal: Option<oneshot::Sender<()>>,
    pub(crate) token: CancelToken,
}

/// Aggregate of all per-session state.
pub struct SessionState {
    pub(crate) config: Config,
    pub(crate) defaults: Config,
    pub(crate) history: HistoryBuffer,
    pub(crate) output: OutputBuffer,
    pub(crate) processes: ProcessRegistry,
    pub(crate) input: InputController,
    pub(crate) registry: CommandRegistry,
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) presenter: Box<dyn Presenter>,
    pub(crate) busy: bool,
    pub(crate) running: Option<Running>,
    pub(crate) first_launch: bool,
}

impl SessionState {
    /// Build the session, loading the configuration from storage.
    pub fn new(storage: Box<dyn Storage>, presenter: Box<dyn Presenter>, defaults: Config) -> Self {
        let mut storage = storage;
        let (config, first_launch) = load_config(storage.as_mut(), &defaults);
        let mut state = Self {
            history: HistoryBuffer::new(config.max_history()),
            output: OutputBuffer::new(config.max_buffer()),
            processes: ProcessRegistry::new(),
            input: InputController::new(config.tab_size()),
            registry: CommandRegistry::new(),
            config,
            defaults,
            storage,
            presenter,
            busy: false,
            running: None,
            first_launch,
        };
        state.apply_all_styles();
        state
    }

    /// Append a record to the scrollback and the visible surface.
    pub(crate) fn emit(&mut self, record: OutputRecord) {
        self.presenter.append(&record);
        if self.output.append(record).is_some() {
            self.presenter.remove_oldest();
        }
        self.presenter.scroll_to_bottom();
    }

    pub(crate) fn echo_command(&mut self, input: &str) {
        let record = OutputRecord::Command {
            user: self.config.prompt_user(),
            symbol: self.config.prompt_symbol(),
            input: input.to_string(),
        };
        self.emit(record);
    }

    pub(crate) fn emit_error(&mut self, source: &str, err: &CommandError) {
        self.emit(OutputRecord::Error {
            source: source.to_string(),
            code: err.code.clone(),
            details: err.details.clone(),
        });
    }

    pub(crate) fn clear_output(&mut self) {
        self.output.clear();
        self.presenter.clear();
    }

    pub(crate) fn hide_main_prompt(&mut self) {
        self.input.disable_main();
        self.presenter.hide_main_prompt();
    }

    /// Focus an empty main prompt, closing any sub-prompt left open.
    pub(crate) fn restore_main_prompt(&mut self) {
        if self.input.restore_main() {
            self.presenter.close_sub_prompt();
        }
        let (user, symbol) = (self.config.prompt_user(), self.config.prompt_symbol());
        self.presenter.show_main_prompt(&user, &symbol);
        self.presenter.scroll_to_bottom();
    }

    fn open_prompt(&mut self, request: PromptRequest) -> oneshot::Receiver<PromptReply> {
        let (tx, rx) = oneshot::channel();
        if self.input.prompt_request().is_some() {
            self.presenter.close_sub_prompt();
        }
        let text = match &request {
            PromptRequest::Multiline { initial } => initial.clone(),
            other => other.label().map(str::to_string),
        };
        self.hide_main_prompt();
        self.presenter.open_sub_prompt(request.kind(), text.as_deref());
        self.input.open_prompt(request, tx);
        self.presenter.scroll_to_bottom();
        rx
    }

    /// Fire the cancellation signal of the running command, if any.
    pub(crate) fn interrupt(&mut self) {
        if let Some(signal) = self.running.as_mut().and_then(|r| r.signal.take()) {
            log::debug!("Interrupt requested");
            // The lifecycle may already have finished with the receiver.
            let _ = signal.send(());
        }
    }

    /// Set one option and persist the full snapshot, rolling back on failure.
    pub(crate) fn set_config(&mut self, key: &str, value: ConfigValue) -> Result<()> {
        if !self.config.contains_key(key) {
            return Err(MirageError::Config(format!("unknown option '{key}'")));
        }
        let previous = self.config.insert(key, value.clone());
        if let Err(e) = self.storage.store(config::STORAGE_KEY, &self.config.to_json()) {
            log::warn!("Failed to persist config change of '{key}': {e}");
            if let Some(previous) = previous {
                self.config.insert(key, previous);
            }
            return Err(e);
        }
        log::info!("Config '{key}' set to {value}");
        self.apply_config(key, &value);
        Ok(())
    }

    /// Make an accepted change take effect.
    fn apply_config(&mut self, key: &str, value: &ConfigValue) {
        match key {
            config::MAX_HISTORY => self.history.set_capacity(self.config.max_history()),
            config::MAX_BUFFER => {
                for _ in 0..self.output.set_capacity(self.config.max_buffer()) {
                    self.presenter.remove_oldest();
                }
            },
            config::TAB_SIZE => self.input.set_tab_size(self.config.tab_size()),
            config::PROMPT_USER | config::PROMPT_SYMBOL => {
                if self.input.mode() == InputMode::MainPromptActive {
                    let (user, symbol) = (self.config.prompt_user(), self.config.prompt_symbol());
                    self.presenter.show_main_prompt(&user, &symbol);
                }
            },
            _ => {},
        }
        self.presenter.apply_style(key, value);
    }

    fn apply_all_styles(&mut self) {
        let entries: Vec<(String, ConfigValue)> = self
            .config
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        for (key, value) in entries {
            self.presenter.apply_style(&key, &value);
        }
    }

    /// Store the default configuration as the persisted snapshot.
    pub(crate) fn store_defaults(&mut self) -> Result<()> {
        self.storage
            .store(config::STORAGE_KEY, &self.defaults.to_json())
    }

    /// Reload config from storage and clear history, output and processes.
    pub(crate) fn restart(&mut self) {
        log::info!("Restarting session");
        let (config, _) = load_config(self.storage.as_mut(), &self.defaults);
        self.config = config;
        self.history = HistoryBuffer::new(self.config.max_history());
        self.output = OutputBuffer::new(self.config.max_buffer());
        self.processes.clear();
        self.input.set_tab_size(self.config.tab_size());
        self.presenter.clear();
        self.apply_all_styles();
    }
}

/// Load the persisted config layered over `defaults`.
///
/// Absent: store the defaults and report a first launch. Malformed or
/// unreadable: fall back to the defaults.
fn load_config(storage: &mut dyn Storage, defaults: &Config) -> (Config, bool) {
    match storage.retrieve(config::STORAGE_KEY) {
        Ok(Some(json)) => match Config::from_json(json) {
            Ok(stored) => {
                let mut config = defaults.clone();
                for (key, value) in stored.iter() {
                    config.insert(key, value.clone());
                }
                log::debug!("Loaded stored configuration");
                (config, false)
            },
            Err(e) => {
                log::warn!("Stored configuration is malformed, using defaults: {e}");
                (defaults.clone(), false)
            },
        },
        Ok(None) => {
            log::info!("No stored configuration, writing defaults");
            if let Err(e) = storage.store(config::STORAGE_KEY, &defaults.to_json()) {
                log::warn!("Failed to store default configuration: {e}");
            }
            (defaults.clone(), true)
        },
        Err(e) => {
            log::warn!("Failed to read configuration, using defaults: {e}");
            (defaults.clone(), false)
        },
    }
}

/// Capability interface handed to commands.
#[derive(Clone)]
pub struct SessionHandle {
    state: Rc<RefCell<SessionState>>,
}

impl SessionHandle {
    pub(crate) fn new(state: SessionState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Run `f` with exclusive access to the state. Never call across an `.await`.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    // -- Output --

    pub fn print(&self, text: &str) {
        self.with(|st| st.emit(OutputRecord::line(text)));
    }

    pub fn new_line(&self) {
        self.with(|st| st.emit(OutputRecord::Blank));
    }

    /// Empty the scrollback.
    pub fn clear(&self) {
        self.with(SessionState::clear_output);
    }

    // -- Sub-prompts --

    async fn read(&self, request: PromptRequest) -> std::result::Result<PromptReply, CommandError> {
        let reply = self.with(|st| st.open_prompt(request));
        reply.await.map_err(|_| CommandError::cancelled())
    }

    /// Read one line, completed by Enter.
    pub async fn read_line(&self, label: Option<&str>) -> std::result::Result<String, CommandError> {
        let request = PromptRequest::Line {
            label: label.map(str::to_string),
        };
        match self.read(request).await? {
            PromptReply::Text(text) => Ok(text),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// Read a single alphanumeric character.
    pub async fn read_char(&self, label: Option<&str>) -> std::result::Result<char, CommandError> {
        let request = PromptRequest::Char {
            label: label.map(str::to_string),
        };
        match self.read(request).await? {
            PromptReply::Char(ch) => Ok(ch),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// Read free text, completed by Shift+Enter.
    pub async fn read_multiline(
        &self,
        initial: Option<&str>,
    ) -> std::result::Result<String, CommandError> {
        let request = PromptRequest::Multiline {
            initial: initial.map(str::to_string),
        };
        match self.read(request).await? {
            PromptReply::Text(text) => Ok(text),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// Ask the host for files. Empty if the picker was dismissed.
    pub async fn read_files(
        &self,
        multiple: bool,
        accept: &[&str],
    ) -> std::result::Result<Vec<FileHandle>, CommandError> {
        let request = PromptRequest::Files {
            multiple,
            accept: accept.iter().map(|s| (*s).to_string()).collect(),
        };
        match self.read(request).await? {
            PromptReply::Files(files) => Ok(files),
            other => Err(unexpected_reply(&other)),
        }
    }

    // -- Configuration --

    pub fn config(&self) -> Config {
        self.with(|st| st.config.clone())
    }

    pub fn config_value(&self, key: &str) -> Option<ConfigValue> {
        self.with(|st| st.config.get(key).cloned())
    }

    /// Default value of an option, as configured for this session.
    pub fn default_value(&self, key: &str) -> Option<ConfigValue> {
        self.with(|st| st.defaults.get(key).cloned())
    }

    /// Set an existing option; persisted before it takes effect.
    pub fn set_config(&self, key: &str, value: ConfigValue) -> Result<()> {
        self.with(|st| st.set_config(key, value))
    }

    /// Persist the default configuration. Takes effect on the next restart.
    pub fn store_default_config(&self) -> Result<()> {
        self.with(SessionState::store_defaults)
    }

    // -- Storage --

    pub fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.with(|st| st.storage.as_mut().store_as(key, value))
    }

    pub fn retrieve<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.with(|st| st.storage.as_ref().retrieve_as(key))
    }

    // -- Commands --

    /// Command names for the `help` listing, sorted.
    pub fn command_names(&self) -> Vec<String> {
        self.with(|st| st.registry.listed_names())
    }

    pub fn command_help(&self, name: &str) -> Result<String> {
        self.with(|st| st.registry.help(name))
    }

    /// Run another command inside the current one: no echo, no history, no
    /// prompt handling. Its failure is returned to the caller.
    pub fn invoke(&self, line: &str) -> LocalBoxFuture<'static, CommandResult> {
        let (token, raw_args) = split_command(line);
        let resolved = self.with(|st| {
            st.registry
                .canonical_name(token)
                .map(str::to_string)
                .zip(st.registry.resolve(token))
        });
        let Some((name, command)) = resolved else {
            if token.is_empty() {
                return futures::future::ready(Ok(())).boxed_local();
            }
            let err = CommandError::new(ErrorKind::CommandNotFound, "command not found...");
            return futures::future::ready(Err(err)).boxed_local();
        };
        let cancel = self.with(|st| {
            st.running
                .as_ref()
                .map(|r| r.token.clone())
                .unwrap_or_default()
        });
        log::debug!("Invoking nested '{name}'");
        command.run(CommandContext {
            name,
            args: raw_args.split_whitespace().map(str::to_string).collect(),
            raw_args: raw_args.to_string(),
            session: self.clone(),
            cancel,
        })
    }

    // -- Processes --

    pub fn register_process(&self, name: &str, data: Rc<dyn Any>) -> Result<()> {
        self.with(|st| st.processes.register(name, data))
    }

    pub fn process(&self, name: &str) -> Result<ProcessEntry> {
        self.with(|st| st.processes.get(name))
    }

    /// Remove a process entry; a no-op if absent.
    pub fn end_process(&self, name: &str) -> Option<ProcessEntry> {
        self.with(|st| st.processes.unregister(name))
    }

    pub fn process_names(&self) -> Vec<String> {
        self.with(|st| st.processes.names())
    }

    // -- Session --

    /// Reload config from storage and clear history, output and processes.
    pub fn restart(&self) {
        self.with(SessionState::restart);
    }
}

fn unexpected_reply(reply: &PromptReply) -> CommandError {
    CommandError::new(
        ErrorKind::Internal,
        format!("prompt answered with an unexpected reply: {reply:?}"),
    )
}
