//! Error types for the mirage terminal.
//!
//! Two layers: [`MirageError`] covers engine and infrastructure failures,
//! [`CommandError`] is the payload a command body fails with and the
//! terminal renders as an error record.

use std::fmt;
use std::io;

/// Errors produced by the mirage engine and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum MirageError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("command already installed: {0}")]
    DuplicateCommand(String),

    #[error("process already running: {0}")]
    DuplicateProcess(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("terminal busy: {0}")]
    Busy(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MirageError>;

/// Discriminant of a command failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The typed token matches no installed command or alias.
    CommandNotFound,
    /// Malformed flags or arguments.
    InvalidUsage,
    InvalidConfigKey,
    InvalidConfigValue,
    InvalidConfigPair,
    /// A help or notes lookup with no match.
    NotFound,
    /// A note or process name collision.
    DuplicateEntity,
    /// A storage write did not complete.
    PersistenceFailure,
    /// A pending read was abandoned because the command was cancelled.
    Cancelled,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CommandNotFound => "command not found",
            Self::InvalidUsage => "invalid usage",
            Self::InvalidConfigKey => "invalid config key",
            Self::InvalidConfigValue => "invalid config value",
            Self::InvalidConfigPair => "invalid config pair",
            Self::NotFound => "not found",
            Self::DuplicateEntity => "duplicate entity",
            Self::PersistenceFailure => "persistence failure",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal error",
        };
        f.write_str(s)
    }
}

/// Failure payload of a command body: a kind, an optional machine code
/// (e.g. `C03`), and the human-readable details shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{details}")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub code: Option<String>,
    pub details: String,
}

impl CommandError {
    /// Build an error without a machine code.
    pub fn new(kind: ErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            details: details.into(),
        }
    }

    /// Build an error carrying a machine code.
    pub fn with_code(kind: ErrorKind, code: &str, details: impl Into<String>) -> Self {
        Self {
            kind,
            code: Some(code.to_string()),
            details: details.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "input was cancelled")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl From<MirageError> for CommandError {
    fn from(err: MirageError) -> Self {
        let kind = match &err {
            MirageError::Storage(_) | MirageError::Io(_) | MirageError::Json(_) => {
                ErrorKind::PersistenceFailure
            },
            MirageError::Config(_) | MirageError::TomlParse(_) => ErrorKind::InvalidConfigValue,
            MirageError::DuplicateCommand(_) | MirageError::DuplicateProcess(_) => {
                ErrorKind::DuplicateEntity
            },
            MirageError::NotFound(_) => ErrorKind::NotFound,
            MirageError::Busy(_) => ErrorKind::Internal,
        };
        Self::new(kind, err.to_string())
    }
}

/// Result type of a command body.
pub type CommandResult = std::result::Result<(), CommandError>;
