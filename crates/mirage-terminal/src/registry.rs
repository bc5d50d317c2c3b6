//! Command trait and the registry that resolves typed names to commands.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use mirage_types::error::{CommandResult, MirageError, Result};

use crate::session::CommandContext;

/// A single installable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// Alternative tokens that resolve to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Help text: sections separated by `~`, blank sections render as blank lines.
    fn help(&self) -> Option<&str> {
        None
    }

    /// Hidden commands are installed but left out of the `help` listing.
    fn hidden(&self) -> bool {
        false
    }

    /// Start the command body. The future is driven by the terminal and may be
    /// dropped at any suspension point if the user cancels.
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult>;
}

/// Installed commands keyed by name, plus the alias table.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Rc<dyn Command>>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a batch of commands.
    ///
    /// Every name and alias must be unused, both among installed commands
    /// and within the batch. The batch is validated as a whole, so on error
    /// nothing is installed.
    pub fn install(&mut self, batch: Vec<Rc<dyn Command>>) -> Result<()> {
        let mut claimed = HashSet::new();
        for cmd in &batch {
            for token in std::iter::once(cmd.name()).chain(cmd.aliases().iter().copied()) {
                if self.is_taken(token) || !claimed.insert(token.to_string()) {
                    return Err(MirageError::DuplicateCommand(token.to_string()));
                }
            }
        }
        for cmd in batch {
            let name = cmd.name().to_string();
            for alias in cmd.aliases() {
                self.aliases.insert((*alias).to_string(), name.clone());
            }
            log::debug!("Installed command '{name}'");
            self.commands.insert(name, cmd);
        }
        Ok(())
    }

    fn is_taken(&self, token: &str) -> bool {
        self.commands.contains_key(token) || self.aliases.contains_key(token)
    }

    /// Canonical name for a typed token: exact names first, then aliases.
    pub fn canonical_name(&self, token: &str) -> Option<&str> {
        if let Some((name, _)) = self.commands.get_key_value(token) {
            return Some(name.as_str());
        }
        self.aliases.get(token).map(String::as_str)
    }

    pub fn resolve(&self, token: &str) -> Option<Rc<dyn Command>> {
        let name = self.canonical_name(token)?;
        self.commands.get(name).cloned()
    }

    /// True if `token` resolves, or is empty (a no-op line).
    pub fn is_valid(&self, token: &str) -> bool {
        token.is_empty() || self.canonical_name(token).is_some()
    }

    /// Installed command names, sorted; aliases excluded.
    pub fn list_names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    /// Names shown by `help`: like [`list_names`](Self::list_names) without hidden commands.
    pub fn listed_names(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter(|(_, cmd)| !cmd.hidden())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Help text of a command or alias. Missing or empty help is `NotFound`.
    pub fn help(&self, token: &str) -> Result<String> {
        self.resolve(token)
            .and_then(|cmd| cmd.help().filter(|h| !h.trim().is_empty()).map(str::to_string))
            .ok_or_else(|| MirageError::NotFound(format!("help for '{token}'")))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
