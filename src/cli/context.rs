use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm};
use rust_decimal::Decimal;
use strsim::levenshtein;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cli::{commands, output, registry::CommandRegistry},
    config::{Config, ConfigManager},
    core::services::ServiceError,
    domain::FinanceBook,
    errors::{CliError, FinanceError, StoreError},
    storage::{BookAccess, JsonStore},
    utils::paths::PathResolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

/// Shell state shared by every command handler.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: JsonStore,
    pub running: bool,
    pub last_command: Option<String>,
    base_dir: PathBuf,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base_dir: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        let store = JsonStore::open(Some(base_dir.clone()), &config.active_book)?;
        info!(book = %store.path().display(), ?mode, "shell started");

        Ok(Self {
            mode,
            registry: commands::build_registry(),
            config_manager,
            config,
            store,
            running: true,
            last_command: None,
            base_dir,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        format!("finance [{}]> ", self.config.active_book)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            debug!(command, ?args, "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?").map_err(CliError::from)
    }

    /// Asks a yes/no question. Script mode always answers yes.
    pub(crate) fn confirm(&self, question: &str) -> Result<bool, dialoguer::Error> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Service(ServiceError::Ambiguous(prefix)) => {
                output::error(format!("`{prefix}` matches more than one record."));
                output::hint("Type more characters of the id.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn with_book<T>(&self, f: impl FnOnce(&FinanceBook) -> T) -> Result<T, CommandError> {
        Ok(self.store.read(f)?)
    }

    /// Runs a fallible mutation; the book is persisted after the closure returns.
    pub(crate) fn with_book_mut<T>(
        &self,
        f: impl FnOnce(&mut FinanceBook) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        self.store.write(f)?
    }

    /// Applies a config change, reopening the store when the active book changes.
    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set(&key.to_lowercase(), value)?;
        if updated.active_book != self.config.active_book {
            self.store = JsonStore::open(Some(self.base_dir.clone()), &updated.active_book)?;
            info!(book = %self.store.path().display(), "switched active book");
        }
        self.config_manager.save(&updated)?;
        self.config = updated;
        Ok(())
    }

    pub(crate) fn format_amount(&self, amount: Decimal) -> String {
        format!("{:.2} {}", amount, self.config.currency)
    }
}
