//! Core CLI loop state, dispatch, and shell context helpers.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracker_config::{app_data_dir, Config, ConfigError, ConfigManager};
use tracker_core::{Clock, Commit, CoreError, LedgerSession, LedgerStore, SystemClock};
use tracker_domain::{RecordId, RecordKind};
use tracker_storage_csv::CsvLedgerStorage;

use crate::cli::commands;
use crate::cli::formatters::CurrencyFormatter;
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    mode: CliMode,
    pub(crate) registry: CommandRegistry,
    theme: ColorfulTheme,
    config: Config,
    config_manager: ConfigManager,
    session: LedgerSession,
    formatter: CurrencyFormatter,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Shell rooted at `base`: config under `base/config`, ledger file per config.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        Self::with_clock(mode, base, Arc::new(SystemClock))
    }

    pub(crate) fn with_clock(
        mode: CliMode,
        base: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let storage = CsvLedgerStorage::new(config_manager.data_file(&config));
        let session = open_session(storage, clock);

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            formatter: CurrencyFormatter::from_config(&config),
            config,
            config_manager,
            session,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn theme(&self) -> &ColorfulTheme {
        &self.theme
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub(crate) fn session(&self) -> &LedgerSession {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut LedgerSession {
        &mut self.session
    }

    pub(crate) fn store(&self) -> &LedgerStore {
        self.session.store()
    }

    pub(crate) fn formatter(&self) -> &CurrencyFormatter {
        &self.formatter
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        if self.session.is_dirty() {
            "budget*> ".into()
        } else {
            "budget> ".into()
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(command);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
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
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let prompt = if self.session.is_dirty() {
            "Exit with unsaved changes?"
        } else {
            "Exit shell?"
        };
        cli_io::confirm_action(&self.theme, prompt, false).map_err(CliError::from)
    }

    /// Tells the user when the save following a mutation failed.
    pub(crate) fn report_commit<T>(&self, commit: &Commit<T>) {
        if let Some(err) = commit.save_error() {
            self.print_warning(&err.to_string());
            self.print_hint("The change is kept in memory. Use `save` to retry.");
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(core) => {
                self.print_error(&core.to_string());
                if let CoreError::RecordNotFound { kind, .. } = core {
                    let hint = format!("Use `history {}` to list record ids.", kind.as_str());
                    self.print_hint(&hint);
                }
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

/// A broken data file is reported, then the shell starts empty. Nothing is
/// written back until the next successful mutation.
fn open_session(storage: CsvLedgerStorage, clock: Arc<dyn Clock>) -> LedgerSession {
    match LedgerSession::open(Box::new(storage.clone()), Arc::clone(&clock)) {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "could not load ledger; starting empty");
            cli_io::print_error(&err);
            cli_io::print_warning(format!(
                "Starting with an empty ledger. `{}` is left untouched until the next change.",
                storage.path().display()
            ));
            LedgerSession::empty(Box::new(storage), clock)
        }
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<RecordKind, CommandError> {
    raw.parse::<RecordKind>().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "unknown record kind `{}` (use `income` or `spending`)",
            raw
        ))
    })
}

pub(crate) fn parse_record_id(raw: &str) -> Result<RecordId, CommandError> {
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map(RecordId)
        .map_err(|_| CommandError::InvalidArguments(format!("record id `{}` must be numeric", raw)))
}

pub(crate) fn require_arg<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::Config(inner) => CliError::Config(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let clock: Arc<dyn Clock> = Arc::new(tests::FixedClock);
    let mut app = ShellContext::with_clock(CliMode::Script, base, clock)?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}
