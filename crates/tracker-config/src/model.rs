use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::DATA_FILE_NAME;

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_enabled")]
    pub ui_color_enabled: bool,
    /// Ask before deleting a record in interactive mode.
    #[serde(default = "Config::default_enabled")]
    pub confirm_deletions: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom ledger file. Defaults to `<base>/budget_data.csv`.
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency_symbol: Self::default_currency_symbol(),
            ui_color_enabled: Self::default_enabled(),
            confirm_deletions: Self::default_enabled(),
            data_file: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    fn default_enabled() -> bool {
        true
    }

    /// Ledger file location; relative overrides are taken from `base`.
    pub fn resolve_data_file(&self, base: &Path) -> PathBuf {
        match &self.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => base.join(DATA_FILE_NAME),
        }
    }
}
