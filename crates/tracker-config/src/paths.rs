use std::{env, path::PathBuf};

use dirs::home_dir;

/// Overrides the application base directory when set.
pub const HOME_ENV: &str = "BUDGET_TRACKER_HOME";
pub const DATA_FILE_NAME: &str = "budget_data.csv";
const DEFAULT_DIR_NAME: &str = ".budget_tracker";

/// Returns the application-specific data directory, defaulting to `~/.budget_tracker`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
