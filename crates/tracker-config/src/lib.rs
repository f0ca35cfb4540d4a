//! tracker-config
//!
//! Persistent user preferences for the budget tracker shell.
//! Owns the Config data structure, its disk persistence, and the
//! application directory layout.

pub mod error;
pub mod manager;
pub mod model;
pub mod paths;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
pub use paths::{app_data_dir, DATA_FILE_NAME};
