//! # Action Configuration
//!
//! Settings shared by every action: where the database lives, pool sizing, the
//! page-size ceiling applied to paginated lists, batch insert chunking and the
//! statement tracing knobs.
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional `config/query_action.{toml,yaml,json}` file, then `QUERY_ACTION_*`
//! environment variables. `DATABASE_URL` is honoured as a last override.

use crate::error::{ActionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default location (without extension) of the optional configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config/query_action";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "QUERY_ACTION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Upper bound applied to any page size requested through pagination
    pub max_page_size: u32,
    /// Rows per INSERT statement when batch creating
    pub batch_size: usize,
    /// Open per-operation spans on new actions
    pub trace_enabled: bool,
    /// Statements slower than this are logged at WARN
    pub slow_statement_ms: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            max_page_size: 1000,
            batch_size: 1000,
            trace_enabled: false,
            slow_statement_ms: 200,
        }
    }
}

impl ActionConfig {
    /// Load configuration from the default file location and the environment
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration, reading `file` instead of the default location when given.
    ///
    /// An explicit file must exist; the default file is optional.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file_source)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let mut loaded: ActionConfig = settings.try_deserialize()?;

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            loaded.database_url = db_url;
        }

        loaded.validate()?;
        debug!(
            max_connections = loaded.max_connections,
            max_page_size = loaded.max_page_size,
            batch_size = loaded.batch_size,
            trace_enabled = loaded.trace_enabled,
            "Action configuration loaded"
        );
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(ActionError::Configuration(
                "database_url must not be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ActionError::Configuration(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        if self.max_page_size == 0 {
            return Err(ActionError::Configuration(
                "max_page_size must be greater than zero".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ActionError::Configuration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn slow_statement_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_statement_ms)
    }
}
