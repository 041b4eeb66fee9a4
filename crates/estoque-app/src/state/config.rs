//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`ESTOQUE_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization.

use std::path::PathBuf;

use directories::ProjectDirs;
use estoque_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Default tracing filter when neither `RUST_LOG` nor `ESTOQUE_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,estoque=debug,sqlx=warn";

const DB_FILE_NAME: &str = "estoque.db";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file.
    /// Default: `estoque.db` in the platform data directory
    pub database_path: PathBuf,

    /// Maximum pool connections.
    /// Default: 5
    pub max_connections: u32,

    /// `tracing-subscriber` filter directives, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: default_database_path(),
            max_connections: 5,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Creates a new AppConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `ESTOQUE_DB_PATH`: database file
    /// - `ESTOQUE_MAX_CONNECTIONS`: pool size (ignored unless a positive integer)
    /// - `ESTOQUE_LOG`: log filter, e.g. `debug` or `estoque_db=trace`
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("ESTOQUE_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(max) = lookup("ESTOQUE_MAX_CONNECTIONS") {
            match max.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => {}
            }
        }

        if let Some(filter) = lookup("ESTOQUE_LOG").filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        config
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Platform-specific database location.
///
/// - **macOS**: `~/Library/Application Support/br.estoque.estoque/estoque.db`
/// - **Windows**: `%APPDATA%\estoque\estoque\data\estoque.db`
/// - **Linux**: `~/.local/share/estoque/estoque.db`
///
/// Falls back to the working directory when no home directory is known.
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("br", "estoque", "estoque")
        .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use estoque_db::DbLocation;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));

        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.database_path.ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ESTOQUE_DB_PATH", "/tmp/loja.db"),
            ("ESTOQUE_MAX_CONNECTIONS", "8"),
            ("ESTOQUE_LOG", "estoque_db=trace"),
        ]));

        assert_eq!(config.database_path, PathBuf::from("/tmp/loja.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.log_filter, "estoque_db=trace");

        let db = config.db_config();
        assert_eq!(db.location, DbLocation::File(PathBuf::from("/tmp/loja.db")));
        assert_eq!(db.max_connections, 8);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ESTOQUE_DB_PATH", "  "),
            ("ESTOQUE_MAX_CONNECTIONS", "0"),
        ]));
        assert!(config.database_path.ends_with(DB_FILE_NAME));
        assert_eq!(config.max_connections, 5);

        let config = AppConfig::from_lookup(lookup(&[("ESTOQUE_MAX_CONNECTIONS", "many")]));
        assert_eq!(config.max_connections, 5);
    }
}
