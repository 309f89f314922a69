use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Time-related constants
// =============================================================================

/// Initial delay before reconnecting the change feed (1 second)
pub const RECONNECT_INITIAL_DELAY_MS: u64 = 1_000;

/// Upper bound for the reconnect backoff (30 seconds)
pub const RECONNECT_MAX_DELAY_MS: u64 = 30_000;

/// Timeout for catalog requests (30 seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Database holding the documentation data
pub const DOCS_DATABASE: &str = "docs_data";

/// Client configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    /// Base URL of the documentation server
    pub base_url: String,
    /// Target database name
    pub database: String,
    pub reconnect: ReconnectConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            database: DOCS_DATABASE.to_string(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Change-feed reconnection configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconnectConfig {
    /// Delay before the first reconnect attempt in milliseconds
    pub initial_delay_ms: u64,
    /// Cap for the exponential backoff in milliseconds
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: RECONNECT_INITIAL_DELAY_MS,
            max_delay_ms: RECONNECT_MAX_DELAY_MS,
        }
    }
}

/// Returns the path to the data directory for stacksync.
/// Uses $XDG_DATA_HOME/stacksync if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/stacksync,
/// or ./stacksync if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("stacksync.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("stacksync")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sync_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "baseUrl": "https://docs.example.com"
        }))
        .unwrap();

        assert_eq!(result.base_url, "https://docs.example.com");
        assert_eq!(result.database, DOCS_DATABASE);
        assert_eq!(result.reconnect, ReconnectConfig::default());
    }

    #[test]
    fn sync_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "baseUrl": "https://docs.example.com",
            "database": "user_data",
            "reconnect": {
                "initialDelayMs": 250,
                "maxDelayMs": 5000
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            SyncConfig {
                base_url: "https://docs.example.com".to_string(),
                database: "user_data".to_string(),
                reconnect: ReconnectConfig {
                    initial_delay_ms: 250,
                    max_delay_ms: 5000,
                },
            }
        );
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/stacksync"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/stacksync"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./stacksync"));
    }
}
