use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for `geoai serve`. Every field falls back to a default accessor
/// in `defaults.rs`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ProxyConfig {
    /// Socket address the proxy listens on (e.g., "127.0.0.1:3000")
    pub bind: Option<String>,
    /// generateContent endpoint of the upstream model
    pub upstream_url: Option<String>,
    /// Environment variable holding the upstream API key
    pub api_key_env: Option<String>,
    /// Place names answered locally without calling the upstream
    pub known_locations: Option<Vec<String>>,
    /// Reply for messages mentioning a known location
    pub known_location_reply: Option<String>,
    /// Reply when the upstream response has no usable text
    pub fallback_reply: Option<String>,
    /// Instruction text placed ahead of the user's query
    pub system_prefix: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Chat proxy endpoint used by `chat` and `say`
    pub proxy_url: Option<String>,
    /// Base URL of the forecasting backend
    pub forecast_url: Option<String>,
    /// Delay between revealed characters, in milliseconds
    pub reveal_interval_ms: Option<u64>,
    /// Completion request timeout in seconds; 0 disables the timeout
    pub request_timeout_secs: Option<u64>,
    /// Assistant message shown when a chat session starts
    pub greeting: Option<String>,
    /// Directory holding `built_{year}.png` map images
    pub map_dir: Option<PathBuf>,
    /// Default CSV for `geoai analytics`
    pub analytics_csv: Option<PathBuf>,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
