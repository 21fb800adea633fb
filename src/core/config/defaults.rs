use crate::core::config::data::{Config, ProxyConfig};
use crate::core::constants::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_REVEAL_INTERVAL};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/chat";
pub const DEFAULT_FORECAST_URL: &str = "http://localhost:8000";
pub const DEFAULT_MAP_DIR: &str = "public/map";
pub const DEFAULT_ANALYTICS_CSV: &str = "public/kolkata_1990_2050.csv";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_KNOWN_LOCATIONS: [&str; 6] = [
    "Park Street",
    "Esplanade",
    "Salt Lake",
    "New Town",
    "Rajarhat",
    "Alipore",
];
pub const DEFAULT_KNOWN_LOCATION_REPLY: &str =
    "This location is already a part of Kolkata with 100% accuracy.";
pub const DEFAULT_FALLBACK_REPLY: &str = "I don't know about this location.";
pub const DEFAULT_SYSTEM_PREFIX: &str = "You are GeoAI, a generative AI specialized in geographical and urban expansion analysis of Kolkata only.\n\
If you don't know the answer, research it and give the most accurate answer you can.\n\
Keep the answer short.";

/// Keys accepted by `geoai set` / `geoai unset`.
pub const SETTABLE_KEYS: [&str; 7] = [
    "proxy-url",
    "forecast-url",
    "reveal-interval-ms",
    "request-timeout-secs",
    "greeting",
    "map-dir",
    "analytics-csv",
];

impl Config {
    pub fn proxy_url(&self) -> &str {
        self.proxy_url.as_deref().unwrap_or(DEFAULT_PROXY_URL)
    }

    pub fn forecast_url(&self) -> &str {
        self.forecast_url.as_deref().unwrap_or(DEFAULT_FORECAST_URL)
    }

    pub fn reveal_interval(&self) -> Duration {
        self.reveal_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REVEAL_INTERVAL)
    }

    /// `None` when the timeout has been disabled with `0`.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    pub fn map_dir(&self) -> PathBuf {
        self.map_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MAP_DIR))
    }

    pub fn analytics_csv(&self) -> PathBuf {
        self.analytics_csv
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ANALYTICS_CSV))
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {key}"));
        }
        match key {
            "proxy-url" => self.proxy_url = Some(value.to_string()),
            "forecast-url" => self.forecast_url = Some(value.to_string()),
            "reveal-interval-ms" => self.reveal_interval_ms = Some(parse_number(key, value)?),
            "request-timeout-secs" => self.request_timeout_secs = Some(parse_number(key, value)?),
            "greeting" => self.greeting = Some(value.to_string()),
            "map-dir" => self.map_dir = Some(PathBuf::from(value)),
            "analytics-csv" => self.analytics_csv = Some(PathBuf::from(value)),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        match key {
            "proxy-url" => self.proxy_url = None,
            "forecast-url" => self.forecast_url = None,
            "reveal-interval-ms" => self.reveal_interval_ms = None,
            "request-timeout-secs" => self.request_timeout_secs = None,
            "greeting" => self.greeting = None,
            "map-dir" => self.map_dir = None,
            "analytics-csv" => self.analytics_csv = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

impl ProxyConfig {
    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn upstream_url(&self) -> &str {
        self.upstream_url.as_deref().unwrap_or(DEFAULT_UPSTREAM_URL)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    pub fn known_locations(&self) -> Vec<String> {
        match &self.known_locations {
            Some(locations) => locations.clone(),
            None => DEFAULT_KNOWN_LOCATIONS
                .iter()
                .map(|location| location.to_string())
                .collect(),
        }
    }

    pub fn known_location_reply(&self) -> &str {
        self.known_location_reply
            .as_deref()
            .unwrap_or(DEFAULT_KNOWN_LOCATION_REPLY)
    }

    pub fn fallback_reply(&self) -> &str {
        self.fallback_reply
            .as_deref()
            .unwrap_or(DEFAULT_FALLBACK_REPLY)
    }

    pub fn system_prefix(&self) -> &str {
        self.system_prefix
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PREFIX)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("{key} expects a whole number, got '{value}'"))
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key} (expected one of: {})",
        SETTABLE_KEYS.join(", ")
    )
}
