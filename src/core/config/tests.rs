use super::data::{Config, ProxyConfig};
use super::defaults::{DEFAULT_FORECAST_URL, DEFAULT_KNOWN_LOCATIONS, DEFAULT_PROXY_URL};
use super::io::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.proxy_url(), DEFAULT_PROXY_URL);
    assert_eq!(config.forecast_url(), DEFAULT_FORECAST_URL);
    assert_eq!(config.reveal_interval(), Duration::from_millis(20));
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(60)));
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        proxy_url: Some("http://geoai.internal/api/chat".to_string()),
        reveal_interval_ms: Some(5),
        proxy: ProxyConfig {
            known_locations: Some(vec!["Howrah".to_string()]),
            ..Default::default()
        },
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let mut loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.proxy.known_locations(), vec!["Howrah".to_string()]);

    loaded.unset_value("proxy-url").expect("unset");
    loaded.save_to_path(&config_path).expect("save again");
    let reloaded = Config::load_from_path(&config_path).expect("reload");
    assert_eq!(reloaded.proxy_url(), DEFAULT_PROXY_URL);
    assert_eq!(reloaded.reveal_interval(), Duration::from_millis(5));
}

#[test]
fn test_parse_error_names_the_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "reveal_interval_ms = \"fast\"").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn test_proxy_table_from_toml() {
    let config: Config = toml::from_str(
        r#"
map_dir = "assets/map"

[proxy]
bind = "0.0.0.0:8080"
known_location_reply = "Inside the city."
"#,
    )
    .expect("parse");

    assert_eq!(config.map_dir(), PathBuf::from("assets/map"));
    assert_eq!(config.proxy.bind(), "0.0.0.0:8080");
    assert_eq!(config.proxy.known_location_reply(), "Inside the city.");
    assert_eq!(
        config.proxy.known_locations().len(),
        DEFAULT_KNOWN_LOCATIONS.len()
    );
    assert_eq!(config.proxy.api_key_env(), "GEMINI_API_KEY");
}

#[test]
fn test_set_value_validates_keys_and_numbers() {
    let mut config = Config::default();

    config.set_value("request-timeout-secs", "0").expect("set");
    assert_eq!(config.request_timeout(), None);

    config
        .set_value("greeting", "  Namaskar! Ask me about Kolkata.  ")
        .expect("set");
    assert_eq!(
        config.greeting.as_deref(),
        Some("Namaskar! Ask me about Kolkata.")
    );

    assert!(config.set_value("reveal-interval-ms", "soon").is_err());
    assert!(config.set_value("theme", "dark").is_err());
    assert!(config.set_value("proxy-url", "   ").is_err());
    assert!(config.unset_value("theme").is_err());
}
