use crate::core::config::data::{path_display, Config};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        print_setting("proxy-url", self.proxy_url.as_deref(), self.proxy_url());
        print_setting(
            "forecast-url",
            self.forecast_url.as_deref(),
            self.forecast_url(),
        );
        println!(
            "  reveal-interval-ms: {}",
            self.reveal_interval().as_millis()
        );
        match self.request_timeout() {
            Some(timeout) => println!("  request-timeout-secs: {}", timeout.as_secs()),
            None => println!("  request-timeout-secs: 0 (disabled)"),
        }
        match &self.greeting {
            Some(greeting) => println!("  greeting: {greeting}"),
            None => println!("  greeting: (unset)"),
        }
        println!("  map-dir: {}", path_display(self.map_dir()));
        println!("  analytics-csv: {}", path_display(self.analytics_csv()));
        println!("  proxy:");
        println!("    bind: {}", self.proxy.bind());
        println!("    upstream-url: {}", self.proxy.upstream_url());
        println!("    api-key-env: {}", self.proxy.api_key_env());
        println!(
            "    known-locations: {}",
            self.proxy.known_locations().join(", ")
        );
    }
}

fn print_setting(key: &str, explicit: Option<&str>, effective: &str) {
    match explicit {
        Some(value) => println!("  {key}: {value}"),
        None => println!("  {key}: {effective} (default)"),
    }
}
