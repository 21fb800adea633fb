//! Shared constants used across the application

use std::time::Duration;

/// Assistant text appended when a turn fails. Never revealed incrementally.
pub const ERROR_MARKER: &str = "❌ Error: Unable to get response.";

/// Used when the proxy answers 2xx without a usable `reply`.
pub const NO_RESPONSE_REPLY: &str = "No response";

/// Delay between successive reveal prefixes.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(20);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Latest year the forecasting backend is asked about.
pub const MAX_FORECAST_YEAR: i32 = 2035;
