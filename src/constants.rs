//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "apex-tui";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under $HOME holding settings and extra API configurations
pub const CONFIG_DIR_NAME: &str = ".apex";

/// Settings file inside the config directory
pub const SETTINGS_FILE: &str = "config.yaml";

/// Default log file (relative to the working directory)
pub const DEFAULT_LOG_FILE: &str = "apex-tui.log";

/// Retry defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client pool limits
pub const DEFAULT_POOL_CAPACITY: usize = 10;
pub const DEFAULT_POOL_IDLE_SECS: u64 = 5 * 60;

/// Metrics grouping window
pub const DEFAULT_METRICS_WINDOW_MS: i64 = 60_000;

/// Header used by `apiKey` auth when the config names none
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Content types the client serializes specially
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Status text recorded when no HTTP response arrived
pub const NETWORK_ERROR_TEXT: &str = "Network Error";
