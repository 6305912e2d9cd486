// =============================================================================
// Service Configuration — environment-driven settings with defaults
// =============================================================================
//
// Every tunable lives here. Values come from the environment (a `.env` file
// is honoured via dotenv in main); anything unset falls back to the defaults
// below. Malformed numeric values fall back with a warning rather than
// aborting startup.
// =============================================================================

use tracing::warn;

/// Default dataset source: the published NEPSE daily-bars sheet, exported as
/// CSV.
const DEFAULT_SHEET_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/1Q_En7VGGfifDmn5xuiF-t_02doPpwl4PLzxb4TBCW0Q/export?format=csv";

/// Default listen address for the query surface.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8002";

/// Default refresh cadence in seconds.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;

/// Default timeout for the dataset fetch in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration for the technical service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// URL of the delimited tabular document holding the daily bars.
    pub sheet_csv_url: String,

    /// Address the HTTP query surface binds to.
    pub bind_addr: String,

    /// Seconds between scheduled refresh cycles.
    pub refresh_interval_secs: u64,

    /// Timeout applied to the dataset fetch.
    pub fetch_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sheet_csv_url: DEFAULT_SHEET_CSV_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("NEPSE_SHEET_CSV_URL") {
            if !url.trim().is_empty() {
                config.sheet_csv_url = url.trim().to_string();
            }
        }
        if let Ok(addr) = std::env::var("NEPSE_BIND_ADDR") {
            if !addr.trim().is_empty() {
                config.bind_addr = addr.trim().to_string();
            }
        }
        config.refresh_interval_secs = env_u64(
            "NEPSE_REFRESH_INTERVAL_SECS",
            DEFAULT_REFRESH_INTERVAL_SECS,
        );
        config.fetch_timeout_secs =
            env_u64("NEPSE_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS);

        config
    }
}

/// Read a `u64` environment variable, falling back to `default` on absence
/// or parse failure.
fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => v,
            _ => {
                warn!(var = name, value = %raw, "invalid value — using default");
                default
            }
        },
        Err(_) => default,
    }
}
