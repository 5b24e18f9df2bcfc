use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Billscope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> &'static str {
    "billscope=info,tower_http=info"
}

/// Get the application data directory
/// ~/Billscope/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Billscope")
}

/// Runtime settings resolved from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Location of the two-column fee schedule (cpt_code, median_price).
    pub price_table_path: PathBuf,
    /// Bearer key for the hosted LLM. Absent key disables the LLM endpoints.
    pub together_api_key: Option<String>,
    /// Override for the LLM endpoint, mainly for tests.
    pub together_api_url: Option<String>,
}

impl Settings {
    /// Resolve settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BILLSCOPE_BIND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let price_table_path = std::env::var("BILLSCOPE_PRICE_TABLE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir().join("cpt_pricing_data.csv"));

        Self {
            bind_addr,
            price_table_path,
            together_api_key: std::env::var("TOGETHER_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            together_api_url: std::env::var("TOGETHER_API_URL").ok(),
        }
    }
}
