#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "location-filter/0.1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;
pub const DEFAULT_LOCATION_COLUMN: &str = "Location";
pub const DEFAULT_URL_COLUMN: &str = "Profile URL";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// What to do when the geocoder fails for a reason other than
/// "no match" or "timed out".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorPolicy {
    /// Stop the run and report the error.
    #[default]
    Abort,
    /// Log a warning and leave the row's country blank.
    Degrade,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderSettings {
    pub endpoint: String,
    /// Sent as the HTTP User-Agent; Nominatim rejects anonymous clients.
    pub user_agent: String,
    pub timeout: Duration,
    pub language: String,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFilenames {
    pub unfiltered: String,
    pub filtered: String,
    pub profile_urls: String,
    pub archive: String,
}

impl Default for ExportFilenames {
    fn default() -> Self {
        Self {
            unfiltered: "unfiltered_data.csv".to_string(),
            filtered: "filtered_data.csv".to_string(),
            profile_urls: "profile_urls.csv".to_string(),
            archive: "location_filter_output.zip".to_string(),
        }
    }
}

pub(crate) fn cache_ttl_from_hours(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}
