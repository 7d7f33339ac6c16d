use crate::config::{
    cache_ttl_from_hours, ExportFilenames, GeocoderSettings, ProviderErrorPolicy,
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_GEOCODER_ENDPOINT, DEFAULT_LANGUAGE,
    DEFAULT_LOCATION_COLUMN, DEFAULT_OUTPUT_PATH, DEFAULT_TIMEOUT_SECONDS, DEFAULT_URL_COLUMN,
    DEFAULT_USER_AGENT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::*;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "location-filter")]
#[command(about = "Label a CSV of profiles with countries and filter it by country")]
pub struct CliConfig {
    /// CSV file with at least a location column
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    /// Countries to keep in the filtered exports; none keeps every row
    #[arg(short, long = "country", value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Print the countries found in the input and exit
    #[arg(long)]
    pub list_countries: bool,

    #[arg(long, default_value = DEFAULT_LOCATION_COLUMN)]
    pub location_column: String,

    #[arg(long, default_value = DEFAULT_URL_COLUMN)]
    pub url_column: String,

    /// Geocode locations as written instead of stripping noise words first
    #[arg(long)]
    pub raw_locations: bool,

    /// Columns removed from the labeled exports; unknown names are ignored
    #[arg(long = "drop-column", value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Also bundle the three exports into a zip archive
    #[arg(long)]
    pub zip: bool,

    #[arg(long, default_value = DEFAULT_GEOCODER_ENDPOINT)]
    pub geocoder_endpoint: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_HOURS)]
    pub cache_ttl_hours: u64,

    #[arg(long, default_value = "1")]
    pub concurrent_requests: usize,

    #[arg(long, value_enum, default_value_t = ProviderErrorPolicy::Abort)]
    pub on_provider_error: ProviderErrorPolicy,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn location_column(&self) -> &str {
        &self.location_column
    }

    fn url_column(&self) -> &str {
        &self.url_column
    }

    fn normalize_locations(&self) -> bool {
        !self.raw_locations
    }

    fn drop_columns(&self) -> &[String] {
        &self.drop_columns
    }

    fn selected_countries(&self) -> &[String] {
        &self.countries
    }

    fn bundle_zip(&self) -> bool {
        self.zip
    }

    fn export_filenames(&self) -> ExportFilenames {
        ExportFilenames::default()
    }

    fn geocoder_settings(&self) -> GeocoderSettings {
        GeocoderSettings {
            endpoint: self.geocoder_endpoint.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            language: self.language.clone(),
        }
    }

    fn cache_ttl(&self) -> Duration {
        cache_ttl_from_hours(self.cache_ttl_hours)
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn provider_error_policy(&self) -> ProviderErrorPolicy {
        self.on_provider_error
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["csv"])?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("location_column", &self.location_column)?;
        validate_non_empty_string("url_column", &self.url_column)?;
        validate_url("geocoder_endpoint", &self.geocoder_endpoint)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_non_empty_string("language", &self.language)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        Ok(())
    }
}
