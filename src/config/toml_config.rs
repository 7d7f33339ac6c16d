use crate::config::{
    cache_ttl_from_hours, ExportFilenames, GeocoderSettings, ProviderErrorPolicy,
    DEFAULT_CACHE_TTL_HOURS, DEFAULT_GEOCODER_ENDPOINT, DEFAULT_LANGUAGE,
    DEFAULT_LOCATION_COLUMN, DEFAULT_OUTPUT_PATH, DEFAULT_TIMEOUT_SECONDS, DEFAULT_URL_COLUMN,
    DEFAULT_USER_AGENT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LocationFilterError, Result};
use crate::utils::validation::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File-based configuration for unattended runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    #[serde(default = "default_location_column")]
    pub location_column: String,
    #[serde(default = "default_url_column")]
    pub url_column: String,
    #[serde(default = "default_true")]
    pub normalize: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub language: String,
    pub concurrent_requests: usize,
    pub on_error: ProviderErrorPolicy,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            language: DEFAULT_LANGUAGE.to_string(),
            concurrent_requests: 1,
            on_error: ProviderErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_CACHE_TTL_HOURS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
    pub drop_columns: Vec<String>,
    pub zip: bool,
    pub filenames: ExportFilenames,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            drop_columns: Vec::new(),
            zip: false,
            filenames: ExportFilenames::default(),
        }
    }
}

fn default_location_column() -> String {
    DEFAULT_LOCATION_COLUMN.to_string()
}

fn default_url_column() -> String {
    DEFAULT_URL_COLUMN.to_string()
}

fn default_true() -> bool {
    true
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LocationFilterError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LocationFilterError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("input.path", &self.input.path)?;
        validate_file_extension("input.path", &self.input.path, &["csv"])?;
        validate_non_empty_string("input.location_column", &self.input.location_column)?;
        validate_non_empty_string("input.url_column", &self.input.url_column)?;

        validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validate_non_empty_string("geocoder.user_agent", &self.geocoder.user_agent)?;
        validate_range("geocoder.timeout_seconds", self.geocoder.timeout_seconds, 1, 300)?;
        validate_non_empty_string("geocoder.language", &self.geocoder.language)?;
        validate_positive_number(
            "geocoder.concurrent_requests",
            self.geocoder.concurrent_requests,
            1,
        )?;

        validate_path("export.output_path", &self.export.output_path)?;
        let names = &self.export.filenames;
        for (field, name) in [
            ("export.filenames.unfiltered", &names.unfiltered),
            ("export.filenames.filtered", &names.filtered),
            ("export.filenames.profile_urls", &names.profile_urls),
        ] {
            validate_file_extension(field, name, &["csv"])?;
        }
        validate_file_extension("export.filenames.archive", &names.archive, &["zip"])?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn location_column(&self) -> &str {
        &self.input.location_column
    }

    fn url_column(&self) -> &str {
        &self.input.url_column
    }

    fn normalize_locations(&self) -> bool {
        self.input.normalize
    }

    fn drop_columns(&self) -> &[String] {
        &self.export.drop_columns
    }

    fn selected_countries(&self) -> &[String] {
        &self.filter.countries
    }

    fn bundle_zip(&self) -> bool {
        self.export.zip
    }

    fn export_filenames(&self) -> ExportFilenames {
        self.export.filenames.clone()
    }

    fn geocoder_settings(&self) -> GeocoderSettings {
        GeocoderSettings {
            endpoint: self.geocoder.endpoint.clone(),
            user_agent: self.geocoder.user_agent.clone(),
            timeout: Duration::from_secs(self.geocoder.timeout_seconds),
            language: self.geocoder.language.clone(),
        }
    }

    fn cache_ttl(&self) -> Duration {
        cache_ttl_from_hours(self.cache.ttl_hours)
    }

    fn concurrent_requests(&self) -> usize {
        self.geocoder.concurrent_requests
    }

    fn provider_error_policy(&self) -> ProviderErrorPolicy {
        self.geocoder.on_error
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
