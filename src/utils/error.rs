use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocationFilterError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input is missing required column '{column}'")]
    MissingColumnError { column: String },

    #[error("Geocoding provider returned {status}: {message}")]
    ProviderError { status: u16, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Output,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LocationFilterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::ProviderError { .. } => ErrorCategory::Network,
            Self::CsvError(_) | Self::MissingColumnError { .. } => ErrorCategory::Input,
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::Output,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // provider hiccups usually clear up on a later run
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_connect() => {
                "Check network connectivity and the geocoder endpoint".to_string()
            }
            Self::ApiError(_) => "Retry later or raise the geocoder timeout".to_string(),
            Self::ProviderError { status: 429, .. } => {
                "The provider is rate limiting; lower concurrent_requests and retry".to_string()
            }
            Self::ProviderError { .. } => {
                "Retry later, or run with --on-provider-error degrade to keep going".to_string()
            }
            Self::CsvError(_) => "Make sure the input is a well-formed CSV file".to_string(),
            Self::MissingColumnError { column } => {
                format!("Add a '{}' column or point location_column at the right header", column)
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Check that the input exists and the output directory is writable".to_string()
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file".to_string()
            }
            Self::SerializationError(_) => {
                "The provider answered with an unexpected payload; check the endpoint".to_string()
            }
            Self::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Country lookup failed: {}", self),
            ErrorCategory::Input => format!("Could not read the profile list: {}", self),
            ErrorCategory::Output => format!("Could not write the results: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }

    /// Process exit code for a failed run.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, LocationFilterError>;
