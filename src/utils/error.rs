use thiserror::Error;

#[derive(Error, Debug)]
pub enum CraftError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No price quote for item {id}")]
    MissingPrice { id: u32 },

    #[error("Parse error in {context}: {message}")]
    ParseError { context: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CraftError {
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatus { .. } => ErrorCategory::Network,
            Self::CsvError(_) | Self::MissingPrice { .. } | Self::ParseError { .. } => {
                ErrorCategory::Data
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 上游暫時性錯誤，稍後重試即可
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::HttpStatus { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            Self::HttpStatus { .. } => ErrorSeverity::High,
            Self::MissingPrice { .. } => ErrorSeverity::Medium,
            Self::CsvError(_) | Self::ParseError { .. } => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check your network connection and try again",
            Self::HttpStatus { status: 404, .. } => {
                "Check the spelling of the player or item name"
            }
            Self::HttpStatus { .. } => "The remote service may be unavailable; try again later",
            Self::MissingPrice { .. } => {
                "The item may not be tradeable or has not traded recently"
            }
            Self::CsvError(_) | Self::ParseError { .. } => {
                "The remote response format may have changed"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Review the configuration file and CLI flags",
            Self::IoError(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "Could not reach the remote service".to_string(),
            Self::HttpStatus { status, url } => {
                format!("The request to {} failed with status {}", url, status)
            }
            Self::MissingPrice { id } => format!("No current price is available for item {}", id),
            Self::ParseError { context, .. } => format!("Could not read data from {}", context),
            Self::CsvError(_) => "Received data in an unexpected format".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            Self::IoError(e) => format!("File operation failed: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, CraftError>;
