use thiserror::Error;

/// 搜尋失敗時的預設訊息（後端沒有提供 message 時使用）
pub const GENERIC_SEARCH_FAILURE: &str = "Failed to perform search";

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    HttpStatus {
        status: u16,
        message: Option<String>,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FinderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FinderError::ApiError(_) => ErrorCategory::Network,
            FinderError::HttpStatus { .. } => ErrorCategory::Server,
            FinderError::CsvError(_)
            | FinderError::IoError(_)
            | FinderError::SerializationError(_)
            | FinderError::ValidationError { .. } => ErrorCategory::Data,
            FinderError::UrlError(_)
            | FinderError::ConfigError { .. }
            | FinderError::InvalidConfigValueError { .. }
            | FinderError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或 5xx 錯誤：重試可能成功
            FinderError::ApiError(_) => ErrorSeverity::Medium,
            FinderError::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            FinderError::HttpStatus { .. } => ErrorSeverity::High,
            FinderError::ValidationError { .. } => ErrorSeverity::Low,
            FinderError::CsvError(_) | FinderError::SerializationError(_) => ErrorSeverity::High,
            FinderError::IoError(_)
            | FinderError::UrlError(_)
            | FinderError::ConfigError { .. }
            | FinderError::InvalidConfigValueError { .. }
            | FinderError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the API server is reachable and retry",
            ErrorCategory::Server => "Adjust the filters or retry once the server recovers",
            ErrorCategory::Data => "The server returned data in an unexpected shape",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FinderError::HttpStatus {
                message: Some(message),
                ..
            } => message.clone(),
            FinderError::ApiError(e) if e.is_timeout() => "The request timed out".to_string(),
            FinderError::ApiError(_) => "Could not reach the API server".to_string(),
            other => other.to_string(),
        }
    }

    /// 將錯誤轉成搜尋橫幅上顯示的單一訊息
    pub fn search_message(&self) -> String {
        match self {
            FinderError::HttpStatus {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_SEARCH_FAILURE.to_string(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, FinderError::HttpStatus { status: 401 | 419, .. })
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
