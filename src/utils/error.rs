use thiserror::Error;

/// Message used when a request fails and the caller supplied none.
pub const DEFAULT_REQUEST_ERROR: &str = "Url must be wrong";

#[derive(Error, Debug)]
pub enum DogHouseError {
    #[error("You must include a valid token")]
    MissingToken,

    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Cannot aggregate over an empty {collection} collection")]
    EmptyCollection { collection: &'static str },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DogHouseError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            source: None,
        }
    }

    pub fn request_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingToken => ErrorCategory::Authentication,
            Self::Request { .. } => ErrorCategory::Network,
            Self::EmptyCollection { .. } | Self::SerializationError(_) => ErrorCategory::Data,
            Self::IoError(_) => ErrorCategory::System,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
            ErrorCategory::Configuration
            | ErrorCategory::Authentication
            | ErrorCategory::Data => ErrorSeverity::High,
        }
    }

    /// Process exit code for a failed run; never 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2, // 請求錯誤
            ErrorSeverity::Critical => 3, // 本地 IO
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingToken => "Pass --token, or --email and --password to request one",
            Self::Request { .. } => "Check --base-url and that the API is reachable",
            Self::EmptyCollection { .. } => "The API returned no records; nothing to aggregate",
            Self::IoError(_) => "Check that --output-path is writable",
            Self::SerializationError(_) => "The report could not be encoded as JSON",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the command line flags or the TOML config",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Request { message, .. } => format!("Request failed: {}", message),
            Self::EmptyCollection { collection } => {
                format!("No {} were loaded from the API", collection)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DogHouseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_displays_message_only() {
        let err = DogHouseError::request(DEFAULT_REQUEST_ERROR);
        assert_eq!(err.to_string(), "Url must be wrong");
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_missing_token_is_authentication() {
        let err = DogHouseError::MissingToken;
        assert_eq!(err.to_string(), "You must include a valid token");
        assert_eq!(err.category(), ErrorCategory::Authentication);
    }

    #[test]
    fn test_empty_collection_message() {
        let err = DogHouseError::EmptyCollection { collection: "dogs" };
        assert_eq!(err.user_friendly_message(), "No dogs were loaded from the API");
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_exit_codes_are_never_success() {
        let errors = [
            DogHouseError::MissingToken,
            DogHouseError::request(DEFAULT_REQUEST_ERROR),
            DogHouseError::EmptyCollection { collection: "breeds" },
            DogHouseError::IoError(std::io::Error::other("disk full")),
            DogHouseError::MissingConfigError {
                field: "password".to_string(),
            },
        ];
        let codes: Vec<i32> = errors.iter().map(DogHouseError::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 1, 3, 1]);
    }
}
