use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Malformed dataset: {message}")]
    MalformedDataset { message: String },

    #[error("Failed to parse upload: {message}")]
    ParseFailure { message: String },

    #[error("Invalid transition: already at {level}")]
    InvalidTransition { level: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Session,
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

impl NormalizeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NormalizeError::MalformedDataset { .. } | NormalizeError::ParseFailure { .. } => {
                ErrorCategory::Data
            }
            NormalizeError::InvalidTransition { .. } => ErrorCategory::Session,
            NormalizeError::ConfigError { .. } | NormalizeError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            NormalizeError::IoError(_) | NormalizeError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 已在 NF5 再前進只是無效操作
            NormalizeError::InvalidTransition { .. } => ErrorSeverity::Low,
            NormalizeError::MalformedDataset { .. } | NormalizeError::ParseFailure { .. } => {
                ErrorSeverity::Medium
            }
            NormalizeError::ConfigError { .. } | NormalizeError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            NormalizeError::IoError(_) | NormalizeError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NormalizeError::MalformedDataset { .. } => {
                "Make sure every row of the upload has the same columns"
            }
            NormalizeError::ParseFailure { .. } => {
                "Check that the file is a delimited text file with a header row"
            }
            NormalizeError::InvalidTransition { .. } => {
                "The walkthrough is complete; reset to start again"
            }
            NormalizeError::ConfigError { .. } | NormalizeError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration file"
            }
            NormalizeError::IoError(_) => "Check that the file exists and is readable",
            NormalizeError::SerializationError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NormalizeError::MalformedDataset { message } => {
                format!("The dataset could not be loaded: {}", message)
            }
            NormalizeError::ParseFailure { message } => {
                format!("Error loading dataset: {}", message)
            }
            NormalizeError::InvalidTransition { level } => {
                format!("Nothing left to normalize, already at {}", level)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_message_is_displayable() {
        let err = NormalizeError::ParseFailure {
            message: "unexpected end of file".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(
            err.user_friendly_message(),
            "Error loading dataset: unexpected end of file"
        );
    }

    #[test]
    fn test_invalid_transition_is_low_severity() {
        let err = NormalizeError::InvalidTransition {
            level: "5NF".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Session);
    }
}
