use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoxshelfError {
    #[error("Precondition failed: {message}")]
    PreconditionFailed { message: String },

    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Capacity exceeded: {collection} holds at most {capacity} entries")]
    CapacityExceeded {
        collection: &'static str,
        capacity: usize,
    },

    #[error("{collection} is empty")]
    EmptyCollection { collection: &'static str },

    #[error("Duplicate entry: {entity} {key} already exists")]
    DuplicateEntry { entity: &'static str, key: String },

    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Position {position} is out of range (valid: 1..={length})")]
    OutOfRange { position: usize, length: usize },

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("Validation error on '{field}' (value: {value}): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Random source error: {message}")]
    RandomSourceError { message: String },

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The engine is not in a state that allows the operation.
    Precondition,
    /// The caller passed something unusable.
    Input,
    /// A referenced record does not exist.
    Lookup,
    Configuration,
    External,
}

impl BoxshelfError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoxshelfError::PreconditionFailed { .. }
            | BoxshelfError::CapacityExceeded { .. }
            | BoxshelfError::EmptyCollection { .. } => ErrorCategory::Precondition,
            BoxshelfError::TypeMismatch { .. }
            | BoxshelfError::DuplicateEntry { .. }
            | BoxshelfError::OutOfRange { .. }
            | BoxshelfError::InvalidOperation { .. }
            | BoxshelfError::ValidationError { .. } => ErrorCategory::Input,
            BoxshelfError::NotFound { .. } => ErrorCategory::Lookup,
            BoxshelfError::ConfigError { .. } | BoxshelfError::UrlError(_) => {
                ErrorCategory::Configuration
            }
            BoxshelfError::RandomSourceError { .. }
            | BoxshelfError::ApiError(_)
            | BoxshelfError::IoError(_)
            | BoxshelfError::SerializationError(_) => ErrorCategory::External,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Precondition => 1,
            ErrorCategory::Lookup => 2,
            ErrorCategory::Configuration => 3,
            ErrorCategory::External => 4,
        }
    }

    /// Short message for the terminal, without source chains.
    pub fn user_friendly_message(&self) -> String {
        match self {
            BoxshelfError::EmptyCollection { collection } => {
                format!("{} has no entries yet", collection)
            }
            BoxshelfError::NotFound { entity, key } => format!("No {} with key {}", entity, key),
            BoxshelfError::ValidationError { field, reason, .. } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            BoxshelfError::ApiError(_) => "Could not reach the remote random source".to_string(),
            BoxshelfError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BoxshelfError::PreconditionFailed { .. } | BoxshelfError::CapacityExceeded { .. } => {
                "Enter exactly two boxers before starting a fight"
            }
            BoxshelfError::EmptyCollection { .. } => "Add books to the reading list first",
            BoxshelfError::NotFound { .. } => "Check the id or name against the seeded catalog and roster",
            BoxshelfError::DuplicateEntry { .. } => "Use a different name or title",
            BoxshelfError::OutOfRange { .. } => "Positions start at 1 and end at the list length",
            BoxshelfError::TypeMismatch { .. }
            | BoxshelfError::InvalidOperation { .. }
            | BoxshelfError::ValidationError { .. } => "Check the command arguments and try again",
            BoxshelfError::ConfigError { .. } | BoxshelfError::UrlError(_) => {
                "Check the TOML file and the TTL environment variable"
            }
            BoxshelfError::RandomSourceError { .. } | BoxshelfError::ApiError(_) => {
                "Retry later or set [random] source = \"local\""
            }
            BoxshelfError::IoError(_) => "Check that the file exists and is readable",
            BoxshelfError::SerializationError(_) => "Check the JSON input",
        }
    }

    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        BoxshelfError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        BoxshelfError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoxshelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_drive_exit_codes() {
        let empty = BoxshelfError::EmptyCollection {
            collection: "Reading list",
        };
        assert_eq!(empty.category(), ErrorCategory::Precondition);
        assert_eq!(empty.exit_code(), 1);

        let missing = BoxshelfError::not_found("Book", 7);
        assert_eq!(missing.category(), ErrorCategory::Lookup);
        assert_eq!(missing.to_string(), "Book 7 not found");

        let config = BoxshelfError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(config.exit_code(), 3);
    }

    #[test]
    fn test_user_facing_messages() {
        let empty = BoxshelfError::EmptyCollection {
            collection: "Reading list",
        };
        assert_eq!(empty.user_friendly_message(), "Reading list has no entries yet");
        assert_eq!(empty.recovery_suggestion(), "Add books to the reading list first");

        let invalid = BoxshelfError::validation("weight", f64::NAN, "Value must be a finite number");
        assert_eq!(
            invalid.user_friendly_message(),
            "Invalid value for 'weight': Value must be a finite number"
        );
    }
}
