use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradebookError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Operation rejected: {message}")]
    Rejected { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Domain,
    Persistence,
    Configuration,
}

impl GradebookError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::NotFound { .. } | Self::Rejected { .. } => ErrorCategory::Domain,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::Persistence
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access the data file: {}", e),
            Self::SerializationError(e) => format!("The data file is not valid grade data: {}", e),
            Self::CsvError(e) => format!("Could not write the CSV export: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ValidationError { field, reason, .. } => format!("{}: {}", field, reason),
            Self::NotFound { entity, id } => format!("{} with ID {} not found!", entity, id),
            Self::Rejected { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the value and try again",
            ErrorCategory::Domain => "List existing students and courses to check the identifiers",
            ErrorCategory::Persistence => "Check the data file path and its permissions",
            ErrorCategory::Configuration => {
                "Fix the configuration file or pass the option on the command line"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Domain => 1,
            ErrorCategory::Persistence | ErrorCategory::Configuration => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories_drive_exit_codes() {
        let missing = GradebookError::not_found("Student", "S1");
        assert_eq!(missing.category(), ErrorCategory::Domain);
        assert_eq!(missing.exit_code(), 1);
        assert_eq!(missing.user_friendly_message(), "Student with ID S1 not found!");

        let io = GradebookError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.category(), ErrorCategory::Persistence);
        assert_eq!(io.exit_code(), 2);
    }
}
