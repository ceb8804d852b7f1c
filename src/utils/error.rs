use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Malformed IPv4 address '{ip}': {reason}")]
    MalformedAddress { ip: String, reason: String },

    #[error("Invalid IP range: {min} is greater than {max}")]
    InvalidIpRange { min: String, max: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    System,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EvalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EvalError::MalformedAddress { .. }
            | EvalError::CsvError(_)
            | EvalError::ValidationError { .. } => ErrorCategory::Input,
            EvalError::InvalidIpRange { .. }
            | EvalError::ConfigError { .. }
            | EvalError::ConfigValidationError { .. }
            | EvalError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EvalError::IoError(_) => ErrorCategory::System,
            EvalError::SerializationError(_) | EvalError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EvalError::MalformedAddress { .. } | EvalError::ValidationError { .. } => {
                ErrorSeverity::Medium
            }
            EvalError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EvalError::MalformedAddress { .. } => {
                "Route the check-in to manual review; the address must be a dotted-quad IPv4 value"
            }
            EvalError::InvalidIpRange { .. } => {
                "Swap the range bounds so the lower address comes first"
            }
            EvalError::IoError(_) => "Check that the input files exist and the output directory is writable",
            EvalError::CsvError(_) => "Check the CSV headers and column values of the input files",
            EvalError::SerializationError(_) => "Check the report contents for values JSON cannot represent",
            EvalError::ConfigError { .. }
            | EvalError::ConfigValidationError { .. }
            | EvalError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            EvalError::ProcessingError { .. } | EvalError::ValidationError { .. } => {
                "Inspect the input records mentioned in the log output"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EvalError::MalformedAddress { ip, .. } => {
                format!("The address '{}' is not a valid IPv4 address", ip)
            }
            EvalError::IoError(e) => format!("A file could not be read or written ({})", e),
            EvalError::InvalidIpRange { min, max } => {
                format!("The whitelisted range {}-{} has its bounds reversed", min, max)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
