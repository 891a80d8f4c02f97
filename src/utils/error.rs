use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostError {
    #[error("Configuration error in `{field}`: {message}")]
    ConfigurationError { field: String, message: String },

    #[error("Insufficient data: {observed} rows observed, at least {required} required")]
    InsufficientDataError { observed: usize, required: usize },

    #[error("Invalid group size: {size}")]
    InvalidGroupSize { size: usize },

    #[error("Planning row {row} could not be parsed: {message}")]
    ParseError { row: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Caller,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CostError {
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        CostError::ConfigurationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CostError::ConfigurationError { .. } | CostError::TomlError(_) => {
                ErrorCategory::Configuration
            }
            CostError::InsufficientDataError { .. }
            | CostError::ParseError { .. }
            | CostError::CsvError(_) => ErrorCategory::Data,
            CostError::InvalidGroupSize { .. } => ErrorCategory::Caller,
            CostError::IoError(_) | CostError::SerializationError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CostError::ParseError { .. } => ErrorSeverity::Medium,
            CostError::InsufficientDataError { .. } | CostError::CsvError(_) => {
                ErrorSeverity::High
            }
            CostError::ConfigurationError { .. } | CostError::TomlError(_) => {
                ErrorSeverity::High
            }
            CostError::InvalidGroupSize { .. }
            | CostError::IoError(_)
            | CostError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的修正建議
    pub fn recovery_suggestion(&self) -> String {
        match self {
            CostError::ConfigurationError { field, .. } => {
                format!("Check the `{}` entry of the settings file", field)
            }
            CostError::InsufficientDataError { required, .. } => format!(
                "Provide a planning with at least {} rows or lower `min_rows`",
                required
            ),
            CostError::InvalidGroupSize { .. } => {
                "Ride groups must contain at least one passenger".to_string()
            }
            CostError::ParseError { .. } | CostError::CsvError(_) => {
                "Make sure the planning has the columns Employee ID, Date, Time, Zone, Line"
                    .to_string()
            }
            CostError::TomlError(_) => "Make sure the settings file is valid TOML".to_string(),
            CostError::IoError(_) => "Check that the file exists and is readable".to_string(),
            CostError::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CostError::ConfigurationError { field, message } => {
                format!("Invalid setting `{}`: {}", field, message)
            }
            CostError::InsufficientDataError { observed, required } => format!(
                "Not enough planning rows to compare costs ({} of {} required)",
                observed, required
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CostError>;
