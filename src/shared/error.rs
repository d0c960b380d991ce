use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes for the `riskwatch` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Server shut down cleanly
    Success = 0,
    /// Startup failed (config, snapshot, bind, ...)
    ApplicationError = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ApplicationError => write!(f, "Application Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
        }
    }
}

/// Domain and application errors for the risk service.
///
/// Use cases return these wrapped in `anyhow::Error`; the HTTP adapter
/// downcasts them back to pick a status code. Anything that is not a
/// `RiskError` is reported as an internal error.
#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Upstream service {service} failed: {details}")]
    Upstream { service: String, details: String },

    #[error("Storage failure at {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    Storage { path: PathBuf, details: String },
}

impl RiskError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RiskError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        RiskError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        RiskError::Conflict {
            message: message.into(),
        }
    }

    /// Stable machine-readable code carried in error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            RiskError::Validation { .. } => "VALIDATION_FAILED",
            RiskError::NotFound { .. } => "NOT_FOUND",
            RiskError::Conflict { .. } => "CONFLICT",
            RiskError::Upstream { .. } => "UPSTREAM_FAILURE",
            RiskError::Storage { .. } => "STORAGE_FAILURE",
        }
    }
}
