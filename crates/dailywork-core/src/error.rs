//! Error types module
//!
//! Every failure in the daily-work workflow is expressed as a [`WorkflowError`].
//! Errors self-describe how they should be presented to the user (a toast-style
//! notice) through [`ErrorMetadata`], the same way for document capture, decode,
//! assembly, upload and field update failures.

use std::io;

use crate::models::{WorkId, WorkStatus};

/// Fallback shown when the server gave no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like a dismissed picker
    Debug,
    /// Warning level - for recoverable issues like a rejected request
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error is presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_REJECTED")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same user action may succeed
    fn is_recoverable(&self) -> bool;

    /// Message for the notification surface
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Document selection cancelled")]
    Cancelled,

    #[error("Failed to decode image {file}: {reason}")]
    Decode { file: String, reason: String },

    #[error("Cannot assemble a document without pages")]
    EmptyDocument,

    #[error("Document encoding failed: {0}")]
    Encode(String),

    #[error("Server rejected request with status {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Daily work {0} not found")]
    NotFound(WorkId),

    #[error("Daily work {0} already has a change in flight")]
    Busy(WorkId),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: WorkStatus, to: WorkStatus },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    /// The user dismissed the picker or chose nothing. Not a failure to report.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, WorkflowError::Cancelled)
    }

    /// Nothing changed and nothing went wrong: a cancelled picker, or a
    /// repeated action while the first one is still running.
    pub fn is_silent(&self) -> bool {
        matches!(self, WorkflowError::Cancelled | WorkflowError::Busy(_))
    }

    pub fn decode(file: impl Into<String>, reason: impl ToString) -> Self {
        WorkflowError::Decode {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<io::Error> for WorkflowError {
    fn from(err: io::Error) -> Self {
        WorkflowError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        WorkflowError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata per variant: (error_code, recoverable, log_level).
fn workflow_error_static_metadata(err: &WorkflowError) -> (&'static str, bool, LogLevel) {
    match err {
        WorkflowError::Cancelled => ("CANCELLED", true, LogLevel::Debug),
        WorkflowError::Decode { .. } => ("DECODE_FAILED", true, LogLevel::Warn),
        WorkflowError::EmptyDocument => ("EMPTY_DOCUMENT", true, LogLevel::Warn),
        WorkflowError::Encode(_) => ("ENCODE_FAILED", false, LogLevel::Error),
        WorkflowError::Server { status, .. } if *status >= 500 => {
            ("SERVER_ERROR", true, LogLevel::Error)
        }
        WorkflowError::Server { .. } => ("REQUEST_REJECTED", true, LogLevel::Warn),
        WorkflowError::Network(_) => ("NETWORK_ERROR", true, LogLevel::Warn),
        WorkflowError::Timeout => ("TIMEOUT", true, LogLevel::Warn),
        WorkflowError::NotFound(_) => ("NOT_FOUND", false, LogLevel::Warn),
        WorkflowError::Busy(_) => ("IN_FLIGHT", true, LogLevel::Debug),
        WorkflowError::InvalidTransition { .. } => ("INVALID_TRANSITION", false, LogLevel::Debug),
        WorkflowError::InvalidInput(_) => ("INVALID_INPUT", false, LogLevel::Debug),
        WorkflowError::Internal(_) => ("INTERNAL_ERROR", false, LogLevel::Error),
    }
}

impl ErrorMetadata for WorkflowError {
    fn error_code(&self) -> &'static str {
        workflow_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        workflow_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            WorkflowError::Cancelled => "No document selected.".to_string(),
            WorkflowError::Decode { file, .. } => {
                format!("Could not read image {}. Please choose another file.", file)
            }
            WorkflowError::EmptyDocument => "Select at least one image.".to_string(),
            WorkflowError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            WorkflowError::Server { .. }
            | WorkflowError::Network(_)
            | WorkflowError::Encode(_)
            | WorkflowError::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            WorkflowError::Timeout => {
                "The server took too long to respond. Please try again.".to_string()
            }
            WorkflowError::NotFound(id) => format!("Daily work {} no longer exists.", id),
            WorkflowError::Busy(id) => format!("Daily work {} is already being updated.", id),
            WorkflowError::InvalidTransition { to, .. } => format!("Daily work is already {}.", to),
            WorkflowError::InvalidInput(msg) => msg.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        workflow_error_static_metadata(self).2
    }
}
