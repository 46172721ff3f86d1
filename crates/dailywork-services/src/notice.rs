//! User-facing notifications for workflow outcomes.

use dailywork_core::{ErrorMetadata, WorkflowError};
use serde::Serialize;
use std::fmt;

pub const UPDATED_MESSAGE: &str = "Daily work updated successfully";
pub const UPLOADED_MESSAGE: &str = "RFI document uploaded successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast-style message shown once an action settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Success notice from a server message, or `fallback` when it sent none.
    pub fn from_server(message: Option<&str>, fallback: &str) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback);
        Self::success(message)
    }

    /// Error notice for a failed action. Cancelled and ignored repeat actions
    /// are silent.
    pub fn for_error(err: &WorkflowError) -> Option<Self> {
        if err.is_silent() {
            return None;
        }
        Some(Self::error(err.client_message()))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailywork_core::error::GENERIC_FAILURE_MESSAGE;
    use dailywork_core::models::WorkId;

    #[test]
    fn server_message_wins_over_fallback() {
        assert_eq!(
            Notice::from_server(Some("Status updated"), UPDATED_MESSAGE).message,
            "Status updated"
        );
        assert_eq!(
            Notice::from_server(Some("  "), UPDATED_MESSAGE).message,
            UPDATED_MESSAGE
        );
        assert_eq!(
            Notice::from_server(None, UPDATED_MESSAGE).message,
            UPDATED_MESSAGE
        );
    }

    #[test]
    fn cancellation_has_no_notice() {
        assert_eq!(Notice::for_error(&WorkflowError::Cancelled), None);
    }

    #[test]
    fn busy_record_has_no_notice() {
        assert_eq!(Notice::for_error(&WorkflowError::Busy(WorkId(4))), None);
    }

    #[test]
    fn failures_use_client_message() {
        let rejected = WorkflowError::Server {
            status: 403,
            message: Some("Not allowed".to_string()),
        };
        assert_eq!(
            Notice::for_error(&rejected),
            Some(Notice::error("Not allowed"))
        );

        let offline = WorkflowError::Network("connection refused".to_string());
        assert_eq!(
            Notice::for_error(&offline).map(|n| n.message),
            Some(GENERIC_FAILURE_MESSAGE.to_string())
        );
    }

    #[test]
    fn serializes_for_json_output() {
        let json = serde_json::to_value(Notice::success("done")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"level": "success", "message": "done"})
        );
    }
}
