use thiserror::Error;

use crate::chat::types::ConversationState;

/// Everything that can go wrong while exchanging turns with the triage backend.
///
/// None of these are fatal: the conversation stays resumable and the caller
/// shows the `Display` text inline.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx status. `message` is the server's `error` string when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Message is required")]
    EmptyMessage,

    #[error("Message too long. Maximum length is {max} characters")]
    MessageTooLong { max: usize },

    #[error("Still waiting for the previous reply")]
    ReplyPending,

    #[error("The assessment is complete; start a new conversation to continue")]
    ConversationComplete,

    #[error("No report is available yet")]
    ReportUnavailable,

    #[error("Invalid transition from {from:?} on {event}")]
    InvalidTransition {
        from: ConversationState,
        event: &'static str,
    },
}

impl ChatError {
    pub fn server(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status: {}", status));
        ChatError::Server { status, message }
    }

    /// True for errors raised before anything was sent.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            ChatError::EmptyMessage
                | ChatError::MessageTooLong { .. }
                | ChatError::ReplyPending
                | ChatError::ConversationComplete
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_prefers_backend_message() {
        let err = ChatError::server(400, Some("Message is required.".to_string()));
        assert_eq!(err.to_string(), "Message is required.");
    }

    #[test]
    fn test_server_error_falls_back_to_status() {
        let err = ChatError::server(503, None);
        assert_eq!(err.to_string(), "Request failed with status: 503");

        let blank = ChatError::server(500, Some("  ".to_string()));
        assert_eq!(blank.to_string(), "Request failed with status: 500");
    }

    #[test]
    fn test_rejected_input_classification() {
        assert!(ChatError::EmptyMessage.is_rejected_input());
        assert!(ChatError::ReplyPending.is_rejected_input());
        assert!(!ChatError::server(500, None).is_rejected_input());
    }
}
