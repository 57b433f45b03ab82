use async_trait::async_trait;
use thiserror::Error;

/// Notification delivery errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Missing notifier credentials: {0}")]
    MissingCredentials(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// Outbound text notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifierPort: Send + Sync {
    /// Deliver one plain-text message
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}
