pub mod animation;
pub mod conversation;
pub mod provider;
pub mod speech;
pub mod turn;
pub mod util;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum OshaberiError {
    #[error("Response provider error: {0}")]
    ProviderError(String),

    #[error("Speech synthesis is not supported on this platform")]
    SpeechUnsupported,

    #[error("Speech playback error: {0}")]
    SpeechPlaybackError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl OshaberiError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Remote failures are typically transient
            OshaberiError::ProviderError(_) => true,
            // A missing platform capability requires a different host
            OshaberiError::SpeechUnsupported => false,
            OshaberiError::SpeechPlaybackError(_) => true,
            OshaberiError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            OshaberiError::ProviderError(_) => {
                "Response generation failed. Please try again.".to_string()
            }
            OshaberiError::SpeechUnsupported => {
                "Speech output is not available. Responses will be shown as text.".to_string()
            }
            OshaberiError::SpeechPlaybackError(_) => {
                "Speech playback failed. Response will be shown as text.".to_string()
            }
            OshaberiError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, OshaberiError>;
