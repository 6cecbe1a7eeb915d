pub mod audio;
pub mod conversation;
pub mod messages;
pub mod session;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MiraError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Wire format error: {0}")]
    WireError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for MiraError {
    fn from(e: std::io::Error) -> Self {
        MiraError::IOError(e.to_string())
    }
}

impl MiraError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            MiraError::AudioDeviceError(_) => false,
            // Transient errors, a new session can be started
            MiraError::AudioProcessingError(_) => true,
            MiraError::SessionError(_) => true,
            MiraError::WireError(_) => true,
            MiraError::IOError(_) => false,
            MiraError::ConfigError(_) => false,
            MiraError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            MiraError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            MiraError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            MiraError::SessionError(_) => {
                "Connection to the voice service failed. Please try again.".to_string()
            }
            MiraError::WireError(_) => {
                "Received malformed data from the voice service.".to_string()
            }
            MiraError::IOError(_) => {
                "File system error occurred.".to_string()
            }
            MiraError::ConfigError(_) => {
                "Configuration error. Please check your API key and settings.".to_string()
            }
            MiraError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MiraError>;
