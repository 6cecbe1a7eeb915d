//! Configuration for the realtime voice session

use crate::session::persona;
use crate::{MiraError, Result};

/// Environment variable holding the service API key
pub const API_KEY_ENV: &str = "MIRA_API_KEY";

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "MIRA_MODEL";

/// Configuration for one live session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// API key passed to the service endpoint
    pub api_key: String,

    /// Model to converse with
    pub model: String,

    /// Prebuilt voice used for synthesized speech
    pub voice: String,

    /// System instruction establishing the companion persona
    pub system_instruction: String,

    /// WebSocket endpoint of the realtime service
    pub endpoint: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "models/gemini-2.5-flash-preview-native-audio-dialog".to_string(),
            voice: "Kore".to_string(),
            system_instruction: persona::SYSTEM_INSTRUCTION.to_string(),
            endpoint: "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent".to_string(),
        }
    }
}

impl SessionConfig {
    /// Build a configuration from the environment
    ///
    /// Reads a `.env` file when present. The API key comes from
    /// `MIRA_API_KEY`, the model can be overridden with `MIRA_MODEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.api_key = key;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = model;
        }
        config
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the voice name
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Full connection URL including the API key
    pub fn url(&self) -> String {
        format!("{}?key={}", self.endpoint, self.api_key)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(MiraError::ConfigError(format!(
                "API key is required, set {}",
                API_KEY_ENV
            )));
        }
        if self.model.is_empty() {
            return Err(MiraError::ConfigError("Model name is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert!(!config.model.is_empty());
        assert_eq!(config.voice, "Kore");
        assert!(config.system_instruction.contains(persona::COMFORT_MODE_TOOL));
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::default()
            .with_api_key("secret")
            .with_voice("Puck")
            .with_model("models/other");

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.voice, "Puck");
        assert_eq!(config.model, "models/other");
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = SessionConfig::default();
        assert!(matches!(config.validate(), Err(MiraError::ConfigError(_))));

        let config = config.with_api_key("secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_carries_key() {
        let config = SessionConfig::default().with_api_key("abc123");
        let url = config.url();
        assert!(url.starts_with("wss://"));
        assert!(url.ends_with("?key=abc123"));
    }
}
