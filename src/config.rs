//! TOML configuration.
//!
//! Every field has a default, so an empty or missing file is a valid
//! configuration:
//!
//! ```toml
//! snapshot_path = "cafe_database.json"
//! actor_buffer = 32
//!
//! [assistant]
//! model = "gemini-2.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CafeConfig {
    /// File the application snapshot is saved to.
    pub snapshot_path: PathBuf,
    /// Request queue capacity of the order actor.
    pub actor_buffer: usize,
    pub assistant: AssistantConfig,
}

impl Default for CafeConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("cafe_database.json"),
            actor_buffer: 32,
            assistant: AssistantConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Upper bound for one assistant exchange.
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
            temperature: 0.7,
        }
    }
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "{} environment variable not set",
                    self.api_key_env
                ))
            })
    }
}

impl CafeConfig {
    /// Loads `path`, or the defaults when no path is given or the file does not exist.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_buffer == 0 {
            return Err(ConfigError::Invalid(
                "actor_buffer must be greater than zero".to_string(),
            ));
        }
        if self.assistant.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "assistant.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.assistant.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "assistant.model must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(CafeConfig::from_toml_str("").unwrap(), CafeConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = CafeConfig::from_toml_str(
            r#"
            snapshot_path = "/var/lib/cafe/db.json"

            [assistant]
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("/var/lib/cafe/db.json"));
        assert_eq!(config.actor_buffer, 32);
        assert_eq!(config.assistant.timeout(), Duration::from_secs(5));
        assert_eq!(config.assistant.model, "gemini-2.5-flash");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            CafeConfig::from_toml_str("actor_buffer = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CafeConfig::from_toml_str("[assistant]\ntimeout_secs = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CafeConfig::from_toml_str("actor_buffer = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn load_reads_a_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(
            CafeConfig::load(Some(&missing)).await.unwrap(),
            CafeConfig::default()
        );

        let path = dir.path().join("cafe.toml");
        std::fs::write(&path, "actor_buffer = 8\n").unwrap();
        assert_eq!(CafeConfig::load(Some(&path)).await.unwrap().actor_buffer, 8);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let config = AssistantConfig {
            api_key_env: "CAFE_ORDERS_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AssistantConfig::default()
        };
        assert!(matches!(config.api_key(), Err(ConfigError::Invalid(_))));
    }
}
