use crate::domain::error::{AppError, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

pub const CONFIG_FILE: &str = "docbridge.toml";
const ENV_PREFIX: &str = "DOCBRIDGE_";

/// Client configuration, merged from defaults, an optional
/// `docbridge.toml` next to the working directory, and
/// `DOCBRIDGE_`-prefixed environment variables (highest precedence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let config: ClientConfig = Figment::from(Serialized::defaults(ClientConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        self.base_url = base_url.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|e| {
            AppError::Config(format!("invalid base_url '{}': {}", self.base_url, e))
        })?;
        Ok(())
    }
}
