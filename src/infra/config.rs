// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub messaging: MessagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            timeout_secs: None,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Host of the messaging web app.
    pub host: String,
    /// Window name the session tab is bound to.
    pub session_name: String,
    /// Wait before redirecting a freshly opened tab to the deep link.
    pub settle_delay_ms: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            host: "web.whatsapp.com".into(),
            session_name: "WHATS_ZHAZ".into(),
            settle_delay_ms: 300,
        }
    }
}

impl MessagingConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn root_url(&self) -> String {
        format!("https://{}", self.host)
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), crate::infra::errors::OutreachError> {
        use crate::infra::errors::OutreachError;

        if self.backend.base_url.trim().is_empty() {
            return Err(OutreachError::Config("backend.base_url is empty".into()));
        }
        if self.messaging.session_name.trim().is_empty() {
            return Err(OutreachError::Config(
                "messaging.session_name is empty".into(),
            ));
        }
        Ok(())
    }
}
