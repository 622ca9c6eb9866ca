use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::utils::{CareerLensError, CareerLensResult};

pub const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";
const ENV_PREFIX: &str = "CAREERLENS";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub poller: PollerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollerConfig {
    pub interval_ms: u64,
    /// Unset means poll until the analysis settles or the user cancels.
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub database_path: String,
}

impl AppConfig {
    pub fn load() -> CareerLensResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Layers built-in defaults, the TOML file at `path` (if present) and
    /// `CAREERLENS__SECTION__KEY` environment variables, in that order.
    pub fn load_from(path: impl AsRef<Path>) -> CareerLensResult<Self> {
        let path = path.as_ref().to_string_lossy().into_owned();
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::new(&path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CareerLensResult<()> {
        if self.poller.interval_ms == 0 {
            return Err(CareerLensError::Config(
                "poller.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> CareerLensResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Writes the built-in defaults to `path` unless a file is already there.
    /// Environment overrides are never persisted. Returns whether a file was
    /// written.
    pub fn write_default(path: impl AsRef<Path>) -> CareerLensResult<bool> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(false);
        }
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        Self::default().save(path)?;
        Ok(true)
    }

    pub fn database_url(&self) -> String {
        format!("sqlite:{}", self.storage.database_path)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api/v1".to_string(),
                timeout_secs: 15,
            },
            poller: PollerConfig {
                interval_ms: 1000,
                max_attempts: None,
            },
            storage: StorageConfig {
                database_path: "./data/careerlens.db".to_string(),
            },
        }
    }
}
