//! `linkres.toml` loading.

use std::path::Path;

use anyhow::{Context, Result};
use engine::EngineConfig;
use linking::UrlTemplates;
use platform::PlatformConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "linkres.toml";
pub const SECRET_API_KEY_ENV: &str = "LINKRES_SECRET_API_KEY";

/// Everything the composition root needs, one table per crate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub links: UrlTemplates,
    pub platform: PlatformConfig,
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Reads `path`. A missing file yields defaults unless the path was given
    /// explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !path.exists() {
            if explicit {
                anyhow::bail!("configuration file {} does not exist", path.display());
            }
            tracing::debug!(path = %path.display(), "No configuration file; using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.platform.validate()?;
        Ok(config)
    }

    /// Applies environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(SECRET_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.platform.secret_api_key = Some(key);
        }
    }
}
