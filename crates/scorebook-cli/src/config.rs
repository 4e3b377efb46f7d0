use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use scorebook_types::MatchFormat;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "scorebook.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorebookConfig {
    /// Directory holding one snapshot file per match.
    pub store_dir: PathBuf,
    /// Format used by `new` when `--match-format` is not given.
    pub default_format: MatchFormat,
    /// Overs per innings for the custom format.
    pub custom_overs: u32,
    pub color: bool,
}

impl Default for ScorebookConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".scorebook"),
            default_format: MatchFormat::T20,
            custom_overs: 20,
            color: true,
        }
    }
}

impl ScorebookConfig {
    /// Load `path`, or `./scorebook.toml` if it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.custom_overs == 0 {
            anyhow::bail!("custom_overs must be at least 1");
        }
        Ok(config)
    }

    /// Overs limit for a new match in `format`.
    pub fn overs_for(&self, format: MatchFormat) -> Option<u32> {
        format.default_overs().or(Some(self.custom_overs))
    }
}
