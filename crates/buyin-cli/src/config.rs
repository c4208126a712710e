use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use buyin_sdk::CorruptDataPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "buyin.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyInConfig {
    /// Directory holding `players.json` and `transactions.json`.
    pub data_dir: PathBuf,
    pub on_corrupt: CorruptDataPolicy,
    /// Ask before `new-game` clears the saved game.
    pub confirm_reset: bool,
}

impl Default for BuyInConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".buyin"),
            on_corrupt: CorruptDataPolicy::TreatAsEmpty,
            confirm_reset: true,
        }
    }
}

impl BuyInConfig {
    /// Load from `path`, or from `buyin.toml` in the working directory when
    /// no path is given and that file exists. Otherwise defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}
