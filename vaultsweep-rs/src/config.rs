//! User configuration loaded from `config.toml`.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "VAULTSWEEP_CONFIG";

/// Environment variable naming the vault when `--vault` is absent.
pub const VAULT_ENV: &str = "VAULTSWEEP_VAULT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default vault root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<PathBuf>,

    pub block_refs: BlockRefConfig,

    pub covers: CoverConfig,

    pub cards: CardConfig,

    pub videos: VideoConfig,
}

/// Settings for the block reference sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRefConfig {
    /// Notes whose stem ends with this suffix are drawings and never swept.
    pub drawing_suffix: String,

    /// Whether `![[note#^id]]` embeds keep an anchor alive.
    pub count_embeds: bool,
}

impl Default for BlockRefConfig {
    fn default() -> Self {
        Self {
            drawing_suffix: ".excalidraw".to_string(),
            count_embeds: true,
        }
    }
}

/// Settings for orphaned cover detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Folder holding book notes and their covers.
    pub folder: String,

    /// Image extensions treated as covers (lowercase, no dot).
    pub extensions: Vec<String>,

    /// Shared placeholder image that is never orphaned.
    pub placeholder: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            folder: "Books".to_string(),
            extensions: vec!["jpg".to_string(), "jpeg".to_string()],
            placeholder: "Books/cover.jpg".to_string(),
        }
    }
}

/// Settings for folder cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Folder that author notes live in.
    pub authors_folder: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            authors_folder: "Figures".to_string(),
        }
    }
}

/// Settings for embedded video handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Folder archived videos are stored in, as `<id>.mp4`.
    pub media_folder: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            media_folder: "_media/videos".to_string(),
        }
    }
}

impl Config {
    /// Default config file location (`<config_dir>/vaultsweep/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vaultsweep").join("config.toml"))
    }

    /// Load the config from `VAULTSWEEP_CONFIG` or the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        match path {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load the config from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
            .map_err(|e| VaultError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse config TOML.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Pick the vault root: CLI flag, then environment, then config file.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(VAULT_ENV) {
            return Ok(PathBuf::from(path));
        }
        self.vault.clone().ok_or(VaultError::NoVaultConfigured)
    }
}
