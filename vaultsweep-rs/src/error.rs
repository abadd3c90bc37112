//! Error types and exit codes for vaultsweep.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const INVALID_FRONTMATTER: i32 = 5;
    pub const VAULT_NOT_FOUND: i32 = 6;
}

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Note not found: {0}")]
    NoteNotFound(PathBuf),

    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("No vault given: pass --vault, set VAULTSWEEP_VAULT, or set `vault` in the config file")]
    NoVaultConfigured,

    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Invalid card query: {0}")]
    InvalidQuery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VaultError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            VaultError::InvalidFrontmatter { .. } => exit_code::INVALID_FRONTMATTER,
            VaultError::VaultNotFound(_) | VaultError::NoVaultConfigured => {
                exit_code::VAULT_NOT_FOUND
            }
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
        }
    }
}
