//! Vault representation and filesystem operations.

use crate::corpus::Corpus;
use crate::error::{Result, VaultError};
use crate::parser::parse_all_links;
use crate::types::{DocumentHandle, DocumentKind, Link};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::warn;

/// An Obsidian vault rooted at a directory.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,

    /// Stem suffix that marks a markdown file as a drawing.
    pub drawing_suffix: String,
}

impl Vault {
    /// Open a vault at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(VaultError::VaultNotFound(root));
        }

        Ok(Self {
            root,
            drawing_suffix: ".excalidraw".to_string(),
        })
    }

    /// Override the drawing suffix.
    pub fn with_drawing_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.drawing_suffix = suffix.into();
        self
    }

    /// Absolute path of a vault-relative path.
    pub fn full_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Check if a file exists in the vault.
    pub fn file_exists(&self, relative_path: &Path) -> bool {
        self.full_path(relative_path).is_file()
    }

    /// Read a file as text.
    pub fn read(&self, relative_path: &Path) -> Result<String> {
        if !self.file_exists(relative_path) {
            return Err(VaultError::NoteNotFound(relative_path.to_path_buf()));
        }
        Ok(std::fs::read_to_string(self.full_path(relative_path))?)
    }

    /// Overwrite an existing file.
    pub fn write(&self, relative_path: &Path, content: &str) -> Result<()> {
        if !self.file_exists(relative_path) {
            return Err(VaultError::NoteNotFound(relative_path.to_path_buf()));
        }

        std::fs::write(self.full_path(relative_path), content).map_err(|source| {
            VaultError::WriteFailed {
                path: relative_path.to_path_buf(),
                source,
            }
        })
    }

    /// Delete a file.
    pub fn delete(&self, relative_path: &Path) -> Result<()> {
        if !self.file_exists(relative_path) {
            return Err(VaultError::NoteNotFound(relative_path.to_path_buf()));
        }
        std::fs::remove_file(self.full_path(relative_path))?;
        Ok(())
    }

    /// List every file in the vault, skipping hidden files and directories.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        self.list_matching("**/*")
    }

    /// List all markdown files in the vault.
    pub fn list_notes(&self) -> Result<Vec<PathBuf>> {
        self.list_matching("**/*.md")
    }

    /// List files directly inside a vault folder (not recursive).
    pub fn list_folder(&self, folder: &str) -> Result<Vec<PathBuf>> {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            return self.list_matching("*");
        }
        let pattern = format!("{}/*", glob::Pattern::escape(folder));
        self.list_matching(&pattern)
    }

    fn list_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let root_pattern = glob::Pattern::escape(&self.root.to_string_lossy());
        let full_pattern = format!("{}/{}", root_pattern, pattern);

        let mut files = Vec::new();

        for entry in glob(&full_pattern)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        if !relative
                            .components()
                            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                        {
                            files.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    warn!("glob error: {}", e);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Classify a vault-relative path.
    pub fn kind_of(&self, relative_path: &Path) -> DocumentKind {
        DocumentKind::classify(relative_path, &self.drawing_suffix)
    }
}

impl Corpus for Vault {
    fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        Ok(self
            .list_notes()?
            .into_iter()
            .map(|path| {
                let kind = self.kind_of(&path);
                DocumentHandle::new(path, kind)
            })
            .collect())
    }

    fn read_text(&self, doc: &DocumentHandle) -> Result<String> {
        self.read(&doc.path)
    }

    fn write_text(&self, doc: &DocumentHandle, content: &str) -> Result<()> {
        self.write(&doc.path, content)
    }

    fn links(&self, doc: &DocumentHandle) -> Result<Vec<Link>> {
        Ok(parse_all_links(&self.read(&doc.path)?))
    }

    fn resolve_by_path(&self, path: &Path) -> Option<DocumentHandle> {
        if !self.file_exists(path) {
            return None;
        }
        let kind = self.kind_of(path);
        kind.is_text().then(|| DocumentHandle::new(path, kind))
    }
}
