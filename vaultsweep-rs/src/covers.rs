//! Orphaned book cover detection.
//!
//! A book note `Books/Title.md` keeps its cover next to it as `Books/Title.jpg`.
//! When the note is deleted or renamed the image stays behind; those images are
//! orphans.

use crate::config::CoverConfig;
use crate::error::Result;
use crate::types::display_path;
use crate::vault::Vault;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn is_cover_image(path: &Path, config: &CoverConfig) -> bool {
    let prefix = format!("{}/", config.folder.trim_end_matches('/'));
    if !display_path(path).starts_with(&prefix) {
        return false;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| config.extensions.iter().any(|c| c == ext))
        .unwrap_or(false)
}

/// Cover images under the books folder with no `.md` note of the same stem.
pub fn find_orphaned_covers(vault: &Vault, config: &CoverConfig) -> Result<Vec<PathBuf>> {
    let files = vault.list_files()?;
    let existing: HashSet<&PathBuf> = files.iter().collect();

    let orphans: Vec<PathBuf> = files
        .iter()
        .filter(|path| is_cover_image(path, config))
        .filter(|path| display_path(path) != config.placeholder)
        .filter(|path| !existing.contains(&path.with_extension("md")))
        .cloned()
        .collect();

    debug!(count = orphans.len(), folder = %config.folder, "found orphaned covers");
    Ok(orphans)
}

/// Delete the given covers, skipping any that are already gone.
///
/// Returns the paths actually deleted.
pub fn delete_covers(vault: &Vault, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut deleted = Vec::new();

    for path in paths {
        if !vault.file_exists(path) {
            warn!(path = %path.display(), "cover already gone");
            continue;
        }
        vault.delete(path)?;
        info!(path = %path.display(), "deleted orphaned cover");
        deleted.push(path.clone());
    }

    Ok(deleted)
}
