//! `clean-covers` command.

use crate::cli::output::Output;
use crate::config::CoverConfig;
use crate::covers::{delete_covers, find_orphaned_covers};
use crate::error::{ExitCode, Result};
use crate::types::display_path;
use crate::vault::Vault;
use serde::Serialize;

/// Output for clean-covers.
#[derive(Debug, Serialize)]
pub struct CleanCoversOutput {
    pub dry_run: bool,
    pub orphaned: Vec<String>,
    pub deleted: Vec<String>,
}

/// Find cover images whose book note is gone and delete them.
pub fn clean_covers(
    vault: &Vault,
    config: &CoverConfig,
    dry_run: bool,
    output: &Output,
) -> Result<ExitCode> {
    let orphaned = find_orphaned_covers(vault, config)?;

    let deleted = if dry_run {
        Vec::new()
    } else {
        delete_covers(vault, &orphaned)?
    };

    if orphaned.is_empty() {
        output.info("No orphaned covers found.");
    }

    output.print(&CleanCoversOutput {
        dry_run,
        orphaned: orphaned.iter().map(|p| display_path(p)).collect(),
        deleted: deleted.iter().map(|p| display_path(p)).collect(),
    })?;

    Ok(ExitCode::Success)
}
