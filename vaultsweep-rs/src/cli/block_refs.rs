//! `clean-block-refs` command.

use crate::cli::output::Output;
use crate::config::BlockRefConfig;
use crate::error::{ExitCode, Result};
use crate::sweep::{BlockRefSweep, NOTHING_REMOVED, SweepReport};
use crate::vault::Vault;
use serde::Serialize;

/// Output for clean-block-refs.
#[derive(Debug, Serialize)]
pub struct CleanBlockRefsOutput {
    pub dry_run: bool,
    pub count: usize,

    /// `path#^anchor` per removal.
    pub removed: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&SweepReport> for CleanBlockRefsOutput {
    fn from(report: &SweepReport) -> Self {
        Self {
            dry_run: report.dry_run,
            count: report.removed.len(),
            removed: report.removed.iter().map(ToString::to_string).collect(),
            message: report.is_empty().then(|| NOTHING_REMOVED.to_string()),
        }
    }
}

/// Remove every block anchor that no link in the vault points to.
pub fn clean_block_refs(
    vault: &Vault,
    config: &BlockRefConfig,
    dry_run: bool,
    text: bool,
    output: &Output,
) -> Result<ExitCode> {
    let report = BlockRefSweep::new(vault)
        .with_config(config)
        .dry_run(dry_run)
        .run()?;

    if text {
        for line in report.lines() {
            output.print_raw(&line);
        }
    } else {
        output.print(&CleanBlockRefsOutput::from(&report))?;
    }

    if dry_run && !report.is_empty() {
        output.info("Dry run: no notes were modified.");
    }

    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RemovalRecord;
    use std::path::PathBuf;

    #[test]
    fn test_output_from_empty_report() {
        let out = CleanBlockRefsOutput::from(&SweepReport::default());
        assert_eq!(out.count, 0);
        assert!(out.removed.is_empty());
        assert_eq!(out.message.as_deref(), Some(NOTHING_REMOVED));
    }

    #[test]
    fn test_output_lists_removals() {
        let report = SweepReport {
            removed: vec![RemovalRecord {
                path: PathBuf::from("notes/A.md"),
                anchor: "x1".to_string(),
            }],
            dry_run: true,
        };
        let out = CleanBlockRefsOutput::from(&report);
        assert!(out.dry_run);
        assert_eq!(out.removed, vec!["notes/A.md#^x1"]);
        assert!(out.message.is_none());
    }
}
