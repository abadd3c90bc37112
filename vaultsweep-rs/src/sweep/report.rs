//! Sweep results.

use crate::types::RemovalRecord;
use serde::Serialize;

/// Line shown when a sweep removed nothing.
pub const NOTHING_REMOVED: &str = "No unused block references found.";

/// Everything a sweep removed, in removal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub removed: Vec<RemovalRecord>,

    /// Set when nothing was written back.
    pub dry_run: bool,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    /// `path#^anchor` per removal, or a single line saying nothing was found.
    pub fn lines(&self) -> Vec<String> {
        if self.removed.is_empty() {
            vec![NOTHING_REMOVED.to_string()]
        } else {
            self.removed.iter().map(ToString::to_string).collect()
        }
    }
}
