//! Vaultsweep - maintenance sweeps for Obsidian-style vaults.
//!
//! # Overview
//!
//! - Block reference sweep: strip `^anchor` markers that no link in the
//!   vault points to (`[[note#^anchor]]`)
//! - Orphaned covers: find book cover images whose note is gone
//! - Folder cards: summarize the frontmatter of a folder's notes
//! - Videos: list embedded YouTube videos and link archived copies
//!
//! The sweep works against any [`Corpus`]; [`Vault`] is the filesystem one and
//! [`MemoryCorpus`] keeps documents in memory.
//!
//! # Example
//!
//! ```no_run
//! use vaultsweep::{Vault, run_sweep};
//!
//! let vault = Vault::new("/path/to/vault").unwrap();
//! let report = run_sweep(&vault).unwrap();
//! for line in report.lines() {
//!     println!("{}", line);
//! }
//! ```

pub mod cards;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod covers;
pub mod error;
pub mod parser;
pub mod sweep;
pub mod types;
pub mod vault;
pub mod videos;

// Re-export main types at crate root
pub use config::Config;
pub use corpus::{Corpus, MemoryCorpus};
pub use error::{Result, VaultError};
pub use sweep::{BlockRefSweep, SweepReport, run_sweep};
pub use types::*;
pub use vault::Vault;
