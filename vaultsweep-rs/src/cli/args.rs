//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vaultsweep")]
#[command(author, version, about = "Maintenance sweeps for Obsidian-style vaults", long_about = None)]
pub struct Cli {
    /// Path to the vault (overrides VAULTSWEEP_VAULT and the config default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log filter for the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove block anchors (^id) that no link points to
    #[command(name = "clean-block-refs")]
    CleanBlockRefs(CleanBlockRefsArgs),

    /// Find and delete cover images whose book note is gone
    #[command(name = "clean-covers")]
    CleanCovers(CleanCoversArgs),

    /// Summarize the notes of a folder as cards
    Cards(CardsArgs),

    /// List embedded YouTube videos
    Videos(VideosArgs),
}

// === Block references ===

#[derive(Parser, Debug)]
pub struct CleanBlockRefsArgs {
    /// Show what would be removed without modifying notes
    #[arg(long)]
    pub dry_run: bool,

    /// Print one `path#^id` line per removal instead of structured output
    #[arg(long)]
    pub text: bool,
}

// === Covers ===

#[derive(Parser, Debug)]
pub struct CleanCoversArgs {
    /// List orphaned covers without deleting them
    #[arg(long)]
    pub dry_run: bool,
}

// === Cards ===

#[derive(Parser, Debug)]
pub struct CardsArgs {
    /// YAML file with `folderPath` and `tags`
    #[arg(long, conflicts_with = "folder")]
    pub query: Option<PathBuf>,

    /// Folder to list (relative to vault)
    #[arg(long, required_unless_present = "query")]
    pub folder: Option<String>,

    /// Required tag (repeatable for AND logic)
    #[arg(long)]
    pub tag: Vec<String>,

    /// Render cards as markdown instead of structured output
    #[arg(long)]
    pub markdown: bool,
}

// === Videos ===

#[derive(Parser, Debug)]
pub struct VideosArgs {
    /// Note to scan (relative to vault); all notes when omitted
    pub note: Option<PathBuf>,

    /// Replace embeds of already archived videos with local links
    #[arg(long, requires = "note")]
    pub link_archived: bool,
}
