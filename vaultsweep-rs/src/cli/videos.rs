//! `videos` command.

use crate::cli::args::VideosArgs;
use crate::cli::output::Output;
use crate::config::VideoConfig;
use crate::error::{ExitCode, Result};
use crate::vault::Vault;
use crate::videos::{NoteVideo, link_archived_videos, scan_videos};
use serde::Serialize;

/// Output for videos.
#[derive(Debug, Serialize)]
pub struct VideosOutput {
    pub count: usize,
    pub videos: Vec<NoteVideo>,

    /// URLs whose embeds were swapped for local links.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked: Vec<String>,
}

/// List embedded videos, optionally linking archived copies in place.
pub fn videos(vault: &Vault, config: &VideoConfig, args: &VideosArgs, output: &Output) -> Result<ExitCode> {
    let notes: Vec<_> = args.note.iter().cloned().collect();

    let linked = match &args.note {
        Some(note) if args.link_archived => link_archived_videos(vault, note, config)?,
        _ => Vec::new(),
    };

    let videos = scan_videos(vault, &notes, config)?;
    if videos.is_empty() {
        output.info("No YouTube videos found.");
    }

    output.print(&VideosOutput {
        count: videos.len(),
        videos,
        linked,
    })?;

    Ok(ExitCode::Success)
}
