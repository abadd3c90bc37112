//! Embedded YouTube videos.
//!
//! Notes embed videos either as a privacy-enhanced `<iframe>` or as a markdown
//! image pointing at a YouTube URL. A video archived under the media folder as
//! `<id>.mp4` can replace its embed with a local `![[...]]` link.

use crate::config::VideoConfig;
use crate::error::Result;
use crate::types::{DocumentKind, display_path};
use crate::vault::Vault;
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};
use url::Url;

const NOCOOKIE_PREFIX: &str = "https://www.youtube-nocookie.com/embed/";

static IFRAME_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<iframe.*?src="(https://www\.youtube-nocookie\.com/embed/[^"]+)""#).unwrap()
});

static SHORT_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[.*?\]\((https://youtu\.be/[^)]+)\)").unwrap()
});

static WATCH_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[.*?\]\((https://www\.youtube\.com/watch\?v=[^)]+)\)").unwrap()
});

/// How a video is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    /// `<iframe src="https://www.youtube-nocookie.com/embed/<id>">`
    Iframe,
    /// `![..](https://youtu.be/<id>)`
    Short,
    /// `![..](https://www.youtube.com/watch?v=<id>)`
    Watch,
}

/// One embedded video URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoEmbed {
    pub url: String,
    pub source: VideoSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Embedded videos in content: iframes first, then short links, then watch links.
pub fn find_video_embeds(content: &str) -> Vec<VideoEmbed> {
    [
        (&*IFRAME_EMBED, VideoSource::Iframe),
        (&*SHORT_EMBED, VideoSource::Short),
        (&*WATCH_EMBED, VideoSource::Watch),
    ]
    .into_iter()
    .flat_map(|(re, source)| {
        re.captures_iter(content).map(move |cap| {
            let url = cap[1].to_string();
            VideoEmbed {
                video_id: video_id(&url),
                url,
                source,
            }
        })
    })
    .collect()
}

/// Embedded video URLs in content, in [`find_video_embeds`] order.
pub fn extract_video_urls(content: &str) -> Vec<String> {
    find_video_embeds(content)
        .into_iter()
        .map(|embed| embed.url)
        .collect()
}

/// The YouTube id of a video URL.
pub fn video_id(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix(NOCOOKIE_PREFIX) {
        let id = rest.split(['?', '#']).next().unwrap_or("");
        return (!id.is_empty()).then(|| id.to_string());
    }

    let parsed = Url::parse(url).ok()?;
    if parsed.host_str() == Some("youtu.be") {
        return parsed
            .path_segments()?
            .next()
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, id)| id.into_owned())
        .filter(|id| !id.is_empty())
}

/// Vault path an archived video is stored at.
pub fn archive_path(video_id: &str, config: &VideoConfig) -> PathBuf {
    PathBuf::from(format!(
        "{}/{}.mp4",
        config.media_folder.trim_end_matches('/'),
        video_id
    ))
}

/// Replace every embed of `url` with `link`.
///
/// Iframes are replaced through their closing tag. Returns `None` when the
/// content does not embed `url`.
pub fn replace_video_embed(content: &str, url: &str, link: &str) -> Result<Option<String>> {
    let pattern = if url.contains("youtube-nocookie.com/embed") {
        format!(r#"<iframe.*?src="{}".*?</iframe>"#, regex::escape(url))
    } else {
        format!(r"!\[[^\]\n]*\]\({}\)", regex::escape(url))
    };
    let re = Regex::new(&pattern)?;

    if !re.is_match(content) {
        return Ok(None);
    }
    Ok(Some(re.replace_all(content, NoExpand(link)).into_owned()))
}

/// A video embedded in a vault note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteVideo {
    pub note: String,

    #[serde(flatten)]
    pub embed: VideoEmbed,

    /// Where the archived copy lives, when the id is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,

    /// Whether the archived copy exists.
    pub archived: bool,
}

/// Embedded videos of the given notes, or of every markdown note when `notes` is empty.
pub fn scan_videos(vault: &Vault, notes: &[PathBuf], config: &VideoConfig) -> Result<Vec<NoteVideo>> {
    let notes = if notes.is_empty() {
        vault
            .list_notes()?
            .into_iter()
            .filter(|path| vault.kind_of(path) == DocumentKind::Markdown)
            .collect()
    } else {
        notes.to_vec()
    };

    let mut found = Vec::new();
    for note in &notes {
        let content = vault.read(note)?;
        for embed in find_video_embeds(&content) {
            let archive = embed.video_id.as_deref().map(|id| archive_path(id, config));
            found.push(NoteVideo {
                note: display_path(note),
                archived: archive.as_deref().map(|p| vault.file_exists(p)).unwrap_or(false),
                archive: archive.as_deref().map(display_path),
                embed,
            });
        }
    }

    debug!(notes = notes.len(), videos = found.len(), "scanned video embeds");
    Ok(found)
}

/// Swap the embeds of already archived videos in `note` for `![[<archive>]]` links.
///
/// Returns the URLs that were replaced.
pub fn link_archived_videos(vault: &Vault, note: &Path, config: &VideoConfig) -> Result<Vec<String>> {
    let mut content = vault.read(note)?;
    let mut replaced = Vec::new();

    for embed in find_video_embeds(&content) {
        let Some(archive) = embed.video_id.as_deref().map(|id| archive_path(id, config)) else {
            continue;
        };
        if !vault.file_exists(&archive) {
            continue;
        }

        let link = format!("![[{}]]", display_path(&archive));
        if let Some(updated) = replace_video_embed(&content, &embed.url, &link)? {
            content = updated;
            info!(note = %display_path(note), url = %embed.url, "linked archived video");
            replaced.push(embed.url);
        }
    }

    if !replaced.is_empty() {
        vault.write(note, &content)?;
    }
    Ok(replaced)
}
