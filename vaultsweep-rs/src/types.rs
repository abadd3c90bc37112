//! Shared types for vaultsweep.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A wikilink, embed, or markdown link found in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The target note path as written (no heading or block part).
    /// Empty for same-note links like `[[#^id]]`.
    pub target: String,

    /// Everything after the first `#`, exactly as written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subpath: Option<String>,

    /// Optional display alias (the part after |, or the markdown link text).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Optional heading reference (the part after #, before ^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Optional block reference (the part after #^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    /// Whether this is an embed (![[...]]) rather than a link.
    pub embed: bool,

    /// Line number where this link appears (1-indexed).
    pub line: usize,
}

impl Link {
    /// The link target as written, subpath included.
    pub fn full_target(&self) -> String {
        match &self.subpath {
            Some(sub) => format!("{}#{}", self.target, sub),
            None => self.target.clone(),
        }
    }
}

/// A block anchor definition (`... ^id` at the end of a line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAnchor {
    /// The anchor identifier without the ^ prefix.
    pub id: String,

    /// Line number where the anchor is defined (1-indexed).
    pub line: usize,
}

/// What a vault entry is, decided once at listing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// A regular markdown note.
    Markdown,
    /// A markdown file backing a drawing (e.g. `Sketch.excalidraw.md`).
    Drawing,
    /// Any non-markdown file.
    Attachment,
}

impl DocumentKind {
    /// Classify a vault-relative path.
    pub fn classify(path: &Path, drawing_suffix: &str) -> Self {
        let is_markdown = path.extension().map(|e| e == "md").unwrap_or(false);
        if !is_markdown {
            return DocumentKind::Attachment;
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        if !drawing_suffix.is_empty() && stem.ends_with(drawing_suffix) {
            DocumentKind::Drawing
        } else {
            DocumentKind::Markdown
        }
    }

    /// Whether the entry holds text the sweep can read.
    pub fn is_text(self) -> bool {
        matches!(self, DocumentKind::Markdown | DocumentKind::Drawing)
    }
}

/// A reference to one document of a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// Path relative to the corpus root.
    pub path: PathBuf,

    /// Kind tag assigned by the corpus.
    pub kind: DocumentKind,
}

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>, kind: DocumentKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// The path with `/` separators, as shown to users and matched by links.
    pub fn display_path(&self) -> String {
        display_path(&self.path)
    }
}

/// Render a relative path with `/` separators.
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// One removed anchor definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRecord {
    /// Document the anchor was removed from.
    pub path: PathBuf,

    /// The anchor identifier, without `^`.
    pub anchor: String,
}

impl fmt::Display for RemovalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#^{}", display_path(&self.path), self.anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let suffix = ".excalidraw";
        assert_eq!(
            DocumentKind::classify(Path::new("notes/A.md"), suffix),
            DocumentKind::Markdown
        );
        assert_eq!(
            DocumentKind::classify(Path::new("Sketch.excalidraw.md"), suffix),
            DocumentKind::Drawing
        );
        assert_eq!(
            DocumentKind::classify(Path::new("Books/cover.jpg"), suffix),
            DocumentKind::Attachment
        );
        assert_eq!(
            DocumentKind::classify(Path::new("Sketch.excalidraw.md"), ""),
            DocumentKind::Markdown
        );
    }

    #[test]
    fn test_full_target() {
        let link = Link {
            target: "Note".to_string(),
            subpath: Some("^abc".to_string()),
            alias: None,
            heading: None,
            block_id: Some("abc".to_string()),
            embed: false,
            line: 1,
        };
        assert_eq!(link.full_target(), "Note#^abc");
    }

    #[test]
    fn test_full_target_keeps_subpath_as_written() {
        let link = Link {
            target: String::new(),
            subpath: Some("^b#Sub".to_string()),
            alias: None,
            heading: None,
            block_id: Some("b#Sub".to_string()),
            embed: false,
            line: 1,
        };
        assert_eq!(link.full_target(), "#^b#Sub");
        assert!(!link.full_target().ends_with("#^b"));
    }

    #[test]
    fn test_removal_record_display() {
        let record = RemovalRecord {
            path: PathBuf::from("folder").join("A.md"),
            anchor: "ref1".to_string(),
        };
        assert_eq!(record.to_string(), "folder/A.md#^ref1");
    }
}
