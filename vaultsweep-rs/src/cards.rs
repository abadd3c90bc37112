//! Folder cards: frontmatter summaries of the notes in one folder.
//!
//! A query names a folder and optional tags. Notes carrying every tag are
//! sorted by `birth_date` (years suffixed `BC` sort before year zero) and
//! each note with frontmatter becomes a [`Card`].

use crate::error::{Result, VaultError};
use crate::parser::parse_frontmatter;
use crate::types::display_path;
use crate::vault::Vault;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which notes to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardQuery {
    /// Vault-relative folder; only its direct children are listed.
    pub folder_path: String,

    /// Tags every listed note must carry.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CardQuery {
    pub fn new(folder_path: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            folder_path: folder_path.into(),
            tags,
        }
    }

    /// Parse a query from the YAML body of a `folder` block.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(source)?;
        if value.is_null() {
            return Err(VaultError::InvalidQuery("empty query".to_string()));
        }
        serde_yaml::from_value(value).map_err(|e| VaultError::InvalidQuery(e.to_string()))
    }
}

/// Summary of one note's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Vault-relative path of the note.
    pub note: PathBuf,

    /// File name without extension.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_place: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Cover image path, kept only when the file exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// Read the leading integer of a date the way `parseInt` does; `BC` negates it.
///
/// Anything without a leading number sorts as year 0.
pub fn parse_birth_year(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let Ok(year) = digits.parse::<i64>() else {
        return 0;
    };

    let year = sign * year;
    if raw.contains("BC") { -year } else { year }
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(|v| scalar(Some(v))).collect(),
        Some(Value::String(s)) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

impl Card {
    fn from_frontmatter(vault: &Vault, note: &Path, fm: &Value) -> Self {
        let cover = scalar(fm.get("cover")).filter(|c| vault.file_exists(Path::new(c)));

        Self {
            note: note.to_path_buf(),
            name: note
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string(),
            title: scalar(fm.get("title")),
            subtitle: scalar(fm.get("subtitle")),
            authors: string_list(fm.get("authors")),
            birth_date: scalar(fm.get("birth_date")),
            death_date: scalar(fm.get("death_date")),
            birth_place: scalar(fm.get("birth_place")),
            death_place: scalar(fm.get("death_place")),
            status: scalar(fm.get("status")),
            status_updated: scalar(fm.get("status_updated")),
            tags: string_list(fm.get("tags")),
            cover,
        }
    }

    /// Render the card as markdown blocks separated by blank lines.
    pub fn to_markdown(&self, folder: &str, authors_folder: &str) -> String {
        let folder = folder.trim_end_matches('/');
        let mut blocks = vec![format!("### [[{}/{}.md|{}]]", folder, self.name, self.name)];

        let heading: Vec<String> = [
            self.title.as_ref().map(|t| format!("**{}**", t)),
            self.subtitle.as_ref().map(|s| format!("*{}*", s)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !heading.is_empty() {
            blocks.push(heading.join("\n"));
        }

        if !self.authors.is_empty() {
            let links: Vec<String> = self
                .authors
                .iter()
                .map(|a| format!("[[{}/{}.md|{}]]", authors_folder, a, a))
                .collect();
            blocks.push(format!("**Authors:** {}", links.join(", ")));
        }

        fn labelled(pairs: &[(&str, &Option<String>)]) -> Option<String> {
            let lines: Vec<String> = pairs
                .iter()
                .filter_map(|(label, value)| {
                    value.as_ref().map(|v| format!("**{}:** {}", label, v))
                })
                .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        }

        blocks.extend(labelled(&[
            ("Birth date", &self.birth_date),
            ("Death date", &self.death_date),
            ("Birth place", &self.birth_place),
            ("Death place", &self.death_place),
        ]));
        blocks.extend(labelled(&[
            ("Status", &self.status),
            ("Updated", &self.status_updated),
        ]));

        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t)).collect();
            blocks.push(tags.join(" "));
        }

        if let Some(cover) = &self.cover {
            blocks.push(format!("![[{}]]", cover));
        }

        blocks.join("\n\n")
    }
}

/// Build the cards for a query, sorted by birth year.
pub fn build_cards(vault: &Vault, query: &CardQuery) -> Result<Vec<Card>> {
    let mut selected: Vec<(i64, PathBuf, Option<Value>)> = Vec::new();

    for path in vault.list_folder(&query.folder_path)? {
        if path.extension().map(|e| e != "md").unwrap_or(true) {
            continue;
        }

        let content = match vault.read(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %display_path(&path), "skipping unreadable note: {}", e);
                continue;
            }
        };
        let frontmatter = match parse_frontmatter(&content, &path) {
            Ok(fm) => fm,
            Err(e) => {
                warn!(path = %display_path(&path), "skipping note: {}", e);
                None
            }
        };

        let tags = string_list(frontmatter.as_ref().and_then(|fm| fm.get("tags")));
        if !query.tags.iter().all(|t| tags.contains(t)) {
            debug!(path = %display_path(&path), "missing a requested tag");
            continue;
        }

        let year = scalar(frontmatter.as_ref().and_then(|fm| fm.get("birth_date")))
            .map(|d| parse_birth_year(&d))
            .unwrap_or(0);
        selected.push((year, path, frontmatter));
    }

    selected.sort_by_key(|(year, _, _)| *year);

    Ok(selected
        .into_iter()
        .filter_map(|(_, path, fm)| {
            fm.filter(Value::is_mapping)
                .map(|fm| Card::from_frontmatter(vault, &path, &fm))
        })
        .collect())
}

/// Render cards as one markdown document.
pub fn render_cards(cards: &[Card], folder: &str, authors_folder: &str) -> String {
    cards
        .iter()
        .map(|card| card.to_markdown(folder, authors_folder))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
