//! Block anchor parsing and removal (`text ^block-id`).

use crate::types::BlockAnchor;
use regex::Regex;
use std::sync::LazyLock;

// Anchor at the end of a line: whitespace, then ^id running to end of line.
// The id may contain anything except whitespace and square brackets.
static BLOCK_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s\^([^\s\[\]]+)$").unwrap()
});

// Anchor on a line of its own. Only a definition when a line break precedes it.
static STANDALONE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\^([^\s\[\]]+)$").unwrap()
});

/// Split content into `(line, terminator)` pairs.
///
/// The terminator is `"\n"`, `"\r\n"`, or `""` for a final unterminated line.
pub fn split_lines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.split_inclusive('\n').map(|raw| {
        if let Some(line) = raw.strip_suffix("\r\n") {
            (line, "\r\n")
        } else if let Some(line) = raw.strip_suffix('\n') {
            (line, "\n")
        } else {
            (raw, "")
        }
    })
}

/// Parse all block anchor definitions from content.
///
/// Every matching line yields one entry, so an id defined twice appears twice.
pub fn parse_block_anchors(content: &str) -> Vec<BlockAnchor> {
    let mut anchors = Vec::new();

    for (line_idx, (line, _)) in split_lines(content).enumerate() {
        let cap = BLOCK_ANCHOR.captures(line).or_else(|| {
            if line_idx > 0 {
                STANDALONE_ANCHOR.captures(line)
            } else {
                None
            }
        });

        if let Some(cap) = cap {
            anchors.push(BlockAnchor {
                id: cap[1].to_string(),
                line: line_idx + 1,
            });
        }
    }

    anchors
}

/// Anchor identifiers defined in content, in line order.
pub fn extract_block_anchors(content: &str) -> Vec<String> {
    parse_block_anchors(content)
        .into_iter()
        .map(|anchor| anchor.id)
        .collect()
}

/// What to do with one line when removing an anchor.
#[derive(Debug, PartialEq, Eq)]
enum LineEdit<'a> {
    Keep,
    /// Anchor trailed real content: keep the content, drop the anchor.
    Truncate(&'a str),
    /// The line held nothing but the anchor.
    Drop,
}

fn edit_for_line<'a>(line: &'a str, marker: &str, first_line: bool) -> LineEdit<'a> {
    let Some(before) = line.strip_suffix(marker) else {
        return LineEdit::Keep;
    };

    if before.is_empty() {
        return if first_line { LineEdit::Keep } else { LineEdit::Drop };
    }

    if !before.ends_with(char::is_whitespace) {
        return LineEdit::Keep;
    }

    let content = before.trim_end();
    if content.is_empty() {
        LineEdit::Drop
    } else {
        LineEdit::Truncate(content)
    }
}

/// Remove every definition of `anchor` from content.
///
/// An anchor trailing text is cut together with the whitespace before it. A line
/// holding only the anchor is deleted along with one blank line directly above
/// it. Returns `None` when the content has no definition of `anchor`.
pub fn remove_block_anchor(content: &str, anchor: &str) -> Option<String> {
    let marker = format!("^{}", anchor);
    let mut kept: Vec<(String, &str)> = Vec::new();
    let mut changed = false;

    for (line_idx, (line, ending)) in split_lines(content).enumerate() {
        match edit_for_line(line, &marker, line_idx == 0) {
            LineEdit::Keep => kept.push((line.to_string(), ending)),
            LineEdit::Truncate(rest) => {
                kept.push((rest.to_string(), ending));
                changed = true;
            }
            LineEdit::Drop => {
                if kept
                    .last()
                    .map(|(prev, _)| prev.trim().is_empty())
                    .unwrap_or(false)
                {
                    kept.pop();
                }
                changed = true;
            }
        }
    }

    if !changed {
        return None;
    }

    let mut result = String::with_capacity(content.len());
    for (line, ending) in kept {
        result.push_str(&line);
        result.push_str(ending);
    }
    Some(result)
}
