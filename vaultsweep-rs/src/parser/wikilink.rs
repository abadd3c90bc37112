//! Wikilink, embed, and markdown link parsing.

use crate::parser::code_block::{find_code_spans, is_in_code};
use crate::types::Link;
use regex::Regex;
use std::sync::LazyLock;

// [[target]], [[target|alias]], [[target#heading]], [[target#^block]], [[#^block]], ![[embed]]
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    // (!?)              - Optional ! for embeds (group 1)
    // ([^\]\|#]*)       - Target path, empty for same-note links (group 2)
    // (?:#([^\]\|]*))?  - Subpath after the first # (group 3)
    // (?:\|([^\]]+))?   - Alias (group 4)
    Regex::new(r"(!?)\[\[([^\]\|#]*)(?:#([^\]\|]*))?(?:\|([^\]]+))?\]\]").unwrap()
});

// [text](target) and ![text](target); the target may be wrapped in <...>
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[([^\]\n]*)\]\(\s*(?:<([^>\n]+)>|([^)\s]+))(?:\s+[^)]*)?\)").unwrap()
});

/// Parse all links (wikilinks, embeds, markdown links) from content.
///
/// Links inside code spans are skipped. Results are ordered by position.
pub fn parse_all_links(content: &str) -> Vec<Link> {
    let code_spans = find_code_spans(content);
    let mut found: Vec<(usize, Link)> = Vec::new();

    for cap in WIKILINK.captures_iter(content) {
        let start = cap.get(0).map(|m| m.start()).unwrap_or(0);
        if is_in_code(start, &code_spans) {
            continue;
        }

        let target = cap.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        let subpath = cap.get(3).map(|m| m.as_str());
        if target.is_empty() && subpath.is_none() {
            continue;
        }

        let (heading, block_id) = split_subpath(subpath);
        found.push((
            start,
            Link {
                target: target.to_string(),
                subpath: subpath.map(str::to_string),
                alias: cap.get(4).map(|m| m.as_str().to_string()),
                heading,
                block_id,
                embed: cap.get(1).map(|m| !m.as_str().is_empty()).unwrap_or(false),
                line: line_of(content, start),
            },
        ));
    }

    for cap in MARKDOWN_LINK.captures_iter(content) {
        let start = cap.get(0).map(|m| m.start()).unwrap_or(0);
        if is_in_code(start, &code_spans) {
            continue;
        }

        let raw = cap
            .get(3)
            .or_else(|| cap.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        if raw.is_empty() || is_external(raw) {
            continue;
        }

        let decoded = urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        let (target, subpath) = match decoded.split_once('#') {
            Some((target, sub)) => (target.to_string(), Some(sub.to_string())),
            None => (decoded.clone(), None),
        };
        let (heading, block_id) = split_subpath(subpath.as_deref());

        let text = cap.get(2).map(|m| m.as_str()).unwrap_or("");
        found.push((
            start,
            Link {
                target,
                subpath,
                alias: (!text.is_empty()).then(|| text.to_string()),
                heading,
                block_id,
                embed: cap.get(1).map(|m| !m.as_str().is_empty()).unwrap_or(false),
                line: line_of(content, start),
            },
        ));
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, link)| link).collect()
}

/// Parse all non-embed links from content.
pub fn parse_links(content: &str) -> Vec<Link> {
    parse_all_links(content)
        .into_iter()
        .filter(|link| !link.embed)
        .collect()
}

/// Parse all embeds from content.
pub fn parse_embeds(content: &str) -> Vec<Link> {
    parse_all_links(content)
        .into_iter()
        .filter(|link| link.embed)
        .collect()
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

fn is_external(target: &str) -> bool {
    target.contains("://") || target.starts_with("mailto:")
}

/// Heading and block id of a raw subpath (`Heading` or `^block`).
fn split_subpath(subpath: Option<&str>) -> (Option<String>, Option<String>) {
    match subpath {
        None => (None, None),
        Some(sub) => match sub.strip_prefix('^') {
            Some(block) => (None, Some(block.to_string())),
            None => (Some(sub.to_string()), None),
        },
    }
}
