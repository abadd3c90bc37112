//! Code span detection, so links quoted as code are not counted.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

// Inline code: double backticks may wrap single ones.
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"``(?:[^`]|`[^`])*``|`[^`\n]+`").unwrap()
});

/// An open fence: its character and run length.
struct Fence {
    ch: char,
    len: usize,
    start: usize,
}

fn fence_of(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// Byte ranges of fenced code blocks and inline code spans, sorted by start.
///
/// An unclosed fence runs to the end of the content.
pub fn find_code_spans(content: &str) -> Vec<Range<usize>> {
    let mut fenced: Vec<Range<usize>> = Vec::new();
    let mut open: Option<Fence> = None;
    let mut offset = 0;

    for raw in content.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\r', '\n']);
        match open.take() {
            None => {
                if let Some((ch, len)) = fence_of(line) {
                    open = Some(Fence { ch, len, start: offset });
                }
            }
            Some(fence) => {
                let trimmed = line.trim();
                let closes = fence_of(trimmed)
                    .map(|(ch, len)| ch == fence.ch && len >= fence.len)
                    .unwrap_or(false)
                    && trimmed.chars().all(|c| c == fence.ch);
                if closes {
                    fenced.push(fence.start..offset + line.len());
                } else {
                    open = Some(fence);
                }
            }
        }
        offset += raw.len();
    }

    if let Some(fence) = open {
        fenced.push(fence.start..content.len());
    }

    let mut spans = fenced.clone();
    for m in INLINE_CODE.find_iter(content) {
        let inside_fence = fenced
            .iter()
            .any(|r| m.start() < r.end && m.end() > r.start);
        if !inside_fence {
            spans.push(m.range());
        }
    }

    spans.sort_by_key(|r| r.start);
    spans
}

/// Check if a byte offset falls inside any span.
pub fn is_in_code(offset: usize, spans: &[Range<usize>]) -> bool {
    spans.iter().any(|r| r.contains(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block() {
        let content = "Text\n\n```rust\nlet x = [[not a link]];\n```\n\nMore";
        let spans = find_code_spans(content);
        assert_eq!(spans.len(), 1);
        let inner = content.find("[[not").unwrap();
        assert!(is_in_code(inner, &spans));
        assert!(!is_in_code(content.find("More").unwrap(), &spans));
    }

    #[test]
    fn test_tilde_fence_needs_matching_char() {
        let content = "~~~\ncode\n```\nstill code\n~~~\nafter";
        let spans = find_code_spans(content);
        assert_eq!(spans.len(), 1);
        assert!(is_in_code(content.find("still").unwrap(), &spans));
        assert!(!is_in_code(content.find("after").unwrap(), &spans));
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let content = "```\nnever closed [[x]]";
        let spans = find_code_spans(content);
        assert!(is_in_code(content.find("[[x]]").unwrap(), &spans));
    }

    #[test]
    fn test_inline_code() {
        let content = "before `code` after";
        let spans = find_code_spans(content);
        assert!(!is_in_code(0, &spans));
        assert!(is_in_code(8, &spans));
        assert!(!is_in_code(14, &spans));
    }

    #[test]
    fn test_double_backtick_inline() {
        let content = "Some ``inline `code` with backticks`` here";
        assert_eq!(find_code_spans(content).len(), 1);
    }
}
