//! YAML frontmatter parsing.

use crate::error::{Result, VaultError};
use serde_yaml::Value;
use std::path::Path;

/// Split content into raw frontmatter YAML (without delimiters) and body.
///
/// Frontmatter must open on the very first line with `---` and close with a
/// line holding only `---`. Without a closing delimiter the whole content is body.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };
    let yaml_start = content.len() - rest.len();

    let mut offset = yaml_start;
    for raw in rest.split_inclusive('\n') {
        if raw.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = content[yaml_start..offset].trim_end_matches(['\r', '\n']);
            let body = &content[offset + raw.len()..];
            return (Some(yaml), body);
        }
        offset += raw.len();
    }

    (None, content)
}

/// Parse frontmatter into a YAML value, naming `path` in errors.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<Option<Value>> {
    match split_frontmatter(content).0 {
        Some(yaml) => {
            let value: Value =
                serde_yaml::from_str(yaml).map_err(|e| VaultError::InvalidFrontmatter {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_no_frontmatter() {
        let (yaml, body) = split_frontmatter("Just some content");
        assert!(yaml.is_none());
        assert_eq!(body, "Just some content");
    }

    #[test]
    fn test_split_with_frontmatter() {
        let (yaml, body) = split_frontmatter("---\ntitle: Test\ntags: [a, b]\n---\n\nContent here");
        assert_eq!(yaml, Some("title: Test\ntags: [a, b]"));
        assert_eq!(body, "\nContent here");
    }

    #[test]
    fn test_split_frontmatter_at_eof() {
        let (yaml, body) = split_frontmatter("---\ntitle: Test\n---");
        assert_eq!(yaml, Some("title: Test"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_no_closing_delimiter() {
        let (yaml, _) = split_frontmatter("---\ntitle: Test\n\nContent without closing");
        assert!(yaml.is_none());
    }

    #[test]
    fn test_triple_dash_in_body() {
        let (yaml, body) = split_frontmatter("---\ntitle: Test\n---\n\n---\n\nMore");
        assert_eq!(yaml, Some("title: Test"));
        assert!(body.contains("---"));
    }

    #[test]
    fn test_parse_frontmatter() {
        let content = "---\ntitle: My Note\ntags:\n  - rust\n  - cli\n---\n\nContent";
        let value = parse_frontmatter(content, Path::new("n.md")).unwrap().unwrap();
        assert_eq!(value["title"].as_str(), Some("My Note"));
        assert_eq!(value["tags"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_frontmatter_names_path() {
        let content = "---\ninvalid: yaml: syntax:\n---\nContent";
        let err = parse_frontmatter(content, Path::new("bad.md")).unwrap_err();
        assert!(matches!(err, VaultError::InvalidFrontmatter { ref path, .. } if path == Path::new("bad.md")));
    }
}
