//! Per-sweep indices: where anchors are defined and which notes mention them.

use crate::corpus::Corpus;
use crate::error::Result;
use crate::types::{DocumentHandle, DocumentKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Anchor id -> defining documents, both in first-seen order.
#[derive(Debug, Default)]
pub struct DefinitionIndex {
    entries: Vec<(String, Vec<PathBuf>)>,
    positions: HashMap<String, usize>,
}

impl DefinitionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `path` defines `anchor`. Repeats within a document collapse.
    pub fn add(&mut self, anchor: &str, path: &Path) {
        let idx = match self.positions.get(anchor) {
            Some(&idx) => idx,
            None => {
                self.entries.push((anchor.to_string(), Vec::new()));
                self.positions.insert(anchor.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        let paths = &mut self.entries[idx].1;
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_path_buf());
        }
    }

    /// Anchors with their defining documents, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(anchor, paths)| (anchor.as_str(), paths.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outgoing link targets of every document, captured once per sweep.
#[derive(Debug, Default)]
pub struct MentionIndex {
    targets: Vec<(PathBuf, Vec<String>)>,
}

impl MentionIndex {
    /// Collect link targets for `docs`. Drawings take part as link sources.
    pub fn build<C: Corpus + ?Sized>(
        corpus: &C,
        docs: &[DocumentHandle],
        count_embeds: bool,
    ) -> Result<Self> {
        let mut targets = Vec::with_capacity(docs.len());

        for doc in docs.iter().filter(|d| d.kind != DocumentKind::Attachment) {
            let links: Vec<String> = corpus
                .links(doc)?
                .into_iter()
                .filter(|link| count_embeds || !link.embed)
                .map(|link| link.full_target())
                .collect();
            targets.push((doc.path.clone(), links));
        }

        Ok(Self { targets })
    }

    /// Documents holding at least one link whose target ends with `#^<anchor>`.
    pub fn mentions(&self, anchor: &str) -> Vec<PathBuf> {
        let suffix = format!("#^{}", anchor);
        self.targets
            .iter()
            .filter(|(_, links)| links.iter().any(|t| t.ends_with(&suffix)))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// An anchor is live when anything in the corpus mentions it.
    pub fn is_live(&self, anchor: &str) -> bool {
        !self.mentions(anchor).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MemoryCorpus;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_definition_order_and_dedup() {
        let mut index = DefinitionIndex::new();
        let a = PathBuf::from("a.md");
        let b = PathBuf::from("b.md");
        index.add("x", &a);
        index.add("y", &a);
        index.add("x", &b);
        index.add("x", &b);

        let entries: Vec<_> = index.iter().collect();
        assert_eq!(entries, vec![("x", &[a.clone(), b][..]), ("y", &[a][..])]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_mentions_by_suffix() {
        let corpus = MemoryCorpus::new()
            .with("a.md", "Fact ^f1\nSee [[a#^f1]]")
            .with("b.md", "[[c#^f1]] and [[a#^f10]]")
            .with("c.md", "nothing");
        let docs = corpus.list_documents().unwrap();
        let index = MentionIndex::build(&corpus, &docs, true).unwrap();

        assert_eq!(
            index.mentions("f1"),
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")]
        );
        assert!(index.is_live("f10"));
        assert!(!index.is_live("f"));
        assert!(!index.is_live("F1"));
    }

    #[test]
    fn test_same_note_links_are_mentions() {
        let corpus = MemoryCorpus::new().with("x.md", "Fact ^n1\nQuote ^q\n[[#^n1]] ![[#^q]]");
        let docs = corpus.list_documents().unwrap();
        let index = MentionIndex::build(&corpus, &docs, true).unwrap();

        assert_eq!(index.mentions("n1"), vec![PathBuf::from("x.md")]);
        assert!(index.is_live("q"));
    }

    #[test]
    fn test_embeds_optional() {
        let corpus = MemoryCorpus::new().with("a.md", "![[b#^q]]");
        let docs = corpus.list_documents().unwrap();

        assert!(MentionIndex::build(&corpus, &docs, true).unwrap().is_live("q"));
        assert!(!MentionIndex::build(&corpus, &docs, false).unwrap().is_live("q"));
    }
}
