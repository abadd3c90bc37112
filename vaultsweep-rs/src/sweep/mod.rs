//! Dead block anchor removal.
//!
//! A sweep collects every `^anchor` defined across the corpus, checks whether
//! any link anywhere ends in `#^anchor`, and strips the anchors nobody links to
//! from every document that defines them. Liveness is decided per identifier
//! for the whole corpus, not per document.
//!
//! The sweep is not transactional: a failed read or write stops it, and
//! documents rewritten before the failure keep their edits.

pub mod index;
pub mod report;

pub use index::{DefinitionIndex, MentionIndex};
pub use report::{NOTHING_REMOVED, SweepReport};

use crate::config::BlockRefConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::parser::{extract_block_anchors, remove_block_anchor};
use crate::types::{DocumentHandle, DocumentKind, RemovalRecord};
use tracing::{debug, info, warn};

/// One configured block reference sweep over a corpus.
pub struct BlockRefSweep<'a, C: Corpus + ?Sized> {
    corpus: &'a C,
    count_embeds: bool,
    dry_run: bool,
}

impl<'a, C: Corpus + ?Sized> BlockRefSweep<'a, C> {
    pub fn new(corpus: &'a C) -> Self {
        Self {
            corpus,
            count_embeds: true,
            dry_run: false,
        }
    }

    /// Apply the `[block_refs]` settings.
    pub fn with_config(mut self, config: &BlockRefConfig) -> Self {
        self.count_embeds = config.count_embeds;
        self
    }

    /// Whether `![[note#^id]]` embeds keep an anchor alive.
    pub fn count_embeds(mut self, count: bool) -> Self {
        self.count_embeds = count;
        self
    }

    /// Report what would be removed without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the sweep to completion.
    pub fn run(&self) -> Result<SweepReport> {
        let docs = self.corpus.list_documents()?;
        let definitions = self.collect_definitions(&docs)?;
        let mentions = MentionIndex::build(self.corpus, &docs, self.count_embeds)?;

        debug!(
            documents = docs.len(),
            anchors = definitions.len(),
            "collected block anchors"
        );

        let mut report = SweepReport {
            removed: Vec::new(),
            dry_run: self.dry_run,
        };

        for (anchor, paths) in definitions.iter() {
            if mentions.is_live(anchor) {
                continue;
            }

            debug!(anchor, definitions = paths.len(), "anchor has no mentions");
            for path in paths {
                let Some(doc) = self.corpus.resolve_by_path(path) else {
                    warn!(path = %path.display(), "document vanished during sweep");
                    continue;
                };

                let content = self.corpus.read_text(&doc)?;
                let Some(cleaned) = remove_block_anchor(&content, anchor) else {
                    continue;
                };

                if !self.dry_run {
                    self.corpus.write_text(&doc, &cleaned)?;
                }

                let record = RemovalRecord {
                    path: doc.path.clone(),
                    anchor: anchor.to_string(),
                };
                info!(removed = %record, dry_run = self.dry_run, "removed unused block anchor");
                report.removed.push(record);
            }
        }

        info!(removed = report.removed.len(), "block reference sweep finished");
        Ok(report)
    }

    fn collect_definitions(&self, docs: &[DocumentHandle]) -> Result<DefinitionIndex> {
        let mut definitions = DefinitionIndex::new();

        for doc in docs {
            if doc.kind != DocumentKind::Markdown {
                debug!(path = %doc.path.display(), kind = ?doc.kind, "skipping");
                continue;
            }

            let content = self.corpus.read_text(doc)?;
            for anchor in extract_block_anchors(&content) {
                definitions.add(&anchor, &doc.path);
            }
        }

        Ok(definitions)
    }
}

/// Run a sweep with default settings.
pub fn run_sweep<C: Corpus + ?Sized>(corpus: &C) -> Result<SweepReport> {
    BlockRefSweep::new(corpus).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MemoryCorpus;
    use crate::error::VaultError;
    use crate::types::Link;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_corpus_without_anchors() {
        let corpus = MemoryCorpus::new()
            .with("a.md", "# Title\n\nText [[b]]\n")
            .with("b.md", "More text\n");
        let report = run_sweep(&corpus).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.lines(), vec![NOTHING_REMOVED]);
        assert_eq!(corpus.get("a.md").unwrap(), "# Title\n\nText [[b]]\n");
    }

    #[test]
    fn test_self_reference_keeps_anchor() {
        let content = "Some fact ^note1\n\nSee [[X#^note1]]\n";
        let corpus = MemoryCorpus::new().with("X.md", content);
        let report = run_sweep(&corpus).unwrap();
        assert!(report.is_empty());
        assert_eq!(corpus.get("X.md").unwrap(), content);
    }

    #[test]
    fn test_same_note_link_keeps_anchor() {
        let content = "Some fact ^note1\n\nSee [[#^note1]]\n";
        let corpus = MemoryCorpus::new().with("X.md", content);
        assert!(run_sweep(&corpus).unwrap().is_empty());
        assert_eq!(corpus.get("X.md").unwrap(), content);
    }

    #[test]
    fn test_same_note_embed_keeps_anchor() {
        let content = "Quote ^q\n\n![[#^q]]\n";
        let corpus = MemoryCorpus::new().with("X.md", content);
        assert!(run_sweep(&corpus).unwrap().is_empty());
        assert_eq!(corpus.get("X.md").unwrap(), content);
    }

    #[test]
    fn test_link_past_anchor_is_not_a_mention() {
        let corpus = MemoryCorpus::new()
            .with("N.md", "Fact ^b\n")
            .with("M.md", "[[N#^b#Sub]]\n");
        let report = run_sweep(&corpus).unwrap();
        assert_eq!(report.lines(), vec!["N.md#^b"]);
    }

    #[test]
    fn test_cross_document_dead_anchor() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "Fact one. ^ref1\n")
            .with("B.md", "Links to [[A]] but not the block\n");
        let report = run_sweep(&corpus).unwrap();
        assert_eq!(report.lines(), vec!["A.md#^ref1"]);
        assert_eq!(corpus.get("A.md").unwrap(), "Fact one.\n");
    }

    #[test]
    fn test_live_anchor_mentioned_from_elsewhere() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "Kept ^live\nGone ^dead\n")
            .with("B.md", "[[A#^live]]\n");
        let report = run_sweep(&corpus).unwrap();
        assert_eq!(report.lines(), vec!["A.md#^dead"]);
        assert_eq!(corpus.get("A.md").unwrap(), "Kept ^live\nGone\n");
    }

    #[test]
    fn test_mention_of_same_id_in_other_note_keeps_all_definitions() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "One ^shared\n")
            .with("B.md", "Two ^shared\n")
            .with("C.md", "[[B#^shared]]\n");
        let report = run_sweep(&corpus).unwrap();
        assert!(report.is_empty());
        assert_eq!(corpus.get("A.md").unwrap(), "One ^shared\n");
    }

    #[test]
    fn test_multi_definition_dead_anchor() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "Alpha ^dup\n")
            .with("B.md", "Beta ^dup\n");
        let report = run_sweep(&corpus).unwrap();
        assert_eq!(report.lines(), vec!["A.md#^dup", "B.md#^dup"]);
        assert_eq!(corpus.get("A.md").unwrap(), "Alpha\n");
        assert_eq!(corpus.get("B.md").unwrap(), "Beta\n");
    }

    #[test]
    fn test_repeated_definition_in_one_document_reported_once() {
        let corpus = MemoryCorpus::new().with("A.md", "One ^r\nTwo ^r\n");
        let report = run_sweep(&corpus).unwrap();
        assert_eq!(report.lines(), vec!["A.md#^r"]);
        assert_eq!(corpus.get("A.md").unwrap(), "One\nTwo\n");
    }

    #[test]
    fn test_drawing_files_are_skipped() {
        let drawing = "Excalidraw data\nlabel ^skip1\n";
        let corpus = MemoryCorpus::new().with("Sketch.excalidraw.md", drawing);
        let report = run_sweep(&corpus).unwrap();
        assert!(report.is_empty());
        assert_eq!(corpus.get("Sketch.excalidraw.md").unwrap(), drawing);
    }

    #[test]
    fn test_drawing_links_count_as_mentions() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "Fact ^f\n")
            .with("Board.excalidraw.md", "[[A#^f]]\n");
        assert!(run_sweep(&corpus).unwrap().is_empty());
    }

    #[test]
    fn test_report_order_follows_discovery() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "x ^second-seen-later\n")
            .with("B.md", "y ^b1\nz ^second-seen-later\n");
        let report = run_sweep(&corpus).unwrap();
        assert_eq!(
            report.lines(),
            vec!["A.md#^second-seen-later", "B.md#^second-seen-later", "B.md#^b1"]
        );
        assert_eq!(corpus.get("B.md").unwrap(), "y\nz\n");
    }

    #[test]
    fn test_second_sweep_is_empty() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "Fact ^a\n\n^b\nKept ^c\n")
            .with("B.md", "[[A#^c]]\n");
        let first = run_sweep(&corpus).unwrap();
        assert_eq!(first.removed.len(), 2);

        let after_first = corpus.get("A.md").unwrap();
        let second = run_sweep(&corpus).unwrap();
        assert!(second.is_empty());
        assert_eq!(corpus.get("A.md").unwrap(), after_first);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let corpus = MemoryCorpus::new().with("A.md", "Fact ^gone\n");
        let report = BlockRefSweep::new(&corpus).dry_run(true).run().unwrap();
        assert!(report.dry_run);
        assert_eq!(report.lines(), vec!["A.md#^gone"]);
        assert_eq!(corpus.get("A.md").unwrap(), "Fact ^gone\n");
    }

    #[test]
    fn test_embed_counting_switch() {
        let corpus = MemoryCorpus::new()
            .with("A.md", "Quote ^q\n")
            .with("B.md", "![[A#^q]]\n");
        let report = BlockRefSweep::new(&corpus).count_embeds(false).run().unwrap();
        assert_eq!(report.lines(), vec!["A.md#^q"]);
    }

    /// Fails every write after the first `allowed` ones.
    struct FailingWrites {
        inner: MemoryCorpus,
        allowed: Cell<usize>,
    }

    impl Corpus for FailingWrites {
        fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
            self.inner.list_documents()
        }

        fn read_text(&self, doc: &DocumentHandle) -> Result<String> {
            self.inner.read_text(doc)
        }

        fn write_text(&self, doc: &DocumentHandle, content: &str) -> Result<()> {
            if self.allowed.get() == 0 {
                return Err(VaultError::Other("disk full".to_string()));
            }
            self.allowed.set(self.allowed.get() - 1);
            self.inner.write_text(doc, content)
        }

        fn links(&self, doc: &DocumentHandle) -> Result<Vec<Link>> {
            self.inner.links(doc)
        }

        fn resolve_by_path(&self, path: &Path) -> Option<DocumentHandle> {
            self.inner.resolve_by_path(path)
        }
    }

    /// Fails reads of `path` once it has been read `allowed` times.
    struct FailingReads {
        inner: MemoryCorpus,
        path: PathBuf,
        allowed: Cell<usize>,
    }

    impl Corpus for FailingReads {
        fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
            self.inner.list_documents()
        }

        fn read_text(&self, doc: &DocumentHandle) -> Result<String> {
            if doc.path == self.path {
                if self.allowed.get() == 0 {
                    return Err(VaultError::Other("read failed".to_string()));
                }
                self.allowed.set(self.allowed.get() - 1);
            }
            self.inner.read_text(doc)
        }

        fn write_text(&self, doc: &DocumentHandle, content: &str) -> Result<()> {
            self.inner.write_text(doc, content)
        }

        fn links(&self, doc: &DocumentHandle) -> Result<Vec<Link>> {
            self.inner.links(doc)
        }

        fn resolve_by_path(&self, path: &Path) -> Option<DocumentHandle> {
            self.inner.resolve_by_path(path)
        }
    }

    #[test]
    fn test_read_failure_during_rewrite_aborts_and_keeps_earlier_edits() {
        let corpus = FailingReads {
            inner: MemoryCorpus::new()
                .with("A.md", "One ^a\n")
                .with("B.md", "Two ^b\n")
                .with("C.md", "Three ^c\n"),
            path: PathBuf::from("B.md"),
            allowed: Cell::new(1),
        };

        let err = run_sweep(&corpus).unwrap_err();
        assert!(matches!(err, VaultError::Other(ref msg) if msg == "read failed"));
        assert_eq!(corpus.inner.get("A.md").unwrap(), "One\n");
        assert_eq!(corpus.inner.get("B.md").unwrap(), "Two ^b\n");
        assert_eq!(corpus.inner.get("C.md").unwrap(), "Three ^c\n");
    }

    #[test]
    fn test_write_failure_aborts_and_keeps_earlier_edits() {
        let corpus = FailingWrites {
            inner: MemoryCorpus::new()
                .with("A.md", "One ^a\n")
                .with("B.md", "Two ^b\n")
                .with("C.md", "Three ^c\n"),
            allowed: Cell::new(1),
        };

        let err = run_sweep(&corpus).unwrap_err();
        assert!(matches!(err, VaultError::Other(ref msg) if msg == "disk full"));
        assert_eq!(corpus.inner.get("A.md").unwrap(), "One\n");
        assert_eq!(corpus.inner.get("B.md").unwrap(), "Two ^b\n");
        assert_eq!(corpus.inner.get("C.md").unwrap(), "Three ^c\n");
    }
}
