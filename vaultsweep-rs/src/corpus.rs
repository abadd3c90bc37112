//! The document store a sweep runs against.

use crate::error::{Result, VaultError};
use crate::parser::parse_all_links;
use crate::types::{DocumentHandle, DocumentKind, Link};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Storage and link metadata for a set of text documents.
///
/// Calls are blocking and the sweep issues them one at a time.
pub trait Corpus {
    /// All text documents (markdown and drawings), in a stable order.
    fn list_documents(&self) -> Result<Vec<DocumentHandle>>;

    /// Current full text of a document.
    fn read_text(&self, doc: &DocumentHandle) -> Result<String>;

    /// Replace the full text of a document.
    fn write_text(&self, doc: &DocumentHandle, content: &str) -> Result<()>;

    /// Outgoing links of a document.
    fn links(&self, doc: &DocumentHandle) -> Result<Vec<Link>>;

    /// Look up a document by its corpus-relative path.
    fn resolve_by_path(&self, path: &Path) -> Option<DocumentHandle>;
}

/// A corpus held in memory, in insertion order.
///
/// Links are parsed from the current text on every call.
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    drawing_suffix: String,
    docs: RefCell<Vec<(PathBuf, String)>>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::with_drawing_suffix(".excalidraw")
    }

    pub fn with_drawing_suffix(suffix: impl Into<String>) -> Self {
        Self {
            drawing_suffix: suffix.into(),
            docs: RefCell::new(Vec::new()),
        }
    }

    /// Add or replace a document.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        let mut docs = self.docs.borrow_mut();
        match docs.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = content,
            None => docs.push((path, content)),
        }
    }

    /// Builder form of [`MemoryCorpus::insert`].
    pub fn with(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Current text of a document, if present.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.docs
            .borrow()
            .iter()
            .find(|(p, _)| p == path.as_ref())
            .map(|(_, content)| content.clone())
    }

    fn handle(&self, path: &Path) -> DocumentHandle {
        DocumentHandle::new(path, DocumentKind::classify(path, &self.drawing_suffix))
    }
}

impl Corpus for MemoryCorpus {
    fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        Ok(self
            .docs
            .borrow()
            .iter()
            .map(|(path, _)| self.handle(path))
            .filter(|doc| doc.kind.is_text())
            .collect())
    }

    fn read_text(&self, doc: &DocumentHandle) -> Result<String> {
        self.get(&doc.path)
            .ok_or_else(|| VaultError::NoteNotFound(doc.path.clone()))
    }

    fn write_text(&self, doc: &DocumentHandle, content: &str) -> Result<()> {
        let mut docs = self.docs.borrow_mut();
        match docs.iter_mut().find(|(p, _)| *p == doc.path) {
            Some((_, existing)) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(VaultError::NoteNotFound(doc.path.clone())),
        }
    }

    fn links(&self, doc: &DocumentHandle) -> Result<Vec<Link>> {
        Ok(parse_all_links(&self.read_text(doc)?))
    }

    fn resolve_by_path(&self, path: &Path) -> Option<DocumentHandle> {
        self.docs
            .borrow()
            .iter()
            .any(|(p, _)| p == path)
            .then(|| self.handle(path))
    }
}
