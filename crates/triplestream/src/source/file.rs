//! File-backed document source.

use super::DocumentSource;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A document backed by a file on disk. Local: streams reopen cheaply.
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    path: PathBuf,
    document_iri: String,
    content_type: Option<String>,
}

impl FileDocumentSource {
    pub fn new(path: impl Into<PathBuf>, document_iri: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            document_iri: document_iri.into(),
            content_type: None,
        }
    }

    /// Build a source whose IRI is the `file://` form of the path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document_iri = format!("file://{}", path.display());
        Self {
            path,
            document_iri,
            content_type: None,
        }
    }

    /// Attach a declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileDocumentSource {
    fn open_stream(&self) -> std::io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn content_length(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    fn document_iri(&self) -> &str {
        &self.document_iri
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn is_local(&self) -> bool {
        true
    }
}
