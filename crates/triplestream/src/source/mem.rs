//! In-memory document source.

use super::DocumentSource;
use std::io::{Cursor, Read};

/// A document held entirely in memory. Always local.
#[derive(Debug, Clone)]
pub struct MemoryDocumentSource {
    bytes: Vec<u8>,
    document_iri: String,
    content_type: Option<String>,
}

impl MemoryDocumentSource {
    pub fn new(bytes: impl Into<Vec<u8>>, document_iri: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            document_iri: document_iri.into(),
            content_type: None,
        }
    }

    /// Attach a declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl DocumentSource for MemoryDocumentSource {
    fn open_stream(&self) -> std::io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(&self.bytes[..])))
    }

    fn content_length(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_bytes_and_metadata() {
        let source = MemoryDocumentSource::new(b"a,b\n1,2\n".to_vec(), "http://example.org/doc")
            .with_content_type("text/csv");
        assert!(source.is_local());
        assert_eq!(source.content_length(), Some(8));
        assert_eq!(source.document_iri(), "http://example.org/doc");
        assert_eq!(source.content_type(), Some("text/csv"));
    }

    #[test]
    fn streams_can_be_reopened() {
        let source = MemoryDocumentSource::new(b"abc".to_vec(), "http://example.org/doc");
        for _ in 0..3 {
            let mut buf = Vec::new();
            source.open_stream().unwrap().read_to_end(&mut buf).unwrap();
            assert_eq!(buf, b"abc");
        }
    }
}
