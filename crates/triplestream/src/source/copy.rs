//! Local copies of non-repeatable sources.

use super::{DocumentSource, MemoryDocumentSource};
use crate::{Result, TriplestreamError};
use std::io::Read;

/// Materializes a document source into a cheap-to-reopen local form.
pub trait LocalCopyFactory: Send + Sync {
    /// Read the source's bytes exactly once and return a local copy that
    /// serves repeat opens.
    fn local_copy(&self, source: &dyn DocumentSource) -> Result<MemoryDocumentSource>;
}

/// The default copy factory: one full in-memory materialization.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemCopyFactory;

impl LocalCopyFactory for MemCopyFactory {
    fn local_copy(&self, source: &dyn DocumentSource) -> Result<MemoryDocumentSource> {
        let mut bytes = match source.content_length() {
            Some(len) => Vec::with_capacity(len as usize),
            None => Vec::new(),
        };
        source
            .open_stream()
            .and_then(|mut stream| stream.read_to_end(&mut bytes))
            .map_err(|e| TriplestreamError::source_with("cannot read document source", e))?;

        let mut copy = MemoryDocumentSource::new(bytes, source.document_iri());
        if let Some(content_type) = source.content_type() {
            copy = copy.with_content_type(content_type);
        }
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A non-local source counting how often its stream is opened.
    struct CountingSource {
        bytes: Vec<u8>,
        opens: AtomicUsize,
    }

    impl DocumentSource for CountingSource {
        fn open_stream(&self) -> std::io::Result<Box<dyn Read + '_>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Cursor::new(&self.bytes[..])))
        }

        fn content_length(&self) -> Option<u64> {
            Some(self.bytes.len() as u64)
        }

        fn document_iri(&self) -> &str {
            "http://example.org/remote"
        }

        fn content_type(&self) -> Option<&str> {
            Some("text/csv")
        }

        fn is_local(&self) -> bool {
            false
        }
    }

    #[test]
    fn copies_bytes_and_metadata_with_a_single_open() {
        let source = CountingSource {
            bytes: b"a,b\n1,2\n".to_vec(),
            opens: AtomicUsize::new(0),
        };

        let copy = MemCopyFactory.local_copy(&source).unwrap();
        assert_eq!(copy.bytes(), b"a,b\n1,2\n");
        assert_eq!(copy.document_iri(), "http://example.org/remote");
        assert_eq!(copy.content_type(), Some("text/csv"));
        assert!(copy.is_local());
        assert_eq!(source.opens.load(Ordering::SeqCst), 1);

        // Repeat opens hit the copy, not the original.
        let mut buf = Vec::new();
        copy.open_stream().unwrap().read_to_end(&mut buf).unwrap();
        assert_eq!(source.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn open_failure_is_a_source_error() {
        struct BrokenSource;
        impl DocumentSource for BrokenSource {
            fn open_stream(&self) -> std::io::Result<Box<dyn Read + '_>> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "gone"))
            }
            fn content_length(&self) -> Option<u64> {
                None
            }
            fn document_iri(&self) -> &str {
                "http://example.org/broken"
            }
            fn content_type(&self) -> Option<&str> {
                None
            }
            fn is_local(&self) -> bool {
                false
            }
        }

        let err = MemCopyFactory.local_copy(&BrokenSource).unwrap_err();
        assert!(matches!(err, TriplestreamError::Source { .. }));
    }
}
