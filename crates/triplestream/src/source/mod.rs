//! Document sources.
//!
//! A [`DocumentSource`] is an immutable view over one document's bytes. The
//! engine never mutates a source; when a source is not local (or several
//! extractors need independent re-reads) the orchestrator asks a
//! [`LocalCopyFactory`] to materialize the bytes exactly once.

mod copy;
mod file;
mod mem;

pub use copy::{LocalCopyFactory, MemCopyFactory};
pub use file::FileDocumentSource;
pub use mem::MemoryDocumentSource;

use std::io::Read;

/// An immutable view over a document's bytes.
///
/// `is_local` reports whether `open_stream` can be called repeatedly at
/// negligible cost (in-memory buffers, local files). Non-local sources
/// (network fetches, one-shot pipes) are materialized into a local copy
/// before extraction so that they are opened at most once.
pub trait DocumentSource: Send + Sync {
    /// Open a fresh byte stream over the document.
    fn open_stream(&self) -> std::io::Result<Box<dyn Read + '_>>;

    /// Size in bytes, when known.
    fn content_length(&self) -> Option<u64>;

    /// Canonical IRI of the document. May differ from the originally
    /// requested IRI after redirects.
    fn document_iri(&self) -> &str;

    /// Content type declared by the transport or container metadata.
    fn content_type(&self) -> Option<&str>;

    /// Whether the underlying bytes can be reopened cheaply.
    fn is_local(&self) -> bool;
}
