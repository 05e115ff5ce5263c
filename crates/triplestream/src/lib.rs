//! Triplestream - streaming statement extraction from heterogeneous documents.
//!
//! Triplestream extracts subject/predicate/object(/graph) statements from
//! documents of many shapes (HTML, CSV, RDF serializations, ...) and streams
//! them to one or more output sinks under strict ordering and cleanup
//! guarantees.
//!
//! # Architecture
//!
//! - **MIME matching** (`mime`): media-type value objects with
//!   content-negotiation weights, pre-sniff purifiers, a detection chain,
//!   and accept-header construction
//! - **Sources** (`source`): immutable document views and one-shot local
//!   copies for non-repeatable inputs
//! - **Extractors** (`extractor`): descriptors, the catalog, per-run
//!   contexts, issue accumulation, and the per-document orchestrator
//! - **Handler pipeline** (`handler`): the ordered, context-scoped output
//!   protocol with fan-out, buffering/blocking, counting, logging, and a
//!   reference N-Quads sink
//!
//! The concrete format extractors themselves (microformat rules, RDF
//! parsers, CSV column semantics) plug in from outside through the
//! [`Extractor`] trait; this crate is the engine that matches, drives, and
//! streams them.
//!
//! # Quick start
//!
//! ```rust
//! use oxrdf::{Literal, NamedNode, Subject, Term};
//! use triplestream::{
//!     DocumentInput, ExtractionContext, ExtractionError, ExtractionParameters, ExtractionSink,
//!     Extractor, ExtractorCatalog, ExtractorDescriptor, InputShape, MemoryDocumentSource,
//!     MimeType, ReportingHandler, SingleDocumentExtraction, TripleHandler,
//! };
//!
//! /// Emits one statement recording the document's byte length.
//! struct ByteLength;
//!
//! impl Extractor for ByteLength {
//!     fn run(
//!         &self,
//!         _params: &ExtractionParameters,
//!         context: &ExtractionContext,
//!         input: DocumentInput<'_>,
//!         out: &mut ExtractionSink<'_>,
//!     ) -> Result<(), ExtractionError> {
//!         let DocumentInput::Content { bytes, .. } = input else {
//!             return Err(ExtractionError::failed("expected content input"));
//!         };
//!         let s = Subject::from(context.document_iri().clone());
//!         let p = NamedNode::new_unchecked("http://example.org/byteLength");
//!         let o = Term::from(Literal::new_simple_literal(bytes.len().to_string()));
//!         out.write_triple(&s, &p, &o, None)?;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> triplestream::Result<()> {
//! let mut catalog = ExtractorCatalog::new();
//! catalog.register(
//!     ExtractorDescriptor::new("byte-length", InputShape::Content, || Box::new(ByteLength))
//!         .with_supported_type(MimeType::new("text", "csv")),
//! )?;
//!
//! let source = MemoryDocumentSource::new(b"a,b\n1,2\n".to_vec(), "http://example.org/doc")
//!     .with_content_type("text/csv");
//! let mut sink = ReportingHandler::new();
//!
//! let report = SingleDocumentExtraction::new(&source, &catalog, &mut sink).run()?;
//! sink.close()?;
//!
//! assert!(report.has_matching_extractors);
//! assert_eq!(report.triple_count, 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod batch;
pub mod config;
pub mod encoding;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod mime;
pub mod source;

// The RDF term model used throughout the pipeline.
pub use oxrdf;

pub use error::{Result, TriplestreamError};

pub use config::ExtractionParameters;

pub use mime::{
    build_accept_header, BomPurifier, MimeType, MimeTypeDetector, Purifier, WhitespacePurifier,
    UNKNOWN_MIME_TYPE,
};

pub use encoding::EncodingDetector;

pub use source::{
    DocumentSource, FileDocumentSource, LocalCopyFactory, MemCopyFactory, MemoryDocumentSource,
};

pub use extractor::{
    catalog::accept_header_for, DocumentInput, ExtractionContext, ExtractionError,
    ExtractionReport, ExtractionSink, Extractor, ExtractorCatalog, ExtractorDescriptor,
    InputShape, Issue, IssueLevel, IssueReport, Prefixes, SingleDocumentExtraction,
};

pub use handler::{
    CompositeHandler, ContextBlocker, CountingHandler, HandlerError, HandlerEvent, LoggingHandler,
    NQuadsWriter, ReportingHandler, SharedHandler, TripleHandler,
};

pub use batch::extract_all;
