//! The ordered, context-scoped triple-handler pipeline.
//!
//! Every sink and every decorator implements [`TripleHandler`]. Callers
//! drive the protocol in this shape:
//!
//! ```text
//! start_document(doc_iri)
//!   open_context(context)
//!     receive_namespace(prefix, iri, context)*   -- interleaved freely
//!     receive_triple(s, p, o, g, context)*       -- with receive_triple
//!   close_context(context)
//!   ... more open/close pairs for other contexts of the same document ...
//! end_document(doc_iri)
//! close()                                        -- exactly once, terminal
//! ```
//!
//! Invariants: every `open_context` for a document is matched by exactly
//! one `close_context` before that document's `end_document`; triples and
//! namespaces for a context arrive only between its open and close; no
//! call follows `close`.
//!
//! Decorators are built by explicit composition: each one owns its wrapped
//! handler ([`ContextBlocker`], [`LoggingHandler`]) or a list of children
//! ([`CompositeHandler`]). A handler failure is the one failure the engine
//! cannot absorb locally: it aborts the remainder of the document.
//!
//! # Concurrency
//!
//! Per document the protocol is strictly sequential, so handlers take
//! `&mut self` and need no interior locking. A sink shared by several
//! documents processed concurrently must serialize calls itself; wrap it in
//! [`SharedHandler`] or keep one sink per document.

pub mod blocker;
pub mod composite;
pub mod counting;
pub mod logging;
pub mod nquads;
pub mod reporting;
pub mod shared;

pub use blocker::ContextBlocker;
pub use composite::CompositeHandler;
pub use counting::CountingHandler;
pub use logging::LoggingHandler;
pub use nquads::NQuadsWriter;
pub use reporting::{HandlerEvent, ReportingHandler};
pub use shared::SharedHandler;

use crate::extractor::ExtractionContext;
use oxrdf::{NamedNode, Subject, Term};
use thiserror::Error;

/// Failure raised by a sink or decorator in the handler chain.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("I/O error in triple handler: {0}")]
    Io(#[from] std::io::Error),

    #[error("triple handler error: {0}")]
    Message(String),

    /// Several children of a composite failed during `close`.
    #[error("multiple triple handler failures ({})", .0.len())]
    Aggregate(Vec<HandlerError>),
}

impl HandlerError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Streaming consumer of extracted statements.
///
/// Implemented by terminal sinks (serializers, stores) and by decorators
/// that wrap another handler. See the module documentation for the call
/// protocol and its invariants.
pub trait TripleHandler: Send {
    /// A new document is about to be processed.
    fn start_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError>;

    /// A new extraction context has been established. Contexts are not
    /// guaranteed to receive any statement before they close.
    fn open_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError>;

    /// A namespace declaration was found in the given open context.
    fn receive_namespace(
        &mut self,
        prefix: &str,
        iri: &str,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError>;

    /// A statement was produced in the given open context. `graph` is
    /// `None` for the default graph.
    fn receive_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError>;

    /// No more statements will arrive for this context.
    fn close_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError>;

    /// The end of the document has been reached; every context opened for
    /// it has been closed.
    fn end_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError>;

    /// Advisory size of the content being processed.
    fn set_content_length(&mut self, _content_length: u64) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Called last and exactly once.
    fn close(&mut self) -> Result<(), HandlerError>;
}

impl TripleHandler for Box<dyn TripleHandler> {
    fn start_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        (**self).start_document(document_iri)
    }

    fn open_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        (**self).open_context(context)
    }

    fn receive_namespace(
        &mut self,
        prefix: &str,
        iri: &str,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        (**self).receive_namespace(prefix, iri, context)
    }

    fn receive_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        (**self).receive_triple(subject, predicate, object, graph, context)
    }

    fn close_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        (**self).close_context(context)
    }

    fn end_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        (**self).end_document(document_iri)
    }

    fn set_content_length(&mut self, content_length: u64) -> Result<(), HandlerError> {
        (**self).set_content_length(content_length)
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        (**self).close()
    }
}
