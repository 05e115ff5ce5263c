//! Tracing decorator for the handler chain.

use super::{HandlerError, TripleHandler};
use crate::extractor::ExtractionContext;
use ahash::AHashMap;
use oxrdf::{NamedNode, Subject, Term};
use tracing::{debug, trace};

/// Logs protocol traffic and per-context statement counts, then delegates.
pub struct LoggingHandler<H> {
    inner: H,
    context_triples: AHashMap<String, usize>,
}

impl<H: TripleHandler> LoggingHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            context_triples: AHashMap::new(),
        }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: TripleHandler> TripleHandler for LoggingHandler<H> {
    fn start_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        debug!(document = %document_iri, "start document");
        self.inner.start_document(document_iri)
    }

    fn open_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        trace!(extractor = context.extractor_name(), "open context");
        self.context_triples.insert(context.unique_id().to_string(), 0);
        self.inner.open_context(context)
    }

    fn receive_namespace(
        &mut self,
        prefix: &str,
        iri: &str,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        trace!(prefix, iri, "namespace");
        self.inner.receive_namespace(prefix, iri, context)
    }

    fn receive_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        if let Some(count) = self.context_triples.get_mut(context.unique_id()) {
            *count += 1;
        }
        self.inner
            .receive_triple(subject, predicate, object, graph, context)
    }

    fn close_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        let triples = self
            .context_triples
            .remove(context.unique_id())
            .unwrap_or_default();
        debug!(
            extractor = context.extractor_name(),
            triples, "close context"
        );
        self.inner.close_context(context)
    }

    fn end_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        debug!(document = %document_iri, "end document");
        self.context_triples.clear();
        self.inner.end_document(document_iri)
    }

    fn set_content_length(&mut self, content_length: u64) -> Result<(), HandlerError> {
        self.inner.set_content_length(content_length)
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        self.inner.close()
    }
}
