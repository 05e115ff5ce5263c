//! Sharing one sink across documents.

use super::{HandlerError, TripleHandler};
use crate::extractor::ExtractionContext;
use oxrdf::{NamedNode, Subject, Term};
use parking_lot::Mutex;
use std::sync::Arc;

/// Clonable handler that serializes calls to a single wrapped sink.
///
/// The pipeline itself assumes one handler chain per document. When several
/// documents processed concurrently must feed one sink (a single output
/// file, say), wrap the sink in a `SharedHandler` and hand each document a
/// clone: every protocol call then takes the internal lock, interleaving
/// whole calls rather than bytes.
pub struct SharedHandler<H> {
    inner: Arc<Mutex<H>>,
}

impl<H> Clone for SharedHandler<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: TripleHandler> SharedHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Run a closure against the wrapped sink.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<H: TripleHandler> TripleHandler for SharedHandler<H> {
    fn start_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        self.inner.lock().start_document(document_iri)
    }

    fn open_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        self.inner.lock().open_context(context)
    }

    fn receive_namespace(
        &mut self,
        prefix: &str,
        iri: &str,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        self.inner.lock().receive_namespace(prefix, iri, context)
    }

    fn receive_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        self.inner
            .lock()
            .receive_triple(subject, predicate, object, graph, context)
    }

    fn close_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        self.inner.lock().close_context(context)
    }

    fn end_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        self.inner.lock().end_document(document_iri)
    }

    fn set_content_length(&mut self, content_length: u64) -> Result<(), HandlerError> {
        self.inner.lock().set_content_length(content_length)
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        self.inner.lock().close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Prefixes;
    use crate::handler::CountingHandler;
    use oxrdf::Literal;

    #[test]
    fn clones_feed_one_sink() {
        let shared = SharedHandler::new(CountingHandler::new());
        let mut a = shared.clone();
        let mut b = shared.clone();

        let doc = NamedNode::new("http://example.org/doc").unwrap();
        let ctx = ExtractionContext::new("test", doc.clone(), Prefixes::new());
        let s = Subject::from(doc.clone());
        let p = NamedNode::new("http://example.org/p").unwrap();
        let o = Term::from(Literal::new_simple_literal("v"));

        a.receive_triple(&s, &p, &o, None, &ctx).unwrap();
        b.receive_triple(&s, &p, &o, None, &ctx).unwrap();

        assert_eq!(shared.with_inner(|h| h.triple_count()), 2);
    }
}
