//! Statement-counting handler.

use super::{HandlerError, TripleHandler};
use crate::extractor::ExtractionContext;
use oxrdf::{NamedNode, Subject, Term};

/// Terminal handler that counts statements and discards them.
#[derive(Debug, Default)]
pub struct CountingHandler {
    triples: usize,
    namespaces: usize,
}

impl CountingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triple_count(&self) -> usize {
        self.triples
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces
    }
}

impl TripleHandler for CountingHandler {
    fn start_document(&mut self, _document_iri: &NamedNode) -> Result<(), HandlerError> {
        Ok(())
    }

    fn open_context(&mut self, _context: &ExtractionContext) -> Result<(), HandlerError> {
        Ok(())
    }

    fn receive_namespace(
        &mut self,
        _prefix: &str,
        _iri: &str,
        _context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        self.namespaces += 1;
        Ok(())
    }

    fn receive_triple(
        &mut self,
        _subject: &Subject,
        _predicate: &NamedNode,
        _object: &Term,
        _graph: Option<&NamedNode>,
        _context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        self.triples += 1;
        Ok(())
    }

    fn close_context(&mut self, _context: &ExtractionContext) -> Result<(), HandlerError> {
        Ok(())
    }

    fn end_document(&mut self, _document_iri: &NamedNode) -> Result<(), HandlerError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Prefixes;
    use oxrdf::Literal;

    #[test]
    fn counts_triples_and_namespaces() {
        let doc = NamedNode::new("http://example.org/doc").unwrap();
        let ctx = ExtractionContext::new("test", doc.clone(), Prefixes::new());
        let mut handler = CountingHandler::new();

        handler.start_document(&doc).unwrap();
        handler.open_context(&ctx).unwrap();
        handler.receive_namespace("ex", "http://example.org/ns#", &ctx).unwrap();
        let s = Subject::from(doc.clone());
        let p = NamedNode::new("http://example.org/p").unwrap();
        for i in 0..3 {
            let o = Term::from(Literal::new_simple_literal(format!("v{i}")));
            handler.receive_triple(&s, &p, &o, None, &ctx).unwrap();
        }
        handler.close_context(&ctx).unwrap();
        handler.end_document(&doc).unwrap();
        handler.close().unwrap();

        assert_eq!(handler.triple_count(), 3);
        assert_eq!(handler.namespace_count(), 1);
    }
}
