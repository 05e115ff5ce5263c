//! Fan-out handler.

use super::{HandlerError, TripleHandler};
use crate::extractor::ExtractionContext;
use oxrdf::{NamedNode, Subject, Term};

/// Dispatches every protocol call to each child in registration order.
///
/// For all calls except `close`, the first child failure propagates
/// immediately (a failing sink aborts the document anyway). `close` is
/// special: every child receives it even when an earlier one fails, and the
/// accumulated failures surface once, after all children have been closed.
#[derive(Default)]
pub struct CompositeHandler {
    children: Vec<Box<dyn TripleHandler>>,
}

impl CompositeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<Box<dyn TripleHandler>>) -> Self {
        Self { children }
    }

    pub fn add_child(&mut self, child: Box<dyn TripleHandler>) {
        self.children.push(child);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl TripleHandler for CompositeHandler {
    fn start_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        for child in &mut self.children {
            child.start_document(document_iri)?;
        }
        Ok(())
    }

    fn open_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        for child in &mut self.children {
            child.open_context(context)?;
        }
        Ok(())
    }

    fn receive_namespace(
        &mut self,
        prefix: &str,
        iri: &str,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        for child in &mut self.children {
            child.receive_namespace(prefix, iri, context)?;
        }
        Ok(())
    }

    fn receive_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        for child in &mut self.children {
            child.receive_triple(subject, predicate, object, graph, context)?;
        }
        Ok(())
    }

    fn close_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        for child in &mut self.children {
            child.close_context(context)?;
        }
        Ok(())
    }

    fn end_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        for child in &mut self.children {
            child.end_document(document_iri)?;
        }
        Ok(())
    }

    fn set_content_length(&mut self, content_length: u64) -> Result<(), HandlerError> {
        for child in &mut self.children {
            child.set_content_length(content_length)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        let mut failures = Vec::new();
        for child in &mut self.children {
            if let Err(e) = child.close() {
                failures.push(e);
            }
        }
        match failures.pop() {
            None => Ok(()),
            Some(only) if failures.is_empty() => Err(only),
            Some(last) => {
                failures.push(last);
                Err(HandlerError::Aggregate(failures))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Prefixes;
    use crate::handler::{CountingHandler, ReportingHandler};
    use oxrdf::Literal;

    /// Fails on `close`, succeeds everywhere else.
    struct FailingOnClose {
        closed: bool,
    }

    impl TripleHandler for FailingOnClose {
        fn start_document(&mut self, _: &NamedNode) -> Result<(), HandlerError> {
            Ok(())
        }
        fn open_context(&mut self, _: &ExtractionContext) -> Result<(), HandlerError> {
            Ok(())
        }
        fn receive_namespace(
            &mut self,
            _: &str,
            _: &str,
            _: &ExtractionContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn receive_triple(
            &mut self,
            _: &Subject,
            _: &NamedNode,
            _: &Term,
            _: Option<&NamedNode>,
            _: &ExtractionContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn close_context(&mut self, _: &ExtractionContext) -> Result<(), HandlerError> {
            Ok(())
        }
        fn end_document(&mut self, _: &NamedNode) -> Result<(), HandlerError> {
            Ok(())
        }
        fn close(&mut self) -> Result<(), HandlerError> {
            self.closed = true;
            Err(HandlerError::message("refusing to close"))
        }
    }

    fn sample_call(handler: &mut dyn TripleHandler) {
        let doc = NamedNode::new("http://example.org/doc").unwrap();
        let ctx = ExtractionContext::new("test", doc.clone(), Prefixes::new());
        handler.start_document(&doc).unwrap();
        handler.open_context(&ctx).unwrap();
        let s = Subject::from(doc.clone());
        let p = NamedNode::new("http://example.org/p").unwrap();
        let o = Term::from(Literal::new_simple_literal("v"));
        handler.receive_triple(&s, &p, &o, None, &ctx).unwrap();
        handler.close_context(&ctx).unwrap();
        handler.end_document(&doc).unwrap();
    }

    #[test]
    fn fans_out_to_all_children() {
        let mut composite = CompositeHandler::new();
        composite.add_child(Box::new(CountingHandler::new()));
        composite.add_child(Box::new(ReportingHandler::new()));
        assert_eq!(composite.len(), 2);

        sample_call(&mut composite);
        composite.close().unwrap();
    }

    #[test]
    fn close_reaches_every_child_despite_failures() {
        let mut composite = CompositeHandler::with_children(vec![
            Box::new(FailingOnClose { closed: false }),
            Box::new(CountingHandler::new()),
            Box::new(FailingOnClose { closed: false }),
        ]);

        sample_call(&mut composite);
        let err = composite.close().unwrap_err();
        match err {
            HandlerError::Aggregate(failures) => assert_eq!(failures.len(), 2),
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[test]
    fn single_close_failure_is_not_wrapped() {
        let mut composite = CompositeHandler::with_children(vec![
            Box::new(FailingOnClose { closed: false }),
            Box::new(CountingHandler::new()),
        ]);

        sample_call(&mut composite);
        let err = composite.close().unwrap_err();
        assert!(matches!(err, HandlerError::Message(_)));
    }

    #[test]
    fn empty_composite_is_a_no_op() {
        let mut composite = CompositeHandler::new();
        sample_call(&mut composite);
        composite.close().unwrap();
    }
}
