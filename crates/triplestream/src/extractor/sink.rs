//! The per-context view of the handler chain handed to an extractor.

use super::context::ExtractionContext;
use super::issue::{Issue, IssueLevel};
use crate::handler::{HandlerError, TripleHandler};
use oxrdf::{NamedNode, Subject, Term};

/// Write-side of one extractor run.
///
/// Pins the run's [`ExtractionContext`], so an extractor can only ever
/// address its own context; collects the run's issues; counts the
/// statements written. Handler failures propagate to the caller unchanged
/// and must not be swallowed by the extractor.
pub struct ExtractionSink<'a> {
    handler: &'a mut dyn TripleHandler,
    context: &'a ExtractionContext,
    issues: Vec<Issue>,
    triple_count: usize,
}

impl<'a> ExtractionSink<'a> {
    pub(crate) fn new(handler: &'a mut dyn TripleHandler, context: &'a ExtractionContext) -> Self {
        Self {
            handler,
            context,
            issues: Vec::new(),
            triple_count: 0,
        }
    }

    pub fn context(&self) -> &ExtractionContext {
        self.context
    }

    /// Emit one statement into this run's context. `graph` is `None` for
    /// the default graph.
    pub fn write_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
    ) -> Result<(), HandlerError> {
        self.handler
            .receive_triple(subject, predicate, object, graph, self.context)?;
        self.triple_count += 1;
        Ok(())
    }

    /// Emit a namespace declaration into this run's context.
    pub fn write_namespace(&mut self, prefix: &str, iri: &str) -> Result<(), HandlerError> {
        self.handler.receive_namespace(prefix, iri, self.context)
    }

    /// Record a problem without interrupting the run.
    pub fn report(&mut self, level: IssueLevel, message: impl Into<String>) {
        self.issues.push(Issue::new(level, message));
    }

    /// Record a problem at a known input position.
    pub fn report_at(&mut self, level: IssueLevel, message: impl Into<String>, row: u64, col: u64) {
        self.issues.push(Issue::at(level, message, row, col));
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn triple_count(&self) -> usize {
        self.triple_count
    }

    pub(crate) fn into_parts(self) -> (Vec<Issue>, usize) {
        (self.issues, self.triple_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Prefixes;
    use crate::handler::ReportingHandler;
    use oxrdf::Literal;

    #[test]
    fn forwards_into_its_own_context_only() {
        let doc = NamedNode::new("http://example.org/doc").unwrap();
        let ctx = ExtractionContext::new("csv", doc.clone(), Prefixes::new());
        let mut handler = ReportingHandler::new();
        let mut sink = ExtractionSink::new(&mut handler, &ctx);

        sink.write_namespace("ex", "http://example.org/ns#").unwrap();
        let s = Subject::from(doc.clone());
        let p = NamedNode::new("http://example.org/p").unwrap();
        let o = Term::from(Literal::new_simple_literal("v"));
        sink.write_triple(&s, &p, &o, None).unwrap();
        sink.report(IssueLevel::Warning, "odd cell");

        assert_eq!(sink.triple_count(), 1);
        let (issues, count) = sink.into_parts();
        assert_eq!(issues.len(), 1);
        assert_eq!(count, 1);
        assert_eq!(handler.triple_count(), 1);
    }
}
