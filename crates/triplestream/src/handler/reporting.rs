//! Event-recording handler.
//!
//! Records every protocol call it receives, in order. Useful as a terminal
//! sink when verifying pipeline behavior and when debugging decorator
//! chains.

use super::{HandlerError, TripleHandler};
use crate::extractor::ExtractionContext;
use oxrdf::{NamedNode, Subject, Term};

/// One recorded protocol call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerEvent {
    StartDocument { iri: String },
    OpenContext { extractor: String },
    Namespace { prefix: String, iri: String, extractor: String },
    Triple { statement: String, extractor: String },
    CloseContext { extractor: String },
    EndDocument { iri: String },
    ContentLength(u64),
    Close,
}

/// Terminal handler that records the full event sequence.
#[derive(Debug, Default)]
pub struct ReportingHandler {
    events: Vec<HandlerEvent>,
    triple_count: usize,
}

impl ReportingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[HandlerEvent] {
        &self.events
    }

    pub fn triple_count(&self) -> usize {
        self.triple_count
    }

    /// The recorded statements (rendered in N-Quads form), in arrival order.
    pub fn statements(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HandlerEvent::Triple { statement, .. } => Some(statement.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TripleHandler for ReportingHandler {
    fn start_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        self.events.push(HandlerEvent::StartDocument {
            iri: document_iri.as_str().to_string(),
        });
        Ok(())
    }

    fn open_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        self.events.push(HandlerEvent::OpenContext {
            extractor: context.extractor_name().to_string(),
        });
        Ok(())
    }

    fn receive_namespace(
        &mut self,
        prefix: &str,
        iri: &str,
        context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        self.events.push(HandlerEvent::Namespace {
            prefix: prefix.to_string(),
            iri: iri.to_string(),
            extractor: context.extractor_name().to_string(),
        });
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
        let statement = match graph {
            Some(graph) => format!("{subject} {predicate} {object} {graph} ."),
            None => format!("{subject} {predicate} {object} ."),
        };
        self.events.push(HandlerEvent::Triple {
            statement,
            extractor: context.extractor_name().to_string(),
        });
        self.triple_count += 1;
        Ok(())
    }

    fn close_context(&mut self, context: &ExtractionContext) -> Result<(), HandlerError> {
        self.events.push(HandlerEvent::CloseContext {
            extractor: context.extractor_name().to_string(),
        });
        Ok(())
    }

    fn end_document(&mut self, document_iri: &NamedNode) -> Result<(), HandlerError> {
        self.events.push(HandlerEvent::EndDocument {
            iri: document_iri.as_str().to_string(),
        });
        Ok(())
    }

    fn set_content_length(&mut self, content_length: u64) -> Result<(), HandlerError> {
        self.events.push(HandlerEvent::ContentLength(content_length));
        Ok(())
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        self.events.push(HandlerEvent::Close);
        Ok(())
    }
}
