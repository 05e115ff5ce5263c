//! Line-based N-Quads sink.
//!
//! The reference terminal sink: one statement per line, written as it
//! arrives. Context open/close framing carries no syntax in this format,
//! so the writer only needs the statement stream itself. Richer
//! serializations (Turtle, JSON, RDF/XML) are external collaborators.

use super::{HandlerError, TripleHandler};
use crate::extractor::ExtractionContext;
use oxrdf::{NamedNode, Subject, Term};
use std::io::Write;

/// Writes statements in N-Quads syntax to the wrapped writer.
///
/// One sink instance serves one handler chain; wrap it in
/// [`SharedHandler`](super::SharedHandler) before sharing it across
/// concurrently processed documents.
pub struct NQuadsWriter<W> {
    writer: W,
}

impl<W: Write + Send> NQuadsWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> TripleHandler for NQuadsWriter<W> {
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
        // N-Quads has no namespace syntax.
        Ok(())
    }

    fn receive_triple(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph: Option<&NamedNode>,
        _context: &ExtractionContext,
    ) -> Result<(), HandlerError> {
        match graph {
            Some(graph) => writeln!(self.writer, "{subject} {predicate} {object} {graph} .")?,
            None => writeln!(self.writer, "{subject} {predicate} {object} .")?,
        }
        Ok(())
    }

    fn close_context(&mut self, _context: &ExtractionContext) -> Result<(), HandlerError> {
        Ok(())
    }

    fn end_document(&mut self, _document_iri: &NamedNode) -> Result<(), HandlerError> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        self.writer.flush()?;
        Ok(())
    }
}
