//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use triplestream::oxrdf::{Literal, NamedNode, Subject, Term};
use triplestream::{
    DocumentInput, DocumentSource, ExtractionContext, ExtractionError, ExtractionParameters,
    ExtractionSink, Extractor, ExtractorCatalog, ExtractorDescriptor, HandlerError, InputShape,
    MimeType, TripleHandler,
};

pub const DOC_IRI: &str = "http://example.org/doc";

pub fn predicate(n: usize) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/p{n}"))
}

/// Content-shape extractor emitting a fixed number of statements.
pub struct StatementEmitter {
    pub count: usize,
}

impl Extractor for StatementEmitter {
    fn run(
        &self,
        _params: &ExtractionParameters,
        context: &ExtractionContext,
        input: DocumentInput<'_>,
        out: &mut ExtractionSink<'_>,
    ) -> Result<(), ExtractionError> {
        let DocumentInput::Content { .. } = input else {
            return Err(ExtractionError::failed("expected content input"));
        };
        let s = Subject::from(context.document_iri().clone());
        for n in 1..=self.count {
            let o = Term::from(Literal::new_simple_literal(format!(
                "{}-{n}",
                context.extractor_name()
            )));
            out.write_triple(&s, &predicate(n), &o, None)?;
        }
        Ok(())
    }
}

/// Content-shape extractor recording the advisory charset it received.
pub struct CharsetProbe {
    pub seen: Arc<std::sync::Mutex<Option<&'static str>>>,
}

impl Extractor for CharsetProbe {
    fn run(
        &self,
        _params: &ExtractionParameters,
        _context: &ExtractionContext,
        input: DocumentInput<'_>,
        _out: &mut ExtractionSink<'_>,
    ) -> Result<(), ExtractionError> {
        let DocumentInput::Content { charset, .. } = input else {
            return Err(ExtractionError::failed("expected content input"));
        };
        *self.seen.lock().unwrap() = charset.map(|e| e.name());
        Ok(())
    }
}

/// Always fails fatally.
pub struct FailingExtractor;

impl Extractor for FailingExtractor {
    fn run(
        &self,
        _params: &ExtractionParameters,
        _context: &ExtractionContext,
        _input: DocumentInput<'_>,
        _out: &mut ExtractionSink<'_>,
    ) -> Result<(), ExtractionError> {
        Err(ExtractionError::failed("synthetic failure"))
    }
}

/// Blind-shape extractor emitting one statement about the document IRI.
pub struct BlindNoter;

impl Extractor for BlindNoter {
    fn run(
        &self,
        _params: &ExtractionParameters,
        context: &ExtractionContext,
        input: DocumentInput<'_>,
        out: &mut ExtractionSink<'_>,
    ) -> Result<(), ExtractionError> {
        let DocumentInput::Blind { iri } = input else {
            return Err(ExtractionError::failed("expected blind input"));
        };
        let s = Subject::from(iri.clone());
        let o = Term::from(Literal::new_simple_literal("seen"));
        out.write_triple(&s, &predicate(0), &o, None)?;
        Ok(())
    }
}

/// Tree-shape extractor emitting the root element name.
pub struct TreeRootExtractor;

impl Extractor for TreeRootExtractor {
    fn run(
        &self,
        _params: &ExtractionParameters,
        context: &ExtractionContext,
        input: DocumentInput<'_>,
        out: &mut ExtractionSink<'_>,
    ) -> Result<(), ExtractionError> {
        let DocumentInput::Tree { tree } = input else {
            return Err(ExtractionError::failed("expected tree input"));
        };
        let root = tree.root_element().tag_name().name().to_string();
        let s = Subject::from(context.document_iri().clone());
        let o = Term::from(Literal::new_simple_literal(root));
        out.write_triple(&s, &predicate(0), &o, None)?;
        Ok(())
    }
}

pub fn content_descriptor(
    name: &str,
    mime: &str,
    extractor: impl Fn() -> Box<dyn Extractor> + Send + Sync + 'static,
) -> ExtractorDescriptor {
    ExtractorDescriptor::new(name, InputShape::Content, extractor)
        .with_supported_type(MimeType::parse(mime).unwrap())
}

pub fn csv_catalog_with_emitters(names: &[&str], triples_each: usize) -> ExtractorCatalog {
    let mut catalog = ExtractorCatalog::new();
    for name in names {
        let count = triples_each;
        catalog
            .register(content_descriptor(name, "text/csv", move || {
                Box::new(StatementEmitter { count })
            }))
            .unwrap();
    }
    catalog
}

/// Non-local source counting how often the underlying fetch is opened.
pub struct CountingSource {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub opens: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn csv() -> (Self, Arc<AtomicUsize>) {
        let opens = Arc::new(AtomicUsize::new(0));
        (
            Self {
                bytes: b"a,b\n1,2\n3,4\n".to_vec(),
                content_type: Some("text/csv".to_string()),
                opens: Arc::clone(&opens),
            },
            opens,
        )
    }
}

impl DocumentSource for CountingSource {
    fn open_stream(&self) -> std::io::Result<Box<dyn Read + '_>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Cursor::new(&self.bytes[..])))
    }

    fn content_length(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }

    fn document_iri(&self) -> &str {
        DOC_IRI
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn is_local(&self) -> bool {
        false
    }
}

/// A source whose stream cannot be opened.
pub struct BrokenSource;

impl DocumentSource for BrokenSource {
    fn open_stream(&self) -> std::io::Result<Box<dyn Read + '_>> {
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "fetch failed",
        ))
    }

    fn content_length(&self) -> Option<u64> {
        None
    }

    fn document_iri(&self) -> &str {
        DOC_IRI
    }

    fn content_type(&self) -> Option<&str> {
        Some("text/csv")
    }

    fn is_local(&self) -> bool {
        false
    }
}

/// Sink that accepts framing but rejects every statement.
#[derive(Default)]
pub struct RejectingSink {
    pub contexts_opened: usize,
}

impl TripleHandler for RejectingSink {
    fn start_document(&mut self, _: &NamedNode) -> Result<(), HandlerError> {
        Ok(())
    }

    fn open_context(&mut self, _: &ExtractionContext) -> Result<(), HandlerError> {
        self.contexts_opened += 1;
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
        Err(HandlerError::message("statement rejected"))
    }

    fn close_context(&mut self, _: &ExtractionContext) -> Result<(), HandlerError> {
        Ok(())
    }

    fn end_document(&mut self, _: &NamedNode) -> Result<(), HandlerError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }
}
