//! Single-document extraction orchestration.
//!
//! [`SingleDocumentExtraction`] drives one or many extractors over one
//! document: it detects the character encoding once, sniffs the media type,
//! asks the catalog which extractors apply, guarantees re-readability of
//! the source, and runs each selected extractor in its own context while
//! forwarding everything through the triple-handler chain.
//!
//! One instance is created per document, runs exactly once (enforced by the
//! consuming `run`), and is then discarded. Failure handling follows a
//! strict taxonomy: a source that cannot be opened aborts the document
//! before `start_document`; a failing extractor becomes a fatal
//! [`Issue`] and the remaining extractors still run; a failing handler
//! aborts the remainder of the document.

use super::catalog::ExtractorCatalog;
use super::context::ExtractionContext;
use super::descriptor::{ExtractorDescriptor, Prefixes};
use super::issue::{Issue, IssueLevel, IssueReport};
use super::sink::ExtractionSink;
use super::{DocumentInput, ExtractionError, InputShape};
use crate::config::ExtractionParameters;
use crate::encoding::EncodingDetector;
use crate::handler::TripleHandler;
use crate::mime::{MimeType, MimeTypeDetector};
use crate::source::{DocumentSource, LocalCopyFactory, MemCopyFactory, MemoryDocumentSource};
use crate::{Result, TriplestreamError};
use encoding_rs::Encoding;
use oxrdf::{Literal, NamedNode, Subject, Term};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info, warn};

const METADATA_CONTEXT_NAME: &str = "extraction-metadata";
const EXTRACTION_DATE_IRI: &str = "https://triplestream.dev/vocab#extractionDate";
const STATEMENT_COUNT_IRI: &str = "https://triplestream.dev/vocab#statementCount";

/// Outcome of one document's extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Whether at least one extractor was selected for the document. A
    /// document matching zero extractors is a valid outcome, not an error.
    pub has_matching_extractors: bool,
    /// Media type the detector settled on, when detection ran.
    pub detected_mime_type: Option<String>,
    /// Advisory character encoding, when any extractor consumed content.
    pub detected_charset: Option<String>,
    /// Statements that reached the handler chain.
    pub triple_count: usize,
    /// Per-extractor issues, in execution order.
    pub issues: IssueReport,
}

impl ExtractionReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// JSON rendering of the report, for persistence alongside the output.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TriplestreamError::extraction(format!("cannot serialize report: {e}")))
    }
}

/// Per-document orchestrator.
///
/// ```rust,no_run
/// use triplestream::{
///     ExtractorCatalog, MemoryDocumentSource, NQuadsWriter, SingleDocumentExtraction,
/// };
///
/// # fn main() -> triplestream::Result<()> {
/// let catalog = ExtractorCatalog::new();
/// let source = MemoryDocumentSource::new(b"a,b\n1,2\n".to_vec(), "http://example.org/doc")
///     .with_content_type("text/csv");
/// let mut sink = NQuadsWriter::new(std::io::stdout());
///
/// let report = SingleDocumentExtraction::new(&source, &catalog, &mut sink).run()?;
/// println!("matched: {}", report.has_matching_extractors);
/// # Ok(())
/// # }
/// ```
pub struct SingleDocumentExtraction<'a> {
    source: &'a dyn DocumentSource,
    catalog: &'a ExtractorCatalog,
    output: &'a mut dyn TripleHandler,
    detector: Option<MimeTypeDetector>,
    copy_factory: Box<dyn LocalCopyFactory>,
    params: ExtractionParameters,
}

impl<'a> SingleDocumentExtraction<'a> {
    pub fn new(
        source: &'a dyn DocumentSource,
        catalog: &'a ExtractorCatalog,
        output: &'a mut dyn TripleHandler,
    ) -> Self {
        Self {
            source,
            catalog,
            output,
            detector: Some(MimeTypeDetector::new()),
            copy_factory: Box::new(MemCopyFactory),
            params: ExtractionParameters::default(),
        }
    }

    pub fn with_parameters(mut self, params: ExtractionParameters) -> Self {
        self.params = params;
        self
    }

    /// Replace the default media-type detector.
    pub fn with_detector(mut self, detector: MimeTypeDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Disable media-type detection entirely; every supplied extractor is
    /// tried against the document.
    pub fn without_detector(mut self) -> Self {
        self.detector = None;
        self
    }

    /// Replace the factory used to materialize local copies.
    pub fn with_copy_factory(mut self, factory: Box<dyn LocalCopyFactory>) -> Self {
        self.copy_factory = factory;
        self
    }

    /// Run every applicable extractor over the document.
    ///
    /// Consumes the orchestrator: one instance, one run.
    pub fn run(self) -> Result<ExtractionReport> {
        let SingleDocumentExtraction {
            source,
            catalog,
            output,
            detector,
            copy_factory,
            params,
        } = self;

        let document_iri = NamedNode::new(source.document_iri())?;
        info!(document = %document_iri, "processing document");

        // Non-repeatable sources are materialized up front, before any
        // read, so the underlying fetch happens at most once.
        let mut local = if source.is_local() {
            LocalDocument::Borrowed(source)
        } else {
            LocalDocument::Copied(copy_factory.local_copy(source)?)
        };

        let declared = source.content_type().and_then(|t| MimeType::parse(t).ok());

        let (selected, detected_mime): (Vec<&ExtractorDescriptor>, Option<MimeType>) =
            match &detector {
                Some(det) if !catalog.all_accept_any_content() => {
                    let head = local.sniff_head(params.max_sniff_bytes)?;
                    let hint = filename_hint(document_iri.as_str());
                    let mime = det.detect(hint, declared.as_ref(), &head);
                    debug!(mime = %mime, "detected media type");
                    (catalog.matching_extractors(&mime), Some(mime))
                }
                _ => (catalog.iter().collect(), None),
            };

        let has_matching_extractors = !selected.is_empty();
        if tracing::enabled!(tracing::Level::DEBUG) {
            let names: Vec<&str> = selected.iter().map(|d| d.name()).collect();
            debug!(extractors = ?names, "selected extractors");
        }

        // Several extractors re-read the same source independently; one
        // shared byte copy serves them all.
        if selected.len() > 1 {
            local.ensure_copied(copy_factory.as_ref(), source)?;
        }

        // Encoding detection runs once per document and is advisory.
        let mut charset: Option<&'static Encoding> = None;
        if selected.iter().any(|d| d.input_shape() != InputShape::Blind) {
            let data = local.bytes()?;
            let encoding = EncodingDetector::new().guess(&data);
            debug!(charset = encoding.name(), "detected character encoding");
            charset = Some(encoding);
        }

        output.start_document(&document_iri)?;
        if let Some(len) = source.content_length() {
            output.set_content_length(len)?;
        }

        let mut issues = IssueReport::new();
        let mut triple_count = 0usize;
        let mut failed_runs = 0usize;
        let mut decoded_text: Option<String> = None;

        for &descriptor in &selected {
            let context = ExtractionContext::new(
                descriptor.name(),
                document_iri.clone(),
                descriptor.prefixes().clone(),
            );
            let started = Instant::now();

            output.open_context(&context)?;
            let (run_result, run_issues, run_triples) = run_one(
                &mut *output,
                descriptor,
                &params,
                &context,
                &document_iri,
                &local,
                charset,
                &mut decoded_text,
            );
            // The context closes on the failure path too.
            let close_result = output.close_context(&context);

            for issue in run_issues {
                issues.record(descriptor.name(), issue);
            }
            triple_count += run_triples;

            match run_result {
                Ok(()) => {}
                Err(ExtractionError::Handler(e)) => return Err(e.into()),
                Err(ExtractionError::Failed { message, source }) => {
                    warn!(extractor = descriptor.name(), error = %message, "extractor failed");
                    let text = match source {
                        Some(cause) => format!("{message}: {cause}"),
                        None => message,
                    };
                    issues.record(descriptor.name(), Issue::new(IssueLevel::Fatal, text));
                    failed_runs += 1;
                }
            }
            close_result?;

            debug!(
                extractor = descriptor.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "extractor finished"
            );
        }

        if params.emit_extraction_metadata {
            triple_count += emit_extraction_metadata(output, &document_iri, triple_count)?;
        }

        output.end_document(&document_iri)?;

        if params.stop_at_first_error && has_matching_extractors && failed_runs == selected.len() {
            return Err(TriplestreamError::extraction(format!(
                "all {} selected extractors failed for {document_iri}",
                selected.len()
            )));
        }

        Ok(ExtractionReport {
            has_matching_extractors,
            detected_mime_type: detected_mime.map(|m| m.to_string()),
            detected_charset: charset.map(|e| e.name().to_string()),
            triple_count,
            issues,
        })
    }
}

/// Runs one extractor and harvests the sink, whatever the outcome.
#[allow(clippy::too_many_arguments)]
fn run_one(
    output: &mut dyn TripleHandler,
    descriptor: &ExtractorDescriptor,
    params: &ExtractionParameters,
    context: &ExtractionContext,
    document_iri: &NamedNode,
    local: &LocalDocument<'_>,
    charset: Option<&'static Encoding>,
    decoded_text: &mut Option<String>,
) -> (std::result::Result<(), ExtractionError>, Vec<Issue>, usize) {
    let mut sink = ExtractionSink::new(output, context);
    let result = run_with_input(
        descriptor,
        params,
        context,
        document_iri,
        local,
        charset,
        decoded_text,
        &mut sink,
    );
    let (issues, triples) = sink.into_parts();
    (result, issues, triples)
}

#[allow(clippy::too_many_arguments)]
fn run_with_input(
    descriptor: &ExtractorDescriptor,
    params: &ExtractionParameters,
    context: &ExtractionContext,
    document_iri: &NamedNode,
    local: &LocalDocument<'_>,
    charset: Option<&'static Encoding>,
    decoded_text: &mut Option<String>,
    sink: &mut ExtractionSink<'_>,
) -> std::result::Result<(), ExtractionError> {
    let extractor = descriptor.create();
    match descriptor.input_shape() {
        InputShape::Blind => extractor.run(
            params,
            context,
            DocumentInput::Blind { iri: document_iri },
            sink,
        ),
        InputShape::Content => {
            let bytes = local.bytes().map_err(reread_failure)?;
            extractor.run(
                params,
                context,
                DocumentInput::Content {
                    bytes: &bytes,
                    charset,
                },
                sink,
            )
        }
        InputShape::Tree => {
            // The decoded text is cached per document, so several tree
            // extractors decode once.
            if decoded_text.is_none() {
                let bytes = local.bytes().map_err(reread_failure)?;
                *decoded_text = Some(EncodingDetector::decode(&bytes, charset).into_owned());
            }
            let text = decoded_text.as_deref().unwrap_or_default();
            let tree = roxmltree::Document::parse(text)
                .map_err(|e| ExtractionError::failed_with("cannot parse document as XML", e))?;
            extractor.run(params, context, DocumentInput::Tree { tree: &tree }, sink)
        }
    }
}

fn reread_failure(e: TriplestreamError) -> ExtractionError {
    ExtractionError::failed_with("cannot re-read document content", e)
}

/// Extraction-timestamp and statement-count metadata, emitted in a
/// dedicated context after all extractor contexts have closed.
fn emit_extraction_metadata(
    output: &mut dyn TripleHandler,
    document_iri: &NamedNode,
    statement_count: usize,
) -> Result<usize> {
    let context = ExtractionContext::new(
        METADATA_CONTEXT_NAME,
        document_iri.clone(),
        Prefixes::new(),
    );
    output.open_context(&context)?;
    let result = write_metadata_triples(output, document_iri, statement_count, &context);
    output.close_context(&context)?;
    result?;
    Ok(2)
}

fn write_metadata_triples(
    output: &mut dyn TripleHandler,
    document_iri: &NamedNode,
    statement_count: usize,
    context: &ExtractionContext,
) -> Result<()> {
    let subject = Subject::from(document_iri.clone());
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    output.receive_triple(
        &subject,
        &NamedNode::new_unchecked(EXTRACTION_DATE_IRI),
        &Term::from(Literal::new_typed_literal(
            timestamp,
            oxrdf::vocab::xsd::DATE_TIME,
        )),
        None,
        context,
    )?;
    output.receive_triple(
        &subject,
        &NamedNode::new_unchecked(STATEMENT_COUNT_IRI),
        &Term::from(Literal::new_typed_literal(
            statement_count.to_string(),
            oxrdf::vocab::xsd::INTEGER,
        )),
        None,
        context,
    )?;
    Ok(())
}

/// The document bytes the current run works from: either the caller's own
/// local source (streams reopen cheaply) or a one-shot in-memory copy.
enum LocalDocument<'a> {
    Borrowed(&'a dyn DocumentSource),
    Copied(MemoryDocumentSource),
}

impl LocalDocument<'_> {
    fn sniff_head(&self, max_bytes: usize) -> Result<Vec<u8>> {
        match self {
            LocalDocument::Copied(copy) => {
                let bytes = copy.bytes();
                Ok(bytes[..bytes.len().min(max_bytes)].to_vec())
            }
            LocalDocument::Borrowed(source) => {
                let stream = source.open_stream().map_err(open_failure)?;
                let mut head = Vec::new();
                stream
                    .take(max_bytes as u64)
                    .read_to_end(&mut head)
                    .map_err(open_failure)?;
                Ok(head)
            }
        }
    }

    fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            LocalDocument::Copied(copy) => Ok(Cow::Borrowed(copy.bytes())),
            LocalDocument::Borrowed(source) => {
                let mut data = Vec::new();
                source
                    .open_stream()
                    .and_then(|mut stream| stream.read_to_end(&mut data))
                    .map_err(open_failure)?;
                Ok(Cow::Owned(data))
            }
        }
    }

    fn ensure_copied(
        &mut self,
        factory: &dyn LocalCopyFactory,
        source: &dyn DocumentSource,
    ) -> Result<()> {
        if matches!(self, LocalDocument::Borrowed(_)) {
            *self = LocalDocument::Copied(factory.local_copy(source)?);
        }
        Ok(())
    }
}

fn open_failure(e: std::io::Error) -> TriplestreamError {
    TriplestreamError::source_with("cannot read document source", e)
}

/// Last path segment of the document IRI, when it carries an extension.
fn filename_hint(iri: &str) -> Option<&str> {
    let path = iri.split(['?', '#']).next().unwrap_or(iri);
    let candidate = path.rsplit('/').next()?;
    if candidate.is_empty() || !candidate.contains('.') || candidate.contains(':') {
        return None;
    }
    Some(candidate)
}
