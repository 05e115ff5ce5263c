//! Extractor interfaces, the catalog, and the per-document orchestrator.

pub mod catalog;
pub mod context;
pub mod descriptor;
pub mod issue;
pub mod single_document;
pub mod sink;

pub use catalog::ExtractorCatalog;
pub use context::ExtractionContext;
pub use descriptor::{ExtractorDescriptor, Prefixes};
pub use issue::{Issue, IssueLevel, IssueReport};
pub use single_document::{ExtractionReport, SingleDocumentExtraction};
pub use sink::ExtractionSink;

use crate::config::ExtractionParameters;
use crate::handler::HandlerError;
use encoding_rs::Encoding;
use oxrdf::NamedNode;
use thiserror::Error;

/// Failure of one extractor run.
///
/// `Failed` is recoverable at the document level: the orchestrator records
/// it as a fatal [`Issue`] and moves on to the next extractor. `Handler`
/// wraps a sink failure surfacing through the extractor's output calls; it
/// aborts the rest of the document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ExtractionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    pub fn failed_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// The input shape an extractor consumes.
///
/// Declared on the descriptor so the orchestrator can prepare the matching
/// [`DocumentInput`] at selection time instead of inspecting extractors at
/// run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// Only the document IRI; the content is never read.
    Blind,
    /// The raw byte stream plus the advisory detected charset.
    Content,
    /// A parsed XML/XHTML tree.
    Tree,
}

/// The per-run input handed to an extractor, one variant per [`InputShape`].
pub enum DocumentInput<'a> {
    Blind {
        iri: &'a NamedNode,
    },
    Content {
        bytes: &'a [u8],
        charset: Option<&'static Encoding>,
    },
    Tree {
        tree: &'a roxmltree::Document<'a>,
    },
}

/// A single-format extraction rule.
///
/// Implementations are stateless per call: the catalog's factory produces a
/// fresh instance for every run. All output flows through the
/// [`ExtractionSink`], which pins the run's context; recoverable problems
/// in the input are reported as issues on the sink, while a return of
/// `ExtractionError::Failed` marks the whole run as fatally failed.
pub trait Extractor: Send + Sync {
    fn run(
        &self,
        params: &ExtractionParameters,
        context: &ExtractionContext,
        input: DocumentInput<'_>,
        out: &mut ExtractionSink<'_>,
    ) -> Result<(), ExtractionError>;
}
