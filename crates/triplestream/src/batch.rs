//! Multi-document extraction.
//!
//! Documents are independent: each gets its own orchestrator instance and
//! its own handler chain, all sharing one read-only catalog. Parallelism is
//! data-parallel over the document list. To funnel every document into a
//! single sink, have the factory hand out clones of a
//! [`SharedHandler`](crate::handler::SharedHandler).

use crate::config::ExtractionParameters;
use crate::extractor::{ExtractionReport, ExtractorCatalog, SingleDocumentExtraction};
use crate::handler::TripleHandler;
use crate::source::DocumentSource;
use crate::Result;
use rayon::prelude::*;

/// Extract every source in parallel, one handler chain per document.
///
/// Results come back in input order. A document's failure occupies its own
/// slot and does not fail the batch. Each per-document handler receives
/// `close` after its document finishes; a shared sink handed out as clones
/// must therefore tolerate one `close` per document.
pub fn extract_all<F, H>(
    catalog: &ExtractorCatalog,
    sources: &[Box<dyn DocumentSource>],
    params: &ExtractionParameters,
    handler_factory: F,
) -> Vec<Result<ExtractionReport>>
where
    F: Fn() -> H + Sync,
    H: TripleHandler,
{
    sources
        .par_iter()
        .map(|source| {
            let mut handler = handler_factory();
            let report = SingleDocumentExtraction::new(source.as_ref(), catalog, &mut handler)
                .with_parameters(params.clone())
                .run()?;
            handler.close()?;
            Ok(report)
        })
        .collect()
}
