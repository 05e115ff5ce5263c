//! Extraction contexts.

use super::descriptor::Prefixes;
use oxrdf::NamedNode;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// The scope of one extractor's single run over one document.
///
/// One context is created per run, scoped to exactly one document, opened
/// once and closed exactly once in the handler pipeline, and never reused.
/// Identity is the unique id: two contexts with the same id address the
/// same open/close frame.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    extractor_name: String,
    document_iri: NamedNode,
    unique_id: String,
    prefixes: Prefixes,
}

impl ExtractionContext {
    /// A context with a random unique-id suffix.
    pub fn new(
        extractor_name: impl Into<String>,
        document_iri: NamedNode,
        prefixes: Prefixes,
    ) -> Self {
        Self::with_suffix(extractor_name, document_iri, prefixes, Uuid::new_v4())
    }

    /// A context with a caller-chosen unique-id suffix.
    pub fn with_suffix(
        extractor_name: impl Into<String>,
        document_iri: NamedNode,
        prefixes: Prefixes,
        suffix: impl ToString,
    ) -> Self {
        let extractor_name = extractor_name.into();
        let unique_id = format!(
            "{}:{}:{}",
            document_iri.as_str(),
            extractor_name,
            suffix.to_string()
        );
        Self {
            extractor_name,
            document_iri,
            unique_id,
            prefixes,
        }
    }

    pub fn extractor_name(&self) -> &str {
        &self.extractor_name
    }

    pub fn document_iri(&self) -> &NamedNode {
        &self.document_iri
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }
}

impl PartialEq for ExtractionContext {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id == other.unique_id
    }
}

impl Eq for ExtractionContext {}

impl Hash for ExtractionContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unique_id.hash(state);
    }
}
