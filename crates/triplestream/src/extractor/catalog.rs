//! The extractor catalog.
//!
//! An explicitly constructed, immutable-after-setup mapping from extractor
//! name to descriptor. Catalogs are passed by reference into each
//! orchestrator instance and shared read-only across threads; there is no
//! global registry.

use super::descriptor::ExtractorDescriptor;
use crate::mime::{build_accept_header, MimeType};
use crate::{Result, TriplestreamError};
use std::collections::BTreeMap;

/// Name-keyed set of extractor descriptors.
///
/// Names are unique; registration of a duplicate fails fast with a
/// `Configuration` error. Iteration and selection results are in ascending
/// name order, which keeps extractor execution deterministic.
#[derive(Debug, Default, Clone)]
pub struct ExtractorCatalog {
    descriptors: BTreeMap<String, ExtractorDescriptor>,
}

impl ExtractorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Fails on a duplicate name.
    pub fn register(&mut self, descriptor: ExtractorDescriptor) -> Result<()> {
        let name = descriptor.name().to_string();
        if self.descriptors.contains_key(&name) {
            return Err(TriplestreamError::configuration(format!(
                "duplicate extractor name: {name}"
            )));
        }
        self.descriptors.insert(name, descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ExtractorDescriptor> {
        self.descriptors.get(name)
    }

    /// Descriptors in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtractorDescriptor> {
        self.descriptors.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// A catalog containing only the named extractors. Fails on an unknown
    /// name.
    pub fn subset(&self, names: &[&str]) -> Result<ExtractorCatalog> {
        let mut subset = ExtractorCatalog::new();
        for name in names {
            let descriptor = self.get(name).ok_or_else(|| {
                TriplestreamError::configuration(format!("unknown extractor name: {name}"))
            })?;
            subset.register(descriptor.clone())?;
        }
        Ok(subset)
    }

    /// Every descriptor whose supported types match the given concrete
    /// type by the wildcard rule, in ascending name order. Weights do not
    /// influence selection, only the negotiation header.
    pub fn matching_extractors(&self, mime: &MimeType) -> Vec<&ExtractorDescriptor> {
        self.iter().filter(|d| d.supports(mime)).collect()
    }

    /// Whether every registered extractor accepts any content (`*/*`), in
    /// which case content-type detection cannot narrow the selection.
    pub fn all_accept_any_content(&self) -> bool {
        self.iter().all(ExtractorDescriptor::accepts_any_content)
    }

    /// The combined accept header over all descriptors' supported types.
    /// `None` when the catalog is empty or no descriptor declares a type.
    pub fn accept_header(&self) -> Option<String> {
        accept_header_for(self.iter())
    }
}

/// Accept header for an arbitrary set of descriptors (e.g. a filtered
/// selection), merged with the same weight rules as
/// [`build_accept_header`].
pub fn accept_header_for<'a, I>(descriptors: I) -> Option<String>
where
    I: IntoIterator<Item = &'a ExtractorDescriptor>,
{
    build_accept_header(
        descriptors
            .into_iter()
            .flat_map(|d| d.supported_types().iter().cloned()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionParameters;
    use crate::extractor::{
        DocumentInput, ExtractionContext, ExtractionError, ExtractionSink, Extractor, InputShape,
    };

    struct NoopExtractor;

    impl Extractor for NoopExtractor {
        fn run(
            &self,
            _params: &ExtractionParameters,
            _context: &ExtractionContext,
            _input: DocumentInput<'_>,
            _out: &mut ExtractionSink<'_>,
        ) -> std::result::Result<(), ExtractionError> {
            Ok(())
        }
    }

    fn descriptor(name: &str, types: &[&str]) -> ExtractorDescriptor {
        let mut desc =
            ExtractorDescriptor::new(name, InputShape::Content, || Box::new(NoopExtractor));
        for t in types {
            desc = desc.with_supported_type(MimeType::parse(t).unwrap());
        }
        desc
    }

    fn scenario_catalog() -> ExtractorCatalog {
        let mut catalog = ExtractorCatalog::new();
        catalog.register(descriptor("csv", &["text/csv;q=1.0"])).unwrap();
        catalog.register(descriptor("generic", &["*/*;q=0.01"])).unwrap();
        catalog
    }

    #[test]
    fn duplicate_names_fail_fast() {
        let mut catalog = ExtractorCatalog::new();
        catalog.register(descriptor("csv", &["text/csv"])).unwrap();
        let err = catalog.register(descriptor("csv", &["text/csv"])).unwrap_err();
        assert!(matches!(err, TriplestreamError::Configuration { .. }));
    }

    #[test]
    fn subset_by_name() {
        let catalog = scenario_catalog();
        let subset = catalog.subset(&["csv"]).unwrap();
        assert_eq!(subset.len(), 1);
        assert!(subset.get("csv").is_some());

        let err = catalog.subset(&["nope"]).unwrap_err();
        assert!(matches!(err, TriplestreamError::Configuration { .. }));
    }

    #[test]
    fn selection_is_by_match_in_name_order() {
        let mut catalog = ExtractorCatalog::new();
        catalog.register(descriptor("zeta", &["text/*"])).unwrap();
        catalog.register(descriptor("alpha", &["text/csv"])).unwrap();
        catalog.register(descriptor("mid", &["image/png"])).unwrap();

        let matching = catalog.matching_extractors(&MimeType::new("text", "csv"));
        let names: Vec<&str> = matching.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn both_extractors_match_csv() {
        let catalog = scenario_catalog();
        let matching = catalog.matching_extractors(&MimeType::new("text", "csv"));
        assert_eq!(matching.len(), 2);
    }

    #[test]
    fn wildcard_extractor_matches_unknown() {
        let catalog = scenario_catalog();
        let matching = catalog.matching_extractors(&MimeType::unknown());
        let names: Vec<&str> = matching.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["generic"]);
    }

    #[test]
    fn identical_types_with_different_weights_are_both_eligible() {
        let mut catalog = ExtractorCatalog::new();
        catalog.register(descriptor("a", &["text/csv;q=0.9"])).unwrap();
        catalog.register(descriptor("b", &["text/csv;q=0.1"])).unwrap();
        let matching = catalog.matching_extractors(&MimeType::new("text", "csv"));
        assert_eq!(matching.len(), 2);
    }

    #[test]
    fn wildcard_matches_are_a_superset_of_specific_matches() {
        let mut catalog = ExtractorCatalog::new();
        catalog.register(descriptor("any", &["*/*"])).unwrap();
        catalog.register(descriptor("text", &["text/*"])).unwrap();
        catalog.register(descriptor("csv", &["text/csv"])).unwrap();

        // Every extractor matching the specific type also matches when the
        // sniffed type is exactly what its wildcard covers.
        let specific: Vec<&str> = catalog
            .matching_extractors(&MimeType::new("text", "csv"))
            .iter()
            .map(|d| d.name())
            .collect();
        assert_eq!(specific, vec!["any", "csv", "text"]);
    }

    #[test]
    fn scenario_accept_header() {
        let catalog = scenario_catalog();
        assert_eq!(catalog.accept_header().as_deref(), Some("text/csv, */*;q=0.01"));
    }

    #[test]
    fn empty_catalog_has_no_header() {
        assert_eq!(ExtractorCatalog::new().accept_header(), None);
    }

    #[test]
    fn all_accept_any_content() {
        let mut catalog = ExtractorCatalog::new();
        catalog.register(descriptor("a", &["*/*"])).unwrap();
        catalog.register(descriptor("b", &["*/*;q=0.5"])).unwrap();
        assert!(catalog.all_accept_any_content());

        catalog.register(descriptor("c", &["text/csv"])).unwrap();
        assert!(!catalog.all_accept_any_content());
    }
}
