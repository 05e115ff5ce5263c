//! Static extractor metadata.

use super::{Extractor, InputShape};
use crate::mime::MimeType;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Namespace prefix declarations carried by a descriptor and copied into
/// every context it opens.
#[derive(Debug, Clone, Default)]
pub struct Prefixes {
    map: IndexMap<String, String>,
}

impl Prefixes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a prefix. Re-declaring an existing prefix replaces it.
    pub fn declare(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.map.insert(prefix.into(), iri.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.map.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Prefixes {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut prefixes = Self::new();
        for (p, i) in pairs {
            prefixes.declare(p, i);
        }
        prefixes
    }
}

type Factory = Arc<dyn Fn() -> Box<dyn Extractor> + Send + Sync>;

/// Static metadata for one extractor: its name, the media types it
/// supports (each with a negotiation weight), the input shape it consumes,
/// and a factory producing a stateless-per-call instance.
///
/// Immutable after registration in a catalog; safe to share across threads.
#[derive(Clone)]
pub struct ExtractorDescriptor {
    name: String,
    supported_types: Vec<MimeType>,
    prefixes: Prefixes,
    example_input: Option<String>,
    input_shape: InputShape,
    factory: Factory,
}

impl fmt::Debug for ExtractorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorDescriptor")
            .field("name", &self.name)
            .field("supported_types", &self.supported_types)
            .field("input_shape", &self.input_shape)
            .field("example_input", &self.example_input)
            .finish()
    }
}

impl ExtractorDescriptor {
    pub fn new<F>(name: impl Into<String>, input_shape: InputShape, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Extractor> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            supported_types: Vec::new(),
            prefixes: Prefixes::new(),
            example_input: None,
            input_shape,
            factory: Arc::new(factory),
        }
    }

    pub fn with_supported_type(mut self, mime: MimeType) -> Self {
        self.supported_types.push(mime);
        self
    }

    pub fn with_supported_types(mut self, types: impl IntoIterator<Item = MimeType>) -> Self {
        self.supported_types.extend(types);
        self
    }

    pub fn with_prefixes(mut self, prefixes: Prefixes) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Path of a bundled sample document exercising this extractor.
    pub fn with_example_input(mut self, path: impl Into<String>) -> Self {
        self.example_input = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supported_types(&self) -> &[MimeType] {
        &self.supported_types
    }

    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    pub fn example_input(&self) -> Option<&str> {
        self.example_input.as_deref()
    }

    pub fn input_shape(&self) -> InputShape {
        self.input_shape
    }

    /// Produce a fresh extractor instance for one run.
    pub fn create(&self) -> Box<dyn Extractor> {
        (self.factory)()
    }

    /// Whether any supported type matches the given concrete type by the
    /// wildcard rule. Weights play no role here.
    pub fn supports(&self, mime: &MimeType) -> bool {
        self.supported_types.iter().any(|t| t.matches(mime))
    }

    /// Whether this extractor accepts any content whatsoever (`*/*`).
    pub fn accepts_any_content(&self) -> bool {
        self.supported_types.iter().any(MimeType::is_any_major)
    }
}
