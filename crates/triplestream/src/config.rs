//! Extraction parameter loading and management.
//!
//! Parameters tune a single extraction run and are handed unchanged to every
//! extractor. They can be created programmatically or loaded from a TOML
//! file; malformed files fail at load time with a `Configuration` error,
//! never during per-document processing.

use crate::{Result, TriplestreamError};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_max_sniff_bytes() -> usize {
    2048
}

/// Tuning knobs applied to one extraction run.
///
/// # Example
///
/// ```rust
/// use triplestream::ExtractionParameters;
///
/// let params = ExtractionParameters::default();
/// assert!(!params.stop_at_first_error);
///
/// let params: ExtractionParameters =
///     ExtractionParameters::from_toml_str("stop_at_first_error = true").unwrap();
/// assert!(params.stop_at_first_error);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionParameters {
    /// Ask extractors to abort their run at the first recoverable parse
    /// error instead of skipping past it. When set, a document whose
    /// selected extractors *all* fail fatally makes the whole run fail.
    #[serde(default)]
    pub stop_at_first_error: bool,

    /// Emit extraction-timestamp and statement-count metadata statements in
    /// a dedicated context after all extractor contexts have closed.
    #[serde(default)]
    pub emit_extraction_metadata: bool,

    /// Upper bound on the number of leading bytes handed to the MIME
    /// sniffer.
    #[serde(default = "default_max_sniff_bytes")]
    pub max_sniff_bytes: usize,
}

impl Default for ExtractionParameters {
    fn default() -> Self {
        Self {
            stop_at_first_error: false,
            emit_extraction_metadata: false,
            max_sniff_bytes: default_max_sniff_bytes(),
        }
    }
}

impl ExtractionParameters {
    /// Load parameters from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TriplestreamError::configuration_with("invalid parameters TOML", e))
    }

    /// Load parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}
