//! Error types for Triplestream.
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! is [`TriplestreamError`]. The variants follow the engine's failure
//! taxonomy:
//!
//! - `Source` - the document itself could not be opened or read; the whole
//!   document is aborted and no partial output is produced
//! - `Extraction` - extraction-level failure (e.g. every selected extractor
//!   failed fatally while `stop_at_first_error` was set)
//! - `Handler` - a sink rejected a triple, namespace, or context call;
//!   output integrity cannot be repaired locally, so the rest of the
//!   document is aborted
//! - `Configuration` - malformed catalog or parameter setup; raised at
//!   registration/load time, never during per-document processing
//!
//! Recoverable per-extractor failures are *not* errors: they are recorded as
//! [`Issue`](crate::extractor::Issue)s on the extraction report and the
//! remaining extractors still run.

use thiserror::Error;

/// Result type alias using [`TriplestreamError`].
pub type Result<T> = std::result::Result<T, TriplestreamError>;

/// Main error type for all Triplestream operations.
#[derive(Debug, Error)]
pub enum TriplestreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document source could not be opened or read.
    #[error("source error: {message}")]
    Source {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Extraction-level failure for one document.
    #[error("extraction error: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A triple handler in the output chain failed.
    #[error(transparent)]
    Handler(#[from] crate::handler::HandlerError),

    /// Malformed extractor, catalog, or parameter registration.
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("cannot parse MIME type (expected type/subtype[;q=x.y] format): {0}")]
    MimeParse(String),

    #[error("invalid IRI: {0}")]
    InvalidIri(#[from] oxrdf::IriParseError),
}

impl TriplestreamError {
    /// Create a `Source` error.
    pub fn source<S: Into<String>>(message: S) -> Self {
        Self::Source {
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Source` error with an underlying cause.
    pub fn source_with<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an `Extraction` error.
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction {
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Configuration` error.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Configuration` error with an underlying cause.
    pub fn configuration_with<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TriplestreamError = io_err.into();
        assert!(matches!(err, TriplestreamError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn source_error() {
        let err = TriplestreamError::source("cannot open document");
        assert_eq!(err.to_string(), "source error: cannot open document");
    }

    #[test]
    fn source_error_with_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TriplestreamError::source_with("cannot open document", cause);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn configuration_error() {
        let err = TriplestreamError::configuration("duplicate extractor name: csv");
        assert_eq!(
            err.to_string(),
            "configuration error: duplicate extractor name: csv"
        );
    }

    #[test]
    fn handler_error_is_transparent() {
        let err: TriplestreamError = crate::handler::HandlerError::message("sink refused").into();
        assert_eq!(err.to_string(), "triple handler error: sink refused");
    }

    #[test]
    fn invalid_iri_from() {
        let parse_err = oxrdf::NamedNode::new("no scheme").unwrap_err();
        let err: TriplestreamError = parse_err.into();
        assert!(matches!(err, TriplestreamError::InvalidIri(_)));
    }
}
