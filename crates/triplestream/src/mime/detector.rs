//! Content-based MIME type detection.
//!
//! Detection runs a purifier pipeline over a bounded sniff window, then a
//! chain of detectors where the first non-null result wins. Evidence is
//! consulted from strongest to weakest: magic bytes, then content
//! heuristics (markup roots, RDF statement patterns, delimiter-consistent
//! CSV), then the declared metadata type, then the filename-extension hint.
//! When nothing matches, [`MimeType::unknown`] is returned.

use super::purifier::{BomPurifier, Purifier, WhitespacePurifier};
use super::{MimeType, UNKNOWN_MIME_TYPE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

pub const HTML_MIME_TYPE: &str = "text/html";
pub const XHTML_MIME_TYPE: &str = "application/xhtml+xml";
pub const XML_MIME_TYPE: &str = "application/xml";
pub const RDF_XML_MIME_TYPE: &str = "application/rdf+xml";
pub const NTRIPLES_MIME_TYPE: &str = "application/n-triples";
pub const NQUADS_MIME_TYPE: &str = "application/n-quads";
pub const TURTLE_MIME_TYPE: &str = "text/turtle";
pub const JSONLD_MIME_TYPE: &str = "application/ld+json";
pub const CSV_MIME_TYPE: &str = "text/csv";
pub const TSV_MIME_TYPE: &str = "text/tab-separated-values";

/// IRI-object statement, four terms for quads and three for triples.
static NQUADS_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[^>]*>\s*<[^>]*>\s*<[^>]*>\s*<[^>]*>\s*\."#).unwrap()
});
static NQUADS_LITERAL_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[^>]*>\s*<[^>]*>\s*"[^"]*"(\^\^<[^>]*>|@[A-Za-z0-9-]+)?\s*<[^>]*>\s*\."#)
        .unwrap()
});
static NTRIPLES_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[^>]*>\s*<[^>]*>\s*<[^>]*>\s*\."#).unwrap()
});
static NTRIPLES_LITERAL_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[^>]*>\s*<[^>]*>\s*"[^"]*"(\^\^<[^>]*>|@[A-Za-z0-9-]+)?\s*\."#).unwrap()
});
static TURTLE_PROLOGUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^\s*(@prefix|@base|prefix\s+[A-Za-z0-9_-]*:\s*<|base\s+<)").unwrap()
});

/// Detects the media type of a document from its leading bytes, the type
/// declared by its metadata, and its filename.
///
/// ```rust
/// use triplestream::{MimeType, MimeTypeDetector};
///
/// let detector = MimeTypeDetector::new();
/// let mime = detector.detect(None, None, b"  \n<!DOCTYPE html><html></html>");
/// assert_eq!(mime, MimeType::new("text", "html"));
/// ```
pub struct MimeTypeDetector {
    purifiers: Vec<Box<dyn Purifier>>,
    max_sniff_bytes: usize,
}

impl Default for MimeTypeDetector {
    fn default() -> Self {
        Self {
            purifiers: vec![Box::new(BomPurifier), Box::new(WhitespacePurifier)],
            max_sniff_bytes: 2048,
        }
    }
}

impl fmt::Debug for MimeTypeDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimeTypeDetector")
            .field("purifiers", &self.purifiers.len())
            .field("max_sniff_bytes", &self.max_sniff_bytes)
            .finish()
    }
}

impl MimeTypeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sniff window bound.
    pub fn with_max_sniff_bytes(mut self, max_sniff_bytes: usize) -> Self {
        self.max_sniff_bytes = max_sniff_bytes.max(16);
        self
    }

    /// Append a purifier to the cleanup pipeline.
    pub fn with_purifier(mut self, purifier: Box<dyn Purifier>) -> Self {
        self.purifiers.push(purifier);
        self
    }

    /// Best-guess media type for a document.
    ///
    /// `declared` is the type claimed by the transport or container
    /// metadata; `filename_hint` is a bare file name whose extension may be
    /// consulted last. Never fails: unidentifiable content yields
    /// [`MimeType::unknown`].
    pub fn detect(
        &self,
        filename_hint: Option<&str>,
        declared: Option<&MimeType>,
        data: &[u8],
    ) -> MimeType {
        let truncated = data.len() > self.max_sniff_bytes;
        let mut head = data[..data.len().min(self.max_sniff_bytes)].to_vec();
        for purifier in &self.purifiers {
            purifier.purify(&mut head);
        }

        if let Some(mime) = detect_magic(&head) {
            return mime;
        }
        if let Some(mime) = detect_textual(&head, truncated) {
            return mime;
        }
        if let Some(declared) = declared {
            if declared.specificity() == 2 && declared.full_type() != UNKNOWN_MIME_TYPE {
                return MimeType::new(declared.major_type(), declared.minor_type());
            }
        }
        if let Some(mime) = detect_from_filename(filename_hint) {
            return mime;
        }
        MimeType::unknown()
    }
}

/// Magic-byte detection for binary container formats.
fn detect_magic(head: &[u8]) -> Option<MimeType> {
    let kind = infer::get(head)?;
    MimeType::parse(kind.mime_type()).ok()
}

/// Heuristics over the decoded sniff window.
fn detect_textual(head: &[u8], truncated: bool) -> Option<MimeType> {
    let text = String::from_utf8_lossy(head);
    let lower = text.to_ascii_lowercase();

    if lower.starts_with("<?xml") {
        if text.contains("<rdf:RDF") {
            return parse_const(RDF_XML_MIME_TYPE);
        }
        if lower.contains("<html") {
            return parse_const(XHTML_MIME_TYPE);
        }
        return parse_const(XML_MIME_TYPE);
    }
    if text.contains("<rdf:RDF") {
        return parse_const(RDF_XML_MIME_TYPE);
    }
    if lower.contains("<!doctype html") || lower.contains("<html") {
        return parse_const(HTML_MIME_TYPE);
    }
    if NQUADS_STATEMENT.is_match(&text) || NQUADS_LITERAL_STATEMENT.is_match(&text) {
        return parse_const(NQUADS_MIME_TYPE);
    }
    if NTRIPLES_STATEMENT.is_match(&text) || NTRIPLES_LITERAL_STATEMENT.is_match(&text) {
        return parse_const(NTRIPLES_MIME_TYPE);
    }
    if TURTLE_PROLOGUE.is_match(&text) {
        return parse_const(TURTLE_MIME_TYPE);
    }
    let trimmed = text.trim_start();
    if (trimmed.starts_with('{') || trimmed.starts_with('[')) && text.contains("@context") {
        return parse_const(JSONLD_MIME_TYPE);
    }
    detect_delimited(&text, truncated)
}

/// The CSV sniffing contract: at least two complete lines sharing the same
/// non-zero count of one candidate delimiter.
fn detect_delimited(text: &str, truncated: bool) -> Option<MimeType> {
    let mut lines: Vec<&str> = text.lines().collect();
    if truncated && memchr::memrchr(b'\n', text.as_bytes()).is_some() {
        // The last line of a truncated window may be cut mid-record.
        lines.pop();
    }
    lines.retain(|l| !l.trim().is_empty());
    if lines.len() < 2 {
        return None;
    }
    for (delimiter, mime) in [
        (',', CSV_MIME_TYPE),
        (';', CSV_MIME_TYPE),
        ('\t', TSV_MIME_TYPE),
    ] {
        let first = lines[0].matches(delimiter).count();
        if first > 0 && lines.iter().all(|l| l.matches(delimiter).count() == first) {
            return parse_const(mime);
        }
    }
    None
}

fn detect_from_filename(filename_hint: Option<&str>) -> Option<MimeType> {
    let hint = filename_hint?;
    let raw = mime_guess::from_path(hint).first_raw()?;
    let mime = MimeType::parse(raw).ok()?;
    if mime.full_type() == UNKNOWN_MIME_TYPE {
        return None;
    }
    Some(mime)
}

fn parse_const(mime: &str) -> Option<MimeType> {
    MimeType::parse(mime).ok()
}
