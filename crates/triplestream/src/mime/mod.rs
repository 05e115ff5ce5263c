//! Media type handling: the [`MimeType`] value object, pre-sniff stream
//! purifiers, content-based type detection, and accept-header construction.

pub mod accept;
pub mod detector;
pub mod purifier;

pub use accept::build_accept_header;
pub use detector::MimeTypeDetector;
pub use purifier::{BomPurifier, Purifier, WhitespacePurifier};

use crate::{Result, TriplestreamError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The fallback type for content nothing else can identify.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// A media type with optional wildcard components and a quality weight.
///
/// The weight (`q`) lives in `(0, 1]` and defaults to 1.0; it is stored in
/// thousandths so that values compare and hash exactly. Either component may
/// be a wildcard, but a wildcard major type forces a wildcard minor type
/// (`*/*` is valid, `*/csv` is not).
///
/// Ordering follows negotiation preference: a fully specific type beats a
/// minor-type wildcard, which beats `*/*`; ties are broken by weight. Use
/// descending sorts to obtain preference order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType {
    major: Option<String>,
    minor: Option<String>,
    quality: u16,
}

impl MimeType {
    /// A fully specific type with weight 1.0.
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        Self {
            major: Some(major.into().to_ascii_lowercase()),
            minor: Some(minor.into().to_ascii_lowercase()),
            quality: 1000,
        }
    }

    /// The `*/*` wildcard with weight 1.0.
    pub fn any() -> Self {
        Self {
            major: None,
            minor: None,
            quality: 1000,
        }
    }

    /// A `major/*` wildcard with weight 1.0.
    pub fn any_minor(major: impl Into<String>) -> Self {
        Self {
            major: Some(major.into().to_ascii_lowercase()),
            minor: None,
            quality: 1000,
        }
    }

    /// The "unknown content" fallback, `application/octet-stream`.
    pub fn unknown() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Set the quality weight. Values outside `(0, 1]` are clamped to 1.0,
    /// matching the parser's behavior for out-of-range `q` parameters.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality_to_thousandths(f64::from(quality));
        self
    }

    pub(crate) fn quality_thousandths(&self) -> u16 {
        self.quality
    }

    /// Parse a `type/subtype[;q=x.y]` string.
    ///
    /// Parameters other than `q` are ignored; an unparseable or
    /// out-of-range `q` falls back to 1.0. Returns an error when the
    /// `type/subtype` shape is missing, a component is empty, or a wildcard
    /// major type is combined with a concrete minor type.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (type_part, params) = match input.find(';') {
            Some(i) => (&input[..i], Some(&input[i + 1..])),
            None => (input, None),
        };

        let mut quality = 1000u16;
        if let Some(params) = params {
            for param in params.split(';') {
                let Some(eq) = param.find('=') else { continue };
                if param[..eq].trim().to_ascii_lowercase() != "q" {
                    continue;
                }
                if let Ok(q) = param[eq + 1..].trim().parse::<f64>() {
                    quality = quality_to_thousandths(q);
                }
            }
        }

        let Some(slash) = type_part.find('/') else {
            return Err(TriplestreamError::MimeParse(input.to_string()));
        };
        let major = type_part[..slash].trim().to_ascii_lowercase();
        let minor = type_part[slash + 1..].trim().to_ascii_lowercase();
        if major.is_empty() || minor.is_empty() {
            return Err(TriplestreamError::MimeParse(input.to_string()));
        }

        if major == "*" {
            if minor != "*" {
                return Err(TriplestreamError::MimeParse(input.to_string()));
            }
            return Ok(Self {
                major: None,
                minor: None,
                quality,
            });
        }
        if minor == "*" {
            return Ok(Self {
                major: Some(major),
                minor: None,
                quality,
            });
        }
        Ok(Self {
            major: Some(major),
            minor: Some(minor),
            quality,
        })
    }

    pub fn major_type(&self) -> &str {
        self.major.as_deref().unwrap_or("*")
    }

    pub fn minor_type(&self) -> &str {
        self.minor.as_deref().unwrap_or("*")
    }

    /// `major/minor` without the weight suffix.
    pub fn full_type(&self) -> String {
        format!("{}/{}", self.major_type(), self.minor_type())
    }

    /// The quality weight in `(0, 1]`.
    pub fn quality(&self) -> f32 {
        self.quality as f32 / 1000.0
    }

    pub fn is_any_major(&self) -> bool {
        self.major.is_none()
    }

    pub fn is_any_minor(&self) -> bool {
        self.minor.is_none()
    }

    /// 2 for a fully specific type, 1 for `major/*`, 0 for `*/*`.
    pub fn specificity(&self) -> u8 {
        match (&self.major, &self.minor) {
            (Some(_), Some(_)) => 2,
            (Some(_), None) => 1,
            _ => 0,
        }
    }

    /// Wildcard match of `self` (a supported/declared pattern) against a
    /// concrete sniffed type. Weights play no role in matching.
    pub fn matches(&self, concrete: &MimeType) -> bool {
        if self.is_any_major() {
            return true;
        }
        if self.major_type() != concrete.major_type() {
            return false;
        }
        self.is_any_minor() || self.minor_type() == concrete.minor_type()
    }
}

fn quality_to_thousandths(q: f64) -> u16 {
    if !q.is_finite() || q <= 0.0 || q > 1.0 {
        return 1000;
    }
    ((q * 1000.0).round() as u16).clamp(1, 1000)
}

pub(crate) fn format_quality(thousandths: u16) -> String {
    format!("{}", f64::from(thousandths) / 1000.0)
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quality == 1000 {
            write!(f, "{}", self.full_type())
        } else {
            write!(f, "{};q={}", self.full_type(), format_quality(self.quality))
        }
    }
}

impl FromStr for MimeType {
    type Err = TriplestreamError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for MimeType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.specificity()
            .cmp(&other.specificity())
            .then_with(|| self.quality.cmp(&other.quality))
            .then_with(|| other.full_type().cmp(&self.full_type()))
    }
}

impl PartialOrd for MimeType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
