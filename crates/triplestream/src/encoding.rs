//! Character-set detection.
//!
//! Detection runs once per document and is advisory: extractors that decode
//! text use the guessed charset, extractors operating on raw bytes ignore
//! it.

use encoding_rs::Encoding;
use std::borrow::Cow;

/// Guesses the character encoding of a byte stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodingDetector;

impl EncodingDetector {
    pub fn new() -> Self {
        Self
    }

    /// Best-guess encoding for the given bytes.
    pub fn guess(&self, data: &[u8]) -> &'static Encoding {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(data, true);
        detector.guess(None, true)
    }

    /// Decode bytes with the given encoding, falling back to UTF-8.
    /// Malformed sequences are replaced, never fatal.
    pub fn decode<'a>(data: &'a [u8], encoding: Option<&'static Encoding>) -> Cow<'a, str> {
        let encoding = encoding.unwrap_or(encoding_rs::UTF_8);
        let (text, _, _) = encoding.decode(data);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_utf8() {
        let detector = EncodingDetector::new();
        let encoding = detector.guess("καλημέρα κόσμε".as_bytes());
        assert_eq!(encoding.name(), "UTF-8");
    }

    #[test]
    fn guesses_legacy_single_byte() {
        let detector = EncodingDetector::new();
        // "café au lait" in Latin-1.
        let bytes = b"caf\xe9 au lait, caf\xe9 cr\xe8me";
        let encoding = detector.guess(bytes);
        assert_ne!(encoding.name(), "UTF-8");
        let decoded = EncodingDetector::decode(bytes, Some(encoding));
        assert!(decoded.contains("café"));
    }

    #[test]
    fn decode_defaults_to_utf8() {
        let decoded = EncodingDetector::decode("plain".as_bytes(), None);
        assert_eq!(decoded, "plain");
    }

    #[test]
    fn decode_replaces_malformed_sequences() {
        let decoded = EncodingDetector::decode(b"ok \xff\xfe", Some(encoding_rs::UTF_8));
        assert!(decoded.starts_with("ok "));
    }
}
