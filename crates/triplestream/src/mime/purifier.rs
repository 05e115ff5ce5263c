//! Pre-sniff byte-stream cleanup.
//!
//! Purifiers run over the sniff buffer before any detection step and remove
//! leading noise that would defeat magic-byte matching, such as blank lines
//! in front of an XML declaration.

/// In-place cleanup of the sniff buffer prior to MIME detection.
pub trait Purifier: Send + Sync {
    fn purify(&self, head: &mut Vec<u8>);
}

/// Strips leading ASCII whitespace and control bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespacePurifier;

impl Purifier for WhitespacePurifier {
    fn purify(&self, head: &mut Vec<u8>) {
        let skip = head
            .iter()
            .take_while(|b| b.is_ascii_whitespace() || b.is_ascii_control())
            .count();
        if skip > 0 {
            head.drain(..skip);
        }
    }
}

/// Strips a UTF-8 byte order mark.
#[derive(Debug, Default, Clone, Copy)]
pub struct BomPurifier;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

impl Purifier for BomPurifier {
    fn purify(&self, head: &mut Vec<u8>) {
        if head.starts_with(UTF8_BOM) {
            head.drain(..UTF8_BOM.len());
        }
    }
}
