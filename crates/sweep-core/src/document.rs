//! Raw document decoding.
//!
//! Archive documents are JSON stored in an unknown text encoding. Each
//! supported encoding is tried once, in a fixed priority order, and the
//! first one that both decodes and parses as JSON wins.

use crate::error::{CoreError, CoreResult};
use serde_json::Value;
use std::fmt;

/// Text encodings tried when decoding an archive document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16Le,
    Utf16Be,
    Utf8,
}

impl TextEncoding {
    /// Decoding priority
    pub const PRIORITY: [TextEncoding; 3] = [
        TextEncoding::Utf16Le,
        TextEncoding::Utf16Be,
        TextEncoding::Utf8,
    ];

    /// Decode `bytes` strictly, returning `None` on any invalid sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf16Le => write!(f, "utf-16-le"),
            TextEncoding::Utf16Be => write!(f, "utf-16-be"),
            TextEncoding::Utf8 => write!(f, "utf-8"),
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{FEFF}').unwrap_or(s)
}

/// A parsed document together with the encoding that decoded it
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub value: Value,
    pub encoding: TextEncoding,
}

/// Decode a raw archive document into a JSON value.
///
/// `name` is used only for error reporting. Fails with
/// [`CoreError::DocumentUndecodable`] when no encoding yields valid JSON.
pub fn decode_document(name: &str, bytes: &[u8]) -> CoreResult<DecodedDocument> {
    for encoding in TextEncoding::PRIORITY {
        let Some(text) = encoding.decode(bytes) else {
            continue;
        };
        match serde_json::from_str::<Value>(strip_bom(&text)) {
            Ok(value) => {
                log::debug!("Decoded '{}' as {}", name, encoding);
                return Ok(DecodedDocument { value, encoding });
            }
            Err(e) => {
                log::debug!("'{}' is not JSON as {}: {}", name, encoding, e);
            }
        }
    }

    Err(CoreError::DocumentUndecodable {
        document: name.to_string(),
    })
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
