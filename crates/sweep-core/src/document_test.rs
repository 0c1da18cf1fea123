use super::*;

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn utf16be(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
}

#[test]
fn test_decode_utf16le_document() {
    let doc = decode_document("DataModelSchema", &utf16le(r#"{"model":{"tables":[]}}"#)).unwrap();
    assert_eq!(doc.encoding, TextEncoding::Utf16Le);
    assert!(doc.value["model"]["tables"].is_array());
}

#[test]
fn test_decode_utf16le_with_bom() {
    let doc = decode_document("Layout", &utf16le("\u{FEFF}{\"sections\":[]}")).unwrap();
    assert_eq!(doc.encoding, TextEncoding::Utf16Le);
    assert!(doc.value["sections"].is_array());
}

#[test]
fn test_decode_utf16be_document() {
    let doc = decode_document("Layout", &utf16be(r#"{"sections":[]}"#)).unwrap();
    assert_eq!(doc.encoding, TextEncoding::Utf16Be);
}

#[test]
fn test_decode_utf8_document() {
    // Odd length rules out both UTF-16 variants
    let doc = decode_document("Layout", br#"{"a":1}"#).unwrap();
    assert_eq!(doc.encoding, TextEncoding::Utf8);
    assert_eq!(doc.value["a"], 1);
}

#[test]
fn test_decode_utf8_even_length_document() {
    let doc = decode_document("Layout", br#"{"ab":1}"#).unwrap();
    assert_eq!(doc.encoding, TextEncoding::Utf8);
    assert_eq!(doc.value["ab"], 1);
}

#[test]
fn test_decode_utf8_with_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"x": true}"#);
    let doc = decode_document("Layout", &bytes).unwrap();
    assert_eq!(doc.value["x"], true);
}

#[test]
fn test_undecodable_document_is_fatal() {
    let err = decode_document("DataModelSchema", b"not json at all").unwrap_err();
    assert!(matches!(err, CoreError::DocumentUndecodable { ref document } if document == "DataModelSchema"));
}

#[test]
fn test_odd_length_rejected_for_utf16() {
    assert!(TextEncoding::Utf16Le.decode(&[0x41]).is_none());
    assert!(TextEncoding::Utf16Be.decode(&[0x00, 0x41, 0x00]).is_none());
}
