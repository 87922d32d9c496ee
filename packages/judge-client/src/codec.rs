//! Base64 and number conventions of the Judge0 wire format.

use base64::{Engine as _, engine::general_purpose};

/// Encode a text field for a `base64_encoded=true` request.
pub fn encode(text: &str) -> String {
    general_purpose::STANDARD.encode(text.as_bytes())
}

/// Decode a base64 field from the judge.
///
/// Judge0 wraps base64 output at 60 columns, so ASCII whitespace is dropped
/// before decoding. Invalid UTF-8 in program output is replaced, not rejected.
pub fn decode(encoded: &str) -> Option<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = general_purpose::STANDARD.decode(compact).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Convert judge-reported seconds into whole milliseconds.
pub fn seconds_to_ms(seconds: f64) -> Option<i32> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let ms = (seconds * 1000.0).round();
    if ms > i32::MAX as f64 {
        return None;
    }
    Some(ms as i32)
}
