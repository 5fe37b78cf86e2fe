//! Unpadded Base64URL for token segments
//!
//! Decoding enforces a per-segment size cap. The `URL_SAFE_NO_PAD` engine
//! refuses padding and non-zero trailing bits, so every segment has exactly
//! one accepted spelling.

use crate::error::{DecodeError, Segment};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes to Base64URL string
pub fn encode_bytes(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode a Base64URL segment to bytes with maximum size limit
pub(crate) fn decode_segment(
    input: &str,
    segment: Segment,
    max_size: usize,
) -> Result<Vec<u8>, DecodeError> {
    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| DecodeError::InvalidBase64 {
            segment,
            reason: e.to_string(),
        })?;

    if result.len() > max_size {
        return Err(DecodeError::TooLarge {
            segment,
            size: result.len(),
            max: max_size,
        });
    }

    Ok(result)
}

/// Decode a Base64URL segment to a UTF-8 string with size limit
///
/// Bytes that decode cleanly but are not UTF-8 can't be JSON text, so they
/// are reported as [`DecodeError::InvalidJson`].
pub(crate) fn decode_segment_string(
    input: &str,
    segment: Segment,
    max_size: usize,
) -> Result<String, DecodeError> {
    decode_segment(input, segment, max_size).and_then(|bytes| {
        String::from_utf8(bytes).map_err(|e| DecodeError::InvalidJson {
            segment,
            reason: format!("Invalid UTF-8: {e}"),
        })
    })
}
