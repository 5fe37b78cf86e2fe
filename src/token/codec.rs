use super::{DecodedToken, Header, Payload};
use crate::algorithm::Algorithm;
use crate::claims::ClaimTree;
use crate::error::{DecodeError, Error, Result, Segment};
use crate::limits::{
    MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_DECODED_SIGNATURE_SIZE,
    MAX_TOKEN_LENGTH,
};
use crate::utils::base64url;

use serde_json::{Map, Value};

/// Split and decode a compact token without verifying it
///
/// The header and payload must each be a Base64URL encoded JSON object.
/// The signature segment may be empty, which is how unsigned (`none`)
/// tokens are written.
///
/// # Errors
/// A [`DecodeError`] for a wrong segment count, bad Base64URL, anything
/// other than a JSON object in the first two segments, or a malformed
/// registered claim. No cryptographic work happens here.
pub fn decode(token: &str) -> std::result::Result<DecodedToken, DecodeError> {
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(DecodeError::TokenTooLarge {
            size: token.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    let parts: Vec<&str> = token.split('.').collect();
    let [header_b64, payload_b64, signature_b64] = parts[..] else {
        return Err(DecodeError::SegmentCount { found: parts.len() });
    };

    if header_b64.is_empty() {
        return Err(DecodeError::EmptySegment {
            segment: Segment::Header,
        });
    }
    if payload_b64.is_empty() {
        return Err(DecodeError::EmptySegment {
            segment: Segment::Payload,
        });
    }

    let header_json =
        base64url::decode_segment_string(header_b64, Segment::Header, MAX_DECODED_HEADER_SIZE)?;
    let payload_json =
        base64url::decode_segment_string(payload_b64, Segment::Payload, MAX_DECODED_PAYLOAD_SIZE)?;

    let header = Header::new(parse_object(&header_json, Segment::Header)?);
    let payload = Payload::new(parse_object(&payload_json, Segment::Payload)?)?;

    let signature = base64url::decode_segment(
        signature_b64,
        Segment::Signature,
        MAX_DECODED_SIGNATURE_SIZE,
    )?;

    let header_end = header_b64.len();
    let payload_end = header_end + 1 + payload_b64.len();

    Ok(DecodedToken::new(
        token.to_string(),
        header_end,
        payload_end,
        header,
        payload,
        signature,
    ))
}

/// Parse a segment as a JSON object
///
/// The braces check runs first so that no other kind of JSON document
/// reaches the parser.
fn parse_object(json: &str, segment: Segment) -> std::result::Result<ClaimTree, DecodeError> {
    if !(json.starts_with('{') && json.ends_with('}')) {
        return Err(DecodeError::NotAnObject { segment });
    }

    serde_json::from_str::<Map<String, Value>>(json)
        .map(ClaimTree::from_map)
        .map_err(|e| DecodeError::InvalidJson {
            segment,
            reason: e.to_string(),
        })
}

/// Serialize, sign and join a header and payload into a compact token
///
/// The header is written as given; [`TokenBuilder`](super::TokenBuilder)
/// takes care of `alg` and `typ`.
pub(crate) fn encode(
    header: &Map<String, Value>,
    payload: &Map<String, Value>,
    algorithm: &Algorithm,
) -> Result<String> {
    let header_json = serde_json::to_string(header)
        .map_err(|e| Error::Creation(format!("Couldn't serialize the header: {e}")))?;
    let payload_json = serde_json::to_string(payload)
        .map_err(|e| Error::Creation(format!("Couldn't serialize the payload: {e}")))?;

    let signing_input = format!(
        "{}.{}",
        base64url::encode(&header_json),
        base64url::encode(&payload_json)
    );

    let signature = algorithm.sign(signing_input.as_bytes())?;
    Ok(format!("{signing_input}.{}", base64url::encode_bytes(signature)))
}
