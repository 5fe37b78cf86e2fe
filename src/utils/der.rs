//! ECDSA signature re-encoding between JOSE and ASN.1 DER
//!
//! JWS (RFC 7518 Section 3.4) carries an ECDSA signature as the fixed-length
//! big-endian concatenation `R || S`, each half exactly as wide as the curve
//! order. The signing provider works with the DER form instead:
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE {
//!     r INTEGER,
//!     s INTEGER
//! }
//! ```
//!
//! Only public values pass through here, so branching on the bytes is fine.

use crate::error::SignatureError;
use std::borrow::Cow;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;
/// Long-form length marker for a single length byte
const LONG_FORM_1: u8 = 0x81;

fn malformed(reason: impl Into<String>) -> SignatureError {
    SignatureError::Malformed(reason.into())
}

/// Heuristic check for a signature that is already DER encoded
///
/// A JOSE signature is always exactly `2 * field_len` bytes long; a DER
/// signature starts with a SEQUENCE tag and its length varies with the
/// integer padding. A DER value that happens to be exactly `2 * field_len`
/// bytes is treated as JOSE.
pub fn is_der(signature: &[u8], field_len: usize) -> bool {
    signature.first() == Some(&SEQUENCE_TAG) && signature.len() != 2 * field_len
}

/// Convert a fixed-length JOSE `R || S` signature into DER
///
/// `field_len` is the curve's byte length: 32 for P-256, 48 for P-384 and
/// 66 for P-521.
pub fn jose_to_der(jose: &[u8], field_len: usize) -> Result<Vec<u8>, SignatureError> {
    if field_len == 0 || jose.len() != 2 * field_len {
        return Err(malformed(format!(
            "expected {} bytes, got {}",
            2 * field_len,
            jose.len()
        )));
    }

    let (r, s) = jose.split_at(field_len);
    let r = integer_content(r);
    let s = integer_content(s);

    let content_len = 2 + r.len() + 2 + s.len();
    let mut der = Vec::with_capacity(3 + content_len);
    der.push(SEQUENCE_TAG);
    if content_len > 0xff {
        return Err(malformed(format!(
            "content length {content_len} doesn't fit a single length byte"
        )));
    } else if content_len > 0x7f {
        der.push(LONG_FORM_1);
    }
    der.push(content_len as u8);

    for int in [r, s] {
        der.push(INTEGER_TAG);
        der.push(int.len() as u8);
        der.extend_from_slice(&int);
    }

    Ok(der)
}

/// Minimal unsigned INTEGER content for one fixed-width field
///
/// Leading zeros are stripped, but one is kept (or added) when the first
/// significant byte has its high bit set, so the value is not read as
/// negative.
fn integer_content(field: &[u8]) -> Cow<'_, [u8]> {
    let zeros = field.iter().take_while(|&&b| b == 0).count();

    if zeros == field.len() {
        // Zero value encodes as a single 0x00 content byte
        return Cow::Borrowed(&field[field.len() - 1..]);
    }

    if field[zeros] & 0x80 != 0 {
        if zeros > 0 {
            Cow::Borrowed(&field[zeros - 1..])
        } else {
            let mut padded = Vec::with_capacity(field.len() + 1);
            padded.push(0x00);
            padded.extend_from_slice(field);
            Cow::Owned(padded)
        }
    } else {
        Cow::Borrowed(&field[zeros..])
    }
}

/// Convert a DER ECDSA signature into the fixed-length JOSE `R || S` form
pub fn der_to_jose(der: &[u8], field_len: usize) -> Result<Vec<u8>, SignatureError> {
    if field_len == 0 {
        return Err(malformed("field length must be positive"));
    }
    if der.len() < 2 || der[0] != SEQUENCE_TAG {
        return Err(malformed("missing SEQUENCE tag"));
    }

    let (content_len, mut offset) = match der[1] {
        len if len < 0x80 => (len as usize, 2),
        LONG_FORM_1 if der.len() > 2 => (der[2] as usize, 3),
        _ => return Err(malformed("unsupported SEQUENCE length encoding")),
    };

    if offset + content_len != der.len() {
        return Err(malformed(format!(
            "SEQUENCE length {content_len} doesn't match {} remaining bytes",
            der.len() - offset
        )));
    }

    let mut jose = vec![0u8; 2 * field_len];
    for half in jose.chunks_exact_mut(field_len) {
        let int = read_integer(der, &mut offset)?;
        let int = strip_leading_zeros(int, field_len)?;
        half[field_len - int.len()..].copy_from_slice(int);
    }

    if offset != der.len() {
        return Err(malformed("trailing bytes after S"));
    }

    Ok(jose)
}

/// Read one INTEGER TLV starting at `offset`, advancing past it
fn read_integer<'a>(der: &'a [u8], offset: &mut usize) -> Result<&'a [u8], SignatureError> {
    let header = der
        .get(*offset..*offset + 2)
        .ok_or_else(|| malformed("truncated INTEGER"))?;

    if header[0] != INTEGER_TAG {
        return Err(malformed(format!("expected INTEGER tag, found {:#04x}", header[0])));
    }

    let len = header[1] as usize;
    if len == 0 || len >= 0x80 {
        return Err(malformed(format!("unsupported INTEGER length {len}")));
    }

    let start = *offset + 2;
    let value = der
        .get(start..start + len)
        .ok_or_else(|| malformed("truncated INTEGER"))?;
    *offset = start + len;

    Ok(value)
}

/// Drop sign padding so the integer fits a `field_len` wide field
fn strip_leading_zeros(int: &[u8], field_len: usize) -> Result<&[u8], SignatureError> {
    let mut int = int;
    while int.len() > field_len && int[0] == 0 {
        int = &int[1..];
    }

    if int.len() > field_len {
        return Err(malformed(format!(
            "INTEGER of {} bytes exceeds field length {field_len}",
            int.len()
        )));
    }

    Ok(int)
}
