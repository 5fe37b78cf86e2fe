//! Upper bounds applied before any JSON parsing or signature math

/// Longest compact token accepted by `decode`, in bytes
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Header JSON after base64url decoding
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Payload JSON after base64url decoding
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 48 * 1024;

/// Raw signature bytes. RSA-8192 produces 1024; ECDSA stays far below.
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;
