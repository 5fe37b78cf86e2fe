//! Error types for JWT creation, decoding and verification
//!
//! Failures fall into three kinds that are never conflated:
//! - [`DecodeError`]: the token text is not a well-formed compact JWT
//! - [`SignatureError`]: signing failed or the signature does not verify
//! - [`ClaimError`]: a claim is missing, the algorithm does not match, or
//!   a claim fails a configured assertion
//!
//! Misconfiguration (empty secrets, absent keys) is reported as
//! [`Error::InvalidArgument`] when the [`Algorithm`](crate::Algorithm) is
//! built, never later at sign or verify time.

use thiserror::Error;

/// Umbrella error for every jwtkit operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// Rejected configuration, raised when an algorithm or builder is set up
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A token could not be assembled
    #[error("Token creation failed: {0}")]
    Creation(String),
}

/// The token text is not a well-formed compact JWT
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("The token was expected to have 3 parts, but got {found}")]
    SegmentCount { found: usize },

    #[error("The token is too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("The {segment} segment of the token is empty")]
    EmptySegment { segment: Segment },

    #[error("The {segment} segment is too large: {size} bytes (maximum: {max} bytes)")]
    TooLarge {
        segment: Segment,
        size: usize,
        max: usize,
    },

    #[error("The {segment} segment doesn't have a valid Base64URL encoding: {reason}")]
    InvalidBase64 { segment: Segment, reason: String },

    #[error("The {segment} segment doesn't have a valid JSON format: {reason}")]
    InvalidJson { segment: Segment, reason: String },

    #[error("The {segment} segment is not a JSON object")]
    NotAnObject { segment: Segment },

    #[error("The registered claim '{claim}' is malformed: {reason}")]
    RegisteredClaim { claim: String, reason: String },
}

/// Signing failed or a signature did not verify
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Covers cryptographic mismatch, wrong length, bad encoding and
    /// provider failures alike
    #[error("The Token's Signature resulted invalid when verified using the Algorithm: {algorithm}")]
    Verification { algorithm: String },

    #[error("The Token's Signature couldn't be generated when signing using the Algorithm: {algorithm} ({reason})")]
    Generation { algorithm: String, reason: String },

    /// Structural problem in a JOSE or DER signature encoding
    #[error("Malformed signature encoding: {0}")]
    Malformed(String),
}

/// A claim is missing, the algorithm does not match, or a claim assertion failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("The Claim '{claim}' is not present in the token")]
    Missing { claim: String },

    #[error("The provided Algorithm '{expected}' doesn't match the one defined in the JWT's Header: {found:?}")]
    AlgorithmMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("The Claim '{claim}' value doesn't match the required one (actual: {actual})")]
    Invalid { claim: String, actual: String },

    #[error("The Token has expired: '{claim}' was {at}")]
    Expired { claim: String, at: i64 },

    #[error("The Token can't be used before {at} ('{claim}')")]
    NotYetValid { claim: String, at: i64 },
}

/// Segment of a compact token, used to locate decode failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
    Signature,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Header => write!(f, "header"),
            Segment::Payload => write!(f, "payload"),
            Segment::Signature => write!(f, "signature"),
        }
    }
}

/// Result type alias for jwtkit operations
pub type Result<T> = std::result::Result<T, Error>;
