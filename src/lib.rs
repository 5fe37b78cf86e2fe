//! # jwtkit - Issue and Verify JSON Web Tokens
//!
//! **jwtkit** creates and verifies JSON Web Tokens in compact serialization
//! (`header.payload.signature`), signed with HMAC, RSA or ECDSA, or left
//! unsigned on explicit request.
//!
//! ## Overview
//!
//! A compact JWT is three Base64URL segments: a JSON header naming the
//! algorithm, a JSON payload of claims, and the signature over the ASCII
//! text `header.payload`. Verifying one means decoding both JSON objects,
//! making sure the header names the algorithm the verifier expects,
//! checking the signature over the exact original bytes, and then checking
//! the claims the application cares about.
//!
//! **jwtkit** keeps each of those failures separate: a malformed token is a
//! [`DecodeError`], a bad signature a [`SignatureError`], and a wrong
//! algorithm or claim a [`ClaimError`]. Configuration mistakes such as an
//! empty HMAC secret are rejected when the [`Algorithm`] is built, never
//! later.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtkit::Algorithm;
//! use std::time::{Duration, SystemTime};
//!
//! let algorithm = Algorithm::hmac256(b"secret")?;
//!
//! let token = jwtkit::create()
//!     .with_issuer("auth0")
//!     .with_expires_at(SystemTime::now() + Duration::from_secs(600))
//!     .sign(&algorithm)?;
//!
//! let verifier = jwtkit::require(algorithm)
//!     .with_issuer("auth0")
//!     .build();
//!
//! let decoded = verifier.verify(&token)?;
//! assert_eq!(decoded.payload().issuer(), Some("auth0"));
//! ```
//!
//! ## Algorithm Support
//!
//! | Family | Names                 | Key material                         |
//! |--------|-----------------------|--------------------------------------|
//! | none   | `none`                | -                                    |
//! | HMAC   | HS256, HS384, HS512   | shared secret                        |
//! | RSA    | RS256, RS384, RS512   | PKCS#1 public / PKCS#8 private DER   |
//! | ECDSA  | ES256, ES384, ES512   | SEC1 public point / PKCS#8 private   |
//!
//! ECDSA signatures are written in the fixed-length JOSE `R || S` form. On
//! verification, DER-encoded signatures are accepted as well.
//!
//! ## Claims
//!
//! Claims are read through [`ClaimValue`], which tells apart a claim that
//! was never sent ([`ClaimValue::Missing`]) from one sent as JSON `null`
//! ([`ClaimValue::Null`]):
//!
//! ```ignore
//! let role = decoded.payload().get_claim("role");
//! if role.is_null() {
//!     // explicitly cleared by the issuer
//! }
//! let role: Option<&str> = role.as_string()?; // fails only when missing
//! ```
//!
//! ## Security
//!
//! - Verifiers accept exactly one algorithm. A token whose header names
//!   another one fails with [`ClaimError::AlgorithmMismatch`] before any
//!   signature work.
//! - `none` is only accepted when the verifier was built with
//!   [`Algorithm::none`].
//! - HMAC signatures are compared in constant time via
//!   [`constant_time_eq`](https://crates.io/crates/constant_time_eq).
//! - `exp`, `nbf` and `iat` are checked against the current time by
//!   default, with no leeway unless configured.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) - JSON Web Signature (JWS)
//! - [RFC 7518](https://datatracker.ietf.org/doc/html/rfc7518) - JSON Web Algorithms (JWA)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) - JSON Web Token (JWT)

// Core modules
pub mod error;
mod limits;
pub mod utils;

// Algorithms and keys
pub mod algorithm;
pub mod keys;

// Claims and tokens
pub mod claims;
pub mod token;

// Verification
pub mod verifier;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use algorithm::{Algorithm, Digest, EcdsaCurve};
pub use claims::{ClaimTree, ClaimValue};
pub use error::{ClaimError, DecodeError, Error, Result, Segment, SignatureError};
pub use keys::AsymmetricKey;
pub use token::{DecodedToken, Header, Payload, TokenBuilder, decode};
pub use verifier::{Clock, FixedClock, SystemClock, TokenVerifier, Verification};

/// Start building a new token
pub fn create() -> TokenBuilder {
    TokenBuilder::new()
}

/// Start configuring a verifier that only accepts tokens signed with `algorithm`
pub fn require(algorithm: impl Into<std::sync::Arc<Algorithm>>) -> Verification {
    Verification::new(algorithm)
}
