//! Signing algorithms for compact JWTs
//!
//! [`Algorithm`] is a closed set of variants, each owning its key material
//! from construction on:
//!
//! - **none**: unsigned tokens; the signature is always empty
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA** (RSASSA-PKCS1-v1_5): RS256, RS384, RS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//!
//! Every variant signs and verifies raw signature bytes over the ASCII
//! `header.payload` signing input. Algorithms are immutable once built and
//! can be shared across threads.

mod ecdsa;
mod hmac;
mod rsa;

pub use ecdsa::{EcdsaAlgorithm, EcdsaCurve};
pub use hmac::HmacAlgorithm;
pub use rsa::RsaAlgorithm;

use crate::error::{Result, SignatureError};
use crate::keys::AsymmetricKey;

/// SHA-2 digest size shared by the HMAC and RSA families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digest {
    Sha256,
    Sha384,
    Sha512,
}

impl Digest {
    /// Digest size in bits, as used in algorithm names
    pub const fn bits(&self) -> u16 {
        match self {
            Digest::Sha256 => 256,
            Digest::Sha384 => 384,
            Digest::Sha512 => 512,
        }
    }
}

/// A JWT signing algorithm bound to its key material
#[derive(Debug, Clone)]
pub enum Algorithm {
    /// Unsigned tokens
    None,
    Hmac(HmacAlgorithm),
    Rsa(RsaAlgorithm),
    Ecdsa(EcdsaAlgorithm),
}

impl Algorithm {
    /// Unsigned tokens
    ///
    /// Verifiers never fall back to this; it has to be passed explicitly.
    pub fn none() -> Self {
        Algorithm::None
    }

    /// HMAC with SHA-256
    ///
    /// # Errors
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `secret` is empty.
    pub fn hmac256(secret: impl AsRef<[u8]>) -> Result<Self> {
        HmacAlgorithm::new(Digest::Sha256, secret.as_ref()).map(Algorithm::Hmac)
    }

    /// HMAC with SHA-384
    pub fn hmac384(secret: impl AsRef<[u8]>) -> Result<Self> {
        HmacAlgorithm::new(Digest::Sha384, secret.as_ref()).map(Algorithm::Hmac)
    }

    /// HMAC with SHA-512
    pub fn hmac512(secret: impl AsRef<[u8]>) -> Result<Self> {
        HmacAlgorithm::new(Digest::Sha512, secret.as_ref()).map(Algorithm::Hmac)
    }

    /// RSASSA-PKCS1-v1_5 with SHA-256
    ///
    /// # Errors
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the key has
    /// neither half, or the private half is rejected by the provider.
    pub fn rsa256(key: AsymmetricKey) -> Result<Self> {
        RsaAlgorithm::new(Digest::Sha256, &key).map(Algorithm::Rsa)
    }

    /// RSASSA-PKCS1-v1_5 with SHA-384
    pub fn rsa384(key: AsymmetricKey) -> Result<Self> {
        RsaAlgorithm::new(Digest::Sha384, &key).map(Algorithm::Rsa)
    }

    /// RSASSA-PKCS1-v1_5 with SHA-512
    pub fn rsa512(key: AsymmetricKey) -> Result<Self> {
        RsaAlgorithm::new(Digest::Sha512, &key).map(Algorithm::Rsa)
    }

    /// ECDSA over P-256 with SHA-256
    ///
    /// # Errors
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the key has
    /// neither half, or the private half is not a P-256 key.
    pub fn ecdsa256(key: AsymmetricKey) -> Result<Self> {
        EcdsaAlgorithm::new(EcdsaCurve::P256, &key).map(Algorithm::Ecdsa)
    }

    /// ECDSA over P-384 with SHA-384
    pub fn ecdsa384(key: AsymmetricKey) -> Result<Self> {
        EcdsaAlgorithm::new(EcdsaCurve::P384, &key).map(Algorithm::Ecdsa)
    }

    /// ECDSA over P-521 with SHA-512
    pub fn ecdsa512(key: AsymmetricKey) -> Result<Self> {
        EcdsaAlgorithm::new(EcdsaCurve::P521, &key).map(Algorithm::Ecdsa)
    }

    /// The `alg` header value, e.g. `HS256` or `none`
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::None => "none",
            Algorithm::Hmac(alg) => alg.name(),
            Algorithm::Rsa(alg) => alg.name(),
            Algorithm::Ecdsa(alg) => alg.name(),
        }
    }

    /// Provider-facing identifier, e.g. `HmacSHA256` or `SHA384withECDSA`
    pub fn describe(&self) -> &'static str {
        match self {
            Algorithm::None => "none",
            Algorithm::Hmac(alg) => alg.describe(),
            Algorithm::Rsa(alg) => alg.describe(),
            Algorithm::Ecdsa(alg) => alg.describe(),
        }
    }

    /// Sign the `header.payload` signing input, returning raw signature bytes
    pub fn sign(&self, signing_input: &[u8]) -> std::result::Result<Vec<u8>, SignatureError> {
        match self {
            Algorithm::None => Ok(Vec::new()),
            Algorithm::Hmac(alg) => alg.sign(signing_input),
            Algorithm::Rsa(alg) => alg.sign(signing_input),
            Algorithm::Ecdsa(alg) => alg.sign(signing_input),
        }
    }

    /// Verify raw signature bytes over the `header.payload` signing input
    pub fn verify(
        &self,
        signing_input: &[u8],
        signature: &[u8],
    ) -> std::result::Result<(), SignatureError> {
        match self {
            Algorithm::None if signature.is_empty() => Ok(()),
            Algorithm::None => Err(SignatureError::Verification {
                algorithm: self.describe().to_string(),
            }),
            Algorithm::Hmac(alg) => alg.verify(signing_input, signature),
            Algorithm::Rsa(alg) => alg.verify(signing_input, signature),
            Algorithm::Ecdsa(alg) => alg.verify(signing_input, signature),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
