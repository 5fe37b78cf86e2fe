//! Key material for asymmetric JWT algorithms
//!
//! This module holds raw key bytes as handed over by whatever loaded them
//! (PEM files, a secret store, a JWK). Parsing happens once, when an
//! [`Algorithm`](crate::Algorithm) is built from the key, so a malformed
//! key is rejected before it can be used.
//!
//! - Public keys: DER `RSAPublicKey` (PKCS#1) for RSA; an uncompressed SEC1
//!   point (`04 || X || Y`) for ECDSA
//! - Private keys: PKCS#8 v1 or v2 DER
use std::fmt;

/// An RSA or ECDSA key with optional public and private halves
///
/// Verifying needs the public half and signing needs the private half.
/// When only the private half is present, the public half is derived
/// from it when the algorithm is built.
#[derive(Clone, Default)]
pub struct AsymmetricKey {
    public_der: Option<Vec<u8>>,
    private_pkcs8: Option<Vec<u8>>,
}

impl AsymmetricKey {
    /// Create a verify-only key
    pub fn public(der: impl Into<Vec<u8>>) -> Self {
        Self {
            public_der: Some(der.into()),
            private_pkcs8: None,
        }
    }

    /// Create a key from a PKCS#8 private key, usable for signing and verifying
    pub fn private(pkcs8: impl Into<Vec<u8>>) -> Self {
        Self {
            public_der: None,
            private_pkcs8: Some(pkcs8.into()),
        }
    }

    /// Create a key from both halves
    pub fn pair(public_der: impl Into<Vec<u8>>, private_pkcs8: impl Into<Vec<u8>>) -> Self {
        Self {
            public_der: Some(public_der.into()),
            private_pkcs8: Some(private_pkcs8.into()),
        }
    }

    /// Create a key from optional halves, as handed over by a key loader
    ///
    /// Both halves may be absent here; building an algorithm from such a key
    /// fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument).
    pub fn from_parts(public_der: Option<Vec<u8>>, private_pkcs8: Option<Vec<u8>>) -> Self {
        Self {
            public_der,
            private_pkcs8,
        }
    }

    /// Get the public key bytes, if present
    pub fn public_der(&self) -> Option<&[u8]> {
        self.public_der.as_deref()
    }

    pub(crate) fn private_pkcs8(&self) -> Option<&[u8]> {
        self.private_pkcs8.as_deref()
    }

    /// Whether neither half is present
    pub fn is_empty(&self) -> bool {
        self.public_der.is_none() && self.private_pkcs8.is_none()
    }
}

impl fmt::Debug for AsymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsymmetricKey")
            .field("public_der", &self.public_der.as_ref().map(Vec::len))
            .field("private_pkcs8", &self.private_pkcs8.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
