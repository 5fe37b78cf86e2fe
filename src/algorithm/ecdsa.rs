use crate::error::{Error, Result, SignatureError};
use crate::keys::AsymmetricKey;
use crate::utils::der;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair, KeyPair, UnparsedPublicKey};
use std::fmt;
use std::sync::Arc;

/// Curve of an ECDSA algorithm, each paired with its fixed hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// P-256 with SHA-256
    P256,
    /// P-384 with SHA-384
    P384,
    /// P-521 with SHA-512
    P521,
}

impl EcdsaCurve {
    /// Byte length of one coordinate, which is the width of R and S in a
    /// JOSE signature
    pub const fn field_len(&self) -> usize {
        match self {
            EcdsaCurve::P256 => 32,
            EcdsaCurve::P384 => 48,
            EcdsaCurve::P521 => 66,
        }
    }

    fn signing(&self) -> &'static signature::EcdsaSigningAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_ASN1_SIGNING,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_ASN1_SIGNING,
            EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_ASN1_SIGNING,
        }
    }

    fn verification(&self) -> &'static signature::EcdsaVerificationAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_ASN1,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_ASN1,
            EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_ASN1,
        }
    }
}

/// ECDSA algorithm (ES256, ES384, ES512)
///
/// Signatures leave [`sign`](crate::Algorithm::sign) in the JOSE `R || S`
/// form. [`verify`](crate::Algorithm::verify) accepts JOSE and, for interop
/// with signers that emit it, DER.
#[derive(Clone)]
pub struct EcdsaAlgorithm {
    curve: EcdsaCurve,
    public_point: Option<Arc<[u8]>>,
    private: Option<Arc<EcdsaKeyPair>>,
}

impl EcdsaAlgorithm {
    pub(super) fn new(curve: EcdsaCurve, key: &AsymmetricKey) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::InvalidArgument(
                "Both provided Keys cannot be null".to_string(),
            ));
        }

        let private = key
            .private_pkcs8()
            .map(|pkcs8| {
                EcdsaKeyPair::from_pkcs8(curve.signing(), pkcs8)
                    .map(Arc::new)
                    .map_err(|e| {
                        Error::InvalidArgument(format!("Invalid {curve:?} private key: {e}"))
                    })
            })
            .transpose()?;

        let public_point: Option<Arc<[u8]>> = match (key.public_der(), &private) {
            (Some(point), _) => Some(Arc::from(point)),
            (None, Some(pair)) => Some(Arc::from(pair.public_key().as_ref())),
            (None, None) => None,
        };

        Ok(Self {
            curve,
            public_point,
            private,
        })
    }

    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    pub fn name(&self) -> &'static str {
        match self.curve {
            EcdsaCurve::P256 => "ES256",
            EcdsaCurve::P384 => "ES384",
            EcdsaCurve::P521 => "ES512",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self.curve {
            EcdsaCurve::P256 => "SHA256withECDSA",
            EcdsaCurve::P384 => "SHA384withECDSA",
            EcdsaCurve::P521 => "SHA512withECDSA",
        }
    }

    /// Whether this instance holds a private key
    pub fn can_sign(&self) -> bool {
        self.private.is_some()
    }

    pub(super) fn sign(&self, signing_input: &[u8]) -> std::result::Result<Vec<u8>, SignatureError> {
        let generation = |reason: String| SignatureError::Generation {
            algorithm: self.describe().to_string(),
            reason,
        };

        let pair = self
            .private
            .as_ref()
            .ok_or_else(|| generation("the Private Key is null".to_string()))?;

        let der_sig = pair
            .sign(&SystemRandom::new(), signing_input)
            .map_err(|_| generation("the provider failed to sign".to_string()))?;

        der::der_to_jose(der_sig.as_ref(), self.curve.field_len())
            .map_err(|e| generation(e.to_string()))
    }

    pub(super) fn verify(
        &self,
        signing_input: &[u8],
        sig: &[u8],
    ) -> std::result::Result<(), SignatureError> {
        let invalid = || SignatureError::Verification {
            algorithm: self.describe().to_string(),
        };

        let Some(public_point) = self.public_point.as_deref() else {
            tracing::debug!(algorithm = self.name(), "no public key to verify with");
            return Err(invalid());
        };

        let field_len = self.curve.field_len();
        let der_sig = if der::is_der(sig, field_len) {
            sig.to_vec()
        } else {
            der::jose_to_der(sig, field_len).map_err(|e| {
                tracing::debug!(algorithm = self.name(), error = %e, "signature is not valid JOSE");
                invalid()
            })?
        };

        UnparsedPublicKey::new(self.curve.verification(), public_point)
            .verify(signing_input, &der_sig)
            .map_err(|_| invalid())
    }
}

impl fmt::Debug for EcdsaAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaAlgorithm")
            .field("curve", &self.curve)
            .field("public_point", &self.public_point.as_ref().map(|p| p.len()))
            .field("private", &self.private.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
