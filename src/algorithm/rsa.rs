use super::Digest;
use crate::error::{Error, Result, SignatureError};
use crate::keys::AsymmetricKey;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, KeyPair, RsaKeyPair, UnparsedPublicKey};
use std::fmt;
use std::sync::Arc;

/// RSASSA-PKCS1-v1_5 algorithm (RS256, RS384, RS512)
#[derive(Clone)]
pub struct RsaAlgorithm {
    digest: Digest,
    public_der: Option<Arc<[u8]>>,
    private: Option<Arc<RsaKeyPair>>,
}

impl RsaAlgorithm {
    pub(super) fn new(digest: Digest, key: &AsymmetricKey) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::InvalidArgument(
                "Both provided Keys cannot be null".to_string(),
            ));
        }

        let private = key
            .private_pkcs8()
            .map(|pkcs8| {
                RsaKeyPair::from_pkcs8(pkcs8)
                    .map(Arc::new)
                    .map_err(|e| Error::InvalidArgument(format!("Invalid RSA private key: {e}")))
            })
            .transpose()?;

        // Verify-capable even when only the private half was handed over
        let public_der: Option<Arc<[u8]>> = match (key.public_der(), &private) {
            (Some(der), _) => Some(Arc::from(der)),
            (None, Some(pair)) => Some(Arc::from(pair.public_key().as_ref())),
            (None, None) => None,
        };

        Ok(Self {
            digest,
            public_der,
            private,
        })
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    pub fn name(&self) -> &'static str {
        match self.digest {
            Digest::Sha256 => "RS256",
            Digest::Sha384 => "RS384",
            Digest::Sha512 => "RS512",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self.digest {
            Digest::Sha256 => "SHA256withRSA",
            Digest::Sha384 => "SHA384withRSA",
            Digest::Sha512 => "SHA512withRSA",
        }
    }

    /// Whether this instance holds a private key
    pub fn can_sign(&self) -> bool {
        self.private.is_some()
    }

    pub(super) fn sign(&self, signing_input: &[u8]) -> std::result::Result<Vec<u8>, SignatureError> {
        let generation = |reason: &str| SignatureError::Generation {
            algorithm: self.describe().to_string(),
            reason: reason.to_string(),
        };

        let pair = self
            .private
            .as_ref()
            .ok_or_else(|| generation("the Private Key is null"))?;

        let padding: &'static dyn signature::RsaEncoding = match self.digest {
            Digest::Sha256 => &signature::RSA_PKCS1_SHA256,
            Digest::Sha384 => &signature::RSA_PKCS1_SHA384,
            Digest::Sha512 => &signature::RSA_PKCS1_SHA512,
        };

        let mut sig = vec![0u8; pair.public_modulus_len()];
        pair.sign(padding, &SystemRandom::new(), signing_input, &mut sig)
            .map_err(|_| generation("the provider failed to sign"))?;

        Ok(sig)
    }

    pub(super) fn verify(
        &self,
        signing_input: &[u8],
        sig: &[u8],
    ) -> std::result::Result<(), SignatureError> {
        let invalid = || SignatureError::Verification {
            algorithm: self.describe().to_string(),
        };

        let Some(public_der) = self.public_der.as_deref() else {
            tracing::debug!(algorithm = self.name(), "no public key to verify with");
            return Err(invalid());
        };

        let params: &'static signature::RsaParameters = match self.digest {
            Digest::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            Digest::Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            Digest::Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        };

        UnparsedPublicKey::new(params, public_der)
            .verify(signing_input, sig)
            .map_err(|_| invalid())
    }
}

impl fmt::Debug for RsaAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaAlgorithm")
            .field("digest", &self.digest)
            .field("public_der", &self.public_der.as_ref().map(|der| der.len()))
            .field("private", &self.private.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
