use super::Digest;
use crate::error::{Error, Result, SignatureError};

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use std::sync::Arc;

/// HMAC algorithm (HS256, HS384, HS512) holding its shared secret
#[derive(Clone)]
pub struct HmacAlgorithm {
    digest: Digest,
    secret: Arc<[u8]>,
}

impl HmacAlgorithm {
    pub(super) fn new(digest: Digest, secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::InvalidArgument(
                "The Secret cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            digest,
            secret: Arc::from(secret),
        })
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    pub fn name(&self) -> &'static str {
        match self.digest {
            Digest::Sha256 => "HS256",
            Digest::Sha384 => "HS384",
            Digest::Sha512 => "HS512",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self.digest {
            Digest::Sha256 => "HmacSHA256",
            Digest::Sha384 => "HmacSHA384",
            Digest::Sha512 => "HmacSHA512",
        }
    }

    pub(super) fn sign(&self, signing_input: &[u8]) -> std::result::Result<Vec<u8>, SignatureError> {
        let mac = match self.digest {
            Digest::Sha256 => mac::<Hmac<Sha256>>(&self.secret, signing_input),
            Digest::Sha384 => mac::<Hmac<Sha384>>(&self.secret, signing_input),
            Digest::Sha512 => mac::<Hmac<Sha512>>(&self.secret, signing_input),
        };

        mac.map_err(|reason| SignatureError::Generation {
            algorithm: self.describe().to_string(),
            reason,
        })
    }

    /// Recompute the MAC and compare in constant time
    pub(super) fn verify(
        &self,
        signing_input: &[u8],
        signature: &[u8],
    ) -> std::result::Result<(), SignatureError> {
        let invalid = || SignatureError::Verification {
            algorithm: self.describe().to_string(),
        };

        let expected = self.sign(signing_input).map_err(|_| invalid())?;

        // constant_time_eq returns false on length mismatch without leaking where
        if constant_time_eq(&expected, signature) {
            Ok(())
        } else {
            Err(invalid())
        }
    }
}

fn mac<M: Mac + hmac::digest::KeyInit>(
    secret: &[u8],
    data: &[u8],
) -> std::result::Result<Vec<u8>, String> {
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(secret).map_err(|e| e.to_string())?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl fmt::Debug for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacAlgorithm")
            .field("digest", &self.digest)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_INPUT: &[u8] = b"eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    #[test]
    fn test_signature_lengths() {
        for (digest, len) in [
            (Digest::Sha256, 32),
            (Digest::Sha384, 48),
            (Digest::Sha512, 64),
        ] {
            let alg = HmacAlgorithm::new(digest, b"secret").unwrap();
            assert_eq!(alg.sign(SIGNING_INPUT).unwrap().len(), len);
        }
    }

    #[test]
    fn test_known_hs256_vector() {
        // RFC 4231 test case 2
        let alg = HmacAlgorithm::new(Digest::Sha256, b"Jefe").unwrap();
        let mac = alg.sign(b"what do ya want for nothing?").unwrap();
        assert_eq!(
            crate::utils::encode_bytes(&mac),
            "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM"
        );
    }

    #[test]
    fn test_verify_round_trip() {
        let alg = HmacAlgorithm::new(Digest::Sha512, b"secret").unwrap();
        let sig = alg.sign(SIGNING_INPUT).unwrap();
        assert!(alg.verify(SIGNING_INPUT, &sig).is_ok());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let signer = HmacAlgorithm::new(Digest::Sha256, b"secret").unwrap();
        let verifier = HmacAlgorithm::new(Digest::Sha256, b"not_real_secret").unwrap();
        let sig = signer.sign(SIGNING_INPUT).unwrap();

        let err = verifier.verify(SIGNING_INPUT, &sig).unwrap_err();
        assert_eq!(
            err,
            SignatureError::Verification {
                algorithm: "HmacSHA256".to_string()
            }
        );
    }

    #[test]
    fn test_truncated_or_empty_signature_fails() {
        let alg = HmacAlgorithm::new(Digest::Sha384, b"secret").unwrap();
        let sig = alg.sign(SIGNING_INPUT).unwrap();
        assert!(alg.verify(SIGNING_INPUT, &sig[..sig.len() - 1]).is_err());
        assert!(alg.verify(SIGNING_INPUT, &[]).is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let alg = HmacAlgorithm::new(Digest::Sha256, b"hunter2").unwrap();
        let debug = format!("{alg:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("Sha256"));
    }
}
