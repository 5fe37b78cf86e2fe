//! Sign-then-verify round trips for every supported algorithm

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P384_SHA384_ASN1_SIGNING,
    ECDSA_P521_SHA512_ASN1_SIGNING, EcdsaKeyPair, EcdsaSigningAlgorithm, KeyPair,
};
use jwtkit::*;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::EncodePrivateKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::json;
use std::sync::OnceLock;

/// (PKCS#1 public DER, PKCS#8 private DER), generated once per test binary
fn rsa_keys() -> &'static (Vec<u8>, Vec<u8>) {
    static KEYS: OnceLock<(Vec<u8>, Vec<u8>)> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        let public = RsaPublicKey::from(&private);
        (
            public.to_pkcs1_der().unwrap().as_bytes().to_vec(),
            private.to_pkcs8_der().unwrap().as_bytes().to_vec(),
        )
    })
}

/// (uncompressed public point, PKCS#8 private DER)
fn ec_keys(alg: &'static EcdsaSigningAlgorithm) -> (Vec<u8>, Vec<u8>) {
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &SystemRandom::new()).unwrap();
    let pair = EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref()).unwrap();
    (pair.public_key().as_ref().to_vec(), pkcs8.as_ref().to_vec())
}

/// Sign with `signer`, verify with `verifier`, and compare the claims
fn assert_round_trip(signer: Algorithm, verifier: Algorithm) {
    let token = jwtkit::create()
        .with_issuer("auth0")
        .with_subject("1234567890")
        .with_audience(["api", "web"])
        .with_claim("admin", true)
        .unwrap()
        .with_claim("scopes", json!(["read", "write"]))
        .unwrap()
        .sign(&signer)
        .unwrap();

    let decoded = jwtkit::require(verifier)
        .with_issuer("auth0")
        .with_audience(["api", "web"])
        .build()
        .verify(&token)
        .unwrap_or_else(|e| panic!("{} round trip failed: {e}", signer.name()));

    assert_eq!(decoded.header().algorithm(), Some(signer.name()));
    let payload = decoded.payload();
    assert_eq!(payload.issuer(), Some("auth0"));
    assert_eq!(payload.subject(), Some("1234567890"));
    assert_eq!(payload.audience(), Some(vec!["api", "web"]));
    assert_eq!(payload.get_claim("admin").as_boolean().unwrap(), Some(true));
    assert_eq!(
        payload.get_claim("scopes").as_node(),
        Some(&json!(["read", "write"]))
    );
}

// ============================================================================
// none / HMAC
// ============================================================================

#[test]
fn test_none_round_trip() {
    assert_round_trip(Algorithm::none(), Algorithm::none());
}

#[test]
fn test_hmac_round_trips() {
    assert_round_trip(
        Algorithm::hmac256("secret").unwrap(),
        Algorithm::hmac256("secret").unwrap(),
    );
    assert_round_trip(
        Algorithm::hmac384("secret").unwrap(),
        Algorithm::hmac384("secret").unwrap(),
    );
    assert_round_trip(
        Algorithm::hmac512("secret").unwrap(),
        Algorithm::hmac512("secret").unwrap(),
    );
}

// ============================================================================
// RSA
// ============================================================================

#[test]
fn test_rsa_round_trips() {
    let (public_der, private_der) = rsa_keys();
    let signing = || AsymmetricKey::private(private_der.clone());
    let verifying = || AsymmetricKey::public(public_der.clone());

    assert_round_trip(
        Algorithm::rsa256(signing()).unwrap(),
        Algorithm::rsa256(verifying()).unwrap(),
    );
    assert_round_trip(
        Algorithm::rsa384(signing()).unwrap(),
        Algorithm::rsa384(verifying()).unwrap(),
    );
    assert_round_trip(
        Algorithm::rsa512(signing()).unwrap(),
        Algorithm::rsa512(verifying()).unwrap(),
    );
}

#[test]
fn test_rsa_same_instance_signs_and_verifies() {
    let (public_der, private_der) = rsa_keys();
    let key = AsymmetricKey::pair(public_der.clone(), private_der.clone());
    let alg = Algorithm::rsa256(key).unwrap();
    assert_round_trip(alg.clone(), alg);
}

#[test]
fn test_rsa_verify_only_key_cannot_sign() {
    let (public_der, _) = rsa_keys();
    let alg = Algorithm::rsa256(AsymmetricKey::public(public_der.clone())).unwrap();

    let err = jwtkit::create().sign(&alg).unwrap_err();
    assert!(matches!(
        err,
        Error::Signature(SignatureError::Generation { ref algorithm, .. }) if algorithm == "SHA256withRSA"
    ));
}

// ============================================================================
// ECDSA
// ============================================================================

#[test]
fn test_ecdsa_round_trips() {
    let (public, private) = ec_keys(&ECDSA_P256_SHA256_ASN1_SIGNING);
    assert_round_trip(
        Algorithm::ecdsa256(AsymmetricKey::private(private)).unwrap(),
        Algorithm::ecdsa256(AsymmetricKey::public(public)).unwrap(),
    );

    let (public, private) = ec_keys(&ECDSA_P384_SHA384_ASN1_SIGNING);
    assert_round_trip(
        Algorithm::ecdsa384(AsymmetricKey::private(private)).unwrap(),
        Algorithm::ecdsa384(AsymmetricKey::public(public)).unwrap(),
    );

    let (public, private) = ec_keys(&ECDSA_P521_SHA512_ASN1_SIGNING);
    assert_round_trip(
        Algorithm::ecdsa512(AsymmetricKey::private(private)).unwrap(),
        Algorithm::ecdsa512(AsymmetricKey::public(public)).unwrap(),
    );
}

#[test]
fn test_ecdsa_signature_segment_is_jose() {
    for (alg, field_len) in [
        (&ECDSA_P256_SHA256_ASN1_SIGNING, 32),
        (&ECDSA_P384_SHA384_ASN1_SIGNING, 48),
        (&ECDSA_P521_SHA512_ASN1_SIGNING, 66),
    ] {
        let (_, private) = ec_keys(alg);
        let key = AsymmetricKey::private(private);
        let algorithm = match field_len {
            32 => Algorithm::ecdsa256(key),
            48 => Algorithm::ecdsa384(key),
            _ => Algorithm::ecdsa512(key),
        }
        .unwrap();

        let token = jwtkit::create().sign(&algorithm).unwrap();
        let decoded = jwtkit::decode(&token).unwrap();
        assert_eq!(decoded.signature().len(), 2 * field_len);
    }
}

#[test]
fn test_ecdsa_accepts_der_encoded_signature() {
    let (public, private) = ec_keys(&ECDSA_P256_SHA256_ASN1_SIGNING);
    let signer = Algorithm::ecdsa256(AsymmetricKey::private(private)).unwrap();
    let verifier = jwtkit::require(Algorithm::ecdsa256(AsymmetricKey::public(public)).unwrap())
        .build();

    // Re-encode the JOSE signature as DER, as some issuers emit it. A DER
    // encoding that happens to be exactly 64 bytes would be read as JOSE,
    // so retry until the lengths differ.
    for _ in 0..16 {
        let token = jwtkit::create().with_issuer("auth0").sign(&signer).unwrap();
        let decoded = jwtkit::decode(&token).unwrap();
        let der = jwtkit::utils::der::jose_to_der(decoded.signature(), 32).unwrap();
        if der.len() == 64 {
            continue;
        }

        let der_token = format!(
            "{}.{}",
            decoded.signing_input(),
            jwtkit::utils::encode_bytes(&der)
        );
        assert!(verifier.verify(&der_token).is_ok());
        return;
    }
    panic!("every DER signature was 64 bytes long");
}

#[test]
fn test_ecdsa_wrong_public_key_names_algorithm() {
    let (_, private) = ec_keys(&ECDSA_P256_SHA256_ASN1_SIGNING);
    let (other_public, _) = ec_keys(&ECDSA_P256_SHA256_ASN1_SIGNING);

    let token = jwtkit::create()
        .with_issuer("auth0")
        .sign(&Algorithm::ecdsa256(AsymmetricKey::private(private)).unwrap())
        .unwrap();

    let err = jwtkit::require(Algorithm::ecdsa256(AsymmetricKey::public(other_public)).unwrap())
        .build()
        .verify(&token)
        .unwrap_err();

    assert!(matches!(err, Error::Signature(SignatureError::Verification { .. })));
    assert!(err.to_string().contains("SHA256withECDSA"));
}
