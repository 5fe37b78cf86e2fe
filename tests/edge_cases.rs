//! Edge cases in decoding and claim handling

use jwtkit::*;
use serde_json::{Value, json};

fn hs256() -> Algorithm {
    Algorithm::hmac256("secret").unwrap()
}

/// Hand-assemble an HS256 token so the payload text is exactly `payload`
fn token_with_payload(payload: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let signing_input = format!(
        "{}.{}",
        jwtkit::utils::encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        jwtkit::utils::encode(payload)
    );

    let mut mac = Hmac::<Sha256>::new_from_slice(b"secret").unwrap();
    mac.update(signing_input.as_bytes());
    let signature = jwtkit::utils::encode_bytes(mac.finalize().into_bytes());

    format!("{signing_input}.{signature}")
}

// ============================================================================
// Missing / null / present claims
// ============================================================================

#[test]
fn test_missing_claim_accessors_fail() {
    let decoded = jwtkit::decode(&token_with_payload(r#"{"iss":"auth0"}"#)).unwrap();
    let claim = decoded.payload().get_claim("x");

    assert!(claim.is_missing());
    assert_eq!(
        claim.as_string(),
        Err(ClaimError::Missing {
            claim: "x".to_string()
        })
    );
    assert!(claim.as_list(Value::as_str).is_err());
}

#[test]
fn test_null_claim_accessors_are_empty() {
    let decoded = jwtkit::decode(&token_with_payload(r#"{"x":null}"#)).unwrap();
    let claim = decoded.payload().get_claim("x");

    assert!(claim.is_null());
    assert_eq!(claim.as_string(), Ok(None));
    assert_eq!(claim.as_int(), Ok(None));
    assert_eq!(claim.as_list(Value::as_str), Ok(Some(vec![])));
}

#[test]
fn test_nested_claims() {
    let decoded = jwtkit::decode(&token_with_payload(
        r#"{"profile":{"name":"John","langs":["en","de"]},"n":1.25}"#,
    ))
    .unwrap();
    let payload = decoded.payload();

    let profile = payload.get_claim("profile");
    assert_eq!(profile.as_string(), Ok(None));
    assert_eq!(
        profile.as_node().and_then(|node| node.get("name")),
        Some(&json!("John"))
    );
    assert_eq!(payload.get_claim("n").as_double(), Ok(Some(1.25)));
    assert_eq!(payload.get_claim("n").as_int(), Ok(Some(1)));
}

#[test]
fn test_header_custom_claims() {
    let token = jwtkit::create()
        .with_header_claim("x5t", "thumb")
        .with_header_claim("crit", json!(["exp"]))
        .sign(&hs256())
        .unwrap();
    let decoded = jwtkit::decode(&token).unwrap();

    assert_eq!(decoded.header().get_claim("x5t").as_string(), Ok(Some("thumb")));
    assert_eq!(
        decoded.header().get_claim("crit").as_list(Value::as_str),
        Ok(Some(vec!["exp"]))
    );
    assert!(decoded.header().get_claim("kid").is_missing());
    assert_eq!(decoded.header().claims().len(), 4);
}

// ============================================================================
// Registered claim shapes
// ============================================================================

#[test]
fn test_malformed_exp_fails_decoding() {
    let err = jwtkit::decode(&token_with_payload(r#"{"exp":"soon"}"#)).unwrap_err();
    assert!(matches!(err, DecodeError::RegisteredClaim { ref claim, .. } if claim == "exp"));
}

#[test]
fn test_audience_array_and_string() {
    let array = jwtkit::decode(&token_with_payload(r#"{"aud":["a","b"]}"#)).unwrap();
    assert_eq!(array.payload().audience(), Some(vec!["a", "b"]));

    let single = jwtkit::decode(&token_with_payload(r#"{"aud":"a"}"#)).unwrap();
    assert_eq!(single.payload().audience(), Some(vec!["a"]));

    let verifier = jwtkit::require(hs256()).with_audience(["a"]).build();
    assert!(verifier.verify(single.token()).is_ok());
    assert!(verifier.verify(array.token()).is_err());
}

#[test]
fn test_fractional_numeric_dates_verify() {
    use std::time::{Duration, UNIX_EPOCH};

    for payload in [
        r#"{"exp":4102444800.5}"#,
        r#"{"exp":4.1024448e9}"#,
        r#"{"iat":1700000000.0}"#,
    ] {
        let token = token_with_payload(payload);
        let result = jwtkit::require(hs256()).build().verify(&token);
        assert!(result.is_ok(), "{payload}: {result:?}");
    }

    let decoded = jwtkit::decode(&token_with_payload(r#"{"exp":4102444800.5}"#)).unwrap();
    assert_eq!(
        decoded.payload().expires_at(),
        Some(UNIX_EPOCH + Duration::from_secs(4_102_444_800))
    );
    assert_eq!(decoded.payload().get_claim("exp").as_long(), Ok(Some(4_102_444_800)));
}

// ============================================================================
// Claim assertions
// ============================================================================

#[test]
fn test_wrong_issuer_names_claim() {
    let token = token_with_payload(r#"{"iss":"not-auth0"}"#);
    let err = jwtkit::require(hs256())
        .with_issuer("auth0")
        .build()
        .verify(&token)
        .unwrap_err();

    assert_eq!(
        err,
        Error::Claim(ClaimError::Invalid {
            claim: "iss".to_string(),
            actual: r#""not-auth0""#.to_string(),
        })
    );
}

#[test]
fn test_missing_asserted_claim() {
    let token = token_with_payload(r#"{"sub":"user"}"#);
    let err = jwtkit::require(hs256())
        .with_issuer("auth0")
        .build()
        .verify(&token)
        .unwrap_err();

    assert_eq!(
        err,
        Error::Claim(ClaimError::Missing {
            claim: "iss".to_string()
        })
    );
}

#[test]
fn test_null_does_not_satisfy_assertion() {
    let token = token_with_payload(r#"{"role":null}"#);
    let err = jwtkit::require(hs256())
        .with_claim("role", "admin")
        .build()
        .verify(&token)
        .unwrap_err();
    assert!(matches!(err, Error::Claim(ClaimError::Invalid { .. })));
}

#[test]
fn test_typed_claim_assertions() {
    let token = token_with_payload(r#"{"admin":true,"level":3,"ratio":0.5,"tags":["a","b"]}"#);

    let verifier = jwtkit::require(hs256())
        .with_claim("admin", true)
        .with_claim("level", 3.0)
        .with_claim("ratio", 0.5)
        .with_claim("tags", json!(["a", "b"]))
        .build();
    assert!(verifier.verify(&token).is_ok());

    let reordered = jwtkit::require(hs256())
        .with_claim("tags", json!(["b", "a"]))
        .build();
    assert!(reordered.verify(&token).is_err());
}

#[test]
fn test_date_claim_assertion() {
    use std::time::{Duration, UNIX_EPOCH};

    let token = token_with_payload(r#"{"login":1700000000}"#);
    let at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);

    let verifier = jwtkit::require(hs256()).with_date_claim("login", at).build();
    assert!(verifier.verify(&token).is_ok());

    let other = jwtkit::require(hs256())
        .with_date_claim("login", at + Duration::from_secs(1))
        .build();
    assert!(other.verify(&token).is_err());
}

#[test]
fn test_verifier_is_shareable_across_threads() {
    let verifier = jwtkit::require(hs256()).with_issuer("auth0").build();
    let token = token_with_payload(r#"{"iss":"auth0"}"#);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let verifier = verifier.clone();
            let token = token.as_str();
            scope.spawn(move || assert!(verifier.verify(token).is_ok()));
        }
    });
}
