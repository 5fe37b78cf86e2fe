//! Token verification with a builder
//!
//! A [`Verification`] collects the expected algorithm and claim assertions;
//! [`build`](Verification::build) freezes them into a [`TokenVerifier`]
//! that can be shared across threads and used for any number of tokens.
//!
//! Every call to [`TokenVerifier::verify`] runs the same steps in order and
//! stops at the first failure:
//!
//! 1. Decode the compact token ([`DecodeError`](crate::DecodeError))
//! 2. Compare the header `alg` with the configured algorithm
//!    ([`ClaimError::AlgorithmMismatch`])
//! 3. Verify the signature over the original `header.payload` text
//!    ([`SignatureError`](crate::SignatureError))
//! 4. Check each claim assertion in registration order ([`ClaimError`])
//!
//! # Example
//!
//! ```ignore
//! use jwtkit::Algorithm;
//!
//! let verifier = jwtkit::require(Algorithm::hmac256(b"secret")?)
//!     .with_issuer("auth0")
//!     .with_audience(["api"])
//!     .accept_leeway(30)
//!     .build();
//!
//! let token = verifier.verify(text)?;
//! println!("subject: {:?}", token.payload().subject());
//! ```

mod assertion;
mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use assertion::{Assertion, Expected, Target};
use crate::algorithm::Algorithm;
use crate::claims::{ClaimValue, header, registered, unix_millis, unix_seconds};
use crate::error::{ClaimError, Error, Result};
use crate::token::{self, DecodedToken};

use serde_json::Value;
use std::sync::Arc;
use std::time::SystemTime;

/// Builder for a [`TokenVerifier`]
///
/// Registering an assertion for a claim that already has one replaces it
/// in place, so the last registration wins while the original order is
/// kept.
#[derive(Debug, Clone)]
#[must_use]
pub struct Verification {
    algorithm: Arc<Algorithm>,
    assertions: Vec<Assertion>,
    default_leeway: u64,
    expires_at_leeway: Option<u64>,
    not_before_leeway: Option<u64>,
    issued_at_leeway: Option<u64>,
    ignore_issued_at: bool,
}

impl Verification {
    /// Start a verification that only accepts tokens signed with `algorithm`
    pub fn new(algorithm: impl Into<Arc<Algorithm>>) -> Self {
        Self {
            algorithm: algorithm.into(),
            assertions: Vec::new(),
            default_leeway: 0,
            expires_at_leeway: None,
            not_before_leeway: None,
            issued_at_leeway: None,
            ignore_issued_at: false,
        }
    }

    // ------------------------------------------------------------------
    // Registered claims
    // ------------------------------------------------------------------

    /// Require `iss` to equal `issuer`
    pub fn with_issuer(self, issuer: impl Into<String>) -> Self {
        self.payload_claim(registered::ISSUER, Expected::Value(Value::String(issuer.into())))
    }

    /// Require `sub` to equal `subject`
    pub fn with_subject(self, subject: impl Into<String>) -> Self {
        self.payload_claim(registered::SUBJECT, Expected::Value(Value::String(subject.into())))
    }

    /// Require `aud` to equal this list, in order
    ///
    /// A token carrying a single audience string matches a one-element list.
    pub fn with_audience<I, S>(self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let audience = audience.into_iter().map(Into::into).collect();
        self.payload_claim(registered::AUDIENCE, Expected::Strings(audience))
    }

    /// Require `exp` to be exactly this instant (in whole seconds)
    ///
    /// Replaces the default "not expired" check.
    pub fn with_expires_at(self, at: SystemTime) -> Self {
        self.payload_claim(registered::EXPIRES_AT, Expected::Date(unix_seconds(at)))
    }

    /// Require `nbf` to be exactly this instant; replaces the default window check
    pub fn with_not_before(self, at: SystemTime) -> Self {
        self.payload_claim(registered::NOT_BEFORE, Expected::Date(unix_seconds(at)))
    }

    /// Require `iat` to be exactly this instant; replaces the default window check
    pub fn with_issued_at(self, at: SystemTime) -> Self {
        self.payload_claim(registered::ISSUED_AT, Expected::Date(unix_seconds(at)))
    }

    /// Require `jti` to equal `jwt_id`
    pub fn with_jwt_id(self, jwt_id: impl Into<String>) -> Self {
        self.payload_claim(registered::JWT_ID, Expected::Value(Value::String(jwt_id.into())))
    }

    /// Require the header `kid` to equal `key_id`
    pub fn with_key_id(self, key_id: impl Into<String>) -> Self {
        self.register(
            Target::Header,
            header::KEY_ID,
            Some(Expected::Value(Value::String(key_id.into()))),
        )
    }

    // ------------------------------------------------------------------
    // Arbitrary claims
    // ------------------------------------------------------------------

    /// Require a payload claim to equal a JSON value
    ///
    /// Numbers compare by value (`1` equals `1.0`) and arrays compare
    /// element by element, in order. Passing `Value::Null` removes any
    /// assertion registered for `name`.
    pub fn with_claim(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let expected = match value.into() {
            Value::Null => None,
            value => Some(Expected::Value(value)),
        };
        self.register(Target::Payload, name, expected)
    }

    /// Require a payload claim to be a NumericDate equal to `at` (whole seconds)
    pub fn with_date_claim(self, name: impl Into<String>, at: SystemTime) -> Self {
        self.payload_claim(name, Expected::Date(unix_seconds(at)))
    }

    /// Require `predicate` to accept the claim
    ///
    /// The predicate sees the claim in whatever state it is, including
    /// missing, along with the whole decoded token.
    pub fn with_claim_predicate<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ClaimValue<'_>, &DecodedToken) -> bool + Send + Sync + 'static,
    {
        self.payload_claim(name, Expected::Predicate(Arc::new(predicate)))
    }

    /// Drop any assertion registered for a payload claim
    pub fn without_claim(self, name: impl Into<String>) -> Self {
        self.register(Target::Payload, name, None)
    }

    // ------------------------------------------------------------------
    // Time windows
    // ------------------------------------------------------------------

    /// Clock skew in seconds for `exp`, `nbf` and `iat` (default 0)
    ///
    /// The current time is compared at millisecond precision, so with no
    /// leeway a token is rejected as soon as its `exp` second has passed.
    pub fn accept_leeway(mut self, seconds: u64) -> Self {
        self.default_leeway = seconds;
        self
    }

    /// Clock skew for `exp`, overriding [`accept_leeway`](Self::accept_leeway)
    pub fn accept_expires_at(mut self, seconds: u64) -> Self {
        self.expires_at_leeway = Some(seconds);
        self
    }

    /// Clock skew for `nbf`, overriding [`accept_leeway`](Self::accept_leeway)
    pub fn accept_not_before(mut self, seconds: u64) -> Self {
        self.not_before_leeway = Some(seconds);
        self
    }

    /// Clock skew for `iat`, overriding [`accept_leeway`](Self::accept_leeway)
    pub fn accept_issued_at(mut self, seconds: u64) -> Self {
        self.issued_at_leeway = Some(seconds);
        self
    }

    /// Skip the default check that `iat` is not in the future
    pub fn ignore_issued_at(mut self) -> Self {
        self.ignore_issued_at = true;
        self
    }

    // ------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------

    /// Freeze the configuration, using the system clock
    pub fn build(self) -> TokenVerifier {
        self.build_with_clock(SystemClock)
    }

    /// Freeze the configuration with a custom clock
    ///
    /// `exp`, `nbf` and `iat` get a current-time check unless an exact
    /// assertion was registered for them.
    pub fn build_with_clock(mut self, clock: impl Clock + 'static) -> TokenVerifier {
        let windows = [
            (registered::EXPIRES_AT, self.expires_at_leeway, false),
            (registered::NOT_BEFORE, self.not_before_leeway, false),
            (registered::ISSUED_AT, self.issued_at_leeway, self.ignore_issued_at),
        ];

        for (name, leeway, ignored) in windows {
            if ignored || self.position(Target::Payload, name).is_some() {
                continue;
            }
            self.assertions.push(Assertion {
                target: Target::Payload,
                name: name.to_string(),
                expected: Expected::Window {
                    leeway: leeway.unwrap_or(self.default_leeway),
                },
            });
        }

        TokenVerifier {
            algorithm: self.algorithm,
            assertions: self.assertions.into(),
            clock: Arc::new(clock),
        }
    }

    fn payload_claim(self, name: impl Into<String>, expected: Expected) -> Self {
        self.register(Target::Payload, name, Some(expected))
    }

    fn register(mut self, target: Target, name: impl Into<String>, expected: Option<Expected>) -> Self {
        let name = name.into();
        match (self.position(target, &name), expected) {
            (Some(index), Some(expected)) => self.assertions[index].expected = expected,
            (Some(index), None) => {
                self.assertions.remove(index);
            }
            (None, Some(expected)) => self.assertions.push(Assertion {
                target,
                name,
                expected,
            }),
            (None, None) => {}
        }
        self
    }

    fn position(&self, target: Target, name: &str) -> Option<usize> {
        self.assertions
            .iter()
            .position(|a| a.target == target && a.name == name)
    }
}

/// An immutable, thread-safe token verifier
///
/// Cheap to clone; clones share the algorithm and assertions.
#[derive(Clone)]
pub struct TokenVerifier {
    algorithm: Arc<Algorithm>,
    assertions: Arc<[Assertion]>,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    /// The algorithm tokens must be signed with
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Decode `token` and run every check
    ///
    /// # Errors
    /// The first failure, as [`Error::Decode`], [`Error::Signature`] or
    /// [`Error::Claim`].
    pub fn verify(&self, token: &str) -> Result<DecodedToken> {
        let decoded = token::decode(token).inspect_err(|e| {
            tracing::debug!(stage = "decode", error = %e, "token rejected");
        })?;

        self.verify_decoded(&decoded)?;
        Ok(decoded)
    }

    /// Run the algorithm, signature and claim checks on an already decoded token
    pub fn verify_decoded(&self, token: &DecodedToken) -> Result<()> {
        let expected = self.algorithm.name();
        let found = token.header().algorithm();
        if found != Some(expected) {
            let err = ClaimError::AlgorithmMismatch {
                expected: expected.to_string(),
                found: found.map(str::to_string),
            };
            return Err(rejected("algorithm", err.into()));
        }

        self.algorithm
            .verify(token.signing_input().as_bytes(), token.signature())
            .map_err(|e| rejected("signature", e.into()))?;

        let now_ms = unix_millis(self.clock.now());
        for assertion in self.assertions.iter() {
            assertion
                .check(token, now_ms)
                .map_err(|e| rejected("claims", e.into()))?;
        }

        tracing::trace!(algorithm = expected, "token verified");
        Ok(())
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &self.algorithm)
            .field("assertions", &self.assertions)
            .finish_non_exhaustive()
    }
}

fn rejected(stage: &'static str, err: Error) -> Error {
    tracing::debug!(stage, error = %err, "token rejected");
    err
}
