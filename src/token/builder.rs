use super::codec;
use crate::algorithm::Algorithm;
use crate::claims::{header, registered, unix_seconds};
use crate::error::{Error, Result};

use serde_json::{Map, Value};
use std::time::SystemTime;

/// Builder for signed compact tokens
///
/// Registered claims have typed setters; every other claim goes through
/// [`with_claim`](Self::with_claim). `alg` is always taken from the
/// algorithm passed to [`sign`](Self::sign), and `typ` defaults to `JWT`.
///
/// # Examples
///
/// ```ignore
/// use jwtkit::Algorithm;
/// use std::time::{Duration, SystemTime};
///
/// let algorithm = Algorithm::hmac256(b"secret")?;
/// let token = jwtkit::create()
///     .with_issuer("auth0")
///     .with_audience(["api"])
///     .with_expires_at(SystemTime::now() + Duration::from_secs(3600))
///     .with_claim("admin", true)?
///     .sign(&algorithm)?;
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct TokenBuilder {
    header: Map<String, Value>,
    payload: Map<String, Value>,
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header parameter; `alg` is overwritten when signing
    pub fn with_header_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.header.insert(name.into(), value.into());
        self
    }

    /// Set the `kid` header parameter
    pub fn with_key_id(self, key_id: impl Into<String>) -> Self {
        self.with_header_claim(header::KEY_ID, key_id.into())
    }

    pub fn with_issuer(self, issuer: impl Into<String>) -> Self {
        self.registered(registered::ISSUER, issuer.into())
    }

    pub fn with_subject(self, subject: impl Into<String>) -> Self {
        self.registered(registered::SUBJECT, subject.into())
    }

    /// Set the `aud` claim
    ///
    /// One audience is written as a plain string, several as an array. An
    /// empty list removes the claim.
    pub fn with_audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut audience: Vec<Value> = audience
            .into_iter()
            .map(|aud| Value::String(aud.into()))
            .collect();

        match audience.len() {
            0 => {
                self.payload.remove(registered::AUDIENCE);
                self
            }
            1 => {
                let single = audience.remove(0);
                self.registered(registered::AUDIENCE, single)
            }
            _ => self.registered(registered::AUDIENCE, Value::Array(audience)),
        }
    }

    pub fn with_expires_at(self, at: SystemTime) -> Self {
        self.registered(registered::EXPIRES_AT, unix_seconds(at))
    }

    pub fn with_not_before(self, at: SystemTime) -> Self {
        self.registered(registered::NOT_BEFORE, unix_seconds(at))
    }

    pub fn with_issued_at(self, at: SystemTime) -> Self {
        self.registered(registered::ISSUED_AT, unix_seconds(at))
    }

    pub fn with_jwt_id(self, jwt_id: impl Into<String>) -> Self {
        self.registered(registered::JWT_ID, jwt_id.into())
    }

    /// Add a private claim with any JSON value
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `name` is empty or one of the registered
    /// claims, which have their own setters.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        check_private_name(&name)?;
        self.payload.insert(name, value.into());
        Ok(self)
    }

    /// Add a private claim holding a NumericDate (whole seconds)
    pub fn with_date_claim(self, name: impl Into<String>, at: SystemTime) -> Result<Self> {
        self.with_claim(name, unix_seconds(at))
    }

    /// Sign the collected claims into a compact token
    ///
    /// # Errors
    /// [`Error::Signature`] when the algorithm can't sign (for example a
    /// verify-only RSA key), [`Error::Creation`] when serialization fails.
    pub fn sign(&self, algorithm: &Algorithm) -> Result<String> {
        let mut jose = self.header.clone();
        jose.insert(header::ALGORITHM.to_string(), algorithm.name().into());
        jose.entry(header::TYPE)
            .or_insert_with(|| Value::from("JWT"));

        let token = codec::encode(&jose, &self.payload, algorithm)?;
        tracing::trace!(algorithm = algorithm.name(), "token signed");
        Ok(token)
    }

    fn registered(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(name.to_string(), value.into());
        self
    }
}

fn check_private_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(
            "The Custom Claim's name can't be empty".to_string(),
        ));
    }
    if registered::ALL.contains(&name) {
        return Err(Error::InvalidArgument(format!(
            "The Claim '{name}' is registered and has its own setter"
        )));
    }
    Ok(())
}
