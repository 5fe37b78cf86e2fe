//! Claim trees and typed claim lookup
//!
//! A [`ClaimTree`] is the parsed JSON object of a header or payload. Lookups
//! return a [`ClaimValue`], which keeps "absent" and "explicit `null`" apart.

mod value;

pub use value::ClaimValue;

use serde_json::{Map, Value};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Registered payload claim names (RFC 7519 Section 4.1)
pub mod registered {
    pub const ISSUER: &str = "iss";
    pub const SUBJECT: &str = "sub";
    pub const AUDIENCE: &str = "aud";
    pub const EXPIRES_AT: &str = "exp";
    pub const NOT_BEFORE: &str = "nbf";
    pub const ISSUED_AT: &str = "iat";
    pub const JWT_ID: &str = "jti";

    pub const ALL: [&str; 7] = [
        ISSUER, SUBJECT, AUDIENCE, EXPIRES_AT, NOT_BEFORE, ISSUED_AT, JWT_ID,
    ];

    /// Claims that hold a NumericDate
    pub const DATES: [&str; 3] = [EXPIRES_AT, NOT_BEFORE, ISSUED_AT];
}

/// Header parameter names
pub mod header {
    pub const ALGORITHM: &str = "alg";
    pub const TYPE: &str = "typ";
    pub const CONTENT_TYPE: &str = "cty";
    pub const KEY_ID: &str = "kid";
}

/// An immutable JSON object of claims
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimTree {
    claims: Map<String, Value>,
}

impl ClaimTree {
    pub(crate) fn from_map(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Look up a claim by name
    pub fn get_claim<'a>(&'a self, name: &'a str) -> ClaimValue<'a> {
        ClaimValue::lookup(name, self.claims.get(name))
    }

    pub(crate) fn get_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterate over every claim, including explicit nulls
    pub fn iter(&self) -> impl Iterator<Item = (&str, ClaimValue<'_>)> {
        self.claims
            .iter()
            .map(|(name, node)| (name.as_str(), ClaimValue::lookup(name, Some(node))))
    }

    /// The underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.claims
    }
}

/// Whole seconds since the Unix epoch; earlier instants are negative
pub(crate) fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => {
            let secs = before.duration().as_secs_f64().ceil() as u64;
            i64::try_from(secs).map(|s| -s).unwrap_or(i64::MIN)
        }
    }
}

/// Whole milliseconds since the Unix epoch; earlier instants are negative
pub(crate) fn unix_millis(time: SystemTime) -> i128 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i128::try_from(after.as_millis()).unwrap_or(i128::MAX),
        Err(before) => i128::try_from(before.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i128::MIN),
    }
}

/// A JSON number truncated towards zero, if it fits an `i64`
///
/// NumericDate values may carry a fraction (`1700000000.5`) or be spelled
/// as floats (`4.1024448e9`); both read as whole seconds.
pub(crate) fn integral(node: &Value) -> Option<i64> {
    match node {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    }
}

pub(crate) fn from_unix_seconds(seconds: i64) -> SystemTime {
    let magnitude = Duration::from_secs(seconds.unsigned_abs());
    if seconds >= 0 {
        UNIX_EPOCH + magnitude
    } else {
        UNIX_EPOCH - magnitude
    }
}
