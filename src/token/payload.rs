use crate::claims::{ClaimTree, ClaimValue, from_unix_seconds, integral, registered};
use crate::error::DecodeError;

use serde_json::Value;
use std::time::SystemTime;

/// Claims set of a decoded token
///
/// Registered claims are type-checked when the token is decoded, so the
/// accessors below never see a malformed `exp`, `nbf`, `iat` or `aud`.
/// Fractional NumericDates are accepted and read as whole seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    claims: ClaimTree,
}

impl Payload {
    pub(crate) fn new(claims: ClaimTree) -> Result<Self, DecodeError> {
        for name in registered::DATES {
            match claims.get_claim(name).as_node() {
                Some(node) if integral(node).is_none() => {
                    return Err(DecodeError::RegisteredClaim {
                        claim: name.to_string(),
                        reason: format!("expected a NumericDate in seconds, found {node}"),
                    });
                }
                _ => {}
            }
        }

        if let Some(node) = claims.get_claim(registered::AUDIENCE).as_node() {
            let valid = match node {
                Value::String(_) => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            };
            if !valid {
                return Err(DecodeError::RegisteredClaim {
                    claim: registered::AUDIENCE.to_string(),
                    reason: format!("expected a string or an array of strings, found {node}"),
                });
            }
        }

        Ok(Self { claims })
    }

    /// The `iss` claim
    pub fn issuer(&self) -> Option<&str> {
        self.claims.get_str(registered::ISSUER)
    }

    /// The `sub` claim
    pub fn subject(&self) -> Option<&str> {
        self.claims.get_str(registered::SUBJECT)
    }

    /// The `aud` claim, always as a list
    ///
    /// A single string on the wire becomes a one-element list.
    pub fn audience(&self) -> Option<Vec<&str>> {
        match self.claims.get_claim(registered::AUDIENCE).as_node()? {
            Value::String(aud) => Some(vec![aud.as_str()]),
            Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

    /// The `exp` claim
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.date(registered::EXPIRES_AT)
    }

    /// The `nbf` claim
    pub fn not_before(&self) -> Option<SystemTime> {
        self.date(registered::NOT_BEFORE)
    }

    /// The `iat` claim
    pub fn issued_at(&self) -> Option<SystemTime> {
        self.date(registered::ISSUED_AT)
    }

    /// The `jti` claim
    pub fn jwt_id(&self) -> Option<&str> {
        self.claims.get_str(registered::JWT_ID)
    }

    pub fn get_claim<'a>(&'a self, name: &'a str) -> ClaimValue<'a> {
        self.claims.get_claim(name)
    }

    pub fn claims(&self) -> &ClaimTree {
        &self.claims
    }

    fn date(&self, name: &str) -> Option<SystemTime> {
        self.claims
            .get_claim(name)
            .as_node()
            .and_then(integral)
            .map(from_unix_seconds)
    }
}
