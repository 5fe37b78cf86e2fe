use crate::claims::{ClaimValue, integral, registered};
use crate::error::ClaimError;
use crate::token::DecodedToken;

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub(crate) type Predicate = Arc<dyn Fn(&ClaimValue<'_>, &DecodedToken) -> bool + Send + Sync>;

/// Which JSON object of the token an assertion reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Header,
    Payload,
}

/// What a claim has to look like
#[derive(Clone)]
pub(crate) enum Expected {
    /// JSON equality; numbers compare by value, arrays element-wise in order
    Value(Value),
    /// String or string-array claim, compared as an ordered list
    Strings(Vec<String>),
    /// NumericDate equal to the given second, fractions truncated
    Date(i64),
    /// `exp` / `nbf` / `iat` checked against the current time
    Window { leeway: u64 },
    Predicate(Predicate),
}

impl fmt::Debug for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Expected::Strings(list) => f.debug_tuple("Strings").field(list).finish(),
            Expected::Date(at) => f.debug_tuple("Date").field(at).finish(),
            Expected::Window { leeway } => f.debug_struct("Window").field("leeway", leeway).finish(),
            Expected::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One registered claim check
#[derive(Debug, Clone)]
pub(crate) struct Assertion {
    pub target: Target,
    pub name: String,
    pub expected: Expected,
}

impl Assertion {
    /// `now_ms` is the current time in milliseconds since the Unix epoch
    pub fn check(&self, token: &DecodedToken, now_ms: i128) -> Result<(), ClaimError> {
        let claim = match self.target {
            Target::Header => token.header().get_claim(&self.name),
            Target::Payload => token.payload().get_claim(&self.name),
        };

        match &self.expected {
            Expected::Window { leeway } => check_window(&claim, now_ms, *leeway),
            Expected::Predicate(predicate) => {
                if predicate(&claim, token) {
                    Ok(())
                } else {
                    Err(claim.invalid())
                }
            }
            Expected::Value(expected) => compare(&claim, |node| json_eq(node, expected)),
            Expected::Strings(expected) => compare(&claim, |node| {
                string_list(node).is_some_and(|actual| actual == *expected)
            }),
            Expected::Date(expected) => compare(&claim, |node| integral(node) == Some(*expected)),
        }
    }
}

/// Value check: a missing claim is `Missing`, null or a mismatch is `Invalid`
fn compare(claim: &ClaimValue<'_>, matches: impl FnOnce(&Value) -> bool) -> Result<(), ClaimError> {
    match *claim {
        ClaimValue::Missing { name } => Err(ClaimError::Missing {
            claim: name.to_string(),
        }),
        ClaimValue::Present { node, .. } if matches(node) => Ok(()),
        _ => Err(claim.invalid()),
    }
}

/// Current-time check at millisecond precision; a missing or null claim passes
fn check_window(claim: &ClaimValue<'_>, now_ms: i128, leeway: u64) -> Result<(), ClaimError> {
    let Some(at) = claim.as_node().and_then(integral) else {
        return Ok(());
    };
    let at_ms = i128::from(at) * 1000;
    let leeway_ms = i128::from(leeway) * 1000;

    match claim.name() {
        registered::EXPIRES_AT if now_ms.saturating_sub(leeway_ms) > at_ms => Err(ClaimError::Expired {
            claim: claim.name().to_string(),
            at,
        }),
        registered::NOT_BEFORE | registered::ISSUED_AT if now_ms.saturating_add(leeway_ms) < at_ms => {
            Err(ClaimError::NotYetValid {
                claim: claim.name().to_string(),
                at,
            })
        }
        _ => Ok(()),
    }
}

/// A single string reads as a one-element list
fn string_list(node: &Value) -> Option<Vec<&str>> {
    match node {
        Value::String(s) => Some(vec![s.as_str()]),
        Value::Array(items) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}

fn json_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| json_eq(a, b))
        }
        _ => actual == expected,
    }
}
