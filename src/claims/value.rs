use super::{from_unix_seconds, integral};
use crate::error::ClaimError;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::SystemTime;

/// A claim looked up by name in a header or payload
///
/// Exactly one of three states holds:
///
/// - [`Missing`](ClaimValue::Missing): the name is not in the JSON object.
///   Every typed accessor fails with [`ClaimError::Missing`].
/// - [`Null`](ClaimValue::Null): the name maps to JSON `null`. Scalar
///   accessors return `Ok(None)`; collection accessors return an empty
///   collection.
/// - [`Present`](ClaimValue::Present): any other JSON value. Scalar
///   accessors coerce by the node's JSON type and return `Ok(None)` when
///   the type doesn't fit.
///
/// ```ignore
/// let token = jwtkit::decode(text)?;
/// match token.payload().get_claim("role") {
///     claim if claim.is_missing() => { /* never sent */ }
///     claim => println!("{:?}", claim.as_string()?),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClaimValue<'a> {
    Missing { name: &'a str },
    Null { name: &'a str },
    Present { name: &'a str, node: &'a Value },
}

impl<'a> ClaimValue<'a> {
    pub(crate) fn lookup(name: &'a str, node: Option<&'a Value>) -> Self {
        match node {
            None => ClaimValue::Missing { name },
            Some(Value::Null) => ClaimValue::Null { name },
            Some(node) => ClaimValue::Present { name, node },
        }
    }

    /// The claim name this value was looked up with
    pub fn name(&self) -> &'a str {
        match *self {
            ClaimValue::Missing { name }
            | ClaimValue::Null { name }
            | ClaimValue::Present { name, .. } => name,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ClaimValue::Missing { .. })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null { .. })
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ClaimValue::Present { .. })
    }

    /// The raw JSON node, if the claim is present
    pub fn as_node(&self) -> Option<&'a Value> {
        match *self {
            ClaimValue::Present { node, .. } => Some(node),
            _ => None,
        }
    }

    /// Apply `coerce` to the node: `Err` when missing, `Ok(None)` when null
    fn scalar<T>(&self, coerce: impl FnOnce(&'a Value) -> Option<T>) -> Result<Option<T>, ClaimError> {
        match *self {
            ClaimValue::Missing { name } => Err(ClaimError::Missing {
                claim: name.to_string(),
            }),
            ClaimValue::Null { .. } => Ok(None),
            ClaimValue::Present { node, .. } => Ok(coerce(node)),
        }
    }

    pub fn as_boolean(&self) -> Result<Option<bool>, ClaimError> {
        self.scalar(Value::as_bool)
    }

    /// Numeric claim as `i32`; fractions are truncated, out-of-range values are absent
    pub fn as_int(&self) -> Result<Option<i32>, ClaimError> {
        self.scalar(|node| integral(node).and_then(|n| i32::try_from(n).ok()))
    }

    /// Numeric claim as `i64`; fractions are truncated
    pub fn as_long(&self) -> Result<Option<i64>, ClaimError> {
        self.scalar(integral)
    }

    pub fn as_double(&self) -> Result<Option<f64>, ClaimError> {
        self.scalar(Value::as_f64)
    }

    /// String claim; numbers and booleans are not stringified
    pub fn as_string(&self) -> Result<Option<&'a str>, ClaimError> {
        self.scalar(Value::as_str)
    }

    /// Numeric claim read as whole seconds since the Unix epoch
    pub fn as_date(&self) -> Result<Option<SystemTime>, ClaimError> {
        self.scalar(|node| integral(node).map(from_unix_seconds))
    }

    /// Decode each element of an array claim
    ///
    /// Null yields an empty collection and a non-array yields `Ok(None)`.
    /// An element that `decode` rejects fails the whole claim with
    /// [`ClaimError::Invalid`].
    pub fn as_array<T>(
        &self,
        decode: impl FnMut(&'a Value) -> Option<T>,
    ) -> Result<Option<Box<[T]>>, ClaimError> {
        Ok(self.as_list(decode)?.map(Vec::into_boxed_slice))
    }

    /// Same as [`as_array`](Self::as_array), collected into a `Vec`
    pub fn as_list<T>(
        &self,
        mut decode: impl FnMut(&'a Value) -> Option<T>,
    ) -> Result<Option<Vec<T>>, ClaimError> {
        let node = match *self {
            ClaimValue::Missing { name } => {
                return Err(ClaimError::Missing {
                    claim: name.to_string(),
                });
            }
            ClaimValue::Null { .. } => return Ok(Some(Vec::new())),
            ClaimValue::Present { node, .. } => node,
        };

        let Some(elements) = node.as_array() else {
            return Ok(None);
        };

        elements
            .iter()
            .map(|element| decode(element).ok_or_else(|| self.invalid()))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Deserialize the node into any `serde` type
    pub fn as_type<T: DeserializeOwned>(&self) -> Result<Option<T>, ClaimError> {
        match *self {
            ClaimValue::Present { node, .. } => T::deserialize(node)
                .map(Some)
                .map_err(|_| self.invalid()),
            _ => self.scalar(|_| None),
        }
    }

    pub(crate) fn invalid(&self) -> ClaimError {
        ClaimError::Invalid {
            claim: self.name().to_string(),
            actual: self.to_string(),
        }
    }
}

/// Renders the value the way it appears on the wire, or `<missing>`
impl fmt::Display for ClaimValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimValue::Missing { .. } => write!(f, "<missing>"),
            ClaimValue::Null { .. } => write!(f, "null"),
            ClaimValue::Present { node, .. } => write!(f, "{node}"),
        }
    }
}
