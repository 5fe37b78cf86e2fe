use crate::claims::{ClaimTree, ClaimValue, header};

/// JOSE header of a decoded token
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    claims: ClaimTree,
}

impl Header {
    pub(crate) fn new(claims: ClaimTree) -> Self {
        Self { claims }
    }

    /// The `alg` parameter
    ///
    /// `None` when absent or not a string. Verification then fails with an
    /// algorithm mismatch.
    pub fn algorithm(&self) -> Option<&str> {
        self.claims.get_str(header::ALGORITHM)
    }

    /// The `typ` parameter, usually `JWT`
    pub fn token_type(&self) -> Option<&str> {
        self.claims.get_str(header::TYPE)
    }

    /// The `cty` parameter
    pub fn content_type(&self) -> Option<&str> {
        self.claims.get_str(header::CONTENT_TYPE)
    }

    /// The `kid` parameter
    pub fn key_id(&self) -> Option<&str> {
        self.claims.get_str(header::KEY_ID)
    }

    pub fn get_claim<'a>(&'a self, name: &'a str) -> ClaimValue<'a> {
        self.claims.get_claim(name)
    }

    pub fn claims(&self) -> &ClaimTree {
        &self.claims
    }
}
