use super::{Header, Payload};

/// A token split into its segments, with header and payload parsed
///
/// Produced only by [`decode`](crate::decode). The original text is kept so
/// the signature is checked over the exact bytes that were signed, never
/// over a re-serialization.
///
/// Decoding alone proves nothing about who issued the token. Use a
/// [`TokenVerifier`](crate::TokenVerifier) before trusting any claim.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    token: String,
    /// End of the header segment (position of the first `.`)
    header_end: usize,
    /// End of the payload segment (position of the second `.`)
    payload_end: usize,
    header: Header,
    payload: Payload,
    signature: Vec<u8>,
}

impl DecodedToken {
    pub(crate) fn new(
        token: String,
        header_end: usize,
        payload_end: usize,
        header: Header,
        payload: Payload,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            token,
            header_end,
            payload_end,
            header,
            payload,
            signature,
        }
    }

    /// The original compact token text
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Raw signature bytes (empty for `none` tokens)
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The `header.payload` text the signature covers
    pub fn signing_input(&self) -> &str {
        &self.token[..self.payload_end]
    }

    pub fn header_segment(&self) -> &str {
        &self.token[..self.header_end]
    }

    pub fn payload_segment(&self) -> &str {
        &self.token[self.header_end + 1..self.payload_end]
    }

    pub fn signature_segment(&self) -> &str {
        &self.token[self.payload_end + 1..]
    }
}
