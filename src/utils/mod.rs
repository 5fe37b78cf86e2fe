pub mod base64url;
pub mod der;

pub use base64url::{encode, encode_bytes};
