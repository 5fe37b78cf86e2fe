mod builder;
mod codec;
mod decoded;
mod header;
mod payload;

pub use builder::TokenBuilder;
pub use codec::decode;
pub use decoded::DecodedToken;
pub use header::Header;
pub use payload::Payload;
