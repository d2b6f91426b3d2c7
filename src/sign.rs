//! HMAC-SHA256 signing for secret-authenticated platform calls.
//!
//! Both variants attach a `nonce` and a `sig` entry. The signature is the lowercase hex
//! HMAC-SHA256 of a canonical form of the input plus nonce, keyed by the client secret:
//!
//! - [`sign_query`] digests the key-sorted `application/x-www-form-urlencoded` string.
//! - [`sign_body`] digests the compact JSON of the top-level key-sorted object while the returned
//!   payload keeps the caller's insertion order.

pub mod body;
pub mod nonce;
pub mod query;

pub use body::*;
pub use nonce::*;
pub use query::*;

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{auth::ClientSecret, error::SigningError};

/// Key under which the freshness nonce travels.
pub const NONCE_KEY: &str = "nonce";
/// Key under which the signature travels.
pub const SIGNATURE_KEY: &str = "sig";

type HmacSha256 = Hmac<Sha256>;

/// Computes the lowercase hex HMAC-SHA256 of `message` keyed by `secret`.
pub fn hmac_hex(secret: &ClientSecret, message: &[u8]) -> Result<String, SigningError> {
	let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
		.map_err(|_| SigningError::InvalidKey)?;

	mac.update(message);

	Ok(hex::encode(mac.finalize().into_bytes()))
}
