//! Per-request freshness values.

// self
use crate::_prelude::*;

/// Freshness value attached to every signed payload.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nonce(String);
impl Nonce {
	/// Wraps a caller-chosen nonce.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Current wall-clock time in milliseconds since the epoch.
	pub fn now() -> Self {
		Self(now_millis().to_string())
	}

	/// Returns the nonce text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Nonce {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<&str> for Nonce {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for Nonce {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<Nonce> for String {
	fn from(value: Nonce) -> Self {
		value.0
	}
}
impl Debug for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Nonce({})", self.0)
	}
}
impl Display for Nonce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Milliseconds since the Unix epoch according to the system clock.
pub fn now_millis() -> i128 {
	OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}
