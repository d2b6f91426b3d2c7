//! Wire records exchanged with the platform and the argument payloads sent to it.

pub mod app;
pub mod blob;
pub mod file;
pub mod organization;
pub mod role;
pub mod user;

pub use app::*;
pub use blob::*;
pub use file::*;
pub use organization::*;
pub use role::*;
pub use user::*;

// self
use crate::{_prelude::*, error::SigningError};

/// Free-form JSON object attached to users and roles.
pub type Metadata = Map<String, Value>;

/// Serializes an argument payload into the JSON object the body signer consumes.
///
/// Absent optional fields are skipped by the payload types, so only present values are signed.
pub fn to_object<T>(payload: &T) -> Result<Map<String, Value>, SigningError>
where
	T: ?Sized + Serialize,
{
	match serde_json::to_value(payload)? {
		Value::Object(map) => Ok(map),
		other => Err(SigningError::Serialize(serde::ser::Error::custom(format!(
			"payload must serialize to a JSON object, found `{other}`"
		)))),
	}
}
