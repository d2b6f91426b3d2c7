//! Application info.

// self
use crate::_prelude::*;

/// Public description of the calling application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
	/// Application identifier.
	#[serde(rename = "clientID")]
	pub client_id: String,
	/// Display name.
	pub name: String,
	/// Description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
