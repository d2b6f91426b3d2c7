//! Organizations and their mutation payloads.

// self
use crate::_prelude::*;

/// Organization owned by an application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
	/// Organization identifier.
	#[serde(rename = "organizationID")]
	pub organization_id: String,
	/// Owning application.
	#[serde(rename = "clientID", default)]
	pub client_id: String,
	/// Display name.
	pub name: String,
	/// Description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Creation instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

/// Body of `PUT /s/{client}/organizations/{org}`.
///
/// A missing description is sent as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOrganization {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New description.
	pub description: String,
}
