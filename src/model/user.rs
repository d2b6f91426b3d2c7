//! User records, memberships, and user mutation payloads.

// self
use crate::{_prelude::*, model::Metadata};

/// User known to an application (optionally scoped to an organization).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
	/// Owning application.
	#[serde(rename = "clientID", default)]
	pub client_id: String,
	/// Organization scope, when the record was fetched through one.
	#[serde(rename = "organizationID", default, skip_serializing_if = "Option::is_none")]
	pub organization_id: Option<String>,
	/// Wallet address bound to the user.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub wallet: Option<String>,
	/// Display nickname.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>,
	/// Role names held by the user.
	#[serde(default)]
	pub roles: Vec<String>,
	/// Application-defined metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Metadata>,
	/// Creation instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

/// Membership of a user in one organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMembership {
	/// Owning application.
	#[serde(rename = "clientID")]
	pub client_id: String,
	/// Organization the user belongs to.
	#[serde(rename = "organizationID")]
	pub organization_id: String,
	/// Member.
	#[serde(rename = "userID")]
	pub user_id: String,
	/// Roles held inside the organization.
	#[serde(default)]
	pub roles: Vec<String>,
}

/// Body of `POST /s/{client}/users`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
	/// Wallet address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub wallet: Option<String>,
	/// Email address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<String>,
	/// Display nickname.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>,
	/// Application-defined metadata.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Metadata>,
}

/// Body of `PUT {base}/users/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UpdateUserMetadata {
	/// New nickname.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>,
	/// Replacement metadata.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Metadata>,
}
