//! Role checks, assigned roles, and token-gated role requirements.

// self
use crate::_prelude::*;

/// Result of a role check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasRole {
	/// Whether the subject holds the role.
	#[serde(default)]
	pub has_role: bool,
}

/// Role explicitly assigned to a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedRole {
	/// Assignment kind, e.g. `ASSIGNED_ROLE`.
	#[serde(rename = "type", default)]
	pub kind: String,
	/// Role level that was assigned.
	pub level: RoleLevel,
}

/// Name and description of a role level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLevel {
	/// Role name.
	pub name: String,
	/// Human-readable description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// On-chain holding that grants a role inside an organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequirement {
	/// Requirement identifier.
	pub id: String,
	/// Role granted.
	pub role: String,
	/// Token contract address.
	pub contract: String,
	/// Token standard, e.g. `ERC721`.
	pub contract_type: String,
	/// Minimum holding.
	pub quantity: u64,
	/// Chain the contract lives on.
	#[serde(rename = "chainID")]
	pub chain_id: u64,
	/// Token type for multi-token contracts.
	#[serde(rename = "tokenTypeID", default, skip_serializing_if = "Option::is_none")]
	pub token_type_id: Option<u64>,
}

/// Body of `POST .../organizations/{org}/role_requirement`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoleRequirement {
	/// Token contract address.
	pub contract: String,
	/// Token standard.
	pub contract_type: String,
	/// Minimum holding.
	pub quantity: u64,
	/// Chain the contract lives on.
	#[serde(rename = "chainID")]
	pub chain_id: u64,
	/// Token type for multi-token contracts.
	#[serde(rename = "tokenTypeID", skip_serializing_if = "Option::is_none")]
	pub token_type_id: Option<u64>,
	/// Role granted.
	pub role: String,
}
