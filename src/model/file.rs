//! File records and file payloads.

// self
use crate::{_prelude::*, auth::UserId};

/// File registered against an uploaded blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
	/// File identifier.
	pub id: String,
	/// Backing blob.
	#[serde(rename = "blobID")]
	pub blob_id: String,
	/// Owning application.
	#[serde(rename = "clientID", default)]
	pub client_id: String,
	/// Organization scope.
	#[serde(rename = "organizationID", default, skip_serializing_if = "Option::is_none")]
	pub organization_id: Option<String>,
	/// Uploader.
	pub wallet: String,
	/// Display name.
	pub name: String,
	/// Description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Roles a caller must hold to read the file.
	#[serde(default)]
	pub roles_required: Vec<String>,
	/// Creation instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

/// Body of `PATCH {base}/files/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFile {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// New role list.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub roles_required: Option<Vec<String>>,
}

/// Body of `POST {base}/files`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFile {
	/// Backing blob.
	#[serde(rename = "blobID")]
	pub blob_id: String,
	/// Uploader.
	pub wallet: String,
	/// Display name.
	pub name: String,
	/// Description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Roles a caller must hold to read the file.
	pub roles_required: Vec<String>,
}

/// Input of the composite file upload.
#[derive(Clone, PartialEq, Eq)]
pub struct NewFile {
	/// Uploading user; also recorded as the file's wallet.
	pub user_id: UserId,
	/// Display name.
	pub name: String,
	/// Description.
	pub description: Option<String>,
	/// Roles a caller must hold to read the file.
	pub roles_required: Vec<String>,
	/// Content type sent with the bytes.
	pub mime_type: String,
	/// File contents.
	pub bytes: Vec<u8>,
}
impl Debug for NewFile {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NewFile")
			.field("user_id", &self.user_id)
			.field("name", &self.name)
			.field("mime_type", &self.mime_type)
			.field("len", &self.bytes.len())
			.finish_non_exhaustive()
	}
}
