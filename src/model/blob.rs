//! Blob upload records and status transitions.

// self
use crate::_prelude::*;

/// Lifecycle state of a blob upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlobStatus {
	/// Upload slot created; bytes not yet confirmed.
	Pending,
	/// Bytes uploaded.
	Completed,
	/// Upload abandoned.
	Cancelled,
}
impl BlobStatus {
	/// Wire representation.
	pub const fn as_str(self) -> &'static str {
		match self {
			BlobStatus::Pending => "PENDING",
			BlobStatus::Completed => "COMPLETED",
			BlobStatus::Cancelled => "CANCELLED",
		}
	}
}
impl Display for BlobStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for BlobStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"PENDING" => Ok(BlobStatus::Pending),
			"COMPLETED" => Ok(BlobStatus::Completed),
			"CANCELLED" => Ok(BlobStatus::Cancelled),
			other => Err(Error::UnsupportedValue { field: "blob status", value: other.to_owned() }),
		}
	}
}

/// Upload slot returned by `POST {base}/blobs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBlob {
	/// Blob identifier.
	pub id: String,
	/// Presigned storage URL the bytes are `PUT` to.
	pub signed_url: String,
}

/// Blob status after `PATCH {base}/blobs/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedBlob {
	/// Blob identifier.
	pub id: String,
	/// Status as reported by the platform.
	pub status: String,
}

/// Body of `POST {base}/blobs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlobUpload {
	/// Uploader.
	pub wallet: String,
	/// Content type of the bytes.
	pub mime_type: String,
	/// Size in bytes.
	pub file_size: u64,
}
