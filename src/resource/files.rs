//! Files, blob uploads, and the composite upload flow.

// self
use crate::{
	_prelude::*,
	auth::{OrganizationId, ResourceId},
	envelope::{self, Page, ResponseEnvelope},
	http::{BlobUploader, Method, RestTransport, TransportRequest},
	model::{
		BlobStatus, CreateFile, CreatedBlob, FileRecord, NewBlobUpload, NewFile, UpdateFile,
		UpdatedBlob,
	},
	obs::Resource,
	resource::{Context, query_input},
	sign::QueryInput,
};

const RESOURCE: Resource = Resource::Files;

/// Caller for file and blob operations.
pub struct Files<T>
where
	T: ?Sized,
{
	ctx: Context<T>,
	uploader: Arc<dyn BlobUploader>,
}
impl<T> Files<T>
where
	T: ?Sized + RestTransport,
{
	/// Creates a caller over a shared context; `uploader` performs the presigned `PUT`.
	pub fn new(ctx: Context<T>, uploader: Arc<dyn BlobUploader>) -> Self {
		Self { ctx, uploader }
	}

	/// Fetches one file record.
	pub async fn get_file_by_id(
		&self,
		id: &ResourceId,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<FileRecord>> {
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/files/{id}", self.ctx.base_path(organization)),
		)
		.with_query(self.ctx.signed_query(organization_input(organization))?);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "get_file_by_id", request).await))
	}

	/// Fetches a short-lived download URL for a file.
	pub async fn get_presigned_url(
		&self,
		id: &ResourceId,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<String>> {
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/files/{id}/url", self.ctx.base_path(organization)),
		)
		.with_query(self.ctx.signed_query(organization_input(organization))?);

		Ok(envelope::normalize_pointer(
			self.ctx.send(RESOURCE, "get_presigned_url", request).await,
			"/data/url",
		))
	}

	/// Lists files one page at a time.
	pub async fn list_files(
		&self,
		organization: Option<&OrganizationId>,
		cursor: Option<&str>,
	) -> Result<ResponseEnvelope<Page<FileRecord>>> {
		let mut input = organization_input(organization);

		if let Some(cursor) = cursor {
			input.insert("cursor".into(), cursor.to_owned());
		}

		let request = TransportRequest::new(
			Method::Get,
			format!("{}/files", self.ctx.base_path(organization)),
		)
		.with_query(self.ctx.signed_query(input)?);

		Ok(envelope::normalize_page(self.ctx.send(RESOURCE, "list_files", request).await))
	}

	/// Updates a file's name, description, or required roles.
	pub async fn update_file(
		&self,
		id: &ResourceId,
		update: &UpdateFile,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<FileRecord>> {
		let request = TransportRequest::new(
			Method::Patch,
			format!("{}/files/{id}", self.ctx.base_path(organization)),
		)
		.with_body(self.ctx.signed_body(update)?);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "update_file", request).await))
	}

	/// Deletes a file record.
	pub async fn delete_file(
		&self,
		id: &ResourceId,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<FileRecord>> {
		let request = TransportRequest::new(
			Method::Delete,
			format!("{}/files/{id}", self.ctx.base_path(organization)),
		)
		.with_query(self.ctx.signed_query(QueryInput::new())?);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "delete_file", request).await))
	}

	/// Registers a file against an uploaded blob.
	pub async fn create_file(
		&self,
		file: &CreateFile,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<FileRecord>> {
		let request = TransportRequest::new(
			Method::Post,
			format!("{}/files", self.ctx.base_path(organization)),
		)
		.with_body(self.ctx.signed_body(file)?);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "create_file", request).await))
	}

	/// Opens a blob upload slot.
	pub async fn create_blob_upload(
		&self,
		blob: &NewBlobUpload,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<CreatedBlob>> {
		let request = TransportRequest::new(
			Method::Post,
			format!("{}/blobs", self.ctx.base_path(organization)),
		)
		.with_body(self.ctx.signed_body(blob)?);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "create_blob_upload", request).await))
	}

	/// Moves a blob upload to `status`.
	pub async fn update_blob_upload_status(
		&self,
		id: &ResourceId,
		status: BlobStatus,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<UpdatedBlob>> {
		let request = TransportRequest::new(
			Method::Patch,
			format!("{}/blobs/{id}", self.ctx.base_path(organization)),
		)
		.with_body(self.ctx.signed_body(&serde_json::json!({ "status": status.as_str() }))?);

		Ok(envelope::normalize_data(
			self.ctx.send(RESOURCE, "update_blob_upload_status", request).await,
		))
	}

	/// Uploads `file` and registers it.
	///
	/// The steps run strictly in order: open a blob slot, `PUT` the bytes to its presigned URL,
	/// mark the blob `COMPLETED`, then create the file record. Any step before the last failing
	/// aborts with [`Error::UploadFailure`]; blobs created by earlier steps are left in place.
	pub async fn add_file(
		&self,
		file: NewFile,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<FileRecord>> {
		let NewFile { user_id, name, description, roles_required, mime_type, bytes } = file;
		let slot = NewBlobUpload {
			wallet: user_id.to_string(),
			mime_type: mime_type.clone(),
			file_size: bytes.len() as u64,
		};
		let created = self
			.create_blob_upload(&slot, organization)
			.await?
			.into_result()
			.map_err(|reason| Error::UploadFailure { reason })?;
		let Some(CreatedBlob { id, signed_url }) =
			created.filter(|blob| !blob.id.is_empty() && !blob.signed_url.is_empty())
		else {
			return Err(Error::UploadFailure { reason: "blob upload returned no data".into() });
		};
		let blob_id = ResourceId::new(&id)?;

		self.uploader.put(&signed_url, &mime_type, bytes).await.map_err(|e| {
			Error::UploadFailure { reason: format!("binary upload failed: {}", e.message()) }
		})?;

		let completed =
			self.update_blob_upload_status(&blob_id, BlobStatus::Completed, organization).await?;

		if let Some(error) = completed.error() {
			return Err(Error::UploadFailure {
				reason: format!("blob status update failed: {error}"),
			});
		}

		let record = CreateFile {
			blob_id: id,
			wallet: user_id.to_string(),
			name,
			description,
			roles_required,
		};

		self.create_file(&record, organization).await
	}
}
impl<T> Clone for Files<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self { ctx: self.ctx.clone(), uploader: Arc::clone(&self.uploader) }
	}
}
impl<T> Debug for Files<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Files").field("ctx", &self.ctx).finish_non_exhaustive()
	}
}

fn organization_input(organization: Option<&OrganizationId>) -> QueryInput {
	query_input(organization.map(|org| ("organizationID", org.as_ref())))
}
