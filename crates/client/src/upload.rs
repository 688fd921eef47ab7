//! Multi-file upload to cloud storage.
//!
//! The backend accepts or rejects each file on its own and answers with counts. A partial
//! success is not an error here; the caller turns the [`BulkReport`] into a notification.

use crate::client::HttpClient;
use deskhub_core::bulk::BulkReport;
use deskhub_core::{MutationError, PreconditionError, RecordId, TransportError, ValidationError};
use reqwest::multipart::{Form, Part};

const UPLOAD_PATH: &str = "/cloud/upload";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Failed(#[from] MutationError),
}

impl HttpClient {
    /// Upload `files` for `owner`, into `folder` or the root.
    pub async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        owner: &RecordId,
        folder: Option<&RecordId>,
    ) -> Result<BulkReport, UploadError> {
        if files.is_empty() {
            return Err(PreconditionError::new("Please select file(s)").into());
        }

        let mut form = Form::new();
        for file in files {
            form = form.part("files", Part::bytes(file.bytes).file_name(file.name));
        }
        form = form.text("owner_id", owner.to_string());
        if let Some(folder) = folder {
            form = form.text("folder_id", folder.to_string());
        }

        let request = self.authorize(self.http.post(self.url(UPLOAD_PATH)).multipart(form));
        let reply = self.send(request).await.map_err(MutationError::from)?;

        if !reply.is_success() {
            let err = match reply.message() {
                Some(message) => MutationError::Validation(ValidationError {
                    status: reply.status().as_u16(),
                    message: message.to_owned(),
                }),
                None => MutationError::Transport(reply.transport_error()),
            };
            return Err(err.into());
        }

        let report = reply
            .into_body()
            .and_then(|body| serde_json::from_value::<BulkReport>(body).ok())
            .ok_or_else(|| {
                MutationError::from(TransportError::connection("upload response has no counts"))
            })?;
        tracing::info!(
            succeeded = report.success_count,
            total = report.total_count,
            "upload finished"
        );
        Ok(report)
    }
}
