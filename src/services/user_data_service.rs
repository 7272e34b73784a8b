use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use tracing::{info, instrument};

use crate::dto::auth_dto::MessageResponse;
use crate::error::{Error, Result};
use crate::services::api_client::ApiClient;

pub const EMPTY_EXPORT_MESSAGE: &str = "Aucune donnée à exporter.";

/// Account-level operations: export, import and deletion.
#[derive(Clone)]
pub struct UserDataService {
    api: ApiClient,
}

impl UserDataService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Raw export document. An empty body is an error.
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<Bytes> {
        let body = self.api.get_bytes("user/export").await?;
        if body.is_empty() {
            return Err(Error::BadRequest(EMPTY_EXPORT_MESSAGE.to_string()));
        }
        info!(bytes = body.len(), "User data exported");
        Ok(body)
    }

    /// Writes the export to `path`.
    pub async fn export_to(&self, path: impl AsRef<Path>) -> Result<usize> {
        let body = self.export().await?;
        tokio::fs::write(path.as_ref(), &body).await?;
        Ok(body.len())
    }

    /// Uploads a previously exported document as the `file` form field.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn import(&self, file_name: &str, content: Vec<u8>) -> Result<MessageResponse> {
        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("application/json")?;
        let form = Form::new().part("file", part);
        let response = self.api.post_multipart("user/import", form).await?;
        info!(file_name, "User data imported");
        Ok(response)
    }

    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<MessageResponse> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.json".to_string());
        self.import(&file_name, content).await
    }

    /// Deletes the account server-side, then ends the local session.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<()> {
        self.api.delete("user/delete").await?;
        self.api.session().logout();
        info!("Account deleted");
        Ok(())
    }
}
