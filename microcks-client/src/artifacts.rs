//! Artifact and snapshot import endpoints

use std::path::Path;

use microcks_core::domain::artifact::RemoteArtifact;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::MicrocksClient;
use crate::error::{ClientError, Result};

impl MicrocksClient {
    // =============================================================================
    // Local Artifacts
    // =============================================================================

    /// Import a main artifact (OpenAPI, AsyncAPI, WSDL, proto, ...)
    ///
    /// Main artifacts define services; secondary artifacts only add
    /// examples or metadata to services already defined.
    ///
    /// # Arguments
    /// * `path` - Path of the artifact file on the local filesystem
    ///
    /// # Example
    /// ```no_run
    /// # use microcks_client::MicrocksClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = MicrocksClient::new("http://localhost:8080");
    /// client.import_main_artifact("apipastries-openapi.yaml").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn import_main_artifact(&self, path: impl AsRef<Path>) -> Result<()> {
        self.import_artifact(path.as_ref(), true).await
    }

    /// Import a secondary artifact (Postman collection, metadata, examples, ...)
    ///
    /// # Arguments
    /// * `path` - Path of the artifact file on the local filesystem
    pub async fn import_secondary_artifact(&self, path: impl AsRef<Path>) -> Result<()> {
        self.import_artifact(path.as_ref(), false).await
    }

    async fn import_artifact(&self, path: &Path, main: bool) -> Result<()> {
        let mut url = self.url("/api/artifact/upload");
        if !main {
            url.push_str("?mainArtifact=false");
        }

        let response = self.upload_file(path, &url).await?;
        self.expect_created(response, "Artifact").await?;

        info!("Artifact {} has been imported", path.display());
        Ok(())
    }

    /// Import a repository snapshot previously exported from Microcks
    ///
    /// # Arguments
    /// * `path` - Path of the snapshot JSON file
    pub async fn import_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let url = self.url("/api/import");

        let response = self.upload_file(path, &url).await?;
        self.expect_created(response, "Snapshot").await?;

        info!("Snapshot {} has been imported", path.display());
        Ok(())
    }

    /// Send a file as the `file` part of a multipart form
    async fn upload_file(&self, path: &Path, url: &str) -> Result<reqwest::Response> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ClientError::InvalidRequest(format!("{} is not a file", path.display()))
            })?;

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/json")?;
        let form = Form::new().part("file", part);

        Ok(self.client.post(url).multipart(form).send().await?)
    }

    // =============================================================================
    // Remote Artifacts
    // =============================================================================

    /// Ask Microcks to download an artifact from a URL
    ///
    /// # Arguments
    /// * `artifact` - URL to fetch, with an optional secret for authentication
    /// * `main` - Whether this is a main (`true`) or secondary (`false`) artifact
    pub async fn download_remote_artifact(&self, artifact: &RemoteArtifact, main: bool) -> Result<()> {
        let url = self.url("/api/artifact/download");

        let main_flag = main.to_string();
        let mut form = vec![("mainArtifact", main_flag.as_str()), ("url", artifact.url.as_str())];
        if let Some(secret_name) = &artifact.secret_name {
            form.push(("secretName", secret_name.as_str()));
        }

        let response = self.client.post(&url).form(&form).send().await?;
        self.expect_created(response, "Remote artifact").await?;

        info!("Artifact {} has been downloaded", artifact.url);
        Ok(())
    }
}
