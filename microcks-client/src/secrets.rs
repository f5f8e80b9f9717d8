//! Secret endpoints

use microcks_core::domain::secret::Secret;
use tracing::info;

use crate::MicrocksClient;
use crate::error::{ClientError, Result};

impl MicrocksClient {
    /// Register a secret in Microcks
    ///
    /// Secrets must exist before remote artifacts referencing them are
    /// downloaded.
    ///
    /// # Arguments
    /// * `secret` - The secret to create; its name must not be empty
    pub async fn create_secret(&self, secret: &Secret) -> Result<()> {
        if secret.name.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "secret name is required".to_string(),
            ));
        }

        let url = self.url("/api/secrets");
        let response = self.client.post(&url).json(secret).send().await?;
        self.expect_created(response, "Secret").await?;

        info!("Secret {} has been created", secret.name);
        Ok(())
    }
}
