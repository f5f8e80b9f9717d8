//! Artifact domain types

use serde::{Deserialize, Serialize};

/// An artifact Microcks downloads itself from a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteArtifact {
    pub url: String,
    /// Secret used to authenticate the download
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

impl RemoteArtifact {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret_name: None,
        }
    }

    pub fn with_secret(url: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret_name: Some(secret_name.into()),
        }
    }
}

impl From<&str> for RemoteArtifact {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for RemoteArtifact {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}
