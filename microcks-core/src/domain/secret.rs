//! Secret domain types
//!
//! Secrets hold credentials Microcks needs to fetch remote artifacts or to
//! call protected endpoints during tests.

use serde::{Deserialize, Serialize};

/// A named secret registered in Microcks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Unique name, referenced by remote artifacts
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Header carrying `token`, `Authorization` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert_pem: Option<String>,
}

impl Secret {
    /// Creates a secret with only a name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a token secret sent through a custom header
    pub fn token(
        name: impl Into<String>,
        token: impl Into<String>,
        token_header: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            token: Some(token.into()),
            token_header: Some(token_header.into()),
            ..Default::default()
        }
    }

    /// Creates a basic-auth secret
    pub fn basic(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }
}
