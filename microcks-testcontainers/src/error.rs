//! Error types for container management

use microcks_client::ClientError;
use testcontainers::TestcontainersError;
use thiserror::Error;

/// Result type alias for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Errors that can occur while starting or configuring containers
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container runtime failed to start, inspect or stop a container
    #[error("Container runtime error: {0}")]
    Runtime(#[from] TestcontainersError),

    /// Microcks rejected an artifact, secret or snapshot loaded at startup
    #[error("Microcks API call failed: {0}")]
    Client(#[from] ClientError),

    /// An image reference could not be parsed
    #[error("Invalid image reference '{0}'")]
    InvalidImage(String),

    /// The configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
