//! Microcks container
//!
//! Starts the Microcks "uber" image and loads snapshots, secrets and
//! artifacts into it once it is ready.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use microcks_client::MicrocksClient;
use microcks_core::domain::artifact::RemoteArtifact;
use microcks_core::domain::secret::Secret;
use testcontainers::{ContainerAsync, GenericImage};
use tracing::info;

use crate::config::{DEFAULT_STARTUP_TIMEOUT, Settings};
use crate::error::Result;
use crate::image::{DEFAULT_TAG, ImageRef};
use crate::launch::{self, ContainerLaunch};
use crate::platform;

/// Default Microcks image name
pub const MICROCKS_IMAGE: &str = "quay.io/microcks/microcks-uber";

/// HTTP port of the API, the UI and the REST/SOAP/GraphQL mocks
pub const MICROCKS_HTTP_PORT: u16 = 8080;

/// Port of the gRPC mocks
pub const MICROCKS_GRPC_PORT: u16 = 9090;

const READY_MESSAGE: &str = "Started MicrocksApplication";

/// Microcks configuration, and what to load into it once started
#[derive(Debug, Clone)]
pub struct MicrocksContainerConfig {
    pub image: ImageRef,
    pub startup_timeout: Duration,
    /// Set `LOGGING_LEVEL_IO_GITHUB_MICROCKS=DEBUG`
    pub debug: bool,
    pub network: Option<String>,
    pub container_name: Option<String>,
    /// Extra environment variables, applied last
    pub env: BTreeMap<String, String>,

    pub snapshots: Vec<PathBuf>,
    pub secrets: Vec<Secret>,
    pub main_remote_artifacts: Vec<RemoteArtifact>,
    pub secondary_remote_artifacts: Vec<RemoteArtifact>,
    pub main_artifacts: Vec<PathBuf>,
    pub secondary_artifacts: Vec<PathBuf>,
}

impl MicrocksContainerConfig {
    pub fn new(image: ImageRef) -> Self {
        Self {
            image,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            debug: false,
            network: None,
            container_name: None,
            env: BTreeMap::new(),
            snapshots: Vec::new(),
            secrets: Vec::new(),
            main_remote_artifacts: Vec::new(),
            secondary_remote_artifacts: Vec::new(),
            main_artifacts: Vec::new(),
            secondary_artifacts: Vec::new(),
        }
    }

    /// Configuration using the image, timeout and debug flag of `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let mut config = Self::new(settings.image_ref()?);
        config.startup_timeout = settings.startup_timeout;
        config.debug = settings.debug;
        Ok(config)
    }

    /// Describe the container to start
    pub fn launch(&self) -> ContainerLaunch {
        let mut launch = ContainerLaunch::new(self.image.clone(), self.startup_timeout);
        launch.exposed_ports = vec![MICROCKS_HTTP_PORT, MICROCKS_GRPC_PORT];
        launch.ready_message = Some(READY_MESSAGE.to_string());
        launch.network = self.network.clone();
        launch.container_name = self.container_name.clone();

        if let Some(options) = platform::java_options() {
            launch.env.insert("JAVA_OPTIONS".to_string(), options.to_string());
        }
        if self.debug {
            launch
                .env
                .insert("LOGGING_LEVEL_IO_GITHUB_MICROCKS".to_string(), "DEBUG".to_string());
        }
        launch.env.extend(self.env.clone());

        launch
    }

    /// Load everything this configuration lists into a running Microcks
    ///
    /// Snapshots go first, then secrets so that remote artifacts can use
    /// them, then remote and local artifacts; main artifacts always precede
    /// secondary ones.
    pub async fn import_into(&self, client: &MicrocksClient) -> Result<()> {
        for snapshot in &self.snapshots {
            client.import_snapshot(snapshot).await?;
        }
        for secret in &self.secrets {
            client.create_secret(secret).await?;
        }
        for artifact in &self.main_remote_artifacts {
            client.download_remote_artifact(artifact, true).await?;
        }
        for artifact in &self.secondary_remote_artifacts {
            client.download_remote_artifact(artifact, false).await?;
        }
        for artifact in &self.main_artifacts {
            client.import_main_artifact(artifact).await?;
        }
        for artifact in &self.secondary_artifacts {
            client.import_secondary_artifact(artifact).await?;
        }

        Ok(())
    }

    /// Start Microcks and load the configured artifacts
    ///
    /// The container is removed when the returned value is dropped.
    pub async fn start(&self) -> Result<MicrocksContainer> {
        let container = self.launch().start().await?;
        let microcks = MicrocksContainer::from_container(container).await?;

        self.import_into(microcks.client()).await?;
        info!("Microcks is available at {}", microcks.http_endpoint());

        Ok(microcks)
    }
}

impl Default for MicrocksContainerConfig {
    fn default() -> Self {
        Self::new(ImageRef::new(MICROCKS_IMAGE, DEFAULT_TAG))
    }
}

/// A running Microcks container
pub struct MicrocksContainer {
    container: ContainerAsync<GenericImage>,
    http_endpoint: String,
    grpc_endpoint: String,
    client: MicrocksClient,
}

impl MicrocksContainer {
    async fn from_container(container: ContainerAsync<GenericImage>) -> Result<Self> {
        let http_endpoint = launch::http_endpoint(&container, MICROCKS_HTTP_PORT).await?;
        let (host, grpc_port) = launch::host_and_port(&container, MICROCKS_GRPC_PORT).await?;

        Ok(Self {
            client: MicrocksClient::new(http_endpoint.clone()),
            grpc_endpoint: format!("grpc://{}:{}", host, grpc_port),
            http_endpoint,
            container,
        })
    }

    /// Client bound to this instance
    pub fn client(&self) -> &MicrocksClient {
        &self.client
    }

    /// Host-side URL of the API and HTTP mocks (e.g., "http://localhost:49153")
    pub fn http_endpoint(&self) -> &str {
        &self.http_endpoint
    }

    /// Host-side URL of the gRPC mocks (e.g., "grpc://localhost:49154")
    pub fn grpc_mock_endpoint(&self) -> &str {
        &self.grpc_endpoint
    }

    pub fn rest_mock_endpoint(&self, service: &str, version: &str) -> Result<String> {
        Ok(self.client.rest_mock_endpoint(service, version)?)
    }

    pub fn soap_mock_endpoint(&self, service: &str, version: &str) -> Result<String> {
        Ok(self.client.soap_mock_endpoint(service, version)?)
    }

    pub fn graphql_mock_endpoint(&self, service: &str, version: &str) -> Result<String> {
        Ok(self.client.graphql_mock_endpoint(service, version)?)
    }

    /// Container identifier
    pub fn id(&self) -> &str {
        self.container.id()
    }

    /// Stop the container without removing it
    pub async fn stop(&self) -> Result<()> {
        self.container.stop().await?;
        Ok(())
    }
}
