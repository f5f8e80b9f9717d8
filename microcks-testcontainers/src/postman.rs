//! Postman runtime sidecar
//!
//! Microcks delegates `POSTMAN` test runs to this container.

use std::time::Duration;

use testcontainers::{ContainerAsync, GenericImage};
use tracing::info;

use crate::config::DEFAULT_STARTUP_TIMEOUT;
use crate::error::Result;
use crate::image::ImageRef;
use crate::launch::ContainerLaunch;

/// Default Postman runtime image name
pub const POSTMAN_IMAGE: &str = "quay.io/microcks/microcks-postman-runtime";

/// Default Postman runtime image tag
pub const POSTMAN_TAG: &str = "latest";

/// Port the runtime listens on inside the network
pub const POSTMAN_HTTP_PORT: u16 = 3000;

const READY_MESSAGE: &str = "postman-runtime wrapper listening on port 3000";

/// Postman runtime configuration
#[derive(Debug, Clone)]
pub struct PostmanConfig {
    pub image: ImageRef,
    pub startup_timeout: Duration,
    pub network: Option<String>,
    pub container_name: Option<String>,
}

impl PostmanConfig {
    pub fn new(image: ImageRef) -> Self {
        Self {
            image,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            network: None,
            container_name: None,
        }
    }

    /// Describe the container to start
    pub fn launch(&self) -> ContainerLaunch {
        let mut launch = ContainerLaunch::new(self.image.clone(), self.startup_timeout);
        launch.exposed_ports = vec![POSTMAN_HTTP_PORT];
        launch.ready_message = Some(READY_MESSAGE.to_string());
        launch.network = self.network.clone();
        launch.container_name = self.container_name.clone();
        launch
    }

    /// Start the runtime
    pub async fn start(&self) -> Result<PostmanContainer> {
        let container = self.launch().start().await?;
        info!("Postman runtime {} is ready", container.id());
        Ok(PostmanContainer { container })
    }
}

impl Default for PostmanConfig {
    fn default() -> Self {
        Self::new(ImageRef::new(POSTMAN_IMAGE, POSTMAN_TAG))
    }
}

/// A running Postman runtime
pub struct PostmanContainer {
    container: ContainerAsync<GenericImage>,
}

impl PostmanContainer {
    pub fn id(&self) -> &str {
        self.container.id()
    }

    /// Stop the container without removing it
    pub async fn stop(&self) -> Result<()> {
        self.container.stop().await?;
        Ok(())
    }
}
