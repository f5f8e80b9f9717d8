//! Container launch description
//!
//! Every container of the ensemble is described by a [`ContainerLaunch`]
//! first and only then handed to the container runtime. Keeping the
//! description as plain data lets tests check ports and environment without
//! a Docker daemon.

use std::collections::BTreeMap;
use std::time::Duration;

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ContainerRequest, GenericImage, ImageExt};
use tracing::{debug, info};

use crate::error::Result;
use crate::image::ImageRef;

/// Everything needed to start one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLaunch {
    pub image: ImageRef,
    /// Container ports published on random host ports
    pub exposed_ports: Vec<u16>,
    pub env: BTreeMap<String, String>,
    /// Network to attach to; created on first use
    pub network: Option<String>,
    /// Container name, also resolvable by the other containers of the network
    pub container_name: Option<String>,
    /// Log line on stdout marking the container as ready
    pub ready_message: Option<String>,
    pub startup_timeout: Duration,
}

impl ContainerLaunch {
    pub fn new(image: ImageRef, startup_timeout: Duration) -> Self {
        Self {
            image,
            exposed_ports: Vec::new(),
            env: BTreeMap::new(),
            network: None,
            container_name: None,
            ready_message: None,
            startup_timeout,
        }
    }

    /// Get an environment variable of the launch
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Build the runtime request
    pub fn request(&self) -> ContainerRequest<GenericImage> {
        let mut image = GenericImage::new(self.image.name.clone(), self.image.tag.clone());
        for port in &self.exposed_ports {
            image = image.with_exposed_port(port.tcp());
        }
        if let Some(message) = &self.ready_message {
            image = image.with_wait_for(WaitFor::message_on_stdout(message.clone()));
        }

        let base_request: ContainerRequest<GenericImage> =
            image.with_startup_timeout(self.startup_timeout);

        let mut request = self
            .env
            .iter()
            .fold(base_request, |req, (key, value)| req.with_env_var(key, value));

        if let Some(network) = &self.network {
            request = request.with_network(network.clone());
        }
        if let Some(name) = &self.container_name {
            request = request.with_container_name(name.clone());
        }

        request
    }

    /// Start the container and wait for its ready message
    pub async fn start(&self) -> Result<ContainerAsync<GenericImage>> {
        info!(
            "Starting container {} from {}",
            self.container_name.as_deref().unwrap_or("<unnamed>"),
            self.image
        );
        debug!("Container environment: {:?}", self.env.keys().collect::<Vec<_>>());

        let container = self.request().start().await?;

        info!("Container {} is ready", container.id());
        Ok(container)
    }
}

/// Host-side `http://host:port` address of a started container port
pub(crate) async fn http_endpoint(
    container: &ContainerAsync<GenericImage>,
    port: u16,
) -> Result<String> {
    let (host, port) = host_and_port(container, port).await?;
    Ok(format!("http://{}:{}", host, port))
}

/// Host name and mapped host port of a started container port
pub(crate) async fn host_and_port(
    container: &ContainerAsync<GenericImage>,
    port: u16,
) -> Result<(String, u16)> {
    let host = container.get_host().await?;
    let host_port = container.get_host_port_ipv4(port.tcp()).await?;
    Ok((host.to_string(), host_port))
}
