//! Microcks async minion container
//!
//! The minion publishes mock messages for AsyncAPI operations on WebSocket
//! and, when connected to them, on Kafka and AMQP brokers.

use std::collections::BTreeMap;
use std::time::Duration;

use testcontainers::{ContainerAsync, GenericImage};
use tracing::info;

use crate::config::DEFAULT_STARTUP_TIMEOUT;
use crate::connection::{GenericConnection, KafkaConnection};
use crate::error::Result;
use crate::image::{DEFAULT_TAG, ImageRef};
use crate::launch::{self, ContainerLaunch};
use crate::microcks::MICROCKS_HTTP_PORT;
use crate::platform;

/// Default async minion image name
pub const ASYNC_MINION_IMAGE: &str = "quay.io/microcks/microcks-uber-async-minion";

/// HTTP port of the minion, also serving WebSocket mocks
pub const ASYNC_MINION_HTTP_PORT: u16 = 8081;

const READY_MESSAGE: &str = "Profile prod activated.";

/// Async minion configuration
#[derive(Debug, Clone)]
pub struct AsyncMinionConfig {
    pub image: ImageRef,
    pub startup_timeout: Duration,
    /// Set the Quarkus console and Microcks categories to DEBUG
    pub debug: bool,
    pub network: Option<String>,
    pub container_name: Option<String>,
    /// `host:port` of Microcks as seen from the minion
    pub microcks_host_port: String,
    pub kafka: Option<KafkaConnection>,
    pub amqp: Option<GenericConnection>,
    /// Extra environment variables, applied last
    pub env: BTreeMap<String, String>,
}

impl AsyncMinionConfig {
    /// Minion reaching Microcks at `microcks_host_port` (e.g., "microcks:8080")
    pub fn new(image: ImageRef, microcks_host_port: impl Into<String>) -> Self {
        Self {
            image,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            debug: false,
            network: None,
            container_name: None,
            microcks_host_port: microcks_host_port.into(),
            kafka: None,
            amqp: None,
            env: BTreeMap::new(),
        }
    }

    /// Minion matching a Microcks image, reaching it by container name
    pub fn for_microcks(microcks_image: &ImageRef, microcks_name: &str) -> Self {
        Self::new(
            microcks_image.async_minion(),
            format!("{}:{}", microcks_name, MICROCKS_HTTP_PORT),
        )
    }

    /// Value of `ASYNC_PROTOCOLS`, if any broker is connected
    ///
    /// WebSocket is always on; each connected broker is appended after a
    /// leading comma.
    fn async_protocols(&self) -> Option<String> {
        let mut protocols = String::new();
        if self.kafka.is_some() {
            protocols.push_str(",KAFKA");
        }
        if self.amqp.is_some() {
            protocols.push_str(",AMQP");
        }
        (!protocols.is_empty()).then_some(protocols)
    }

    /// Describe the container to start
    pub fn launch(&self) -> ContainerLaunch {
        let mut launch = ContainerLaunch::new(self.image.clone(), self.startup_timeout);
        launch.exposed_ports = vec![ASYNC_MINION_HTTP_PORT];
        launch.ready_message = Some(READY_MESSAGE.to_string());
        launch.network = self.network.clone();
        launch.container_name = self.container_name.clone();

        let env = &mut launch.env;
        env.insert(
            "MICROCKS_HOST_PORT".to_string(),
            self.microcks_host_port.clone(),
        );
        if let Some(options) = platform::java_options() {
            env.insert("JAVA_OPTIONS".to_string(), options.to_string());
        }
        if let Some(protocols) = self.async_protocols() {
            env.insert("ASYNC_PROTOCOLS".to_string(), protocols);
        }
        if let Some(kafka) = &self.kafka {
            env.insert(
                "KAFKA_BOOTSTRAP_SERVER".to_string(),
                kafka.bootstrap_servers.clone(),
            );
        }
        if let Some(amqp) = &self.amqp {
            env.insert("AMQP_SERVER".to_string(), amqp.url.clone());
            if let Some(username) = &amqp.username {
                env.insert("AMQP_USERNAME".to_string(), username.clone());
            }
            if let Some(password) = &amqp.password {
                env.insert("AMQP_PASSWORD".to_string(), password.clone());
            }
        }
        if self.debug {
            env.insert("QUARKUS_LOG_CONSOLE_LEVEL".to_string(), "DEBUG".to_string());
            env.insert(
                "QUARKUS_LOG_CATEGORY__IO_GITHUB_MICROCKS__LEVEL".to_string(),
                "DEBUG".to_string(),
            );
        }
        env.extend(self.env.clone());

        launch
    }

    /// Start the minion
    ///
    /// Microcks must already be running and reachable at `microcks_host_port`.
    pub async fn start(&self) -> Result<AsyncMinionContainer> {
        let container = self.launch().start().await?;
        let (host, port) = launch::host_and_port(&container, ASYNC_MINION_HTTP_PORT).await?;
        info!("Async minion is available at {}:{}", host, port);

        Ok(AsyncMinionContainer {
            container,
            host,
            port,
        })
    }
}

impl Default for AsyncMinionConfig {
    fn default() -> Self {
        Self::new(
            ImageRef::new(ASYNC_MINION_IMAGE, DEFAULT_TAG),
            format!("microcks:{}", MICROCKS_HTTP_PORT),
        )
    }
}

/// A running async minion
pub struct AsyncMinionContainer {
    container: ContainerAsync<GenericImage>,
    host: String,
    port: u16,
}

impl AsyncMinionContainer {
    /// Kafka topic where mock messages of an operation are published
    ///
    /// # Arguments
    /// * `service` - Service name, e.g. `Pastry orders API`
    /// * `version` - Service version, e.g. `0.1.0`
    /// * `operation` - Operation name, with or without its action (`SUBSCRIBE pastry/orders`)
    pub fn kafka_mock_topic(&self, service: &str, version: &str, operation: &str) -> String {
        kafka_mock_topic(service, version, operation)
    }

    /// Host-side WebSocket URL where mock messages of an operation are published
    pub fn websocket_mock_endpoint(&self, service: &str, version: &str, operation: &str) -> String {
        websocket_mock_endpoint(&self.host, self.port, service, version, operation)
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

/// Drop the action (`SUBSCRIBE`, `PUBLISH`, ...) in front of an operation name
fn operation_name(operation: &str) -> &str {
    match operation.split_once(' ') {
        Some((_, name)) => name,
        None => operation,
    }
}

fn kafka_mock_topic(service: &str, version: &str, operation: &str) -> String {
    let service: String = service.chars().filter(|c| *c != ' ' && *c != '-').collect();
    format!(
        "{}-{}-{}",
        service,
        version,
        operation_name(operation).replace('/', "-")
    )
}

fn websocket_mock_endpoint(
    host: &str,
    port: u16,
    service: &str,
    version: &str,
    operation: &str,
) -> String {
    format!(
        "ws://{}:{}/api/ws/{}/{}/{}",
        host,
        port,
        service.replace(' ', "+"),
        version.replace(' ', "+"),
        operation_name(operation)
    )
}
