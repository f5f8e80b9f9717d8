//! Microcks ensemble
//!
//! Microcks plus its optional companions (async minion, Postman runtime) on
//! a dedicated network. Each ensemble gets its own network and container
//! names, so ensembles started by concurrent tests never resolve each
//! other's containers.

use uuid::Uuid;

use crate::config::Settings;
use crate::connection::{GenericConnection, KafkaConnection};
use crate::error::Result;
use crate::image::ImageRef;
use crate::microcks::{MICROCKS_HTTP_PORT, MicrocksContainer, MicrocksContainerConfig};
use crate::minion::{ASYNC_MINION_HTTP_PORT, AsyncMinionConfig, AsyncMinionContainer};
use crate::postman::{POSTMAN_HTTP_PORT, PostmanConfig, PostmanContainer};

/// Names of the network and containers of one ensemble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsembleNames {
    pub network: String,
    pub microcks: String,
    pub async_minion: String,
    pub postman: String,
}

impl EnsembleNames {
    fn unique() -> Self {
        Self::with_suffix(&Uuid::new_v4().simple().to_string())
    }

    fn with_suffix(suffix: &str) -> Self {
        Self {
            network: format!("microcks-network-{}", suffix),
            microcks: format!("microcks-{}", suffix),
            async_minion: format!("microcks-async-minion-{}", suffix),
            postman: format!("microcks-postman-runtime-{}", suffix),
        }
    }
}

/// Configuration of a Microcks ensemble
#[derive(Debug, Clone)]
pub struct MicrocksContainerEnsemble {
    names: EnsembleNames,
    microcks: MicrocksContainerConfig,
    async_minion: Option<AsyncMinionConfig>,
    postman: Option<PostmanConfig>,
}

impl MicrocksContainerEnsemble {
    /// Ensemble running `image` for Microcks
    pub fn new(image: ImageRef) -> Self {
        Self::with_names(MicrocksContainerConfig::new(image), EnsembleNames::unique())
    }

    /// Ensemble using the image, timeout and debug flag of `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let microcks = MicrocksContainerConfig::from_settings(settings)?;
        Ok(Self::with_names(microcks, EnsembleNames::unique()))
    }

    fn with_names(mut microcks: MicrocksContainerConfig, names: EnsembleNames) -> Self {
        microcks.network = Some(names.network.clone());
        microcks.container_name = Some(names.microcks.clone());
        microcks.env.insert(
            "TEST_CALLBACK_URL".to_string(),
            format!("http://{}:{}", names.microcks, MICROCKS_HTTP_PORT),
        );
        microcks.env.insert(
            "ASYNC_MINION_URL".to_string(),
            format!("http://{}:{}", names.async_minion, ASYNC_MINION_HTTP_PORT),
        );

        Self {
            names,
            microcks,
            async_minion: None,
            postman: None,
        }
    }

    pub fn names(&self) -> &EnsembleNames {
        &self.names
    }

    /// Network shared by the containers; other containers (brokers, the
    /// tested application) should join it to be reachable from Microcks
    pub fn network(&self) -> &str {
        &self.names.network
    }

    pub fn microcks(&self) -> &MicrocksContainerConfig {
        &self.microcks
    }

    /// Microcks configuration, to list artifacts, secrets and snapshots to load
    pub fn microcks_mut(&mut self) -> &mut MicrocksContainerConfig {
        &mut self.microcks
    }

    pub fn async_minion(&self) -> Option<&AsyncMinionConfig> {
        self.async_minion.as_ref()
    }

    pub fn postman(&self) -> Option<&PostmanConfig> {
        self.postman.as_ref()
    }

    /// Add the async minion; calling it again returns the existing one
    ///
    /// The minion image follows the Microcks image.
    pub fn enable_async_feature(&mut self) -> &mut AsyncMinionConfig {
        let names = &self.names;
        let microcks = &self.microcks;
        self.async_minion.get_or_insert_with(|| {
            let mut minion = AsyncMinionConfig::for_microcks(&microcks.image, &names.microcks);
            minion.startup_timeout = microcks.startup_timeout;
            minion.debug = microcks.debug;
            minion.network = Some(names.network.clone());
            minion.container_name = Some(names.async_minion.clone());
            minion
        })
    }

    /// Let the async minion publish mock messages on Kafka
    pub fn connect_kafka(&mut self, connection: KafkaConnection) -> &mut Self {
        self.enable_async_feature().kafka = Some(connection);
        self
    }

    /// Let the async minion publish mock messages on AMQP
    pub fn connect_amqp(&mut self, connection: GenericConnection) -> &mut Self {
        self.enable_async_feature().amqp = Some(connection);
        self
    }

    /// Add the Postman runtime so that `POSTMAN` tests can run
    pub fn enable_postman(&mut self) -> &mut PostmanConfig {
        if self.postman.is_none() {
            self.microcks.env.insert(
                "POSTMAN_RUNNER_URL".to_string(),
                format!("http://{}:{}", self.names.postman, POSTMAN_HTTP_PORT),
            );
        }

        let names = &self.names;
        let startup_timeout = self.microcks.startup_timeout;
        self.postman.get_or_insert_with(|| {
            let mut postman = PostmanConfig::default();
            postman.startup_timeout = startup_timeout;
            postman.network = Some(names.network.clone());
            postman.container_name = Some(names.postman.clone());
            postman
        })
    }

    /// Start Microcks, then the async minion, then the Postman runtime
    ///
    /// If a later container fails to start, the ones already started are
    /// removed as the error is returned.
    pub async fn start(&self) -> Result<StartedEnsemble> {
        let microcks = self.microcks.start().await?;

        let async_minion = match &self.async_minion {
            Some(config) => Some(config.start().await?),
            None => None,
        };

        let postman = match &self.postman {
            Some(config) => Some(config.start().await?),
            None => None,
        };

        Ok(StartedEnsemble {
            network: self.names.network.clone(),
            microcks,
            async_minion,
            postman,
        })
    }
}

impl Default for MicrocksContainerEnsemble {
    fn default() -> Self {
        Self::with_names(MicrocksContainerConfig::default(), EnsembleNames::unique())
    }
}

/// A running ensemble; containers are removed when it is dropped
pub struct StartedEnsemble {
    network: String,
    microcks: MicrocksContainer,
    async_minion: Option<AsyncMinionContainer>,
    postman: Option<PostmanContainer>,
}

impl StartedEnsemble {
    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn microcks(&self) -> &MicrocksContainer {
        &self.microcks
    }

    pub fn async_minion(&self) -> Option<&AsyncMinionContainer> {
        self.async_minion.as_ref()
    }

    pub fn postman(&self) -> Option<&PostmanContainer> {
        self.postman.as_ref()
    }

    /// Stop every container, companions first
    pub async fn stop(&self) -> Result<()> {
        if let Some(postman) = &self.postman {
            postman.stop().await?;
        }
        if let Some(minion) = &self.async_minion {
            minion.stop().await?;
        }
        self.microcks.stop().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ensemble() -> MicrocksContainerEnsemble {
        MicrocksContainerEnsemble::with_names(
            MicrocksContainerConfig::new(ImageRef::new(
                "quay.io/microcks/microcks-uber",
                "1.10.0-native",
            )),
            EnsembleNames::with_suffix("t1"),
        )
    }

    #[test]
    fn test_unique_names() {
        let first = MicrocksContainerEnsemble::default();
        let second = MicrocksContainerEnsemble::default();

        assert_ne!(first.network(), second.network());
        assert_ne!(first.names().microcks, second.names().microcks);
        assert!(first.network().starts_with("microcks-network-"));
    }

    #[test]
    fn test_microcks_launch() {
        let launch = ensemble().microcks().launch();

        assert_eq!(launch.network.as_deref(), Some("microcks-network-t1"));
        assert_eq!(launch.container_name.as_deref(), Some("microcks-t1"));
        assert_eq!(launch.env_var("TEST_CALLBACK_URL"), Some("http://microcks-t1:8080"));
        assert_eq!(
            launch.env_var("ASYNC_MINION_URL"),
            Some("http://microcks-async-minion-t1:8081")
        );
        assert_eq!(launch.env_var("POSTMAN_RUNNER_URL"), None);
    }

    #[test]
    fn test_async_feature() {
        let mut ensemble = ensemble();
        assert!(ensemble.async_minion().is_none());

        ensemble.enable_async_feature();
        let launch = ensemble.async_minion().unwrap().launch();

        assert_eq!(
            launch.image.to_string(),
            "quay.io/microcks/microcks-uber-async-minion:1.10.0"
        );
        assert_eq!(launch.network.as_deref(), Some("microcks-network-t1"));
        assert_eq!(launch.container_name.as_deref(), Some("microcks-async-minion-t1"));
        assert_eq!(launch.env_var("MICROCKS_HOST_PORT"), Some("microcks-t1:8080"));
    }

    #[test]
    fn test_async_feature_is_idempotent() {
        let mut ensemble = ensemble();
        ensemble.connect_kafka(KafkaConnection::new("kafka:19092"));
        ensemble.enable_async_feature();

        let launch = ensemble.async_minion().unwrap().launch();
        assert_eq!(launch.env_var("KAFKA_BOOTSTRAP_SERVER"), Some("kafka:19092"));
        assert_eq!(launch.env_var("ASYNC_PROTOCOLS"), Some(",KAFKA"));
    }

    #[test]
    fn test_connections_imply_async_feature() {
        let mut ensemble = ensemble();
        ensemble
            .connect_kafka(KafkaConnection::new("kafka:19092"))
            .connect_amqp(GenericConnection::with_credentials("rabbitmq:5672", "test", "test"));

        let launch = ensemble.async_minion().unwrap().launch();
        assert_eq!(launch.env_var("ASYNC_PROTOCOLS"), Some(",KAFKA,AMQP"));
        assert_eq!(launch.env_var("AMQP_SERVER"), Some("rabbitmq:5672"));
    }

    #[test]
    fn test_minion_inherits_debug_and_timeout() {
        let settings = Settings {
            startup_timeout: Duration::from_secs(45),
            debug: true,
            ..Settings::default()
        };
        let mut ensemble = MicrocksContainerEnsemble::from_settings(&settings).unwrap();

        let minion = ensemble.enable_async_feature();
        assert!(minion.debug);
        assert_eq!(minion.startup_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_postman() {
        let mut ensemble = ensemble();
        ensemble.enable_postman();
        ensemble.enable_postman();

        let launch = ensemble.postman().unwrap().launch();
        assert_eq!(
            launch.container_name.as_deref(),
            Some("microcks-postman-runtime-t1")
        );
        assert_eq!(launch.network.as_deref(), Some("microcks-network-t1"));
        assert_eq!(
            ensemble.microcks().launch().env_var("POSTMAN_RUNNER_URL"),
            Some("http://microcks-postman-runtime-t1:3000")
        );
    }

    #[test]
    fn test_artifacts_are_kept() {
        let mut ensemble = ensemble();
        ensemble
            .microcks_mut()
            .main_artifacts
            .push("pastry-orders-asyncapi.yml".into());

        assert_eq!(ensemble.microcks().main_artifacts.len(), 1);
    }
}
