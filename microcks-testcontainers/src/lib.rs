//! Microcks Testcontainers
//!
//! Start Microcks and its companions from a test suite, load contract
//! artifacts into it and drive conformance tests through
//! [`MicrocksClient`](microcks_client::MicrocksClient).
//!
//! # Example
//!
//! ```no_run
//! use microcks_core::domain::test::{TestRequest, TestRunnerType};
//! use microcks_testcontainers::{MicrocksContainerConfig, Settings};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     microcks_testcontainers::logging::init();
//!
//!     let mut config = MicrocksContainerConfig::from_settings(&Settings::from_env())?;
//!     config.main_artifacts.push("apipastries-openapi.yaml".into());
//!
//!     let microcks = config.start().await?;
//!     let pastries = microcks.rest_mock_endpoint("API Pastries", "0.0.1")?;
//!     println!("Pastries are mocked at {}", pastries);
//!
//!     let result = microcks
//!         .client()
//!         .test_endpoint(&TestRequest::new(
//!             "API Pastries:0.0.1",
//!             TestRunnerType::OpenApiSchema,
//!             "http://host.testcontainers.internal:3002",
//!             Duration::from_secs(2),
//!         ))
//!         .await?;
//!     assert!(result.success);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod ensemble;
pub mod error;
pub mod image;
pub mod launch;
pub mod logging;
pub mod microcks;
pub mod minion;
pub mod platform;
pub mod postman;

pub use config::Settings;
pub use connection::{GenericConnection, KafkaConnection};
pub use ensemble::{MicrocksContainerEnsemble, StartedEnsemble};
pub use error::{ContainerError, Result};
pub use image::ImageRef;
pub use microcks::{MicrocksContainer, MicrocksContainerConfig};
pub use minion::{AsyncMinionConfig, AsyncMinionContainer};
pub use postman::{PostmanConfig, PostmanContainer};
