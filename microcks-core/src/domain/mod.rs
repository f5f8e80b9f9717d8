//! Core domain types
//!
//! This module contains the payloads exchanged with the Microcks REST API.
//! They are shared between the HTTP client (which sends and reads them) and
//! the container module (which loads secrets and artifacts at startup).

pub mod artifact;
pub mod message;
pub mod metrics;
pub mod secret;
pub mod test;
