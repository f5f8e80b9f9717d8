//! Microcks Core
//!
//! Data model shared by the Microcks client and the container module.
//!
//! This crate contains:
//! - Domain types: the payloads exchanged with the Microcks REST API
//!   (test requests and results, secrets, artifacts, messages, metrics)
//! - Serde helpers for the few fields whose wire shape differs from Rust types
//!
//! Nothing here performs I/O.

pub mod domain;
pub mod serde_util;
