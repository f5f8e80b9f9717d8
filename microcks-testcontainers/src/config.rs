//! Test suite configuration
//!
//! Lets a CI pipeline pin the Microcks image or relax startup timeouts
//! without touching test code.

use std::time::Duration;

use crate::error::{ContainerError, Result};
use crate::image::ImageRef;

/// Default Microcks image
pub const DEFAULT_IMAGE: &str = "quay.io/microcks/microcks-uber:latest";

/// Default time allowed for a container to report readiness
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings shared by the containers of a test suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Microcks image (e.g., "quay.io/microcks/microcks-uber:1.10.0")
    pub image: String,

    /// Maximum time to wait for each container's readiness message
    pub startup_timeout: Duration,

    /// Turn on DEBUG logging inside Microcks and the async minion
    pub debug: bool,
}

impl Settings {
    /// Creates settings from environment variables
    ///
    /// Expected environment variables:
    /// - MICROCKS_IMAGE (optional, default: quay.io/microcks/microcks-uber:latest)
    /// - MICROCKS_STARTUP_TIMEOUT (optional, seconds, default: 120)
    /// - MICROCKS_DEBUG (optional, `1` or `true`, default: false)
    ///
    /// Unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let image = lookup("MICROCKS_IMAGE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string());

        let startup_timeout = lookup("MICROCKS_STARTUP_TIMEOUT")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_STARTUP_TIMEOUT);

        let debug = lookup("MICROCKS_DEBUG")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);

        Self {
            image,
            startup_timeout,
            debug,
        }
    }

    /// Parsed Microcks image
    pub fn image_ref(&self) -> Result<ImageRef> {
        self.image.parse()
    }

    /// Validates the settings
    pub fn validate(&self) -> Result<()> {
        self.image_ref()?;

        if self.startup_timeout.is_zero() {
            return Err(ContainerError::InvalidConfig(
                "startup_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            debug: false,
        }
    }
}
