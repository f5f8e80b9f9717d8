//! Container image references

use std::fmt;
use std::str::FromStr;

use crate::error::ContainerError;

/// Tag used when an image reference has none
pub const DEFAULT_TAG: &str = "latest";

/// A container image reference split into name and tag
///
/// The name keeps its registry and repository path
/// (e.g. `quay.io/microcks/microcks-uber`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// Image of the async minion matching this Microcks image
    ///
    /// `quay.io/microcks/microcks-uber:1.10.0-native` becomes
    /// `quay.io/microcks/microcks-uber-async-minion:1.10.0`. The minion has
    /// no native build, so the `-native` suffix is dropped.
    pub fn async_minion(&self) -> Self {
        let name = if self.name.ends_with("-async-minion") {
            self.name.clone()
        } else {
            self.name
                .replace("microcks-uber", "microcks-uber-async-minion")
        };
        let tag = self
            .tag
            .strip_suffix("-native")
            .unwrap_or(&self.tag)
            .to_string();

        Self { name, tag }
    }
}

impl FromStr for ImageRef {
    type Err = ContainerError;

    /// Parse `registry/repo:tag`; a port in the registry host is not taken as a tag
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(ContainerError::InvalidImage(s.to_string()));
        }

        let last_segment_start = s.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (name, tag) = match s[last_segment_start..].rfind(':') {
            Some(i) => {
                let split = last_segment_start + i;
                (&s[..split], &s[split + 1..])
            }
            None => (s, DEFAULT_TAG),
        };

        if name.is_empty() || tag.is_empty() || name.ends_with('/') {
            return Err(ContainerError::InvalidImage(s.to_string()));
        }

        Ok(Self::new(name, tag))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}
