use anyhow::{Context, Result};
use serde::Deserialize;

/// One entry of the JSON array returned by `inspect <name>`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerInfo {
    #[serde(default)]
    pub configuration: Configuration,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub networks: Vec<Network>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub address: Option<String>,
}

impl ContainerInfo {
    /// First network address, if the runtime reported one.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.networks.first().and_then(|n| n.address.as_deref())
    }
}

/// Parse the JSON document produced by `inspect`.
pub fn parse_inspect(raw: &str) -> Result<Vec<ContainerInfo>> {
    serde_json::from_str(raw).context("malformed inspect output")
}
