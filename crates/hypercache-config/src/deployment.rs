//! Deployment role configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which parts of the gateway run in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentRole {
    /// Store client, internal gRPC service, and HTTP gateway together.
    #[default]
    All,
    /// Store client and internal gRPC service only.
    Service,
    /// HTTP gateway only, dialing a remote internal service.
    Gateway,
}

impl DeploymentRole {
    /// Returns true if this role serves the internal gRPC service.
    #[must_use]
    pub const fn has_service(&self) -> bool {
        matches!(self, Self::All | Self::Service)
    }

    /// Returns true if this role serves the public HTTP gateway.
    #[must_use]
    pub const fn has_gateway(&self) -> bool {
        matches!(self, Self::All | Self::Gateway)
    }
}

impl fmt::Display for DeploymentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Service => write!(f, "service"),
            Self::Gateway => write!(f, "gateway"),
        }
    }
}
