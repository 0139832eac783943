//! Supported host platforms

use macshift_core::{Error, Result};
use std::fmt;

/// Host OS flavour, which decides the utilities and their arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// iproute2 (`ip link`)
    Linux,
    /// BSD `ifconfig`
    MacOs,
}

impl Platform {
    /// Platform of the running binary
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOs),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "Linux"),
            Platform::MacOs => write!(f, "macOS"),
        }
    }
}
