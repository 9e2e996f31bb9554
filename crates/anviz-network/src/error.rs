use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur while setting up or running the gateway listener
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The configured address could not be resolved
    #[error("Failed to resolve {addr}: {source}")]
    AddressResolution {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The address resolved, but not to any IPv4 address
    #[error("No IPv4 address found for {0}")]
    NoIpv4Address(String),

    /// Failed to bind to address
    #[error("Failed to bind to {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
