use crate::error::GatewayError;
use anviz_core::constants::DEFAULT_TCP_PORT;
use anviz_protocol::ChecksumPolicy;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Configuration for the gateway listener and its connections
///
/// # Example
///
/// ```
/// use anviz_network::GatewayConfig;
/// use anviz_protocol::ChecksumPolicy;
/// use std::time::Duration;
///
/// let config = GatewayConfig {
///     listen_addr: "0.0.0.0:8888".to_string(),
///     idle_timeout: Some(Duration::from_secs(30)),
///     checksum_policy: ChecksumPolicy::Warn,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Address to listen on, resolved to IPv4 at bind time
    pub listen_addr: String,

    /// Rolling deadline for each framed read; `None` waits forever
    pub idle_timeout: Option<Duration>,

    /// What to do with frames whose checksum does not match
    pub checksum_policy: ChecksumPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_TCP_PORT}"),
            idle_timeout: None,
            checksum_policy: ChecksumPolicy::Ignore,
        }
    }
}

/// Turn a configured listen value into a `host:port` string.
///
/// Terminals are usually configured with just a port, so a bare port is
/// bound on every interface. Anything else is passed through untouched.
///
/// ```
/// use anviz_network::normalize_listen_addr;
///
/// assert_eq!(normalize_listen_addr("8888"), "0.0.0.0:8888");
/// assert_eq!(normalize_listen_addr("127.0.0.1:9000"), "127.0.0.1:9000");
/// assert_eq!(normalize_listen_addr(""), "0.0.0.0:8888");
/// ```
pub fn normalize_listen_addr(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return format!("0.0.0.0:{DEFAULT_TCP_PORT}");
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return format!("0.0.0.0:{raw}");
    }
    raw.to_string()
}

/// Resolve `addr` and keep the first IPv4 result.
///
/// # Errors
///
/// Returns an error if the name cannot be resolved or has no IPv4 address.
pub async fn resolve_ipv4(addr: &str) -> Result<SocketAddr, GatewayError> {
    let mut candidates = tokio::net::lookup_host(addr).await.map_err(|source| {
        GatewayError::AddressResolution {
            addr: addr.to_string(),
            source,
        }
    })?;

    let resolved = candidates
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| GatewayError::NoIpv4Address(addr.to_string()))?;

    debug!("Resolved {} to {}", addr, resolved);
    Ok(resolved)
}
