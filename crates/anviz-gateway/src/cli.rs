use anviz_core::constants::{DEFAULT_DEBUG_IDLE_SECS, DEFAULT_TCP_PORT};
use anviz_network::{GatewayConfig, normalize_listen_addr};
use anviz_protocol::ChecksumPolicy;
use clap::Parser;
use std::time::Duration;

/// TCP gateway for Anviz EP300Pro attendance terminals
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Port or host:port to listen on
    #[arg(short, long, env = "TCP_PORT", default_value_t = DEFAULT_TCP_PORT.to_string())]
    pub listen: String,

    /// Close a connection after this many seconds without a complete frame
    #[arg(long, env = "IDLE_TIMEOUT_SECS")]
    pub idle_timeout_secs: Option<u64>,

    /// What to do with frames whose checksum does not match: ignore, warn, enforce
    #[arg(long, env = "CHECKSUM_POLICY", default_value_t = ChecksumPolicy::Ignore)]
    pub checksum_policy: ChecksumPolicy,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Hex-dump raw traffic instead of running the protocol gateway
    #[arg(long)]
    pub raw_dump: bool,

    /// Idle deadline in seconds for raw-dump connections
    #[arg(long, default_value_t = DEFAULT_DEBUG_IDLE_SECS)]
    pub debug_idle_secs: u64,
}

impl Cli {
    pub fn listen_addr(&self) -> String {
        normalize_listen_addr(&self.listen)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            listen_addr: self.listen_addr(),
            // Zero means no deadline.
            idle_timeout: self
                .idle_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            checksum_policy: self.checksum_policy,
        }
    }
}
