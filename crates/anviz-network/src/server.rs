//! TCP listener for Anviz terminals.
//!
//! # Architecture
//!
//! ```text
//! Terminal A ┐
//!            │
//! Terminal B ├──> GatewayServer ──spawn──> ConnectionHandler (one task each)
//!            │                                   │
//! Terminal N ┘                                   └──> EventSink (shared)
//! ```
//!
//! The server keeps no per-connection state. There is no connection limit
//! and no shutdown hook: the accept loop and every handler run until the
//! process exits.

use crate::config::{GatewayConfig, resolve_ipv4};
use crate::connection::ConnectionHandler;
use crate::error::GatewayError;
use crate::sink::EventSink;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Pause after a failed accept so a persistent error (e.g. fd exhaustion)
/// does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts terminal connections and runs one handler task per connection.
pub struct GatewayServer {
    listener: TcpListener,
    config: GatewayConfig,
    sink: Arc<dyn EventSink>,
}

impl GatewayServer {
    /// Resolve the configured address to IPv4 and bind it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The address cannot be resolved, or has no IPv4 address
    /// - The port is already in use or needs privileges
    pub async fn bind(
        config: GatewayConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, GatewayError> {
        let addr = resolve_ipv4(&config.listen_addr).await?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::BindFailed { addr, source })?;

        info!(
            addr = %addr,
            checksum_policy = %config.checksum_policy,
            idle_timeout_secs = config.idle_timeout.map(|d| d.as_secs()),
            "Anviz gateway listening"
        );

        Ok(Self {
            listener,
            config,
            sink,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    ///
    /// Accept errors are logged and the loop keeps going.
    pub async fn run(self) {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
            }

            let handler = ConnectionHandler::new(stream, peer, self.sink.clone(), &self.config);
            tokio::spawn(async move {
                let summary = handler.run().await;
                debug!(
                    peer = %summary.peer,
                    frames = summary.frames_received,
                    acks = summary.acks_sent,
                    reason = %summary.reason,
                    "Connection finished"
                );
            });
        }
    }
}
