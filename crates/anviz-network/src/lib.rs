//! Network layer for the Anviz attendance gateway.
//!
//! Terminals connect to the gateway over plain TCP and push binary frames.
//! This crate owns the socket side of that exchange: it binds the listener,
//! runs one [`ConnectionHandler`] task per terminal, and reports decoded
//! events to an injected [`EventSink`].
//!
//! # Components
//!
//! - **GatewayServer**: IPv4 listener and accept loop
//! - **ConnectionHandler**: per-connection read → decode → dispatch → ACK loop
//! - **EventSink / TracingSink**: where decoded events go (logs by default)
//! - **RawDumpServer**: debug listener that hex-dumps whatever a terminal sends
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use anviz_network::{GatewayConfig, GatewayServer, TracingSink};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::default();
//! let server = GatewayServer::bind(config, Arc::new(TracingSink)).await?;
//! server.run().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod debug;
mod error;
mod server;
mod sink;

pub use config::{GatewayConfig, normalize_listen_addr, resolve_ipv4};
pub use connection::{CloseReason, ConnectionHandler, ConnectionSummary};
pub use debug::{RawDumpServer, dump_connection};
pub use error::GatewayError;
pub use server::GatewayServer;
pub use sink::{EventSink, TracingSink};
