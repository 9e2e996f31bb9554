//! Destinations for decoded terminal events.
//!
//! The connection handler never decides what happens to an attendance
//! record; it hands every decoded event to an [`EventSink`] supplied by the
//! process entry point. [`TracingSink`] writes them to the log, which is all
//! the gateway does today. A storage backend is another implementation of the
//! same trait.

use anviz_core::Error;
use anviz_protocol::{Interpretation, Message, VerifyRecord};
use std::net::SocketAddr;
use tracing::{info, warn};

/// Receiver for events decoded from terminal connections.
///
/// Implementations are shared by every connection task, so they must be
/// `Send + Sync` and must not block for long.
pub trait EventSink: Send + Sync + 'static {
    /// A heartbeat frame arrived.
    fn heartbeat(&self, peer: SocketAddr, message: &Message);

    /// A verify record was decoded and interpreted.
    fn attendance(&self, peer: SocketAddr, record: &VerifyRecord, view: &Interpretation);

    /// A verify record payload could not be decoded. The frame is still acknowledged.
    fn undecodable_record(&self, peer: SocketAddr, message: &Message, error: &Error);

    /// Any other command, known or not.
    fn other(&self, peer: SocketAddr, message: &Message);
}

/// Event sink that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn heartbeat(&self, peer: SocketAddr, message: &Message) {
        info!(peer = %peer, device = %message.device_id, "Heartbeat from device");
    }

    fn attendance(&self, peer: SocketAddr, record: &VerifyRecord, view: &Interpretation) {
        info!(
            peer = %peer,
            employee_id = %view.employee_id,
            mode = %view.mode,
            status = %view.status,
            door_opened = view.door_opened,
            work_type = %hex::encode(record.work_type),
            "{}",
            view
        );
    }

    fn undecodable_record(&self, peer: SocketAddr, message: &Message, error: &Error) {
        warn!(
            peer = %peer,
            error = %error,
            payload_hex = %message.payload_hex(),
            "Failed to decode verify record"
        );
    }

    fn other(&self, peer: SocketAddr, message: &Message) {
        info!(
            peer = %peer,
            command = format_args!("0x{:02X}", message.command.as_byte()),
            known = message.command.is_known(),
            payload_hex = %message.payload_hex(),
            "Message type {}",
            message.command
        );
    }
}
