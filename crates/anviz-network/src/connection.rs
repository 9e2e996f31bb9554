//! Per-connection protocol loop.
//!
//! Each accepted terminal gets one [`ConnectionHandler`] running in its own
//! task. The handler owns the socket and nothing else; the only thing it
//! shares with other connections is the [`EventSink`].
//!
//! # State machine
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            v                                              │
//!   AwaitingHeader ──> AwaitingPayload ──> Dispatching ─────┘
//!        │                   │                  (ACK sent, best effort)
//!        └───────────────────┴──> Closed
//! ```
//!
//! `AwaitingHeader` and `AwaitingPayload` live inside [`AnvizCodec`]: one
//! `framed.next()` covers both reads. When an idle timeout is configured it
//! applies to each read separately: the deadline restarts once the header is
//! buffered. A header that does not start with the start marker, end of
//! stream, a read error or an idle timeout all move the handler to `Closed`,
//! which drops the socket.
//!
//! Dispatching never closes the connection. A verify record that cannot be
//! decoded is reported and acknowledged like any other frame.

use crate::config::GatewayConfig;
use crate::sink::EventSink;
use anviz_core::constants::HEADER_LEN;
use anviz_core::{Error, FrameStage};
use anviz_protocol::{
    AnvizCodec, ChecksumOutcome, ChecksumPolicy, CommandCode, Frame, Message, VerifyRecord,
    interpret,
};
use futures::{SinkExt, StreamExt};
use std::fmt;
use std::future::{Future, poll_fn};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_util::codec::Framed;
use tracing::{error, info, trace, warn};

/// Why a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// End of stream or reset between frames, or during a header.
    PeerClosed,
    /// The header, or the payload after it, did not arrive within the idle timeout.
    IdleTimeout(Duration),
    /// Byte 0 of a header was not the start marker.
    InvalidStartMarker(u8),
    /// The stream ended part way through a payload.
    Truncated { expected: usize, received: usize },
    /// Any other read failure.
    ReadFailed(String),
}

impl CloseReason {
    fn from_read_error(err: Error) -> Self {
        match err {
            Error::TruncatedFrame {
                stage: FrameStage::Header,
                ..
            } => CloseReason::PeerClosed,
            Error::TruncatedFrame {
                stage: FrameStage::Payload,
                expected,
                received,
            } => CloseReason::Truncated { expected, received },
            Error::InvalidStartMarker(marker) => CloseReason::InvalidStartMarker(marker),
            Error::Io(io)
                if matches!(
                    io.kind(),
                    ErrorKind::ConnectionReset
                        | ErrorKind::ConnectionAborted
                        | ErrorKind::UnexpectedEof
                ) =>
            {
                CloseReason::PeerClosed
            }
            other => CloseReason::ReadFailed(other.to_string()),
        }
    }

    /// Whether this ending deserves an error-level log line.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CloseReason::Truncated { .. } | CloseReason::ReadFailed(_)
        )
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::PeerClosed => write!(f, "peer closed connection"),
            CloseReason::IdleTimeout(idle) => write!(f, "idle for {idle:?}"),
            CloseReason::InvalidStartMarker(marker) => {
                write!(f, "invalid start marker 0x{marker:02X}")
            }
            CloseReason::Truncated { expected, received } => {
                write!(f, "frame truncated ({received} of {expected} bytes)")
            }
            CloseReason::ReadFailed(reason) => write!(f, "read failed: {reason}"),
        }
    }
}

/// What happened on a connection, returned once it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub peer: SocketAddr,
    pub reason: CloseReason,
    pub frames_received: u64,
    pub acks_sent: u64,
}

/// Drives one terminal connection until it closes.
///
/// Generic over the stream so tests can run it on an in-memory duplex.
pub struct ConnectionHandler<S = TcpStream> {
    framed: Framed<S, AnvizCodec>,
    peer: SocketAddr,
    sink: Arc<dyn EventSink>,
    idle_timeout: Option<Duration>,
    checksum_policy: ChecksumPolicy,
    frames_received: u64,
    acks_sent: u64,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        peer: SocketAddr,
        sink: Arc<dyn EventSink>,
        config: &GatewayConfig,
    ) -> Self {
        Self {
            framed: Framed::new(stream, AnvizCodec::new()),
            peer,
            sink,
            idle_timeout: config.idle_timeout,
            checksum_policy: config.checksum_policy,
            frames_received: 0,
            acks_sent: 0,
        }
    }

    /// Run the read, dispatch, ACK loop until the connection closes.
    ///
    /// Frames are handled strictly in arrival order. The socket is released
    /// when this returns.
    pub async fn run(mut self) -> ConnectionSummary {
        info!(peer = %self.peer, "Device connected");

        let reason = loop {
            match self.next_frame().await {
                Ok(Some(frame)) => {
                    self.frames_received += 1;
                    self.dispatch(frame).await;
                }
                Ok(None) => break CloseReason::PeerClosed,
                Err(reason) => break reason,
            }
        };

        match &reason {
            r if r.is_error() => error!(peer = %self.peer, reason = %r, "Connection closed"),
            CloseReason::PeerClosed => info!(peer = %self.peer, "Device disconnected"),
            r => warn!(peer = %self.peer, reason = %r, "Closing connection"),
        }

        ConnectionSummary {
            peer: self.peer,
            reason,
            frames_received: self.frames_received,
            acks_sent: self.acks_sent,
        }
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, CloseReason> {
        let next = match self.idle_timeout {
            Some(idle) => self.next_within(idle).await?,
            None => self.framed.next().await,
        };

        match next {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(e)) => Err(CloseReason::from_read_error(e)),
            None => Ok(None),
        }
    }

    /// Poll the codec under a rolling deadline.
    ///
    /// The deadline covers the header read and is restarted once the codec
    /// has buffered a full header, so the payload read gets its own `idle`.
    async fn next_within(
        &mut self,
        idle: Duration,
    ) -> Result<Option<anviz_core::Result<Frame>>, CloseReason> {
        let deadline = tokio::time::sleep(idle);
        tokio::pin!(deadline);
        let mut header_buffered = false;

        poll_fn(|cx| {
            if let Poll::Ready(next) = self.framed.poll_next_unpin(cx) {
                return Poll::Ready(Ok(next));
            }
            if !header_buffered && self.framed.read_buffer().len() >= HEADER_LEN {
                header_buffered = true;
                deadline.as_mut().reset(Instant::now() + idle);
            }
            deadline
                .as_mut()
                .poll(cx)
                .map(|()| Err(CloseReason::IdleTimeout(idle)))
        })
        .await
    }

    async fn dispatch(&mut self, frame: Frame) {
        let message = match Message::try_from(&frame) {
            Ok(message) => message,
            Err(e) => {
                error!(
                    peer = %self.peer,
                    error = %e,
                    frame_hex = %frame.to_hex(),
                    "Failed to decode frame"
                );
                return;
            }
        };

        info!(
            peer = %self.peer,
            device = %message.device_id,
            command = %message.command,
            length = message.length,
            frame_len = message.frame_len,
            "Received message"
        );

        let outcome = self.checksum_policy.evaluate(&message, frame.as_bytes());
        if let ChecksumOutcome::Mismatch { declared, computed }
        | ChecksumOutcome::Reject { declared, computed } = outcome
        {
            let err = Error::ChecksumMismatch { declared, computed };
            if outcome.is_rejected() {
                warn!(peer = %self.peer, command = %message.command, "{}, dropping frame", err);
                return;
            }
            warn!(peer = %self.peer, command = %message.command, "{}", err);
        }

        match message.command {
            CommandCode::Heartbeat => self.sink.heartbeat(self.peer, &message),
            CommandCode::VerifyRecord => match VerifyRecord::decode(message.payload_bytes()) {
                Ok(record) => {
                    let view = interpret(&record);
                    self.sink.attendance(self.peer, &record, &view);
                }
                Err(e) => self.sink.undecodable_record(self.peer, &message, &e),
            },
            _ => self.sink.other(self.peer, &message),
        }

        self.acknowledge(message.command).await;
    }

    /// Write the ACK for `command`. Failures are logged and the loop carries on.
    async fn acknowledge(&mut self, command: CommandCode) {
        match self.framed.send(command).await {
            Ok(()) => {
                self.acks_sent += 1;
                trace!(peer = %self.peer, command = %command, "ACK sent");
            }
            Err(e) => {
                warn!(peer = %self.peer, command = %command, error = %e, "Failed to send ACK")
            }
        }
    }
}
