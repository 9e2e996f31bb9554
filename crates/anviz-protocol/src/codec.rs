//! Tokio codec for Anviz frame delimiting.
//!
//! Terminals push frames over a raw TCP stream with no outer length prefix.
//! The only way to find a frame boundary is to read the fixed 10-byte header,
//! take the payload length from bytes 8-9 and then read exactly that many
//! payload bytes plus the 2-byte checksum. `AnvizCodec` implements that rule
//! for tokio-util's `Framed`:
//!
//! - [`Decoder`]: yields one [`Frame`] per complete message
//! - [`Encoder<CommandCode>`]: writes the 10-byte ACK for a command
//!
//! # Architecture
//!
//! ```text
//! TCP Stream -> Decoder -> Frame -> Message::try_from -> dispatch
//! CommandCode -> Encoder -> TCP Stream (10-byte ACK)
//! ```
//!
//! # Desynchronization
//!
//! A header whose first byte is not the `0xA5` start marker means the stream
//! is out of step. The codec reports [`Error::InvalidStartMarker`] and makes no
//! attempt to scan forward for the next marker; the caller closes the
//! connection.
//!
//! # Usage with Tokio Framed
//!
//! ```rust,no_run
//! use tokio::net::TcpStream;
//! use tokio_util::codec::Framed;
//! use anviz_protocol::{AnvizCodec, Message};
//! use futures::{SinkExt, StreamExt};
//!
//! # async fn example() -> anviz_core::Result<()> {
//! let stream = TcpStream::connect("127.0.0.1:8888").await?;
//! let mut framed = Framed::new(stream, AnvizCodec::new());
//!
//! while let Some(frame) = framed.next().await {
//!     let message = Message::try_from(&frame?)?;
//!     framed.send(message.command).await?;
//! }
//! # Ok(())
//! # }
//! ```

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::commands::CommandCode;
use crate::frame::{Frame, declared_length, encode_ack, frame_len};
use anviz_core::constants::{HEADER_LEN, START_MARKER};
use anviz_core::{Error, FrameStage, Result};

/// Tokio codec for Anviz push frames.
///
/// The codec is stateless between calls: everything it needs is in the
/// buffered header, so a partially received frame is simply left in the
/// buffer until enough bytes arrive.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnvizCodec;

impl AnvizCodec {
    pub fn new() -> Self {
        AnvizCodec
    }
}

impl Decoder for AnvizCodec {
    type Item = Frame;
    type Error = Error;

    /// Extract one complete frame from the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Frame))` - A complete frame was split off the buffer
    /// - `Ok(None)` - Need more data (header or payload incomplete)
    /// - `Err(Error::InvalidStartMarker)` - The stream is desynchronized
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < HEADER_LEN {
            src.reserve(HEADER_LEN - src.len());
            return Ok(None);
        }

        if src[0] != START_MARKER {
            return Err(Error::InvalidStartMarker(src[0]));
        }

        let total = frame_len(declared_length(src));
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        Ok(Some(Frame::new(src.split_to(total).freeze())))
    }

    /// Like [`decode`](Self::decode), but reports leftover bytes at end of stream.
    ///
    /// A stream that ends cleanly between frames yields `Ok(None)`. A stream
    /// that ends mid-frame yields [`Error::TruncatedFrame`] naming the stage,
    /// so the caller can tell a terminal hanging up during a header from one
    /// that dropped a payload.
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }
        if buf.is_empty() {
            return Ok(None);
        }

        let received = buf.len();
        let (stage, expected) = if received < HEADER_LEN {
            (FrameStage::Header, HEADER_LEN)
        } else {
            (FrameStage::Payload, frame_len(declared_length(buf)))
        };
        buf.clear();

        Err(Error::TruncatedFrame {
            stage,
            expected,
            received,
        })
    }
}

impl Encoder<CommandCode> for AnvizCodec {
    type Error = Error;

    /// Write the acknowledgment for `item` to the destination buffer.
    fn encode(&mut self, item: CommandCode, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(&encode_ack(item));
        Ok(())
    }
}
