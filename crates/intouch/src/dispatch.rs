// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler registry and frame dispatch.
//!
//! The surrounding UDP receive loop hands every datagram to
//! [`HandlerRegistry::dispatch`]. The registry unwraps the `<PACKT>`
//! envelope once (HELLO frames and anything else pass through raw), then
//! walks the registered handlers in registration order: the first handler
//! whose `can_handle` matches gets `handle`, and handlers that reached a
//! terminal state are unregistered after the walk.
//!
//! Single-threaded by design: the registry is single-writer from the
//! receive loop, performs no I/O and never blocks. Frames of one
//! connection are processed strictly in arrival order.

use std::net::SocketAddr;

use crate::protocol::envelope;
use crate::protocol::handler::{Handling, MessageHandler};
use crate::protocol::ProtocolError;

/// What became of one inbound datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler consumed the frame.
    Consumed,
    /// No registered handler matched; the frame was dropped.
    Ignored,
    /// A handler matched but the payload failed to decode; the frame was
    /// dropped and no handler state changed.
    Failed(ProtocolError),
}

/// Ordered registry of live handlers for one logical connection.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn MessageHandler>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; dispatch order is registration order.
    pub fn register<H: MessageHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Live handlers, in dispatch order. The external scheduler reads the
    /// timeout/retry hints through this.
    pub fn iter(&self) -> std::slice::Iter<'_, Box<dyn MessageHandler>> {
        self.handlers.iter()
    }

    /// Route one datagram to the first matching handler.
    pub fn dispatch(&mut self, datagram: &[u8], sender: Option<SocketAddr>) -> DispatchOutcome {
        #[cfg(feature = "frame-hexdump")]
        dump_frame_hex(datagram);

        // Unwrap the envelope once; handlers classify on the inner payload.
        let payload: &[u8] = if envelope::is_envelope(datagram) {
            match envelope::extract(datagram) {
                Some(parts) => {
                    log::trace!(
                        "[dispatch] envelope src={:?} dst={:?} ({} payload bytes)",
                        parts.src_id,
                        parts.dst_id,
                        parts.payload.len()
                    );
                    parts.payload
                }
                None => {
                    log::debug!("[dispatch] dropping malformed envelope ({} bytes)", datagram.len());
                    return DispatchOutcome::Failed(ProtocolError::MalformedEnvelope(
                        "missing child tags",
                    ));
                }
            }
        } else {
            datagram
        };

        let outcome = self.walk(payload, sender);
        self.sweep();
        outcome
    }

    fn walk(&mut self, payload: &[u8], sender: Option<SocketAddr>) -> DispatchOutcome {
        for handler in &mut self.handlers {
            if !handler.can_handle(payload, sender) {
                continue;
            }
            match handler.handle(payload, sender) {
                Ok(Handling::Consumed) => return DispatchOutcome::Consumed,
                Ok(Handling::Forward) => {}
                Err(err) => {
                    log::debug!("[dispatch] handler rejected frame: {err}");
                    return DispatchOutcome::Failed(err);
                }
            }
        }
        log::debug!("[dispatch] no handler for frame ({} bytes)", payload.len());
        DispatchOutcome::Ignored
    }

    /// Unregister handlers whose exchange reached a terminal state.
    pub fn sweep(&mut self) {
        self.handlers.retain(|handler| !handler.should_remove());
    }
}

/// Dump one frame in hex+ASCII rows for wire debugging.
/// Only compiled with: cargo build --features frame-hexdump
#[cfg(feature = "frame-hexdump")]
fn dump_frame_hex(datagram: &[u8]) {
    use crate::config::DEBUG_DUMP_SIZE;

    let dump_len = DEBUG_DUMP_SIZE.min(datagram.len());
    log::debug!("[frame-hexdump] {} bytes (showing {}):", datagram.len(), dump_len);

    for row_start in (0..dump_len).step_by(16) {
        let row = &datagram[row_start..(row_start + 16).min(dump_len)];
        let mut line = format!("{row_start:04x}: ");
        for byte in row {
            line.push_str(&format!("{byte:02x} "));
        }
        for _ in 0..(16 - row.len()) {
            line.push_str("   ");
        }
        line.push_str(" |");
        for byte in row {
            if byte.is_ascii_graphic() || *byte == b' ' {
                line.push(*byte as char);
            } else {
                line.push('.');
            }
        }
        line.push('|');
        log::debug!("[frame-hexdump]   {line}");
    }
}
