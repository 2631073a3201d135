// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `STATP`/`STATQ` partial status updates.
//!
//! Instead of re-reading the whole status region, the device pushes delta
//! frames naming the changed words:
//!
//! ```text
//! tag + count(1) + count x (offset(u16 BE) + value(2))
//! ```
//!
//! Deltas are a continuous stream, so the handler never reaches a terminal
//! state; each frame replaces `changes` wholesale.

use std::net::SocketAddr;

use super::constants::{has_tag, TAG_PARTIAL_STATUS, TAG_PARTIAL_STATUS_ALT};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{require_len, ProtocolError, ProtocolResult};

/// One delta: status-region offset and the 2-byte replacement value.
pub type StatusChange = (u16, [u8; 2]);

#[derive(Debug, Clone, Default)]
pub struct PartialStatusHandler {
    exchange: Exchange,
    /// Deltas decoded from the last inbound frame.
    pub changes: Vec<StatusChange>,
}

impl PartialStatusHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound delta push. `changes` must fit the 1-byte count field.
    #[must_use]
    pub fn report(changes: &[StatusChange], parms: &ConnectionParms) -> Self {
        debug_assert!(changes.len() <= usize::from(u8::MAX));
        let mut inner = TAG_PARTIAL_STATUS.to_vec();
        inner.push(changes.len() as u8);
        for (offset, value) in changes {
            inner.extend_from_slice(&offset.to_be_bytes());
            inner.extend_from_slice(value);
        }
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            changes: changes.to_vec(),
        }
    }
}

impl MessageHandler for PartialStatusHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_PARTIAL_STATUS) || has_tag(payload, TAG_PARTIAL_STATUS_ALT)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        require_len(payload, 6, "STATP")?;
        let count = usize::from(payload[5]);
        let declared = 6 + count * 4;
        if payload.len() != declared {
            return Err(ProtocolError::LengthMismatch {
                declared: declared - 6,
                actual: payload.len() - 6,
            });
        }

        let mut changes = Vec::with_capacity(count);
        for entry in payload[6..].chunks_exact(4) {
            let offset = u16::from_be_bytes([entry[0], entry[1]]);
            changes.push((offset, [entry[2], entry[3]]));
        }
        self.changes = changes;
        Ok(Handling::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parms() -> ConnectionParms {
        ConnectionParms::new("127.0.0.1:10022".parse().unwrap(), *b"SRCID", *b"DESTID")
    }

    #[test]
    fn test_recv_can_handle() {
        let handler = PartialStatusHandler::new();
        assert!(handler.can_handle(b"STATP", None));
        assert!(handler.can_handle(b"STATQ", None));
        assert!(!handler.can_handle(b"OTHER", None));
    }

    #[test]
    fn test_recv_handle_partial() {
        let mut handler = PartialStatusHandler::new();
        handler
            .handle(b"STATV\x02\x01\x6d\x03\x84\x01\x6e\x84\x0c", None)
            .unwrap();
        assert!(!handler.should_remove());
        assert_eq!(
            handler.changes,
            vec![(365, [0x03, 0x84]), (366, [0x84, 0x0c])]
        );
    }

    #[test]
    fn test_recv_handle_empty_delta() {
        let mut handler = PartialStatusHandler::new();
        handler.handle(b"STATP\x00", None).unwrap();
        assert!(handler.changes.is_empty());
    }

    #[test]
    fn test_recv_handle_count_mismatch() {
        let mut handler = PartialStatusHandler::new();
        let err = handler
            .handle(b"STATP\x02\x01\x6d\x03\x84", None)
            .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::LengthMismatch {
                declared: 8,
                actual: 4
            }
        );
        assert!(handler.changes.is_empty());
    }

    #[test]
    fn test_report_roundtrip() {
        let pushed = [(365u16, [0x03, 0x84]), (366u16, [0x84, 0x0c])];
        let sender = PartialStatusHandler::report(&pushed, &parms());
        let frame = sender.send_bytes().unwrap().to_vec();
        let inner = crate::protocol::envelope::extract(&frame).unwrap().payload;

        let mut receiver = PartialStatusHandler::new();
        assert!(receiver.can_handle(inner, None));
        receiver.handle(inner, None).unwrap();
        assert_eq!(receiver.changes, pushed);
    }
}
