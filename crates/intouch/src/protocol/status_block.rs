// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `STATU`/`STATV` bulk status-region transfer.
//!
//! The request names a byte range of the device's memory-mapped status
//! region; the device streams it back across continuation chunks:
//!
//! ```text
//! STATU + seq(1) + start(u16 BE) + length(u16 BE)
//! STATV + seq(1) + next(1) + length(1) + data(length)
//! ```
//!
//! `next` is the starting chunk offset of the following frame; `next == 0`
//! marks the final chunk of the logical block. The handler stays registered
//! across all chunks, final one included - accumulating the block belongs
//! to the layer above (see [`crate::assembly::StatusBlockAssembler`]).

use std::net::SocketAddr;

use super::constants::{has_tag, TAG_STATUS_REQUEST, TAG_STATUS_RESPONSE};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{require_len, ProtocolError, ProtocolResult};

#[derive(Debug, Clone, Default)]
pub struct StatusBlockHandler {
    exchange: Exchange,
    /// Sequence byte of the last decoded frame, either direction.
    pub sequence: u8,
    /// Requested region start (request direction).
    pub start: u16,
    /// Requested byte count, or the chunk byte count (per direction).
    pub length: usize,
    /// Offset of the next chunk; 0 on the final chunk.
    pub next: u8,
    /// Chunk bytes of the last decoded response frame.
    pub data: Vec<u8>,
}

impl StatusBlockHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound read request for `length` bytes starting at `start`.
    #[must_use]
    pub fn request(sequence: u8, start: u16, length: u16, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_STATUS_REQUEST.to_vec();
        inner.push(sequence);
        inner.extend_from_slice(&start.to_be_bytes());
        inner.extend_from_slice(&length.to_be_bytes());
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound chunk response. `data` must fit the 1-byte length field.
    #[must_use]
    pub fn response(sequence: u8, next: u8, data: &[u8], parms: &ConnectionParms) -> Self {
        debug_assert!(data.len() <= usize::from(u8::MAX));
        let mut inner = TAG_STATUS_RESPONSE.to_vec();
        inner.push(sequence);
        inner.push(next);
        inner.push(data.len() as u8);
        inner.extend_from_slice(data);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// True when the last decoded chunk closed the logical block.
    #[must_use]
    pub fn is_final_chunk(&self) -> bool {
        self.next == 0
    }
}

impl MessageHandler for StatusBlockHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_STATUS_REQUEST) || has_tag(payload, TAG_STATUS_RESPONSE)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        if has_tag(payload, TAG_STATUS_REQUEST) {
            require_len(payload, 10, "STATU")?;
            self.sequence = payload[5];
            self.start = u16::from_be_bytes([payload[6], payload[7]]);
            self.length = usize::from(u16::from_be_bytes([payload[8], payload[9]]));
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_STATUS_RESPONSE) {
            require_len(payload, 8, "STATV")?;
            let declared = usize::from(payload[7]);
            let actual = payload.len() - 8;
            if declared != actual {
                return Err(ProtocolError::LengthMismatch { declared, actual });
            }
            self.sequence = payload[5];
            self.next = payload[6];
            self.length = declared;
            self.data = payload[8..].to_vec();
            // Deliberately never terminal: continuation and final chunks are
            // treated identically here.
            return Ok(Handling::Consumed);
        }
        Ok(Handling::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parms() -> ConnectionParms {
        ConnectionParms::new("127.0.0.1:10022".parse().unwrap(), *b"SRCID", *b"DESTID")
    }

    #[test]
    fn test_send_construct_request() {
        let handler = StatusBlockHandler::request(1, 0, 637, &parms());
        assert_eq!(
            handler.send_bytes(),
            Some(
                &b"<PACKT><SRCCN>DESTID</SRCCN><DESCN>SRCID</DESCN>\
                   <DATAS>STATU\x01\x00\x00\x02\x7d</DATAS></PACKT>"[..]
            )
        );
    }

    #[test]
    fn test_send_construct_response() {
        let handler = StatusBlockHandler::response(3, 4, b"\x01\x02\x03\x04", &parms());
        assert_eq!(
            handler.send_bytes(),
            Some(
                &b"<PACKT><SRCCN>DESTID</SRCCN><DESCN>SRCID</DESCN>\
                   <DATAS>STATV\x03\x04\x04\x01\x02\x03\x04</DATAS></PACKT>"[..]
            )
        );
    }

    #[test]
    fn test_recv_can_handle() {
        let handler = StatusBlockHandler::new();
        assert!(handler.can_handle(b"STATU", None));
        assert!(handler.can_handle(b"STATV", None));
        assert!(!handler.can_handle(b"OTHER", None));
    }

    #[test]
    fn test_recv_handle_request() {
        let mut handler = StatusBlockHandler::new();
        handler.handle(b"STATU\x01\x00\x00\x02\x7d", None).unwrap();
        assert!(!handler.should_remove());
        assert_eq!(handler.sequence, 1);
        assert_eq!(handler.start, 0);
        assert_eq!(handler.length, 637);
    }

    #[test]
    fn test_recv_handle_response() {
        let mut handler = StatusBlockHandler::new();
        handler
            .handle(b"STATV\x03\x04\x04\x01\x02\x03\x04", None)
            .unwrap();
        assert!(!handler.should_remove());
        assert_eq!(handler.sequence, 3);
        assert_eq!(handler.next, 4);
        assert_eq!(handler.length, 4);
        assert_eq!(handler.data, b"\x01\x02\x03\x04");
        assert!(!handler.is_final_chunk());
    }

    #[test]
    fn test_recv_handle_response_final() {
        // The final chunk (next == 0) leaves the handler registered too.
        let mut handler = StatusBlockHandler::new();
        handler
            .handle(b"STATV\x03\x00\x04\x01\x02\x03\x04", None)
            .unwrap();
        assert!(!handler.should_remove());
        assert_eq!(handler.sequence, 3);
        assert_eq!(handler.next, 0);
        assert_eq!(handler.length, 4);
        assert_eq!(handler.data, b"\x01\x02\x03\x04");
        assert!(handler.is_final_chunk());
    }

    #[test]
    fn test_recv_handle_response_length_mismatch() {
        let mut handler = StatusBlockHandler::new();
        let err = handler
            .handle(b"STATV\x03\x04\x04\x01\x02", None)
            .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::LengthMismatch {
                declared: 4,
                actual: 2
            }
        );
        assert!(handler.data.is_empty());
    }
}
