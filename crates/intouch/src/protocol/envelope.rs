// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Outer `<PACKT>` envelope codec.
//!
//! Every non-HELLO datagram is an ASCII-tagged triple:
//!
//! ```text
//! <PACKT><SRCCN>{id}</SRCCN><DESCN>{id}</DESCN><DATAS>{payload}</DATAS></PACKT>
//! ```
//!
//! The child tags name the *protocol-level* slot, not the sender of the
//! frame: an outbound frame writes the remote node's ID into `<SRCCN>` and
//! the local node's into `<DESCN>`, so a request and its reply carry the
//! same two IDs in swapped positions.
//!
//! Classification is strict: a datagram is an envelope iff it begins with
//! `<PACKT>` and ends with `</PACKT>` with no trailing bytes. The protocol
//! runs over UDP with exact datagram boundaries, so partial matches are
//! corruption and are rejected outright.

use std::net::SocketAddr;

use super::constants::{
    DATA_CLOSE, DATA_OPEN, DEST_CLOSE, DEST_OPEN, PACKET_CLOSE, PACKET_OPEN, SRC_CLOSE, SRC_OPEN,
};
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{ProtocolError, ProtocolResult};

/// Borrowed view of a decoded envelope.
///
/// `src_id` is the `<SRCCN>` content and `dst_id` the `<DESCN>` content.
/// Because the peer swapped the slots when emitting, an inbound frame
/// decodes to the same order as the locally configured
/// [`ConnectionParms`] pair and can be compared against it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeParts<'a> {
    pub src_id: &'a [u8],
    pub dst_id: &'a [u8],
    pub payload: &'a [u8],
}

/// Encode one envelope frame. `content` bytes are inserted raw.
#[must_use]
pub fn wrap(content: &[u8], parms: &ConnectionParms) -> Vec<u8> {
    let mut frame = Vec::with_capacity(
        PACKET_OPEN.len()
            + SRC_OPEN.len()
            + parms.dst_id.len()
            + SRC_CLOSE.len()
            + DEST_OPEN.len()
            + parms.src_id.len()
            + DEST_CLOSE.len()
            + DATA_OPEN.len()
            + content.len()
            + DATA_CLOSE.len()
            + PACKET_CLOSE.len(),
    );
    frame.extend_from_slice(PACKET_OPEN);
    frame.extend_from_slice(SRC_OPEN);
    frame.extend_from_slice(&parms.dst_id);
    frame.extend_from_slice(SRC_CLOSE);
    frame.extend_from_slice(DEST_OPEN);
    frame.extend_from_slice(&parms.src_id);
    frame.extend_from_slice(DEST_CLOSE);
    frame.extend_from_slice(DATA_OPEN);
    frame.extend_from_slice(content);
    frame.extend_from_slice(DATA_CLOSE);
    frame.extend_from_slice(PACKET_CLOSE);
    frame
}

/// Strict envelope classifier: exact leading and trailing tags.
#[inline]
#[must_use]
pub fn is_envelope(datagram: &[u8]) -> bool {
    datagram.starts_with(PACKET_OPEN) && datagram.ends_with(PACKET_CLOSE)
}

/// Extract connection IDs and payload from an envelope frame.
///
/// Returns `None` when any child tag is missing or out of order. The
/// payload slice runs to the *last* `</DATAS>` occurrence, since the inner
/// bytes are binary and may themselves contain tag-shaped runs.
#[must_use]
pub fn extract(datagram: &[u8]) -> Option<EnvelopeParts<'_>> {
    if !is_envelope(datagram) {
        return None;
    }

    let (wire_src, rest) = tagged(datagram, SRC_OPEN, SRC_CLOSE)?;
    let (wire_dst, rest) = tagged(rest, DEST_OPEN, DEST_CLOSE)?;

    let data_start = find(rest, DATA_OPEN)? + DATA_OPEN.len();
    let data_end = rfind(rest, DATA_CLOSE)?;
    if data_end < data_start {
        return None;
    }

    Some(EnvelopeParts {
        src_id: wire_src,
        dst_id: wire_dst,
        payload: &rest[data_start..data_end],
    })
}

/// Content of the first `{open}...{close}` pair plus the bytes after it.
fn tagged<'a>(buf: &'a [u8], open: &[u8], close: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    let start = find(buf, open)? + open.len();
    let end = start + find(&buf[start..], close)?;
    Some((&buf[start..end], &buf[end + close.len()..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Handler for envelope frames.
///
/// Built with [`PacketHandler::wrap`] to carry an outbound payload, or with
/// [`PacketHandler::receiver`] to record the connection IDs and content of
/// inbound frames.
#[derive(Debug, Clone)]
pub struct PacketHandler {
    exchange: Exchange,
    /// Payload of the last decoded frame.
    pub packet_content: Option<Vec<u8>>,
}

impl PacketHandler {
    /// Outbound envelope around `content` for the given connection.
    #[must_use]
    pub fn wrap(content: &[u8], parms: &ConnectionParms) -> Self {
        Self {
            exchange: Exchange::outbound(wrap(content, parms), parms.clone()),
            packet_content: None,
        }
    }

    /// Receive-only handler bound to a connection.
    #[must_use]
    pub fn receiver(parms: &ConnectionParms) -> Self {
        Self {
            exchange: Exchange {
                parms: Some(parms.clone()),
                ..Exchange::receiver()
            },
            packet_content: None,
        }
    }
}

impl MessageHandler for PacketHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        is_envelope(payload)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        let parts =
            extract(payload).ok_or(ProtocolError::MalformedEnvelope("missing child tags"))?;

        if let Some(parms) = self.exchange.parms.as_mut() {
            parms.src_id = parts.src_id.to_vec();
            parms.dst_id = parts.dst_id.to_vec();
        }
        self.packet_content = Some(parts.payload.to_vec());
        Ok(Handling::Consumed)
    }
}
