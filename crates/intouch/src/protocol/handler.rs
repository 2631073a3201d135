// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler contract shared by every message kind.
//!
//! A handler is a value object owning the state of one protocol exchange:
//! the eagerly-encoded outbound frame (absent on receive-only templates),
//! the connection parameters, the correlation sequence byte, and the
//! scheduler hints. `can_handle` classifies an inbound payload without
//! mutating; `handle` decodes it into the kind-specific fields and flips the
//! terminal flag when the exchange is over.
//!
//! The core performs no I/O and never blocks: the surrounding receive loop
//! reads a datagram, walks the registry in order, and hands the payload to
//! the first handler whose `can_handle` matches. Timeouts live entirely in
//! the external scheduler; handlers only expose the hints.

use std::net::SocketAddr;
use std::time::Duration;

use crate::config::{DEFAULT_EXCHANGE_TIMEOUT, DEFAULT_RETRY_COUNT};

use super::ProtocolResult;

/// Connection parameters for one logical device connection.
///
/// `src_id` and `dst_id` are the opaque identifiers exchanged during the
/// HELLO conversation. A request and its matched response share the same
/// `{src_id, dst_id}` set; the envelope codec performs the documented slot
/// swap when a frame is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParms {
    /// Local bind address of the transceiver socket.
    pub local: SocketAddr,
    /// Identifier of this node.
    pub src_id: Vec<u8>,
    /// Identifier of the remote node.
    pub dst_id: Vec<u8>,
}

impl ConnectionParms {
    #[must_use]
    pub fn new(
        local: SocketAddr,
        src_id: impl Into<Vec<u8>>,
        dst_id: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            local,
            src_id: src_id.into(),
            dst_id: dst_id.into(),
        }
    }
}

/// What the dispatcher should do with the frame after `handle` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    /// The frame belonged to this handler; stop walking the registry.
    Consumed,
    /// The frame is not for this handler after all; offer it to the rest of
    /// the registry.
    Forward,
}

/// Per-exchange state embedded in every handler.
///
/// Kind-specific decoded fields live on the handler structs themselves; this
/// record carries only what the dispatcher and the scheduler consume.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Fully-encoded outbound frame, computed eagerly at construction.
    /// `None` on receive-only templates.
    pub send_bytes: Option<Vec<u8>>,
    /// Connection this exchange belongs to.
    pub parms: Option<ConnectionParms>,
    /// Correlation sequence byte for request/response kinds.
    pub sequence: Option<u8>,
    /// Timeout hint for the external scheduler.
    pub timeout: Duration,
    /// Retry hint for the external scheduler.
    pub retry_count: u8,
    /// Terminal flag: the dispatcher unregisters the handler once set.
    pub remove: bool,
}

impl Default for Exchange {
    fn default() -> Self {
        Self {
            send_bytes: None,
            parms: None,
            sequence: None,
            timeout: DEFAULT_EXCHANGE_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            remove: false,
        }
    }
}

impl Exchange {
    /// Receive-only template: nothing to send, default hints.
    #[must_use]
    pub fn receiver() -> Self {
        Self::default()
    }

    /// Outbound exchange with an eagerly-encoded frame.
    #[must_use]
    pub fn outbound(send_bytes: Vec<u8>, parms: ConnectionParms) -> Self {
        Self {
            send_bytes: Some(send_bytes),
            parms: Some(parms),
            ..Self::default()
        }
    }
}

/// Contract implemented by every message-kind handler.
///
/// The accessor methods are provided over the embedded [`Exchange`]; kinds
/// override them only when they deviate from the defaults.
pub trait MessageHandler {
    /// Per-exchange state record.
    fn exchange(&self) -> &Exchange;
    fn exchange_mut(&mut self) -> &mut Exchange;

    /// Pure classifier: does this payload belong to this handler?
    ///
    /// Must not mutate; called repeatedly by the dispatcher while walking
    /// the registry.
    fn can_handle(&self, payload: &[u8], sender: Option<SocketAddr>) -> bool;

    /// Decode `payload` into the handler's fields.
    ///
    /// Returns [`Handling::Consumed`] when the frame was taken (the common
    /// case) or [`Handling::Forward`] to offer it to subsequent handlers.
    /// On error no partial state is committed and the handler stays armed.
    fn handle(&mut self, payload: &[u8], sender: Option<SocketAddr>)
        -> ProtocolResult<Handling>;

    /// Encoded outbound frame, if this handler has one.
    fn send_bytes(&self) -> Option<&[u8]> {
        self.exchange().send_bytes.as_deref()
    }

    /// Connection parameters of this exchange.
    fn parms(&self) -> Option<&ConnectionParms> {
        self.exchange().parms.as_ref()
    }

    /// Correlation sequence byte, once known.
    fn sequence(&self) -> Option<u8> {
        self.exchange().sequence
    }

    /// True once the exchange reached a terminal state and the dispatcher
    /// should unregister the handler.
    fn should_remove(&self) -> bool {
        self.exchange().remove
    }

    /// Timeout hint for the external scheduler.
    fn timeout(&self) -> Duration {
        self.exchange().timeout
    }

    /// Retry hint for the external scheduler.
    fn retry_count(&self) -> u8 {
        self.exchange().retry_count
    }
}
