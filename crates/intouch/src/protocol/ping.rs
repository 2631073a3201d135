// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `APING` liveness probe.
//!
//! The request is the bare tag; the response appends a single sequence
//! byte. One handler instance matches both its own echo and unsolicited
//! pings from the peer, so it never reaches a terminal state.

use std::net::SocketAddr;

use super::constants::{has_tag, TAG_LEN, TAG_PING};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::ProtocolResult;

#[derive(Debug, Clone, Default)]
pub struct PingHandler {
    exchange: Exchange,
}

impl PingHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound probe, bare tag.
    #[must_use]
    pub fn request(parms: &ConnectionParms) -> Self {
        Self {
            exchange: Exchange::outbound(envelope::wrap(TAG_PING, parms), parms.clone()),
        }
    }

    /// Outbound echo carrying the sequence byte of the probe it answers.
    #[must_use]
    pub fn response(sequence: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_PING.to_vec();
        inner.push(sequence);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
        }
    }
}

impl MessageHandler for PingHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_PING)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        // Requests are the bare tag; only an echo carries the sequence byte.
        if payload.len() > TAG_LEN {
            self.exchange.sequence = Some(payload[TAG_LEN]);
        }
        Ok(Handling::Consumed)
    }
}
