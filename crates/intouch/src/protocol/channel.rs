// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `CURCH`/`CHCUR` RF channel query.
//!
//! The response carries the current radio channel and the received signal
//! strength, one unsigned byte each.

use std::net::SocketAddr;

use super::constants::{has_tag, TAG_CHANNEL_REQUEST, TAG_CHANNEL_RESPONSE};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{require_len, ProtocolResult};

#[derive(Debug, Clone, Default)]
pub struct ChannelHandler {
    exchange: Exchange,
    pub channel: u8,
    pub signal_strength: u8,
}

impl ChannelHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound request with the caller-supplied sequence byte.
    #[must_use]
    pub fn request(sequence: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_CHANNEL_REQUEST.to_vec();
        inner.push(sequence);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound response with channel and signal strength.
    #[must_use]
    pub fn response(channel: u8, signal_strength: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_CHANNEL_RESPONSE.to_vec();
        inner.push(channel);
        inner.push(signal_strength);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }
}

impl MessageHandler for ChannelHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_CHANNEL_REQUEST) || has_tag(payload, TAG_CHANNEL_RESPONSE)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        if has_tag(payload, TAG_CHANNEL_REQUEST) {
            require_len(payload, 6, "CURCH")?;
            self.exchange.sequence = Some(payload[5]);
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_CHANNEL_RESPONSE) {
            require_len(payload, 7, "CHCUR")?;
            self.channel = payload[5];
            self.signal_strength = payload[6];
            self.exchange.remove = true;
            return Ok(Handling::Consumed);
        }
        Ok(Handling::Forward)
    }
}
