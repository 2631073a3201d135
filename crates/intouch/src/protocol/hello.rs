// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `<HELLO>` discovery and identification handshake.
//!
//! Unique among the message kinds in having no `<PACKT>` envelope: the body
//! sits directly between the tags. Three shapes share the frame, told apart
//! by the body alone:
//!
//! - broadcast discovery: the literal `1`
//! - client announcement: the client identifier
//! - device response: `{spa_id}|{name}` with a UTF-8 display name
//!
//! HELLO is a conversation rather than an exchange: the handler never
//! reaches a terminal state, and each inbound frame resets the decoded
//! fields before re-parsing.

use std::net::SocketAddr;

use super::constants::{HELLO_CLOSE, HELLO_OPEN};
use super::handler::{Exchange, Handling, MessageHandler};
use super::{ProtocolError, ProtocolResult};

/// Body of a broadcast discovery frame.
const BROADCAST_BODY: &[u8] = b"1";

fn frame(body: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HELLO_OPEN.len() + body.len() + HELLO_CLOSE.len());
    frame.extend_from_slice(HELLO_OPEN);
    frame.extend_from_slice(body);
    frame.extend_from_slice(HELLO_CLOSE);
    frame
}

/// Handler for the envelope-less HELLO conversation.
#[derive(Debug, Clone, Default)]
pub struct HelloHandler {
    exchange: Exchange,
    /// True when the last inbound frame was a LAN discovery broadcast.
    pub was_broadcast_discovery: bool,
    /// Identifier announced by a client.
    pub client_identifier: Option<Vec<u8>>,
    /// Identifier announced by a device.
    pub spa_identifier: Option<Vec<u8>>,
    /// Display name announced by a device.
    pub spa_name: Option<String>,
}

impl HelloHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// LAN discovery broadcast, sent by a client looking for devices.
    #[must_use]
    pub fn broadcast() -> Self {
        Self {
            exchange: Exchange {
                send_bytes: Some(frame(BROADCAST_BODY)),
                ..Exchange::receiver()
            },
            ..Self::default()
        }
    }

    /// Presence announcement carrying the client identifier.
    #[must_use]
    pub fn client(identifier: &[u8]) -> Self {
        Self {
            exchange: Exchange {
                send_bytes: Some(frame(identifier)),
                ..Exchange::receiver()
            },
            ..Self::default()
        }
    }

    /// Device response: `{spa_id}|{name}`.
    #[must_use]
    pub fn response(spa_identifier: &[u8], spa_name: &str) -> Self {
        let mut body = Vec::with_capacity(spa_identifier.len() + 1 + spa_name.len());
        body.extend_from_slice(spa_identifier);
        body.push(b'|');
        body.extend_from_slice(spa_name.as_bytes());
        Self {
            exchange: Exchange {
                send_bytes: Some(frame(&body)),
                ..Exchange::receiver()
            },
            ..Self::default()
        }
    }

    fn reset(&mut self) {
        self.was_broadcast_discovery = false;
        self.client_identifier = None;
        self.spa_identifier = None;
        self.spa_name = None;
    }
}

impl MessageHandler for HelloHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        payload.starts_with(HELLO_OPEN) && payload.ends_with(HELLO_CLOSE)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        let body = payload
            .strip_prefix(HELLO_OPEN)
            .and_then(|rest| rest.strip_suffix(HELLO_CLOSE))
            .ok_or(ProtocolError::MalformedEnvelope("missing <HELLO> framing"))?;

        self.reset();
        match body.iter().position(|&b| b == b'|') {
            Some(split) => {
                self.spa_identifier = Some(body[..split].to_vec());
                self.spa_name = Some(String::from_utf8_lossy(&body[split + 1..]).into_owned());
            }
            None if body == BROADCAST_BODY => self.was_broadcast_discovery = true,
            None => self.client_identifier = Some(body.to_vec()),
        }
        Ok(Handling::Consumed)
    }
}
