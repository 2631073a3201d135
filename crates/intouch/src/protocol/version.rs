// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `AVERS`/`SVERS` firmware version exchange.
//!
//! Response layout after the tag is two 4-byte groups, one per processor:
//!
//! ```text
//! Offset  Field       Size
//! 5       pad         1 byte
//! 6       en_build    1 byte   (intouch pack firmware)
//! 7       en_major    1 byte
//! 8       en_minor    1 byte
//! 9       pad         1 byte
//! 10      co_build    1 byte   (co-processor)
//! 11      co_major    1 byte
//! 12      co_minor    1 byte
//! ```

use std::net::SocketAddr;

use super::constants::{has_tag, TAG_VERSION_REQUEST, TAG_VERSION_RESPONSE};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{require_len, ProtocolResult};

#[derive(Debug, Clone, Default)]
pub struct VersionHandler {
    exchange: Exchange,
    pub en_build: u8,
    pub en_major: u8,
    pub en_minor: u8,
    pub co_build: u8,
    pub co_major: u8,
    pub co_minor: u8,
}

impl VersionHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound request with the caller-supplied sequence byte.
    #[must_use]
    pub fn request(sequence: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_VERSION_REQUEST.to_vec();
        inner.push(sequence);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound response carrying both `(build, major, minor)` triples.
    #[must_use]
    pub fn response(en: (u8, u8, u8), co: (u8, u8, u8), parms: &ConnectionParms) -> Self {
        let inner = [
            TAG_VERSION_RESPONSE.as_slice(),
            &[0, en.0, en.1, en.2, 0, co.0, co.1, co.2],
        ]
        .concat();
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Pack firmware version as a `(build, major, minor)` triple.
    #[must_use]
    pub fn en_version(&self) -> (u8, u8, u8) {
        (self.en_build, self.en_major, self.en_minor)
    }

    /// Co-processor version as a `(build, major, minor)` triple.
    #[must_use]
    pub fn co_version(&self) -> (u8, u8, u8) {
        (self.co_build, self.co_major, self.co_minor)
    }
}

impl MessageHandler for VersionHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_VERSION_REQUEST) || has_tag(payload, TAG_VERSION_RESPONSE)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        if has_tag(payload, TAG_VERSION_REQUEST) {
            require_len(payload, 6, "AVERS")?;
            self.exchange.sequence = Some(payload[5]);
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_VERSION_RESPONSE) {
            require_len(payload, 13, "SVERS")?;
            self.en_build = payload[6];
            self.en_major = payload[7];
            self.en_minor = payload[8];
            self.co_build = payload[10];
            self.co_major = payload[11];
            self.co_minor = payload[12];
            self.exchange.remove = true;
            return Ok(Handling::Consumed);
        }
        Ok(Handling::Forward)
    }
}
