// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Watercare mode and weekly schedule exchange.
//!
//! Five tags share one handler:
//!
//! - `GETWC` + seq(1): request the current mode
//! - `WCGET` + mode(1): mode response, terminal
//! - `SETWC` + seq(1) + mode(1): set the mode; the device acks promptly,
//!   so the timeout hint drops to [`PROMPT_ACK_TIMEOUT`]
//! - `REQWC` + seq(1): request the weekly schedule
//! - `WCREQ` + block: schedule response, terminal
//!
//! The schedule travels as a fixed-layout block whose internal bytes are
//! not interpreted here; it is stored and re-emitted verbatim.

use std::net::SocketAddr;

use crate::config::PROMPT_ACK_TIMEOUT;

use super::constants::{
    has_tag, TAG_LEN, TAG_WATERCARE_GET, TAG_WATERCARE_MODE, TAG_WATERCARE_SCHEDULE,
    TAG_WATERCARE_SCHEDULE_REQUEST, TAG_WATERCARE_SET,
};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{require_len, ProtocolResult};

/// Water-treatment programs selectable on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WatercareMode {
    AwayFromHome = 0,
    Standard = 1,
    EnergySaving = 2,
    SuperEnergySaving = 3,
    Weekender = 4,
}

impl TryFrom<u8> for WatercareMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::AwayFromHome),
            1 => Ok(Self::Standard),
            2 => Ok(Self::EnergySaving),
            3 => Ok(Self::SuperEnergySaving),
            4 => Ok(Self::Weekender),
            other => Err(other),
        }
    }
}

/// Weekly schedule block emitted by [`WatercareHandler::schedule`].
///
/// Opaque fixed layout; carried verbatim.
const SCHEDULE_BLOCK: [u8; 38] = [
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x01,
    0x05, 0x06, 0x00, 0x12, 0x00, 0x03, 0x01, 0x00, 0x00, 0x06, 0x06, 0x00, 0x12, 0x00, 0x04,
    0x01, 0x00, 0x01, 0x05, 0x00, 0x00, 0x00, 0x00,
];

#[derive(Debug, Clone, Default)]
pub struct WatercareHandler {
    exchange: Exchange,
    /// True when this exchange is about the weekly schedule rather than the
    /// current mode.
    pub schedule: bool,
    /// Mode decoded from a `WCGET` or `SETWC` frame.
    pub mode: u8,
    /// Raw schedule block decoded from a `WCREQ` frame.
    pub schedule_block: Option<Vec<u8>>,
}

impl WatercareHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound current-mode request.
    #[must_use]
    pub fn request(sequence: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_WATERCARE_GET.to_vec();
        inner.push(sequence);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound mode response.
    #[must_use]
    pub fn response(mode: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_WATERCARE_MODE.to_vec();
        inner.push(mode);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound mode-set request. Uses the prompt-ack timeout hint.
    #[must_use]
    pub fn set(sequence: u8, mode: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_WATERCARE_SET.to_vec();
        inner.push(sequence);
        inner.push(mode);
        Self {
            exchange: Exchange {
                timeout: PROMPT_ACK_TIMEOUT,
                ..Exchange::outbound(envelope::wrap(&inner, parms), parms.clone())
            },
            ..Self::default()
        }
    }

    /// Outbound weekly-schedule response.
    #[must_use]
    pub fn schedule(parms: &ConnectionParms) -> Self {
        let inner = [TAG_WATERCARE_SCHEDULE.as_slice(), &SCHEDULE_BLOCK].concat();
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            schedule: true,
            ..Self::default()
        }
    }

    /// Decoded mode as a named program, when in the known range.
    #[must_use]
    pub fn watercare_mode(&self) -> Option<WatercareMode> {
        WatercareMode::try_from(self.mode).ok()
    }
}

impl MessageHandler for WatercareHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_WATERCARE_GET)
            || has_tag(payload, TAG_WATERCARE_MODE)
            || has_tag(payload, TAG_WATERCARE_SET)
            || has_tag(payload, TAG_WATERCARE_SCHEDULE_REQUEST)
            || has_tag(payload, TAG_WATERCARE_SCHEDULE)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        if has_tag(payload, TAG_WATERCARE_GET) {
            require_len(payload, 6, "GETWC")?;
            self.schedule = false;
            self.exchange.sequence = Some(payload[5]);
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_WATERCARE_MODE) {
            require_len(payload, 6, "WCGET")?;
            self.schedule = false;
            self.mode = payload[5];
            self.exchange.remove = true;
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_WATERCARE_SET) {
            require_len(payload, 7, "SETWC")?;
            self.schedule = false;
            self.exchange.sequence = Some(payload[5]);
            self.mode = payload[6];
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_WATERCARE_SCHEDULE_REQUEST) {
            self.schedule = true;
            if payload.len() > TAG_LEN {
                self.exchange.sequence = Some(payload[5]);
            }
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_WATERCARE_SCHEDULE) {
            self.schedule = true;
            self.schedule_block = Some(payload[TAG_LEN..].to_vec());
            self.exchange.remove = true;
            return Ok(Handling::Consumed);
        }
        Ok(Handling::Forward)
    }
}
