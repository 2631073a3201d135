// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `SPACK`/`PACKS` device command channel.
//!
//! Commands address a specific subsystem ("pack") on the controller:
//!
//! ```text
//! SPACK + seq(1) + pack_type(1) + inner_length(1) + inner
//! ```
//!
//! Two inner shapes, selected by the opcode byte:
//!
//! ```text
//! keypress:   0x39 + keycode(1)
//! set_value:  0x46 + cfg(1) + log(1) + position(u16 BE) + new_data(N)
//! ```
//!
//! The acknowledgment `PACKS` is the bare tag and terminates the exchange.

use std::net::SocketAddr;

use super::constants::{
    has_tag, PACK_OPCODE_KEYPRESS, PACK_OPCODE_SET_VALUE, TAG_PACK_COMMAND, TAG_PACK_COMMAND_ACK,
};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{require_len, ProtocolError, ProtocolResult};

#[derive(Debug, Clone, Default)]
pub struct PackCommandHandler {
    exchange: Exchange,
    /// Target subsystem of the last decoded command.
    pub pack_type: u8,
    pub is_key_press: bool,
    pub is_set_value: bool,
    /// Keycode, when the command was a keypress.
    pub keycode: u8,
    /// Status-region position, when the command was a set-value.
    pub position: u16,
    /// Replacement bytes, when the command was a set-value.
    pub new_data: Vec<u8>,
}

impl PackCommandHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound keypress command.
    #[must_use]
    pub fn keypress(sequence: u8, pack_type: u8, keycode: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_PACK_COMMAND.to_vec();
        inner.push(sequence);
        inner.push(pack_type);
        inner.push(2);
        inner.push(PACK_OPCODE_KEYPRESS);
        inner.push(keycode);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound direct memory write of `size` big-endian bytes of `value`
    /// at `position`. `size` must be in `1..=4`.
    ///
    /// `config_version` and `log_version` are carried verbatim; the device
    /// uses them to guard against writes based on stale layout files.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn set_value(
        sequence: u8,
        pack_type: u8,
        config_version: u8,
        log_version: u8,
        position: u16,
        size: u8,
        value: u32,
        parms: &ConnectionParms,
    ) -> Self {
        debug_assert!((1..=4).contains(&size));
        let size = usize::from(size.clamp(1, 4));
        let mut inner = TAG_PACK_COMMAND.to_vec();
        inner.push(sequence);
        inner.push(pack_type);
        inner.push((5 + size) as u8);
        inner.push(PACK_OPCODE_SET_VALUE);
        inner.push(config_version);
        inner.push(log_version);
        inner.extend_from_slice(&position.to_be_bytes());
        inner.extend_from_slice(&value.to_be_bytes()[4 - size..]);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound acknowledgment, bare tag.
    #[must_use]
    pub fn response(parms: &ConnectionParms) -> Self {
        Self {
            exchange: Exchange::outbound(
                envelope::wrap(TAG_PACK_COMMAND_ACK, parms),
                parms.clone(),
            ),
            ..Self::default()
        }
    }

    fn reset(&mut self) {
        self.is_key_press = false;
        self.is_set_value = false;
        self.keycode = 0;
        self.position = 0;
        self.new_data.clear();
    }
}

impl MessageHandler for PackCommandHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_PACK_COMMAND) || has_tag(payload, TAG_PACK_COMMAND_ACK)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        if has_tag(payload, TAG_PACK_COMMAND) {
            require_len(payload, 8, "SPACK")?;
            let declared = usize::from(payload[7]);
            let inner = &payload[8..];
            if inner.len() != declared {
                return Err(ProtocolError::LengthMismatch {
                    declared,
                    actual: inner.len(),
                });
            }

            // Validate the inner shape before committing any state.
            match inner.first() {
                Some(&PACK_OPCODE_KEYPRESS) => require_len(payload, 10, "SPACK")?,
                Some(&PACK_OPCODE_SET_VALUE) => require_len(payload, 13, "SPACK")?,
                Some(opcode) => {
                    log::debug!("[pack_command] unknown opcode {opcode:#04x}, ignoring body");
                }
                None => {}
            }

            self.reset();
            self.exchange.sequence = Some(payload[5]);
            self.pack_type = payload[6];
            match inner.first() {
                Some(&PACK_OPCODE_KEYPRESS) => {
                    self.is_key_press = true;
                    self.keycode = inner[1];
                }
                Some(&PACK_OPCODE_SET_VALUE) => {
                    self.is_set_value = true;
                    self.position = u16::from_be_bytes([inner[3], inner[4]]);
                    self.new_data = inner[5..].to_vec();
                }
                _ => {}
            }
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_PACK_COMMAND_ACK) {
            self.reset();
            self.exchange.remove = true;
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
    fn test_send_construct_key_press() {
        let handler = PackCommandHandler::keypress(1, 6, 1, &parms());
        assert_eq!(
            handler.send_bytes(),
            Some(
                &b"<PACKT><SRCCN>DESTID</SRCCN><DESCN>SRCID</DESCN>\
                   <DATAS>SPACK\x01\x06\x02\x39\x01</DATAS></PACKT>"[..]
            )
        );
    }

    #[test]
    fn test_send_construct_set_value() {
        let handler = PackCommandHandler::set_value(1, 6, 9, 9, 15, 2, 702, &parms());
        assert_eq!(
            handler.send_bytes(),
            Some(
                &b"<PACKT><SRCCN>DESTID</SRCCN><DESCN>SRCID</DESCN>\
                   <DATAS>SPACK\x01\x06\x07\x46\x09\x09\x00\x0f\x02\xbe</DATAS></PACKT>"[..]
            )
        );
    }

    #[test]
    fn test_send_construct_response() {
        let handler = PackCommandHandler::response(&parms());
        assert_eq!(
            handler.send_bytes(),
            Some(
                &b"<PACKT><SRCCN>DESTID</SRCCN><DESCN>SRCID</DESCN>\
                   <DATAS>PACKS</DATAS></PACKT>"[..]
            )
        );
    }

    #[test]
    fn test_recv_can_handle() {
        let handler = PackCommandHandler::new();
        assert!(handler.can_handle(b"SPACK", None));
        assert!(handler.can_handle(b"PACKS", None));
        assert!(!handler.can_handle(b"OTHER", None));
    }

    #[test]
    fn test_recv_handle_key_press() {
        let mut handler = PackCommandHandler::new();
        handler.handle(b"SPACK\x01\x06\x02\x39\x01", None).unwrap();
        assert!(!handler.should_remove());
        assert_eq!(handler.sequence(), Some(1));
        assert!(handler.is_key_press);
        assert_eq!(handler.keycode, 1);
        assert!(!handler.is_set_value);
    }

    #[test]
    fn test_recv_handle_set_value() {
        let mut handler = PackCommandHandler::new();
        handler
            .handle(b"SPACK\x01\x06\x07\x46\x09\x09\x00\x0f\x02\xbe", None)
            .unwrap();
        assert!(!handler.should_remove());
        assert_eq!(handler.sequence(), Some(1));
        assert!(!handler.is_key_press);
        assert!(handler.is_set_value);
        assert_eq!(handler.position, 15);
        assert_eq!(handler.new_data, b"\x02\xbe");
    }

    #[test]
    fn test_recv_handle_response() {
        let mut handler = PackCommandHandler::new();
        handler.handle(b"PACKS", None).unwrap();
        assert!(handler.should_remove());
        assert!(!handler.is_key_press);
        assert!(!handler.is_set_value);
    }

    #[test]
    fn test_recv_handle_inner_length_mismatch() {
        let mut handler = PackCommandHandler::new();
        let err = handler.handle(b"SPACK\x01\x06\x05\x39\x01", None).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::LengthMismatch {
                declared: 5,
                actual: 2
            }
        );
        assert!(!handler.is_key_press);
    }
}
