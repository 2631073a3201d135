// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! in.touch2 protocol constants
//!
//! Centralizes the envelope tag literals, the 5-byte command tag vocabulary,
//! and the pack-command opcodes so that no byte literal is duplicated in the
//! per-message codecs.
//!
//! # Command tags
//!
//! Every inner payload starts with a 5-byte ASCII command tag that selects
//! the decoder. Request/response pairs use distinct tags (`AVERS`/`SVERS`,
//! `CURCH`/`CHCUR`, ...); the sole exception is `APING`, which both sides
//! send.

/// Length of the leading ASCII command tag on every inner payload.
pub const TAG_LEN: usize = 5;

// ============================================================================
// Envelope tag literals
// ============================================================================

/// Opening tag of the outer datagram envelope.
pub const PACKET_OPEN: &[u8] = b"<PACKT>";
/// Closing tag of the outer datagram envelope.
pub const PACKET_CLOSE: &[u8] = b"</PACKT>";

/// Source-connection child tag (carries the remote node's ID on outbound frames).
pub const SRC_OPEN: &[u8] = b"<SRCCN>";
pub const SRC_CLOSE: &[u8] = b"</SRCCN>";

/// Destination-connection child tag (carries the local node's ID on outbound frames).
pub const DEST_OPEN: &[u8] = b"<DESCN>";
pub const DEST_CLOSE: &[u8] = b"</DESCN>";

/// Payload child tag. Content bytes are inserted raw, no escaping.
pub const DATA_OPEN: &[u8] = b"<DATAS>";
pub const DATA_CLOSE: &[u8] = b"</DATAS>";

/// Discovery/identification frame tags. HELLO frames carry no envelope.
pub const HELLO_OPEN: &[u8] = b"<HELLO>";
pub const HELLO_CLOSE: &[u8] = b"</HELLO>";

// ============================================================================
// Command tag vocabulary
// ============================================================================

/// Liveness probe; request is the bare tag, response appends a sequence byte.
pub const TAG_PING: &[u8; TAG_LEN] = b"APING";

/// Firmware version request.
pub const TAG_VERSION_REQUEST: &[u8; TAG_LEN] = b"AVERS";
/// Firmware version response (EN and CO build triples).
pub const TAG_VERSION_RESPONSE: &[u8; TAG_LEN] = b"SVERS";

/// RF channel request.
pub const TAG_CHANNEL_REQUEST: &[u8; TAG_LEN] = b"CURCH";
/// RF channel response (channel + signal strength).
pub const TAG_CHANNEL_RESPONSE: &[u8; TAG_LEN] = b"CHCUR";

/// Config/log XML filename request.
pub const TAG_CONFIG_FILE_REQUEST: &[u8; TAG_LEN] = b"SFILE";
/// Config/log XML filename response.
pub const TAG_CONFIG_FILE_RESPONSE: &[u8; TAG_LEN] = b"FILES";

/// Status-block read request (start + length, big-endian).
pub const TAG_STATUS_REQUEST: &[u8; TAG_LEN] = b"STATU";
/// Status-block chunk response; `next == 0` marks the final chunk.
pub const TAG_STATUS_RESPONSE: &[u8; TAG_LEN] = b"STATV";

/// Partial status delta push.
pub const TAG_PARTIAL_STATUS: &[u8; TAG_LEN] = b"STATP";
/// Partial status delta, alternate direction.
pub const TAG_PARTIAL_STATUS_ALT: &[u8; TAG_LEN] = b"STATQ";

/// Pack command (keypress or direct memory write).
pub const TAG_PACK_COMMAND: &[u8; TAG_LEN] = b"SPACK";
/// Pack command acknowledgment, bare tag.
pub const TAG_PACK_COMMAND_ACK: &[u8; TAG_LEN] = b"PACKS";

/// Watercare mode request.
pub const TAG_WATERCARE_GET: &[u8; TAG_LEN] = b"GETWC";
/// Watercare mode response.
pub const TAG_WATERCARE_MODE: &[u8; TAG_LEN] = b"WCGET";
/// Watercare weekly-schedule request.
pub const TAG_WATERCARE_SCHEDULE_REQUEST: &[u8; TAG_LEN] = b"REQWC";
/// Watercare weekly-schedule response (fixed-layout block).
pub const TAG_WATERCARE_SCHEDULE: &[u8; TAG_LEN] = b"WCREQ";
/// Watercare mode set request.
pub const TAG_WATERCARE_SET: &[u8; TAG_LEN] = b"SETWC";

// ============================================================================
// Pack-command inner opcodes
// ============================================================================

/// First inner byte of a keypress command: `0x39 + keycode(1)`.
pub const PACK_OPCODE_KEYPRESS: u8 = 0x39;

/// First inner byte of a set-value command:
/// `0x46 + cfg(1) + log(1) + position(u16 BE) + new_data(N)`.
pub const PACK_OPCODE_SET_VALUE: u8 = 0x46;

/// True when `payload` starts with the given 5-byte command tag.
#[inline]
#[must_use]
pub fn has_tag(payload: &[u8], tag: &[u8; TAG_LEN]) -> bool {
    payload.len() >= TAG_LEN && &payload[..TAG_LEN] == tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_five_ascii_bytes() {
        let tags: [&[u8; TAG_LEN]; 18] = [
            TAG_PING,
            TAG_VERSION_REQUEST,
            TAG_VERSION_RESPONSE,
            TAG_CHANNEL_REQUEST,
            TAG_CHANNEL_RESPONSE,
            TAG_CONFIG_FILE_REQUEST,
            TAG_CONFIG_FILE_RESPONSE,
            TAG_STATUS_REQUEST,
            TAG_STATUS_RESPONSE,
            TAG_PARTIAL_STATUS,
            TAG_PARTIAL_STATUS_ALT,
            TAG_PACK_COMMAND,
            TAG_PACK_COMMAND_ACK,
            TAG_WATERCARE_GET,
            TAG_WATERCARE_MODE,
            TAG_WATERCARE_SCHEDULE_REQUEST,
            TAG_WATERCARE_SCHEDULE,
            TAG_WATERCARE_SET,
        ];
        for tag in tags {
            assert!(tag.iter().all(u8::is_ascii_uppercase), "tag {tag:?}");
        }
    }

    #[test]
    fn test_tags_unique() {
        let tags = [
            TAG_PING,
            TAG_VERSION_REQUEST,
            TAG_VERSION_RESPONSE,
            TAG_CHANNEL_REQUEST,
            TAG_CHANNEL_RESPONSE,
            TAG_CONFIG_FILE_REQUEST,
            TAG_CONFIG_FILE_RESPONSE,
            TAG_STATUS_REQUEST,
            TAG_STATUS_RESPONSE,
            TAG_PARTIAL_STATUS,
            TAG_PARTIAL_STATUS_ALT,
            TAG_PACK_COMMAND,
            TAG_PACK_COMMAND_ACK,
            TAG_WATERCARE_GET,
            TAG_WATERCARE_MODE,
            TAG_WATERCARE_SCHEDULE_REQUEST,
            TAG_WATERCARE_SCHEDULE,
            TAG_WATERCARE_SET,
        ];
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_has_tag() {
        assert!(has_tag(b"APING", TAG_PING));
        assert!(has_tag(b"APING\x00", TAG_PING));
        assert!(!has_tag(b"APIN", TAG_PING));
        assert!(!has_tag(b"SVERS", TAG_PING));
        assert!(!has_tag(b"", TAG_PING));
    }
}
