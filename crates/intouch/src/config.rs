// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol-wide configuration - single source of truth
//!
//! Centralizes the port, timing and sizing constants shared by the codecs,
//! the dispatcher and the external scheduler. **Never hardcode these
//! elsewhere.**
//!
//! The timeout and retry values are *hints*: the core never observes time
//! itself, it only exposes them on each handler for the scheduler to consume.

use std::time::Duration;

/// UDP port the in.touch2 transceiver listens on, for both discovery
/// broadcasts and the per-connection exchange traffic.
pub const INTOUCH_UDP_PORT: u16 = 10022;

/// Default per-exchange timeout hint.
///
/// Applies to every request kind that does not override it; bulk
/// status-block reads in particular keep this longer window.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout hint for exchanges the device acknowledges promptly
/// (watercare mode set).
pub const PROMPT_ACK_TIMEOUT: Duration = Duration::from_secs(4);

/// Default retry hint consumed by the external scheduler. Retries reuse the
/// same `send_bytes` and the same sequence byte.
pub const DEFAULT_RETRY_COUNT: u8 = 5;

/// Length of a full status-region read (`STATU` request with `start = 0`).
pub const FULL_STATUS_BLOCK_LENGTH: u16 = 637;

/// Upper bound on the bytes dumped per frame by the `frame-hexdump` feature.
#[cfg(feature = "frame-hexdump")]
pub const DEBUG_DUMP_SIZE: usize = 128;
