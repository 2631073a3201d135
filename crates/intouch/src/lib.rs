// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # intouch - Gecko in.touch2 protocol core
//!
//! Wire-protocol codec and handler dispatch core for the UDP control
//! protocol spoken by Gecko in.touch2 spa controllers. The crate parses and
//! constructs the binary datagrams, classifies inbound frames, maintains
//! per-exchange state (sequence bytes, timeout/retry hints, completion) and
//! demultiplexes frames to the matching message handler.
//!
//! ## Quick Start
//!
//! ```rust
//! use intouch::protocol::handler::{ConnectionParms, MessageHandler};
//! use intouch::protocol::version::VersionHandler;
//! use intouch::{DispatchOutcome, HandlerRegistry};
//!
//! let parms = ConnectionParms::new(
//!     "0.0.0.0:10022".parse().unwrap(),
//!     b"CLIENTID".to_vec(),
//!     b"SPA-ID".to_vec(),
//! );
//!
//! // Build a request; the receive loop sends `send_bytes()` on its socket.
//! let request = VersionHandler::request(1, &parms);
//! assert!(request.send_bytes().is_some());
//!
//! // Register it and feed inbound datagrams to the dispatcher.
//! let mut registry = HandlerRegistry::new();
//! registry.register(request);
//! let reply = intouch::protocol::envelope::wrap(
//!     b"SVERS\x00\x01\x02\x03\x00\x04\x05\x06",
//!     &parms,
//! );
//! assert_eq!(registry.dispatch(&reply, None), DispatchOutcome::Consumed);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                    Collaborators (not this crate)                  |
//! |   UDP receive loop | retry scheduler | discovery | spa state model |
//! +--------------------------------------------------------------------+
//! |                          Dispatch Layer                            |
//! |   HandlerRegistry walk | terminal sweep | StatusBlockAssembler     |
//! +--------------------------------------------------------------------+
//! |                          Handler Layer                             |
//! |   hello | ping | version | channel | config file | status block    |
//! |   partial status | pack command | watercare                        |
//! +--------------------------------------------------------------------+
//! |                          Codec Layer                               |
//! |   <PACKT> envelope | 5-byte command tags | big-endian fields       |
//! +--------------------------------------------------------------------+
//! ```
//!
//! The crate owns no sockets, spawns no threads and never blocks: it is a
//! pure codec plus state machine, driven one datagram at a time by a
//! single-threaded cooperative receive loop.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HandlerRegistry`] | Ordered registry of live handlers, frame router |
//! | [`MessageHandler`] | Contract every message-kind handler implements |
//! | [`ConnectionParms`] | Local address plus the two connection IDs |
//! | [`StatusBlockAssembler`] | Accumulates status chunks until `next == 0` |
//! | [`ProtocolError`] | Decode failure; frame dropped, no state committed |

pub mod assembly;
pub mod config;
pub mod dispatch;
pub mod protocol;

pub use assembly::StatusBlockAssembler;
pub use dispatch::{DispatchOutcome, HandlerRegistry};
pub use protocol::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
pub use protocol::{ProtocolError, ProtocolResult};
