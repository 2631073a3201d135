// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `SFILE`/`FILES` config and log filename query.
//!
//! The device answers with the two XML filenames it reads its
//! configuration and log definitions from:
//!
//! ```text
//! FILES,{platform}_C{cfg:02}.xml,{platform}_S{log:02}.xml
//! ```
//!
//! Both filenames must name the same platform key; a mismatch is a
//! malformed response and commits no state.

use std::net::SocketAddr;

use super::constants::{has_tag, TAG_CONFIG_FILE_REQUEST, TAG_CONFIG_FILE_RESPONSE, TAG_LEN};
use super::envelope;
use super::handler::{ConnectionParms, Exchange, Handling, MessageHandler};
use super::{require_len, ProtocolError, ProtocolResult};

#[derive(Debug, Clone, Default)]
pub struct ConfigFileHandler {
    exchange: Exchange,
    /// Platform key shared by both filenames, e.g. `inXM`.
    pub platform_key: Option<String>,
    pub config_version: u8,
    pub log_version: u8,
}

impl ConfigFileHandler {
    /// Receive-only template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbound request with the caller-supplied sequence byte.
    #[must_use]
    pub fn request(sequence: u8, parms: &ConnectionParms) -> Self {
        let mut inner = TAG_CONFIG_FILE_REQUEST.to_vec();
        inner.push(sequence);
        Self {
            exchange: Exchange::outbound(envelope::wrap(&inner, parms), parms.clone()),
            ..Self::default()
        }
    }

    /// Outbound response naming both filenames for one platform key.
    #[must_use]
    pub fn response(
        platform_key: &str,
        config_version: u8,
        log_version: u8,
        parms: &ConnectionParms,
    ) -> Self {
        let inner = format!(
            "FILES,{platform_key}_C{config_version:02}.xml,{platform_key}_S{log_version:02}.xml"
        );
        Self {
            exchange: Exchange::outbound(envelope::wrap(inner.as_bytes(), parms), parms.clone()),
            ..Self::default()
        }
    }
}

/// Split `{key}_X{nn}.xml` into the platform key and the 2-digit version.
fn parse_versioned_name<'a>(name: &'a str, marker: &str) -> ProtocolResult<(&'a str, u8)> {
    let malformed = || ProtocolError::MalformedFilename(name.to_string());
    let (key, rest) = name.split_once(marker).ok_or_else(malformed)?;
    let digits = rest.strip_suffix(".xml").ok_or_else(malformed)?;
    if digits.len() != 2 {
        return Err(malformed());
    }
    let version = digits.parse::<u8>().map_err(|_| malformed())?;
    Ok((key, version))
}

impl MessageHandler for ConfigFileHandler {
    fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    fn can_handle(&self, payload: &[u8], _sender: Option<SocketAddr>) -> bool {
        has_tag(payload, TAG_CONFIG_FILE_REQUEST) || has_tag(payload, TAG_CONFIG_FILE_RESPONSE)
    }

    fn handle(
        &mut self,
        payload: &[u8],
        _sender: Option<SocketAddr>,
    ) -> ProtocolResult<Handling> {
        if has_tag(payload, TAG_CONFIG_FILE_REQUEST) {
            require_len(payload, 6, "SFILE")?;
            self.exchange.sequence = Some(payload[5]);
            return Ok(Handling::Consumed);
        }
        if has_tag(payload, TAG_CONFIG_FILE_RESPONSE) {
            let text = std::str::from_utf8(&payload[TAG_LEN..]).map_err(|_| {
                ProtocolError::MalformedFilename(String::from_utf8_lossy(payload).into_owned())
            })?;
            let rest = text
                .strip_prefix(',')
                .ok_or_else(|| ProtocolError::MalformedFilename(text.to_string()))?;
            let (config_name, log_name) = rest
                .split_once(',')
                .ok_or_else(|| ProtocolError::MalformedFilename(rest.to_string()))?;

            let (config_key, config_version) = parse_versioned_name(config_name, "_C")?;
            let (log_key, log_version) = parse_versioned_name(log_name, "_S")?;
            if config_key != log_key {
                return Err(ProtocolError::PlatformKeyMismatch {
                    config: config_key.to_string(),
                    log: log_key.to_string(),
                });
            }

            self.platform_key = Some(config_key.to_string());
            self.config_version = config_version;
            self.log_version = log_version;
            self.exchange.remove = true;
            return Ok(Handling::Consumed);
        }
        Ok(Handling::Forward)
    }
}
