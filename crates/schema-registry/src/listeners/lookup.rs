//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Scheme and port lookup over resolved listeners
//!
//! Used when the process advertises where peers can reach it, e.g. to pick
//! the binding used for instance-to-instance calls.

use super::alias::ProtocolAliasTable;
use super::builder::parse_listeners;
use super::types::{ResolvedListener, SchemeAndPort, SupportedSchemes, HTTP};
use crate::error::{ListenerError, ListenerResult};

/// First listener whose resolved scheme matches, ignoring case
///
/// An empty request means the plaintext default.
pub fn scheme_and_port(
    listeners: &[ResolvedListener],
    requested_scheme: &str,
) -> ListenerResult<SchemeAndPort> {
    let requested = if requested_scheme.is_empty() {
        HTTP
    } else {
        requested_scheme
    };

    listeners
        .iter()
        .find(|listener| listener.scheme().eq_ignore_ascii_case(requested))
        .map(|listener| SchemeAndPort::new(listener.scheme(), listener.port()))
        .ok_or_else(|| ListenerError::NoMatchingListener {
            scheme: requested.to_string(),
        })
}

/// Scheme and port for this instance's identity
///
/// Listeners are resolved without an alias table against `http`/`https`,
/// so aliased listeners are rejected on this path.
pub fn scheme_and_port_for_identity<S: AsRef<str>>(
    port: u16,
    configured_listeners: &[S],
    requested_scheme: &str,
) -> ListenerResult<SchemeAndPort> {
    let listeners = parse_listeners(
        configured_listeners,
        &ProtocolAliasTable::new(),
        port,
        &SupportedSchemes::default(),
        HTTP,
    )?;
    scheme_and_port(listeners.as_slice(), requested_scheme)
}
