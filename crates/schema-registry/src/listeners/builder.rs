//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Listener set construction

use std::collections::HashSet;
use tracing::{debug, warn};

use super::alias::{resolve_alias, ProtocolAliasTable};
use super::lookup::scheme_and_port;
use super::types::{ResolvedListener, SchemeAndPort, SupportedSchemes};
use super::uri::parse_listener_uri;
use crate::error::{ListenerError, ListenerResult};

/// Bind address used when synthesizing a listener from the deprecated port
pub const FALLBACK_BIND_HOST: &str = "0.0.0.0";

/// Validated, ordered listener bindings
///
/// Never empty, and logical names are unique among named listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSet {
    listeners: Vec<ResolvedListener>,
}

impl ListenerSet {
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedListener> {
        self.listeners.iter()
    }

    pub fn as_slice(&self) -> &[ResolvedListener] {
        &self.listeners
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Always false for a built set
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listeners that came from an alias, in configured order
    pub fn named(&self) -> impl Iterator<Item = &ResolvedListener> {
        self.listeners.iter().filter(|l| l.is_named())
    }

    /// Listeners bound with a supported scheme, in configured order
    pub fn unnamed(&self) -> impl Iterator<Item = &ResolvedListener> {
        self.listeners.iter().filter(|l| !l.is_named())
    }

    /// Find a named listener
    pub fn by_name(&self, name: &str) -> Option<&ResolvedListener> {
        self.listeners.iter().find(|l| l.name() == Some(name))
    }

    /// See [`scheme_and_port`]
    pub fn scheme_and_port(&self, requested_scheme: &str) -> ListenerResult<SchemeAndPort> {
        scheme_and_port(&self.listeners, requested_scheme)
    }

    pub fn into_vec(self) -> Vec<ResolvedListener> {
        self.listeners
    }
}

impl<'a> IntoIterator for &'a ListenerSet {
    type Item = &'a ResolvedListener;
    type IntoIter = std::slice::Iter<'a, ResolvedListener>;

    fn into_iter(self) -> Self::IntoIter {
        self.listeners.iter()
    }
}

impl AsRef<[ResolvedListener]> for ListenerSet {
    fn as_ref(&self) -> &[ResolvedListener] {
        &self.listeners
    }
}

/// Resolve raw listener strings into a validated listener set
///
/// An empty list, or one whose first entry is empty, falls back to a single
/// `<default_scheme>://0.0.0.0:<deprecated_port>` listener and logs a
/// deprecation warning. The first failing listener aborts the build.
pub fn parse_listeners<S: AsRef<str>>(
    listeners: &[S],
    aliases: &ProtocolAliasTable,
    deprecated_port: u16,
    supported: &SupportedSchemes,
    default_scheme: &str,
) -> ListenerResult<ListenerSet> {
    let fallback;
    let raw: Vec<&str> = match listeners.first() {
        Some(first) if !first.as_ref().is_empty() => {
            listeners.iter().map(|l| l.as_ref()).collect()
        }
        _ => {
            warn!(
                deprecated_port,
                "DEPRECATION warning: `listeners` configuration is not configured. \
                 Falling back to the deprecated `port` configuration."
            );
            fallback = format!(
                "{}://{}:{}",
                default_scheme, FALLBACK_BIND_HOST, deprecated_port
            );
            vec![fallback.as_str()]
        }
    };

    let resolved = raw
        .into_iter()
        .map(|listener| {
            let uri = parse_listener_uri(listener)?;
            resolve_alias(uri, aliases, supported)
        })
        .collect::<ListenerResult<Vec<_>>>()?;

    let mut names = HashSet::new();
    for name in resolved.iter().filter_map(ResolvedListener::name) {
        if !names.insert(name) {
            return Err(ListenerError::DuplicateListenerName {
                name: name.to_string(),
            });
        }
    }

    if resolved.is_empty() {
        return Err(ListenerError::NoListenersConfigured);
    }

    debug!(
        listeners = %resolved
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        "Resolved listeners"
    );

    Ok(ListenerSet {
        listeners: resolved,
    })
}
