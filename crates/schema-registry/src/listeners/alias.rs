//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Protocol alias resolution
//!
//! Operators may expose listeners under their own scheme names, e.g.
//! `internal://0.0.0.0:8082`, and map each name onto one of the supported
//! transport schemes. The alias becomes the listener's logical name.

use http::uri::Scheme;
use http::Uri;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::types::{ListenerUri, ResolvedListener, SupportedSchemes};
use crate::error::{ListenerError, ListenerResult};

/// Lower-cased alias to transport scheme mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct ProtocolAliasTable {
    aliases: HashMap<String, String>,
}

impl ProtocolAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_alias(mut self, alias: &str, protocol: &str) -> Self {
        self.insert(alias, protocol);
        self
    }

    /// Insert an alias; the key is lower-cased
    pub fn insert(&mut self, alias: &str, protocol: &str) -> Option<String> {
        self.aliases
            .insert(alias.to_lowercase(), protocol.to_string())
    }

    /// Look up an already lower-cased alias
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl From<HashMap<String, String>> for ProtocolAliasTable {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<ProtocolAliasTable> for HashMap<String, String> {
    fn from(table: ProtocolAliasTable) -> Self {
        table.aliases
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for ProtocolAliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, protocol) in iter {
            table.insert(alias.as_ref(), protocol.as_ref());
        }
        table
    }
}

/// Resolve a parsed listener against the supported schemes and alias table
///
/// Supported schemes pass through unnamed. Anything else must be an alias,
/// in which case the scheme is replaced and host, port and path are kept.
pub fn resolve_alias(
    uri: ListenerUri,
    aliases: &ProtocolAliasTable,
    supported: &SupportedSchemes,
) -> ListenerResult<ResolvedListener> {
    if supported.contains(uri.scheme()) {
        return Ok(ResolvedListener::unnamed(uri));
    }

    let listener = uri.to_string();
    let name = uri.scheme().to_lowercase();
    let protocol = aliases
        .get(&name)
        .ok_or_else(|| ListenerError::UnsupportedScheme {
            listener: listener.clone(),
            scheme: uri.scheme().to_string(),
        })?;

    let rewrite_failure = |reason: String| ListenerError::UriRewriteFailure {
        listener: listener.clone(),
        protocol: protocol.to_string(),
        reason,
    };

    let port = uri.port();
    let mut parts = uri.into_uri().into_parts();
    parts.scheme = Some(Scheme::try_from(protocol).map_err(|e| rewrite_failure(e.to_string()))?);
    let rewritten = Uri::from_parts(parts).map_err(|e| rewrite_failure(e.to_string()))?;

    debug!(
        listener = %listener,
        name = %name,
        protocol = %protocol,
        "Resolved listener alias"
    );

    Ok(ResolvedListener::named(
        ListenerUri::new(rewritten, protocol, port),
        name,
    ))
}
