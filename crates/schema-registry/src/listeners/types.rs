//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Listener data model

use http::Uri;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Plaintext transport scheme
pub const HTTP: &str = "http";

/// TLS transport scheme
pub const HTTPS: &str = "https";

/// A listener URI with a mandatory explicit port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerUri {
    uri: Uri,
    scheme: String,
    port: u16,
}

impl ListenerUri {
    /// Callers guarantee `uri` has a scheme and an authority carrying `port`
    ///
    /// `scheme` is kept as written: `http::Uri` lower-cases `HTTP` and
    /// `HTTPS` but leaves every other scheme alone.
    pub(crate) fn new(uri: Uri, scheme: impl Into<String>, port: u16) -> Self {
        Self {
            uri,
            scheme: scheme.into(),
            port,
        }
    }

    /// Scheme, exactly as configured
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host, without the port
    pub fn host(&self) -> &str {
        self.uri.host().unwrap_or_default()
    }

    /// Explicit port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path, if anything beyond the root was given
    pub fn path(&self) -> Option<&str> {
        match self.uri.path() {
            "" | "/" => None,
            path => Some(path),
        }
    }

    /// Underlying URI
    pub fn as_uri(&self) -> &Uri {
        &self.uri
    }

    pub(crate) fn into_uri(self) -> Uri {
        self.uri
    }
}

impl fmt::Display for ListenerUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authority = self
            .uri
            .authority()
            .map(|a| a.as_str())
            .unwrap_or_default();
        write!(f, "{}://{}", self.scheme(), authority)?;
        if let Some(path) = self.path() {
            write!(f, "{}", path)?;
        }
        if let Some(query) = self.uri.query() {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

/// A validated listener binding
///
/// `name` is only present when the configured scheme was an alias that got
/// rewritten to a supported transport scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedListener {
    uri: ListenerUri,
    name: Option<String>,
}

impl ResolvedListener {
    /// Listener bound directly with a supported scheme
    pub fn unnamed(uri: ListenerUri) -> Self {
        Self { uri, name: None }
    }

    /// Listener whose scheme was rewritten from the alias `name`
    pub fn named(uri: ListenerUri, name: impl Into<String>) -> Self {
        Self {
            uri,
            name: Some(name.into()),
        }
    }

    pub fn uri(&self) -> &ListenerUri {
        &self.uri
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn scheme(&self) -> &str {
        self.uri.scheme()
    }

    pub fn host(&self) -> &str {
        self.uri.host()
    }

    pub fn port(&self) -> u16 {
        self.uri.port()
    }
}

impl fmt::Display for ResolvedListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "'{}' {}", name, self.uri),
            None => write!(f, "{}", self.uri),
        }
    }
}

impl Serialize for ResolvedListener {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResolvedListener", 6)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("uri", &self.uri.to_string())?;
        state.serialize_field("scheme", self.scheme())?;
        state.serialize_field("host", self.host())?;
        state.serialize_field("port", &self.port())?;
        state.serialize_field("path", &self.uri.path())?;
        state.end()
    }
}

/// Transport schemes the process binds natively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedSchemes {
    schemes: Vec<String>,
}

impl SupportedSchemes {
    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self {
            schemes: Vec::new(),
        };
        for scheme in schemes {
            let scheme = scheme.into();
            if !set.schemes.contains(&scheme) {
                set.schemes.push(scheme);
            }
        }
        set
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.iter().any(|s| s == scheme)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl Default for SupportedSchemes {
    fn default() -> Self {
        Self::new([HTTP, HTTPS])
    }
}

/// Scheme and port a peer should use to reach this process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeAndPort {
    pub scheme: String,
    pub port: u16,
}

impl SchemeAndPort {
    pub fn new(scheme: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            port,
        }
    }
}

impl fmt::Display for SchemeAndPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(raw: &str, port: u16) -> ListenerUri {
        let (scheme, _) = raw.split_once("://").unwrap();
        ListenerUri::new(raw.parse().unwrap(), scheme, port)
    }

    #[test]
    fn test_listener_uri_accessors() {
        let listener = uri("https://0.0.0.0:8082/registry", 8082);
        assert_eq!(listener.scheme(), "https");
        assert_eq!(listener.host(), "0.0.0.0");
        assert_eq!(listener.port(), 8082);
        assert_eq!(listener.path(), Some("/registry"));
        assert_eq!(listener.to_string(), "https://0.0.0.0:8082/registry");
    }

    #[test]
    fn test_listener_uri_without_path_displays_bare_authority() {
        let listener = uri("http://0.0.0.0:8081", 8081);
        assert_eq!(listener.path(), None);
        assert_eq!(listener.to_string(), "http://0.0.0.0:8081");
    }

    #[test]
    fn test_listener_uri_keeps_scheme_case() {
        let listener = uri("HTTP://0.0.0.0:8081", 8081);
        assert_eq!(listener.scheme(), "HTTP");
        assert_eq!(listener.to_string(), "HTTP://0.0.0.0:8081");
    }

    #[test]
    fn test_resolved_listener_display() {
        let unnamed = ResolvedListener::unnamed(uri("http://0.0.0.0:8081", 8081));
        assert_eq!(unnamed.to_string(), "http://0.0.0.0:8081");

        let named = ResolvedListener::named(uri("https://0.0.0.0:8082", 8082), "internal");
        assert_eq!(named.to_string(), "'internal' https://0.0.0.0:8082");
        assert!(named.is_named());
    }

    #[test]
    fn test_resolved_listener_serializes_flat() {
        let named = ResolvedListener::named(uri("https://0.0.0.0:8082", 8082), "internal");
        let json = serde_json::to_value(&named).unwrap();
        assert_eq!(json["name"], "internal");
        assert_eq!(json["scheme"], "https");
        assert_eq!(json["port"], 8082);
    }

    #[test]
    fn test_supported_schemes_deduplicates() {
        let schemes = SupportedSchemes::new(["http", "https", "http"]);
        assert_eq!(schemes.len(), 2);
        assert!(schemes.contains("https"));
        assert!(!schemes.contains("HTTPS"));
        assert_eq!(SupportedSchemes::default(), SupportedSchemes::new([HTTP, HTTPS]));
    }
}
