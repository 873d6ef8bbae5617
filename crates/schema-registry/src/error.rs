//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Error handling for the schema registry host
//!
//! Listener resolution failures are configuration errors and are kept as a
//! discriminated taxonomy so callers can react to the cause rather than the
//! message text. Metrics bridge failures are reported separately because the
//! bridge never lets them escape into the reporting subsystem.

use thiserror::Error;

/// Result type for schema registry host operations
pub type SchemaRegistryHostResult<T> = Result<T, SchemaRegistryHostError>;

/// Result type for listener resolution
pub type ListenerResult<T> = Result<T, ListenerError>;

/// Listener resolution error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener string is not a URI
    #[error("Listener '{listener}' is not a valid URI: {reason}")]
    InvalidUri { listener: String, reason: String },

    /// The listener URI has no explicit port
    #[error("Listener '{listener}' must specify a port")]
    MissingPort { listener: String },

    /// The scheme is neither supported nor a known alias
    #[error("Listener '{listener}' has an unsupported scheme '{scheme}'")]
    UnsupportedScheme { listener: String, scheme: String },

    /// Substituting the alias target produced an invalid URI
    #[error("Listener '{listener}' with protocol '{protocol}' is not a valid URI: {reason}")]
    UriRewriteFailure {
        listener: String,
        protocol: String,
        reason: String,
    },

    /// Two listeners resolved to the same logical name
    #[error("More than one listener was specified with name '{name}'. Listener names must be unique")]
    DuplicateListenerName { name: String },

    /// The effective listener set is empty
    #[error("No listeners are configured. At least one listener must be configured")]
    NoListenersConfigured,

    /// No resolved listener uses the requested scheme
    #[error("No listener configured with requested scheme '{scheme}'")]
    NoMatchingListener { scheme: String },
}

impl ListenerError {
    pub(crate) fn invalid_uri(listener: &str, reason: impl ToString) -> Self {
        Self::InvalidUri {
            listener: listener.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn missing_port(listener: &str) -> Self {
        Self::MissingPort {
            listener: listener.to_string(),
        }
    }

    /// Whether this failure can only happen when querying a resolved set
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Self::NoMatchingListener { .. })
    }
}

/// Metrics bridge error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsBridgeError {
    /// The gauge sink refused a registration
    #[error("Failed to register gauge '{name}': {message}")]
    Registration { name: String, message: String },

    /// The bridge has been closed
    #[error("Metrics bridge is closed")]
    Closed,
}

impl MetricsBridgeError {
    /// Create a registration error
    pub fn registration(name: &str, message: &str) -> Self {
        Self::Registration {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

/// Schema registry host error types
#[derive(Error, Debug)]
pub enum SchemaRegistryHostError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration source could not be loaded
    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// Listener resolution error
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// Metrics bridge error
    #[error(transparent)]
    Metrics(#[from] MetricsBridgeError),

    /// Logging could not be initialised
    #[error("Logging error: {message}")]
    Logging { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SchemaRegistryHostError {
    /// Create a configuration error
    pub fn config(message: &str) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a configuration error with details
    pub fn config_with_details(message: &str, details: String) -> Self {
        Self::Config {
            message: format!("{}: {}", message, details),
        }
    }

    /// Create a logging error
    pub fn logging(message: &str) -> Self {
        Self::Logging {
            message: message.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal(message: &str) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Configuration problems are fatal at startup
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::Config { .. } | Self::ConfigSource(_) => true,
            Self::Listener(err) => !err.is_lookup_error(),
            _ => false,
        }
    }
}
