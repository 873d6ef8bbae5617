//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Listener configuration resolution
//!
//! Turns raw listener strings into validated, typed bindings. Parsing,
//! alias rewriting, set construction and scheme lookup are pure functions
//! over their explicit inputs; nothing here reads ambient configuration.

pub mod alias;
pub mod builder;
pub mod lookup;
pub mod types;
pub mod uri;

#[cfg(test)]
mod tests;

pub use alias::{resolve_alias, ProtocolAliasTable};
pub use builder::{parse_listeners, ListenerSet, FALLBACK_BIND_HOST};
pub use lookup::{scheme_and_port, scheme_and_port_for_identity};
pub use types::{ListenerUri, ResolvedListener, SchemeAndPort, SupportedSchemes, HTTP, HTTPS};
pub use uri::parse_listener_uri;
