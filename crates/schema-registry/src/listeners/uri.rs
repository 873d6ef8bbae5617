//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Listener URI parsing
//!
//! Only syntax and the presence of an explicit port are checked here.
//! Whether the scheme is acceptable is decided during alias resolution.

use http::uri::Authority;
use http::Uri;

use super::types::ListenerUri;
use crate::error::{ListenerError, ListenerResult};

/// Parse one raw listener string
///
/// No scheme-default port is ever assumed: `http://0.0.0.0` fails with
/// [`ListenerError::MissingPort`].
pub fn parse_listener_uri(listener: &str) -> ListenerResult<ListenerUri> {
    let uri: Uri = listener
        .parse()
        .map_err(|e| ListenerError::invalid_uri(listener, e))?;

    let scheme = match (uri.scheme(), listener.split_once("://")) {
        (Some(_), Some((scheme, _))) => scheme.to_string(),
        _ => return Err(ListenerError::invalid_uri(listener, "missing scheme")),
    };

    let authority = uri
        .authority()
        .ok_or_else(|| ListenerError::invalid_uri(listener, "missing authority"))?;

    if authority.host().is_empty() {
        return Err(ListenerError::invalid_uri(listener, "missing host"));
    }

    let port = match authority.port_u16() {
        Some(port) => port,
        None => match raw_port(authority) {
            Some(raw) if !raw.is_empty() => {
                return Err(ListenerError::invalid_uri(
                    listener,
                    format!("port '{}' is out of range", raw),
                ))
            }
            _ => return Err(ListenerError::missing_port(listener)),
        },
    };

    Ok(ListenerUri::new(uri, scheme, port))
}

/// Port text as written, ignoring userinfo and bracketed IPv6 hosts
fn raw_port(authority: &Authority) -> Option<&str> {
    let host_port = match authority.as_str().rsplit_once('@') {
        Some((_, host_port)) => host_port,
        None => authority.as_str(),
    };
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host.rsplit_once(':').map(|(_, port)| port)
}
