//! Listener resolution tests

use super::*;
use crate::error::ListenerError;

fn internal_aliases() -> ProtocolAliasTable {
    ProtocolAliasTable::new().with_alias("internal", "https")
}

fn build(listeners: &[&str], aliases: &ProtocolAliasTable) -> Result<ListenerSet, ListenerError> {
    parse_listeners(listeners, aliases, 8081, &SupportedSchemes::default(), HTTP)
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn test_preserves_input_order_and_names() {
        let aliases = internal_aliases()
            .with_alias("public", "http")
            .with_alias("replication", "https");
        let set = build(
            &[
                "public://0.0.0.0:8080",
                "http://0.0.0.0:8081",
                "internal://0.0.0.0:8082",
                "https://0.0.0.0:8443",
                "replication://0.0.0.0:8444",
            ],
            &aliases,
        )
        .unwrap();

        let ports: Vec<u16> = set.iter().map(ResolvedListener::port).collect();
        assert_eq!(ports, vec![8080, 8081, 8082, 8443, 8444]);

        let names: Vec<&str> = set.named().filter_map(ResolvedListener::name).collect();
        assert_eq!(names, vec!["public", "internal", "replication"]);
        assert_eq!(set.unnamed().count(), 2);
        assert_eq!(set.by_name("internal").map(ResolvedListener::port), Some(8082));
    }

    #[test]
    fn test_duplicate_names_fail_regardless_of_position() {
        let aliases = internal_aliases();
        let layouts: [&[&str]; 3] = [
            &["internal://0.0.0.0:8082", "internal://0.0.0.0:8083"],
            &["internal://0.0.0.0:8082", "http://0.0.0.0:8081", "INTERNAL://0.0.0.0:8083"],
            &["http://0.0.0.0:8081", "internal://a:1", "https://b:2", "internal://c:3"],
        ];

        for layout in layouts {
            assert_eq!(
                build(layout, &aliases),
                Err(ListenerError::DuplicateListenerName {
                    name: "internal".to_string()
                }),
                "{:?}",
                layout
            );
        }
    }

    #[test]
    fn test_unnamed_listeners_may_share_a_scheme() {
        let set = build(&["http://0.0.0.0:8081", "http://127.0.0.1:8082"], &internal_aliases())
            .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.named().count(), 0);
    }

    #[test]
    fn test_empty_list_falls_back_to_deprecated_port() {
        let empty: [&str; 0] = [];
        let set = parse_listeners(
            &empty,
            &ProtocolAliasTable::new(),
            9092,
            &SupportedSchemes::default(),
            "http",
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        let listener = &set.as_slice()[0];
        assert_eq!(listener.scheme(), "http");
        assert_eq!(listener.host(), FALLBACK_BIND_HOST);
        assert_eq!(listener.port(), 9092);
        assert_eq!(listener.name(), None);
    }

    #[test]
    fn test_empty_first_entry_falls_back_to_deprecated_port() {
        let set = parse_listeners(
            &["", "ignored://nothing"],
            &ProtocolAliasTable::new(),
            9092,
            &SupportedSchemes::default(),
            "https",
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].scheme(), "https");
        assert_eq!(set.as_slice()[0].port(), 9092);
    }

    #[test]
    fn test_fallback_with_upper_case_supported_schemes() {
        let empty: [&str; 0] = [];
        let set = parse_listeners(
            &empty,
            &ProtocolAliasTable::new(),
            8081,
            &SupportedSchemes::new(["HTTP"]),
            "HTTP",
        )
        .unwrap();

        assert_eq!(set.as_slice()[0].scheme(), "HTTP");
        assert_eq!(
            set.scheme_and_port("").unwrap(),
            SchemeAndPort::new("HTTP", 8081)
        );
    }

    #[test]
    fn test_upper_case_scheme_is_not_supported() {
        assert_eq!(
            build(&["HTTP://0.0.0.0:8081"], &ProtocolAliasTable::new()),
            Err(ListenerError::UnsupportedScheme {
                listener: "HTTP://0.0.0.0:8081".to_string(),
                scheme: "HTTP".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_port_fails() {
        assert_eq!(
            build(&["http://0.0.0.0"], &internal_aliases()),
            Err(ListenerError::MissingPort {
                listener: "http://0.0.0.0".to_string()
            })
        );
    }

    #[test]
    fn test_first_failure_aborts_build() {
        let err = build(
            &["http://0.0.0.0:8081", "ftp://0.0.0.0:21", "http://0.0.0.0"],
            &internal_aliases(),
        )
        .unwrap_err();
        assert!(matches!(err, ListenerError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_alias_round_trip() {
        let set = build(&["internal://0.0.0.0:8082"], &internal_aliases()).unwrap();
        let listener = &set.as_slice()[0];
        assert_eq!(listener.scheme(), "https");
        assert_eq!(listener.host(), "0.0.0.0");
        assert_eq!(listener.port(), 8082);
        assert_eq!(listener.name(), Some("internal"));
    }
}

#[cfg(test)]
mod lookup_tests {
    use super::*;

    fn resolved() -> ListenerSet {
        build(
            &["http://0.0.0.0:8081", "internal://0.0.0.0:8082"],
            &internal_aliases(),
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let found = resolved().scheme_and_port("HTTPS").unwrap();
        assert_eq!(found, SchemeAndPort::new("https", 8082));
    }

    #[test]
    fn test_lookup_empty_scheme_uses_plaintext_default() {
        let found = scheme_and_port(resolved().as_slice(), "").unwrap();
        assert_eq!(found, SchemeAndPort::new("http", 8081));
    }

    #[test]
    fn test_lookup_returns_first_match() {
        let set = build(&["https://a:1", "https://b:2"], &internal_aliases()).unwrap();
        assert_eq!(set.scheme_and_port("https").unwrap().port, 1);
    }

    #[test]
    fn test_lookup_without_match_fails() {
        assert_eq!(
            resolved().scheme_and_port("ftp"),
            Err(ListenerError::NoMatchingListener {
                scheme: "ftp".to_string()
            })
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// `true` entries become unique aliases of https, `false` entries plain http
    fn render(layout: &[(bool, u16)]) -> (Vec<String>, ProtocolAliasTable, Vec<String>) {
        let mut listeners = Vec::new();
        let mut aliases = ProtocolAliasTable::new();
        let mut names = Vec::new();

        for (i, (aliased, port)) in layout.iter().enumerate() {
            if *aliased {
                let name = format!("alias{}", i);
                aliases.insert(&name, HTTPS);
                listeners.push(format!("{}://0.0.0.0:{}", name, port));
                names.push(name);
            } else {
                listeners.push(format!("http://0.0.0.0:{}", port));
            }
        }

        (listeners, aliases, names)
    }

    proptest! {
        #[test]
        fn test_order_and_names_are_preserved(
            layout in prop::collection::vec((any::<bool>(), 1u16..=u16::MAX), 1..10)
        ) {
            let (listeners, aliases, names) = render(&layout);
            let set = parse_listeners(&listeners, &aliases, 8081, &SupportedSchemes::default(), HTTP)
                .unwrap();

            let ports: Vec<u16> = set.iter().map(ResolvedListener::port).collect();
            let expected: Vec<u16> = layout.iter().map(|(_, port)| *port).collect();
            prop_assert_eq!(ports, expected);

            let resolved: Vec<&str> = set.named().filter_map(ResolvedListener::name).collect();
            let expected: Vec<&str> = names.iter().map(String::as_str).collect();
            prop_assert_eq!(resolved, expected);
        }

        #[test]
        fn test_duplicate_alias_fails_at_any_position(
            ports in prop::collection::vec(1u16..=u16::MAX, 2..10),
            first in any::<prop::sample::Index>(),
            second in any::<prop::sample::Index>(),
        ) {
            let first = first.index(ports.len());
            let mut second = second.index(ports.len() - 1);
            if second >= first {
                second += 1;
            }

            let listeners: Vec<String> = ports
                .iter()
                .enumerate()
                .map(|(i, port)| {
                    let scheme = if i == first || i == second { "internal" } else { HTTP };
                    format!("{}://0.0.0.0:{}", scheme, port)
                })
                .collect();

            prop_assert_eq!(
                parse_listeners(&listeners, &internal_aliases(), 8081, &SupportedSchemes::default(), HTTP),
                Err(ListenerError::DuplicateListenerName {
                    name: "internal".to_string()
                })
            );
        }

        #[test]
        fn test_supported_scheme_case_must_match(
            scheme in "[hH][tT][tT][pP][sS]?",
            port in 1u16..=u16::MAX,
        ) {
            let listener = format!("{}://0.0.0.0:{}", scheme, port);
            let result = build(&[listener.as_str()], &ProtocolAliasTable::new());

            if scheme == HTTP || scheme == HTTPS {
                let set = result.unwrap();
                prop_assert_eq!(set.as_slice()[0].scheme(), scheme.as_str());
            } else {
                prop_assert_eq!(
                    result,
                    Err(ListenerError::UnsupportedScheme {
                        listener: listener.clone(),
                        scheme: scheme.clone(),
                    })
                );
            }
        }

        #[test]
        fn test_alias_matches_in_any_case(
            scheme in "[iI][nN][tT][eE][rR][nN][aA][lL]",
            port in 1u16..=u16::MAX,
        ) {
            let listener = format!("{}://0.0.0.0:{}", scheme, port);
            let set = build(&[listener.as_str()], &internal_aliases()).unwrap();
            let resolved = &set.as_slice()[0];

            prop_assert_eq!(resolved.name(), Some("internal"));
            prop_assert_eq!(resolved.scheme(), HTTPS);
            prop_assert_eq!(resolved.port(), port);
        }
    }
}
