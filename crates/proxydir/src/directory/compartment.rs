//! Host compartmentalization
//!
//! A deployed host receives a need-to-know slice of the directory: enough to
//! serve the discovery promises made (or about to be made) to the clients
//! that might query it, and nothing else. Hosts and Sponsors never leave the
//! central directory; client channels, server ownership, and notes are
//! blanked. Compromising one host therefore exposes a strict subset of the
//! fleet.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use proxydir_storage::{Client, DirectorySnapshot, HomePage, Server, Version};

/// The host-scoped slice of the directory.
///
/// Hosts and Sponsors are deliberately unrepresentable here.
#[derive(Debug, Clone, Default)]
pub struct HostExport {
    pub clients: Vec<Client>,
    pub servers: Vec<Server>,
    pub home_pages: Vec<HomePage>,
    pub versions: Vec<Version>,
}

/// The clients that might ever be told about a server on `host_id` via
/// discovery. Reserved servers (no discovery client) contribute nothing.
pub fn discovering_clients<'a>(snap: &'a DirectorySnapshot, host_id: &str) -> BTreeSet<&'a str> {
    snap.servers
        .iter()
        .filter(|s| s.host_id == host_id)
        .filter_map(|s| s.discovery_client_id.as_deref())
        .collect()
}

/// Build the compartmentalized export for `host_id` as of `at`.
///
/// Server rows survive when their discovery client is one of this host's
/// discovering clients, except rows on *other* hosts that are no longer
/// relevant: rotations whose window has fully elapsed, and permanently
/// embedded servers (those are only ever disclosed by their own host).
/// An unknown host id yields empty Clients/Servers but the full
/// Home_Pages/Versions sheets, indistinguishable from a host with no
/// discoverable servers.
pub fn host_export(snap: &DirectorySnapshot, host_id: &str, at: NaiveDateTime) -> HostExport {
    let discovering = discovering_clients(snap, host_id);

    let clients = snap
        .clients
        .iter()
        .filter(|c| discovering.contains(c.client_id.as_str()))
        .map(|c| Client {
            client_id: c.client_id.clone(),
            propagation_channels: BTreeSet::new(),
            notes: None,
        })
        .collect();

    let servers = snap
        .servers
        .iter()
        .filter(|s| {
            s.discovery_client_id
                .as_deref()
                .is_some_and(|id| discovering.contains(id))
        })
        .filter(|s| {
            if s.host_id == host_id {
                // Servers on this host always ship; they must run even when
                // not currently discoverable.
                return true;
            }
            match s.discovery_window {
                Some(window) => !window.elapsed_by(at),
                None => false,
            }
        })
        .map(|s| Server {
            host_id: String::new(),
            notes: None,
            ..s.clone()
        })
        .collect();

    HostExport {
        clients,
        servers,
        home_pages: snap.home_pages.clone(),
        versions: snap.versions.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxydir_storage::schema::{parse_datetime, DiscoveryWindow};

    fn server(ip: &str, host: &str, client: Option<&str>, window: Option<(&str, &str)>) -> Server {
        Server {
            server_id: Some(format!("server at {ip}")),
            host_id: host.to_string(),
            ip_address: ip.to_string(),
            web_server_port: 8080,
            web_server_secret: "SECRET".to_string(),
            web_server_certificate: "CERT".to_string(),
            web_server_private_key: None,
            discovery_client_id: client.map(str::to_string),
            discovery_window: window.map(|(s, e)| DiscoveryWindow {
                start: parse_datetime(s).unwrap(),
                end: parse_datetime(e).unwrap(),
            }),
            notes: Some("operator note".to_string()),
        }
    }

    fn client(id: &str) -> Client {
        Client {
            client_id: id.to_string(),
            propagation_channels: ["email".to_string()].into(),
            notes: Some("note".to_string()),
        }
    }

    fn fixture() -> DirectorySnapshot {
        DirectorySnapshot {
            clients: vec![client("C1"), client("C2"), client("C3")],
            servers: vec![
                // host-1: embedded for C1, live rotation for C1, elapsed for C2
                server("10.0.0.1", "host-1", Some("C1"), None),
                server("10.0.0.2", "host-1", Some("C1"), Some(("2011-05-16", "2011-05-23"))),
                server("10.0.0.5", "host-1", Some("C2"), Some(("2011-04-01", "2011-04-08"))),
                // host-2: cross-host rotation for C1, embedded for C2, reserved
                server("10.0.0.3", "host-2", Some("C1"), Some(("2011-05-16", "2011-05-23"))),
                server("10.0.0.4", "host-2", Some("C2"), None),
                server("10.0.0.6", "host-2", None, None),
            ],
            ..Default::default()
        }
    }

    fn exported_ips(export: &HostExport) -> Vec<&str> {
        export.servers.iter().map(|s| s.ip_address.as_str()).collect()
    }

    #[test]
    fn test_discovering_clients_excludes_reserved_servers() {
        let snap = fixture();
        let host1: Vec<&str> = discovering_clients(&snap, "host-1").into_iter().collect();
        assert_eq!(host1, vec!["C1", "C2"]);
        let host2: Vec<&str> = discovering_clients(&snap, "host-2").into_iter().collect();
        assert_eq!(host2, vec!["C1", "C2"]);
        assert!(discovering_clients(&snap, "no-such-host").is_empty());
    }

    #[test]
    fn test_export_filters_servers_by_relevance() {
        let snap = fixture();
        let at = parse_datetime("2011-05-18").unwrap();
        let export = host_export(&snap, "host-1", at);
        // Own servers always ship, including the already-elapsed 10.0.0.5;
        // the cross-host live rotation ships; the cross-host embedded server
        // and the reserved server do not.
        assert_eq!(
            exported_ips(&export),
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.5", "10.0.0.3"]
        );
    }

    #[test]
    fn test_export_prunes_elapsed_cross_host_rotations() {
        let snap = fixture();
        let late = parse_datetime("2011-06-01").unwrap();
        let export = host_export(&snap, "host-1", late);
        assert_eq!(
            exported_ips(&export),
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.5"]
        );
    }

    #[test]
    fn test_export_blanks_sensitive_fields() {
        let snap = fixture();
        let at = parse_datetime("2011-05-18").unwrap();
        let export = host_export(&snap, "host-1", at);
        for server in &export.servers {
            assert!(server.host_id.is_empty());
            assert!(server.notes.is_none());
        }
        for client in &export.clients {
            assert!(client.propagation_channels.is_empty());
            assert!(client.notes.is_none());
        }
        // Untouched sheets travel whole.
        assert!(export.servers.iter().any(|s| s.web_server_private_key.is_none()));
    }

    #[test]
    fn test_export_satisfies_client_server_closure() {
        let snap = fixture();
        let at = parse_datetime("2011-05-18").unwrap();
        for host in ["host-1", "host-2"] {
            let export = host_export(&snap, host, at);
            let client_ids: BTreeSet<&str> =
                export.clients.iter().map(|c| c.client_id.as_str()).collect();
            let server_clients: BTreeSet<&str> = export
                .servers
                .iter()
                .filter_map(|s| s.discovery_client_id.as_deref())
                .collect();
            assert_eq!(client_ids, server_clients, "closure failed for {host}");
            // Every exported server names a discovery client.
            assert_eq!(
                export.servers.iter().filter(|s| s.discovery_client_id.is_none()).count(),
                0
            );
        }
    }

    #[test]
    fn test_unknown_host_gets_empty_compartment_with_shared_sheets() {
        let mut snap = fixture();
        snap.home_pages.push(HomePage {
            sponsor_id: "SP1".to_string(),
            region: None,
            home_page_url: "http://example.com/".to_string(),
            notes: None,
        });
        snap.versions.push(Version {
            client_version: "2".to_string(),
            notes: None,
        });
        let at = parse_datetime("2011-05-18").unwrap();
        let export = host_export(&snap, "no-such-host", at);
        assert!(export.clients.is_empty());
        assert!(export.servers.is_empty());
        assert_eq!(export.home_pages.len(), 1);
        assert_eq!(export.versions.len(), 1);
    }
}
