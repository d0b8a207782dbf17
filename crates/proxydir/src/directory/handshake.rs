//! Handshake encoding
//!
//! Builds the ordered, line-oriented response for one client request:
//! home pages for the requester's region, an upgrade notice when the client
//! is behind, then the discovery disclosure. "Nothing to show" is never an
//! error - unknown clients and sponsors produce fewer (or zero) lines, the
//! same as known ids with no matching rows, so a response never confirms
//! whether an id exists.

use std::net::IpAddr;

use chrono::NaiveDateTime;
use proxydir_common::wire::{
    encode_server_entry, ServerEntry, HOMEPAGE_PREFIX, SERVER_PREFIX, UPGRADE_PREFIX,
};
use proxydir_storage::{DirectorySnapshot, HomePage, Server};
use tracing::debug;

use crate::directory::discovery;
use crate::region::RegionResolver;

/// One client handshake request, as seen by the encoder.
#[derive(Debug, Clone)]
pub struct HandshakeRequest {
    /// Requester source address, taken from the transport layer.
    pub client_ip: IpAddr,
    pub client_id: String,
    pub sponsor_id: String,
    pub client_version: String,
}

/// The ordered response lines for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    lines: Vec<String>,
}

impl HandshakeResponse {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The newline-joined wire body. An empty body is a valid response.
    pub fn into_body(self) -> String {
        self.lines.join("\n")
    }
}

/// Home pages for a sponsor and region, falling back to the sponsor's
/// default (region-less) pages when the region has no entry. Row order is
/// preserved.
pub fn sponsor_home_pages<'a>(
    snap: &'a DirectorySnapshot,
    sponsor_id: &str,
    region: Option<&str>,
) -> Vec<&'a HomePage> {
    let for_region: Vec<&HomePage> = snap
        .home_pages
        .iter()
        .filter(|hp| hp.sponsor_id == sponsor_id && hp.region.as_deref() == region)
        .collect();
    if !for_region.is_empty() || region.is_none() {
        return for_region;
    }
    snap.home_pages
        .iter()
        .filter(|hp| hp.sponsor_id == sponsor_id && hp.region.is_none())
        .collect()
}

/// The newest directory version, if it is numerically ahead of the client's
/// reported version. Versions compare as integers, never lexicographically;
/// an unparseable version on either side yields no upgrade.
pub fn upgrade_version<'a>(snap: &'a DirectorySnapshot, client_version: &str) -> Option<&'a str> {
    let newest = snap.latest_version()?;
    let newest_ordinal: i64 = newest.client_version.parse().ok()?;
    let reported: i64 = match client_version.parse() {
        Ok(v) => v,
        Err(_) => {
            debug!(client_version, "unparseable client version, no upgrade");
            return None;
        }
    };
    (newest_ordinal > reported).then_some(newest.client_version.as_str())
}

/// Hex wire token for one server row.
pub fn encoded_entry(server: &Server) -> String {
    encode_server_entry(&ServerEntry {
        ip_address: server.ip_address.clone(),
        web_server_port: server.web_server_port,
        web_server_secret: server.web_server_secret.clone(),
        web_server_certificate: server.web_server_certificate.clone(),
    })
}

/// The embedded (permanently-known) encoded entries for a client, used when
/// producing client distributions.
pub fn embedded_entries(snap: &DirectorySnapshot, client_id: &str) -> Vec<String> {
    discovery::embedded_servers(snap, client_id)
        .into_iter()
        .map(encoded_entry)
        .collect()
}

/// Compose the full handshake response for one request at instant `at`.
///
/// Line order is significant: home pages, then the upgrade notice, then
/// server disclosures. A failed or absent region lookup degrades to the
/// sponsor's default pages.
pub fn handshake(
    snap: &DirectorySnapshot,
    resolver: &dyn RegionResolver,
    request: &HandshakeRequest,
    at: NaiveDateTime,
) -> HandshakeResponse {
    let region = resolver.resolve(request.client_ip);
    let mut lines = Vec::new();
    for home_page in sponsor_home_pages(snap, &request.sponsor_id, region.as_deref()) {
        lines.push(format!("{HOMEPAGE_PREFIX}{}", home_page.home_page_url));
    }
    if let Some(version) = upgrade_version(snap, &request.client_version) {
        lines.push(format!("{UPGRADE_PREFIX}{version}"));
    }
    for server in discovery::discovery_servers(snap, &request.client_id, request.client_ip, at) {
        lines.push(format!("{SERVER_PREFIX}{}", encoded_entry(server)));
    }
    HandshakeResponse { lines }
}
