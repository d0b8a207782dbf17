//! Discovery bucketing
//!
//! Decides which server rows a client may learn. Two disjoint modes:
//!
//! - **embedded**: the permanently-known set baked into a client build -
//!   every server assigned to the client with no discovery window;
//! - **discovery**: at live handshake time, the servers assigned to the
//!   client whose window is open right now form the candidate set; the
//!   requester's IPv4 address picks exactly one of them.
//!
//! The bucket count equals the candidate-set size, so each observer sees at
//! most one server of the live rotation and different addresses see
//! different partial views. This is a disclosure-limiting trade-off, not
//! cryptography: as the live set shrinks the mapping degrades toward
//! revealing everything, which is accepted and documented behavior.

use std::net::{IpAddr, Ipv4Addr};

use chrono::NaiveDateTime;
use proxydir_storage::{DirectorySnapshot, Server};

/// Servers permanently known to `client_id`: assigned to it and not
/// time-gated. Unknown client ids yield an empty set.
pub fn embedded_servers<'a>(snap: &'a DirectorySnapshot, client_id: &str) -> Vec<&'a Server> {
    snap.servers
        .iter()
        .filter(|s| s.discovery_client_id.as_deref() == Some(client_id))
        .filter(|s| s.discovery_window.is_none())
        .collect()
}

/// Servers disclosed to `client_id` from `client_addr` at instant `at`.
///
/// The candidate set is every server assigned to the client whose window
/// contains `at`, in sheet row order; the requester address selects one
/// bucket from it. Requesters without an IPv4 identity (IPv6 that is not
/// IPv4-mapped) learn nothing.
pub fn discovery_servers<'a>(
    snap: &'a DirectorySnapshot,
    client_id: &str,
    client_addr: IpAddr,
    at: NaiveDateTime,
) -> Vec<&'a Server> {
    let candidates: Vec<&Server> = snap
        .servers
        .iter()
        .filter(|s| s.discovery_client_id.as_deref() == Some(client_id))
        .filter(|s| s.discovery_window.is_some_and(|w| w.contains(at)))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }
    let Some(addr) = ipv4_identity(client_addr) else {
        return Vec::new();
    };
    let bucket = bucket_index(addr, candidates.len());
    vec![candidates[bucket]]
}

/// The IPv4 identity of a requester address, unwrapping IPv4-mapped IPv6.
pub fn ipv4_identity(addr: IpAddr) -> Option<Ipv4Addr> {
    match addr {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// Deterministic bucket: the address's 32-bit big-endian value mod the
/// candidate count.
fn bucket_index(addr: Ipv4Addr, bucket_count: usize) -> usize {
    u32::from(addr) as usize % bucket_count
}
