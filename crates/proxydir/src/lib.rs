//! proxydir: proxy network directory
//!
//! Derives two things from a central directory of proxy servers, clients,
//! sponsors, and localized home pages:
//!
//! - a per-client **handshake response** listing the servers, home pages,
//!   and upgrade that client may learn right now ([`directory::handshake`]);
//! - a per-host **compartmentalized export** holding only the slice of the
//!   directory that host needs to operate ([`directory::compartment`],
//!   [`export`]).
//!
//! Clients learn new servers over time through discovery without any single
//! client or host ever holding the full server list, bounding what a
//! compromised party can enumerate.

pub mod commands;
pub mod directory;
pub mod export;
pub mod region;
pub mod server;
