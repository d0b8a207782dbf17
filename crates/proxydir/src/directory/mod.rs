//! Disclosure logic over a directory snapshot
//!
//! Three pieces, each a set of pure functions over
//! [`proxydir_storage::DirectorySnapshot`]:
//!
//! - [`discovery`] - which servers a client may learn, embedded or live
//! - [`handshake`] - the wire response for one client request
//! - [`compartment`] - the need-to-know directory slice for one host

pub mod compartment;
pub mod discovery;
pub mod handshake;
