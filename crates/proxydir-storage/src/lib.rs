//! Directory store for proxydir
//!
//! Schema-validated access to the six directory sheets (Clients, Hosts,
//! Servers, Sponsors, Home_Pages, Versions) held in a single workbook file.
//!
//! # Architecture
//!
//! - [`Workbook`] / [`Sheet`] - raw named tables of string cells
//! - [`backends`] - whole-workbook load/replace behind [`WorkbookBackend`]
//! - [`DirectorySnapshot`] - one consistent, typed parse of all sheets
//! - [`DirectoryStore`] - the handle: `snapshot()` plus keyed `update()`
//!
//! # Examples
//!
//! ```no_run
//! use proxydir_storage::DirectoryStore;
//!
//! # fn example() -> Result<(), proxydir_storage::StoreError> {
//! let store = DirectoryStore::open("/var/lib/proxydir/directory.json");
//! let snapshot = store.snapshot()?;
//! println!("{} servers", snapshot.servers.len());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod schema;
mod snapshot;
mod store;
mod workbook;

pub mod backends;

pub use backends::WorkbookBackend;
pub use error::StoreError;
pub use schema::{
    Client, DiscoveryWindow, HomePage, Host, Server, Sponsor, Table, Version,
};
pub use snapshot::DirectorySnapshot;
pub use store::{DirectoryStore, RowUpdate};
pub use workbook::{Sheet, Workbook};
