//! Region lookup capability
//!
//! Mapping a requester address to a region code is an optional external
//! capability. The default implementation is "unavailable" and resolves
//! nothing; deployments with a local mapping can load a [`TableResolver`].
//! Lookup never fails loudly - an address with no known region simply has
//! none, and the handshake falls back to sponsor default pages.

use std::collections::HashMap;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

use proxydir_common::validation::normalize_region;
use thiserror::Error;
use tracing::info;

/// `ip -> region-code | none`. Implementations must be infallible; absence
/// of an answer is the normal case, not an error.
pub trait RegionResolver: Send + Sync {
    fn resolve(&self, addr: IpAddr) -> Option<String>;
}

/// The default capability: no region database is present.
pub struct UnavailableResolver;

impl RegionResolver for UnavailableResolver {
    fn resolve(&self, _addr: IpAddr) -> Option<String> {
        None
    }
}

#[derive(Debug, Error)]
pub enum RegionTableError {
    #[error("failed to read region table: {0}")]
    Io(#[from] std::io::Error),

    #[error("region table is not a valid address map: {0}")]
    Format(#[from] serde_json::Error),

    #[error("invalid address {0:?} in region table")]
    InvalidAddress(String),

    #[error("invalid region code {0:?} in region table")]
    InvalidRegion(String),
}

/// Exact-address region map loaded from a JSON file
/// (`{"203.0.113.7": "CA", ...}`). A stand-in for a real GeoIP provider,
/// which is out of scope; anything implementing [`RegionResolver`] can be
/// swapped in.
pub struct TableResolver {
    entries: HashMap<IpAddr, String>,
}

impl TableResolver {
    pub fn new(entries: HashMap<IpAddr, String>) -> Self {
        Self { entries }
    }

    pub fn from_file(path: &Path) -> Result<Self, RegionTableError> {
        let bytes = fs::read(path)?;
        let raw: HashMap<String, String> = serde_json::from_slice(&bytes)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (addr, region) in raw {
            let addr: IpAddr = addr
                .parse()
                .map_err(|_| RegionTableError::InvalidAddress(addr.clone()))?;
            let region = normalize_region(&region)
                .ok_or_else(|| RegionTableError::InvalidRegion(region.clone()))?;
            entries.insert(addr, region);
        }
        info!(entries = entries.len(), "loaded region table");
        Ok(Self { entries })
    }
}

impl RegionResolver for TableResolver {
    fn resolve(&self, addr: IpAddr) -> Option<String> {
        self.entries.get(&addr).cloned()
    }
}
