//! Handshake wire format
//!
//! A handshake response body is a sequence of newline-joined lines:
//!
//! ```text
//! Homepage: <url>
//! Upgrade: <version>
//! Server: <hex(ip " " port " " secret " " certificate)>
//! ```
//!
//! A server entry travels as one hex token: the four fields joined by single
//! spaces, then hex-encoded. Consumers hex-decode and split on spaces. The
//! fields are opaque space-free tokens (addresses, ports, secrets, PEM bodies
//! with whitespace stripped), so the split is unambiguous.

use thiserror::Error;

/// Line prefix for sponsor home pages.
pub const HOMEPAGE_PREFIX: &str = "Homepage: ";
/// Line prefix for the upgrade version, at most one per response.
pub const UPGRADE_PREFIX: &str = "Upgrade: ";
/// Line prefix for encoded server entries.
pub const SERVER_PREFIX: &str = "Server: ";

/// Number of space-separated fields in a decoded server entry.
const ENTRY_FIELDS: usize = 4;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("decoded entry is not valid UTF-8")]
    InvalidUtf8,

    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid web server port: {0:?}")]
    InvalidPort(String),
}

/// The connection parameters a client needs to reach one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub ip_address: String,
    pub web_server_port: u16,
    pub web_server_secret: String,
    pub web_server_certificate: String,
}

/// Encode a server entry into its hex wire form.
pub fn encode_server_entry(entry: &ServerEntry) -> String {
    hex::encode(format!(
        "{} {} {} {}",
        entry.ip_address,
        entry.web_server_port,
        entry.web_server_secret,
        entry.web_server_certificate
    ))
}

/// Decode a hex wire token back into a server entry.
///
/// Fails if the token is not hex, the decoded bytes are not UTF-8, the field
/// count is wrong, or the port is not a valid u16.
pub fn decode_server_entry(encoded: &str) -> Result<ServerEntry, WireError> {
    let raw = hex::decode(encoded)?;
    let text = String::from_utf8(raw).map_err(|_| WireError::InvalidUtf8)?;
    let fields: Vec<&str> = text.split(' ').collect();
    if fields.len() != ENTRY_FIELDS {
        return Err(WireError::FieldCount(fields.len()));
    }
    let web_server_port = fields[1]
        .parse::<u16>()
        .map_err(|_| WireError::InvalidPort(fields[1].to_string()))?;
    Ok(ServerEntry {
        ip_address: fields[0].to_string(),
        web_server_port,
        web_server_secret: fields[2].to_string(),
        web_server_certificate: fields[3].to_string(),
    })
}
