//! Sheet schemas and typed rows
//!
//! The directory is six named sheets with fixed column headers. A read
//! validates the header of every sheet it touches against the expected
//! column list; any difference is a `SchemaMismatch` and the read aborts.
//!
//! Cell conventions: an empty string is an absent value; dates are
//! `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

pub const CLIENTS_SHEET: &str = "Clients";
pub const CLIENTS_COLUMNS: [&str; 3] = ["Client_ID", "Propagation_Channels", "Notes"];

pub const HOSTS_SHEET: &str = "Hosts";
pub const HOSTS_COLUMNS: [&str; 6] = [
    "Host_ID",
    "IP_Address",
    "SSH_Username",
    "SSH_Password",
    "SSH_Host_Key",
    "Notes",
];

pub const SERVERS_SHEET: &str = "Servers";
pub const SERVERS_COLUMNS: [&str; 11] = [
    "Server_ID",
    "Host_ID",
    "IP_Address",
    "Web_Server_Port",
    "Web_Server_Secret",
    "Web_Server_Certificate",
    "Web_Server_Private_Key",
    "Discovery_Client_ID",
    "Discovery_Time_Start",
    "Discovery_Time_End",
    "Notes",
];

pub const SPONSORS_SHEET: &str = "Sponsors";
pub const SPONSORS_COLUMNS: [&str; 3] = ["Sponsor_ID", "Banner_Filename", "Notes"];

pub const HOME_PAGES_SHEET: &str = "Home_Pages";
pub const HOME_PAGES_COLUMNS: [&str; 4] = ["Sponsor_ID", "Region", "Home_Page_URL", "Notes"];

pub const VERSIONS_SHEET: &str = "Versions";
pub const VERSIONS_COLUMNS: [&str; 2] = ["Client_Version", "Notes"];

/// The six directory tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Clients,
    Hosts,
    Servers,
    Sponsors,
    HomePages,
    Versions,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Clients,
        Table::Hosts,
        Table::Servers,
        Table::Sponsors,
        Table::HomePages,
        Table::Versions,
    ];

    pub fn sheet_name(self) -> &'static str {
        match self {
            Table::Clients => CLIENTS_SHEET,
            Table::Hosts => HOSTS_SHEET,
            Table::Servers => SERVERS_SHEET,
            Table::Sponsors => SPONSORS_SHEET,
            Table::HomePages => HOME_PAGES_SHEET,
            Table::Versions => VERSIONS_SHEET,
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Clients => &CLIENTS_COLUMNS,
            Table::Hosts => &HOSTS_COLUMNS,
            Table::Servers => &SERVERS_COLUMNS,
            Table::Sponsors => &SPONSORS_COLUMNS,
            Table::HomePages => &HOME_PAGES_COLUMNS,
            Table::Versions => &VERSIONS_COLUMNS,
        }
    }

    /// Resolve a sheet name to its table, for callers taking names as input.
    pub fn from_sheet_name(name: &str) -> Option<Table> {
        Table::ALL.iter().copied().find(|t| t.sheet_name() == name)
    }
}

/// Parse a date cell, accepting a bare date or a date with time.
pub fn parse_datetime(cell: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| format!("unparseable date {cell:?}"))
}

/// Format a date cell; midnight timestamps collapse to the bare date.
pub fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// The half-open interval during which a server may be disclosed to its
/// assigned client via live discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DiscoveryWindow {
    /// Whether the window is open at `at` (`start <= at < end`).
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }

    /// Whether the window has fully elapsed as of `at`.
    pub fn elapsed_by(&self, at: NaiveDateTime) -> bool {
        self.end <= at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub client_id: String,
    pub propagation_channels: BTreeSet<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub host_id: String,
    pub ip_address: String,
    pub ssh_username: Option<String>,
    pub ssh_password: Option<String>,
    pub ssh_host_key: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub server_id: Option<String>,
    pub host_id: String,
    pub ip_address: String,
    pub web_server_port: u16,
    pub web_server_secret: String,
    pub web_server_certificate: String,
    pub web_server_private_key: Option<String>,
    /// Client this server may be disclosed to. `None` means the server is
    /// reserved: disclosed through no channel.
    pub discovery_client_id: Option<String>,
    /// `None` means permanently embedded (when a discovery client is set).
    pub discovery_window: Option<DiscoveryWindow>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sponsor {
    pub sponsor_id: String,
    pub banner_filename: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    pub sponsor_id: String,
    /// `None` is the sponsor's default page, served when no region matches.
    pub region: Option<String>,
    pub home_page_url: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Ordinal version token; the Versions sheet is ascending, last is newest.
    pub client_version: String,
    pub notes: Option<String>,
}

fn cell(row: &[String], idx: usize) -> Option<&str> {
    match row[idx].as_str() {
        "" => None,
        s => Some(s),
    }
}

fn required(row: &[String], table: Table, idx: usize) -> Result<String, String> {
    cell(row, idx)
        .map(str::to_string)
        .ok_or_else(|| format!("column {} must not be empty", table.columns()[idx]))
}

fn parse_window(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<DiscoveryWindow>, String> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(s), Some(e)) => {
            let start = parse_datetime(s)?;
            let end = parse_datetime(e)?;
            if start < end {
                Ok(Some(DiscoveryWindow { start, end }))
            } else {
                Err(format!(
                    "discovery window start {s:?} is not before end {e:?}"
                ))
            }
        }
        _ => Err("discovery window requires both start and end, or neither".to_string()),
    }
}

impl Client {
    pub(crate) fn from_row(row: &[String]) -> Result<Self, String> {
        let channels = cell(row, 1)
            .map(|c| {
                c.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Client {
            client_id: required(row, Table::Clients, 0)?,
            propagation_channels: channels,
            notes: cell(row, 2).map(str::to_string),
        })
    }
}

impl Host {
    pub(crate) fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(Host {
            host_id: required(row, Table::Hosts, 0)?,
            ip_address: required(row, Table::Hosts, 1)?,
            ssh_username: cell(row, 2).map(str::to_string),
            ssh_password: cell(row, 3).map(str::to_string),
            ssh_host_key: cell(row, 4).map(str::to_string),
            notes: cell(row, 5).map(str::to_string),
        })
    }
}

impl Server {
    pub(crate) fn from_row(row: &[String]) -> Result<Self, String> {
        let port_cell = required(row, Table::Servers, 3)?;
        let web_server_port = port_cell
            .parse::<u16>()
            .map_err(|_| format!("invalid Web_Server_Port {port_cell:?}"))?;
        Ok(Server {
            server_id: cell(row, 0).map(str::to_string),
            // Blank in per-host exports; populated in the central directory.
            host_id: cell(row, 1).map(str::to_string).unwrap_or_default(),
            ip_address: required(row, Table::Servers, 2)?,
            web_server_port,
            web_server_secret: required(row, Table::Servers, 4)?,
            web_server_certificate: required(row, Table::Servers, 5)?,
            web_server_private_key: cell(row, 6).map(str::to_string),
            discovery_client_id: cell(row, 7).map(str::to_string),
            discovery_window: parse_window(cell(row, 8), cell(row, 9))?,
            notes: cell(row, 10).map(str::to_string),
        })
    }
}

impl Sponsor {
    pub(crate) fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(Sponsor {
            sponsor_id: required(row, Table::Sponsors, 0)?,
            banner_filename: cell(row, 1).map(str::to_string),
            notes: cell(row, 2).map(str::to_string),
        })
    }
}

impl HomePage {
    pub(crate) fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(HomePage {
            sponsor_id: required(row, Table::HomePages, 0)?,
            region: cell(row, 1).map(str::to_string),
            home_page_url: required(row, Table::HomePages, 2)?,
            notes: cell(row, 3).map(str::to_string),
        })
    }
}

impl Version {
    pub(crate) fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(Version {
            client_version: required(row, Table::Versions, 0)?,
            notes: cell(row, 1).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_date_parsing_accepts_both_forms() {
        let bare = parse_datetime("2011-05-16").unwrap();
        assert_eq!(bare.time(), NaiveTime::MIN);
        let full = parse_datetime("2011-05-16 13:45:00").unwrap();
        assert_eq!(format_datetime(full), "2011-05-16 13:45:00");
        assert_eq!(format_datetime(bare), "2011-05-16");
        assert!(parse_datetime("16/05/2011").is_err());
    }

    #[test]
    fn test_window_requires_both_bounds() {
        assert!(parse_window(Some("2011-05-16"), None).is_err());
        assert!(parse_window(None, Some("2011-05-23")).is_err());
        assert!(parse_window(None, None).unwrap().is_none());
        let window = parse_window(Some("2011-05-16"), Some("2011-05-23"))
            .unwrap()
            .unwrap();
        assert!(window.start < window.end);
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        assert!(parse_window(Some("2011-05-23"), Some("2011-05-16")).is_err());
        assert!(parse_window(Some("2011-05-16"), Some("2011-05-16")).is_err());
    }

    #[test]
    fn test_window_half_open_contains() {
        let window = parse_window(Some("2011-05-16"), Some("2011-05-23"))
            .unwrap()
            .unwrap();
        assert!(window.contains(parse_datetime("2011-05-16").unwrap()));
        assert!(window.contains(parse_datetime("2011-05-22 23:59:59").unwrap()));
        assert!(!window.contains(parse_datetime("2011-05-23").unwrap()));
        assert!(!window.contains(parse_datetime("2011-05-15").unwrap()));
        assert!(window.elapsed_by(parse_datetime("2011-05-23").unwrap()));
        assert!(!window.elapsed_by(parse_datetime("2011-05-22").unwrap()));
    }

    #[test]
    fn test_client_channels_parse_as_set() {
        let client = Client::from_row(&row(&["C1", "email, web ,email", "note"])).unwrap();
        assert_eq!(client.propagation_channels.len(), 2);
        assert!(client.propagation_channels.contains("email"));
        assert!(client.propagation_channels.contains("web"));

        let bare = Client::from_row(&row(&["C2", "", ""])).unwrap();
        assert!(bare.propagation_channels.is_empty());
        assert!(bare.notes.is_none());
    }

    #[test]
    fn test_server_row_parses_empty_cells_as_none() {
        let server = Server::from_row(&row(&[
            "", "host-1", "10.0.0.1", "8080", "SECRET", "CERT", "", "", "", "", "",
        ]))
        .unwrap();
        assert!(server.server_id.is_none());
        assert!(server.web_server_private_key.is_none());
        assert!(server.discovery_client_id.is_none());
        assert!(server.discovery_window.is_none());
    }

    #[test]
    fn test_server_row_rejects_bad_port() {
        let result = Server::from_row(&row(&[
            "s", "host-1", "10.0.0.1", "eighty", "SECRET", "CERT", "", "", "", "", "",
        ]));
        assert!(result.unwrap_err().contains("Web_Server_Port"));
    }

    #[test]
    fn test_server_row_rejects_half_window() {
        let result = Server::from_row(&row(&[
            "s", "host-1", "10.0.0.1", "80", "SECRET", "CERT", "", "C1", "2011-05-16", "", "",
        ]));
        assert!(result.unwrap_err().contains("both start and end"));
    }

    #[test]
    fn test_table_name_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_sheet_name(table.sheet_name()), Some(table));
        }
        assert_eq!(Table::from_sheet_name("Hosts "), None);
    }
}
