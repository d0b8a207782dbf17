//! Consistent directory view
//!
//! A `DirectorySnapshot` is the parse of one workbook load: all six sheets,
//! schema-validated and typed. Handshake and export operations read only
//! from a snapshot, so a single operation never observes a half-applied
//! administrative update across tables.

use crate::error::StoreError;
use crate::schema::{
    Client, HomePage, Host, Server, Sponsor, Table, Version,
};
use crate::workbook::Workbook;

/// Typed contents of the whole directory at one instant.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub clients: Vec<Client>,
    pub hosts: Vec<Host>,
    pub servers: Vec<Server>,
    pub sponsors: Vec<Sponsor>,
    pub home_pages: Vec<HomePage>,
    pub versions: Vec<Version>,
}

impl DirectorySnapshot {
    /// Parse and validate every sheet of a workbook.
    ///
    /// Fails with `MissingSheet`/`SchemaMismatch` on structural problems and
    /// `InvalidRow` on the first row that violates a data invariant
    /// (half-set discovery windows, unparseable ports or dates, empty
    /// required cells).
    pub fn parse(workbook: &Workbook) -> Result<Self, StoreError> {
        Ok(DirectorySnapshot {
            clients: parse_sheet(workbook, Table::Clients, Client::from_row)?,
            hosts: parse_sheet(workbook, Table::Hosts, Host::from_row)?,
            servers: parse_sheet(workbook, Table::Servers, Server::from_row)?,
            sponsors: parse_sheet(workbook, Table::Sponsors, Sponsor::from_row)?,
            home_pages: parse_sheet(workbook, Table::HomePages, HomePage::from_row)?,
            versions: parse_sheet(workbook, Table::Versions, Version::from_row)?,
        })
    }

    pub fn client(&self, client_id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.client_id == client_id)
    }

    pub fn host(&self, host_id: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.host_id == host_id)
    }

    pub fn sponsor(&self, sponsor_id: &str) -> Option<&Sponsor> {
        self.sponsors.iter().find(|s| s.sponsor_id == sponsor_id)
    }

    /// The newest version row; the Versions sheet is ascending by table order.
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.last()
    }
}

/// Validate a sheet's presence and header, then parse its data rows.
pub(crate) fn check_sheet<'wb>(
    workbook: &'wb Workbook,
    table: Table,
) -> Result<&'wb [Vec<String>], StoreError> {
    let name = table.sheet_name();
    let sheet = workbook
        .sheet(name)
        .ok_or(StoreError::MissingSheet { sheet: name })?;
    let expected: Vec<String> = table.columns().iter().map(|c| c.to_string()).collect();
    let found = sheet.header().unwrap_or(&[]);
    if found != expected.as_slice() {
        return Err(StoreError::SchemaMismatch {
            sheet: name,
            expected,
            found: found.to_vec(),
        });
    }
    Ok(sheet.data_rows())
}

fn parse_sheet<T>(
    workbook: &Workbook,
    table: Table,
    from_row: impl Fn(&[String]) -> Result<T, String>,
) -> Result<Vec<T>, StoreError> {
    let rows = check_sheet(workbook, table)?;
    let width = table.columns().len();
    let mut parsed = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        // Data row numbering starts at 1, below the header.
        let row_number = i + 1;
        if row.len() != width {
            return Err(StoreError::InvalidRow {
                sheet: table.sheet_name(),
                row: row_number,
                reason: format!("expected {width} cells, found {}", row.len()),
            });
        }
        parsed.push(from_row(row).map_err(|reason| StoreError::InvalidRow {
            sheet: table.sheet_name(),
            row: row_number,
            reason,
        })?);
    }
    Ok(parsed)
}
