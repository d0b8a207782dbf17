//! Per-host export files
//!
//! Serializes a [`HostExport`] into a workbook with exactly four sheets -
//! Clients, Servers, Home_Pages, Versions - and writes it atomically. The
//! Hosts and Sponsors sheets are never written; `Host_ID` and `Notes`
//! columns are present but blank. Dates serialize as `YYYY-MM-DD`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use proxydir_storage::backends::{JsonFileBackend, WorkbookBackend};
use proxydir_storage::schema::{
    format_datetime, CLIENTS_COLUMNS, CLIENTS_SHEET, HOME_PAGES_COLUMNS, HOME_PAGES_SHEET,
    SERVERS_COLUMNS, SERVERS_SHEET, VERSIONS_COLUMNS, VERSIONS_SHEET,
};
use proxydir_storage::{DirectorySnapshot, Sheet, StoreError, Workbook};
use thiserror::Error;
use tracing::info;

use crate::directory::compartment::{host_export, HostExport};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Write(#[from] StoreError),

    #[error("I/O error preparing export directory: {0}")]
    Io(#[from] std::io::Error),
}

fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

fn date_cell(date: Option<NaiveDateTime>) -> String {
    date.map(format_datetime).unwrap_or_default()
}

/// Lay a host export out as a four-sheet workbook.
pub fn export_workbook(export: &HostExport) -> Workbook {
    let mut clients = vec![header(&CLIENTS_COLUMNS)];
    for client in &export.clients {
        // Propagation channels and notes are blanked for deployment.
        clients.push(vec![client.client_id.clone(), String::new(), String::new()]);
    }

    let mut servers = vec![header(&SERVERS_COLUMNS)];
    for server in &export.servers {
        servers.push(vec![
            server.server_id.clone().unwrap_or_default(),
            String::new(), // Host_ID
            server.ip_address.clone(),
            server.web_server_port.to_string(),
            server.web_server_secret.clone(),
            server.web_server_certificate.clone(),
            server.web_server_private_key.clone().unwrap_or_default(),
            server.discovery_client_id.clone().unwrap_or_default(),
            date_cell(server.discovery_window.map(|w| w.start)),
            date_cell(server.discovery_window.map(|w| w.end)),
            String::new(), // Notes
        ]);
    }

    let mut home_pages = vec![header(&HOME_PAGES_COLUMNS)];
    for page in &export.home_pages {
        home_pages.push(vec![
            page.sponsor_id.clone(),
            page.region.clone().unwrap_or_default(),
            page.home_page_url.clone(),
            String::new(), // Notes
        ]);
    }

    let mut versions = vec![header(&VERSIONS_COLUMNS)];
    for version in &export.versions {
        versions.push(vec![version.client_version.clone(), String::new()]);
    }

    Workbook {
        sheets: vec![
            Sheet::new(CLIENTS_SHEET, clients),
            Sheet::new(SERVERS_SHEET, servers),
            Sheet::new(HOME_PAGES_SHEET, home_pages),
            Sheet::new(VERSIONS_SHEET, versions),
        ],
    }
}

/// Compartmentalize the directory for one host and write its export file.
pub fn write_host_export(
    snap: &DirectorySnapshot,
    host_id: &str,
    at: NaiveDateTime,
    path: &Path,
) -> Result<(), ExportError> {
    let export = host_export(snap, host_id, at);
    let workbook = export_workbook(&export);
    JsonFileBackend::new(path).replace(&workbook)?;
    info!(
        host_id,
        clients = export.clients.len(),
        servers = export.servers.len(),
        path = %path.display(),
        "wrote host export"
    );
    Ok(())
}

/// One export file per host row, named `<host_id>.json`, for a deployment
/// cycle. Returns the written paths.
pub fn export_all_hosts(
    snap: &DirectorySnapshot,
    at: NaiveDateTime,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(snap.hosts.len());
    for host in &snap.hosts {
        let path = out_dir.join(format!("{}.json", host.host_id));
        write_host_export(snap, &host.host_id, at, &path)?;
        written.push(path);
    }
    Ok(written)
}
