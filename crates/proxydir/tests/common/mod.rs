//! Shared directory fixture for integration tests.
//!
//! One mid-sized deployment: two hosts, three clients, a mix of embedded,
//! windowed, elapsed, reserved, and always-live servers, two sponsors with
//! regional and default home pages, and two versions.

use proxydir_storage::schema::{
    CLIENTS_COLUMNS, HOME_PAGES_COLUMNS, HOSTS_COLUMNS, SERVERS_COLUMNS, SPONSORS_COLUMNS,
    VERSIONS_COLUMNS,
};
use proxydir_storage::{DirectorySnapshot, DirectoryStore, Sheet, Workbook};

pub const WEB_SECRET: &str = "FEDCBA9876543210";

fn cells(row: &[&str]) -> Vec<String> {
    row.iter().map(|c| c.to_string()).collect()
}

fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

pub fn fixture_workbook() -> Workbook {
    let mut wb = Workbook::default();
    wb.push_sheet(Sheet::new(
        "Clients",
        vec![
            header(&CLIENTS_COLUMNS),
            cells(&["C1", "email,web", "first client build"]),
            cells(&["C2", "torrent", ""]),
            cells(&["C3", "", ""]),
        ],
    ));
    wb.push_sheet(Sheet::new(
        "Hosts",
        vec![
            header(&HOSTS_COLUMNS),
            cells(&["host-1", "192.168.1.10", "ops", "hunter2", "ssh-rsa AAAA", ""]),
            cells(&["host-2", "192.168.1.20", "ops", "hunter3", "ssh-rsa BBBB", ""]),
        ],
    ));
    wb.push_sheet(Sheet::new(
        "Servers",
        vec![
            header(&SERVERS_COLUMNS),
            cells(&[
                "ubunix electrows uplore",
                "host-1",
                "10.0.0.1",
                "8080",
                "SEC1",
                "CERT-A",
                "",
                "C1",
                "",
                "",
                "",
            ]),
            cells(&[
                "engual malet uplore",
                "host-1",
                "10.0.0.2",
                "8080",
                "SEC2",
                "CERT-B",
                "KEY-B",
                "C1",
                "2011-05-16",
                "2011-05-23",
                "",
            ]),
            cells(&[
                "hareware zinink randowser",
                "host-2",
                "10.0.0.3",
                "8080",
                "SEC3",
                "CERT-C",
                "",
                "C1",
                "2011-05-16",
                "2011-05-23",
                "",
            ]),
            cells(&[
                "dentops wexware lunis",
                "host-2",
                "10.0.0.4",
                "8080",
                "SEC4",
                "CERT-D",
                "",
                "C2",
                "",
                "",
                "",
            ]),
            cells(&[
                "morgo vintalic sampline",
                "host-1",
                "10.0.0.5",
                "8080",
                "SEC5",
                "CERT-E",
                "",
                "C2",
                "2011-04-01",
                "2011-04-08",
                "",
            ]),
            cells(&[
                "resic quarone hitecus",
                "host-2",
                "10.0.0.6",
                "8080",
                "SEC6",
                "CERT-F",
                "",
                "",
                "",
                "",
                "",
            ]),
            cells(&[
                "bantion craxel ferode",
                "host-1",
                "10.0.0.7",
                "8080",
                "SEC7",
                "CERT-G",
                "",
                "C3",
                "2000-01-01",
                "2100-01-01",
                "",
            ]),
        ],
    ));
    wb.push_sheet(Sheet::new(
        "Sponsors",
        vec![
            header(&SPONSORS_COLUMNS),
            cells(&["SP1", "banner1.png", ""]),
            cells(&["SP2", "banner2.png", ""]),
        ],
    ));
    wb.push_sheet(Sheet::new(
        "Home_Pages",
        vec![
            header(&HOME_PAGES_COLUMNS),
            cells(&["SP1", "CA", "http://example.com/ca-1", ""]),
            cells(&["SP1", "CA", "http://example.com/ca-2", ""]),
            cells(&["SP1", "", "http://example.com/default", ""]),
            cells(&["SP2", "US", "http://other.example.com/us", ""]),
        ],
    ));
    wb.push_sheet(Sheet::new(
        "Versions",
        vec![header(&VERSIONS_COLUMNS), cells(&["1", ""]), cells(&["2", ""])],
    ));
    wb
}

pub fn fixture_store() -> DirectoryStore {
    DirectoryStore::in_memory(fixture_workbook())
}

pub fn fixture_snapshot() -> DirectorySnapshot {
    fixture_store()
        .snapshot()
        .expect("fixture workbook must parse")
}
