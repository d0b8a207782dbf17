//! Administrative CLI
//!
//! Everything an operator does against the directory: validation, embedded
//! server lists for client builds, handshake dry runs, per-host export
//! files for deployment, keyed updates for secret/certificate rotation, and
//! running the handshake listener.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use proxydir_common::validation::validate_entity_id;
use proxydir_storage::{DirectoryStore, RowUpdate, Table};

use crate::directory::handshake::{embedded_entries, handshake, HandshakeRequest};
use crate::export::{export_all_hosts, write_host_export};
use crate::region::UnavailableResolver;
use crate::server;
use crate::server::config::Config;

#[derive(Parser)]
#[command(name = "proxydir")]
#[command(about = "Proxy network directory: discovery, handshakes, per-host exports", long_about = None)]
pub struct Cli {
    /// Path to the directory workbook file
    #[arg(long, global = true, default_value = "directory.json")]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read and schema-check every sheet of the directory
    Validate,

    /// Print the embedded (permanently-known) server entries for a client
    Embed {
        #[arg(long)]
        client_id: String,
    },

    /// Dry-run a handshake locally and print the response body
    Handshake {
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        sponsor_id: String,
        #[arg(long)]
        client_version: String,
        /// Requester address to bucket with
        #[arg(long)]
        client_ip: IpAddr,
    },

    /// Write compartmentalized export files for deployment
    Export {
        /// Export a single host to this file
        #[arg(long, conflicts_with = "all")]
        host_id: Option<String>,
        /// Export every host into --out as a directory
        #[arg(long)]
        all: bool,
        /// Output file (single host) or directory (--all)
        #[arg(long)]
        out: PathBuf,
    },

    /// Apply keyed partial-row updates to one sheet
    Update {
        /// Sheet name, e.g. Servers
        #[arg(long)]
        sheet: String,
        /// Column the key matches against, e.g. IP_Address
        #[arg(long)]
        key_column: String,
        /// Key value identifying the target row
        #[arg(long)]
        key: String,
        /// Column=value assignments, repeatable
        #[arg(long = "set", value_name = "COLUMN=VALUE")]
        sets: Vec<String>,
    },

    /// Run the handshake web listener
    Serve {
        #[arg(long)]
        config: PathBuf,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate => {
            let store = DirectoryStore::open(&cli.store);
            let snap = store.snapshot().context("directory failed validation")?;
            println!(
                "ok: {} clients, {} hosts, {} servers, {} sponsors, {} home pages, {} versions",
                snap.clients.len(),
                snap.hosts.len(),
                snap.servers.len(),
                snap.sponsors.len(),
                snap.home_pages.len(),
                snap.versions.len()
            );
            Ok(())
        }

        Command::Embed { client_id } => {
            validate_entity_id(&client_id)?;
            let snap = DirectoryStore::open(&cli.store).snapshot()?;
            for entry in embedded_entries(&snap, &client_id) {
                println!("{entry}");
            }
            Ok(())
        }

        Command::Handshake {
            client_id,
            sponsor_id,
            client_version,
            client_ip,
        } => {
            validate_entity_id(&client_id)?;
            validate_entity_id(&sponsor_id)?;
            let snap = DirectoryStore::open(&cli.store).snapshot()?;
            let request = HandshakeRequest {
                client_ip,
                client_id,
                sponsor_id,
                client_version,
            };
            let response = handshake(&snap, &UnavailableResolver, &request, Utc::now().naive_utc());
            println!("{}", response.into_body());
            Ok(())
        }

        Command::Export { host_id, all, out } => {
            let snap = DirectoryStore::open(&cli.store).snapshot()?;
            let at = Utc::now().naive_utc();
            match (host_id, all) {
                (Some(host_id), false) => {
                    validate_entity_id(&host_id)?;
                    write_host_export(&snap, &host_id, at, &out)?;
                    println!("{}", out.display());
                }
                (None, true) => {
                    for path in export_all_hosts(&snap, at, &out)? {
                        println!("{}", path.display());
                    }
                }
                _ => bail!("pass exactly one of --host-id or --all"),
            }
            Ok(())
        }

        Command::Update {
            sheet,
            key_column,
            key,
            sets,
        } => {
            let Some(table) = Table::from_sheet_name(&sheet) else {
                bail!("unknown sheet {sheet:?}");
            };
            if sets.is_empty() {
                bail!("at least one --set COLUMN=VALUE is required");
            }
            let parsed: Vec<(String, String)> = sets
                .iter()
                .map(|s| {
                    s.split_once('=')
                        .map(|(c, v)| (c.to_string(), v.to_string()))
                        .with_context(|| format!("malformed --set {s:?}, expected COLUMN=VALUE"))
                })
                .collect::<Result<_>>()?;
            let store = DirectoryStore::open(&cli.store);
            store.update(table, &[RowUpdate::new(key_column, key, parsed)])?;
            println!("updated 1 row in {sheet}");
            Ok(())
        }

        Command::Serve { config } => {
            let config = Config::load(&config)?;
            server::run(config).await?;
            Ok(())
        }
    }
}
