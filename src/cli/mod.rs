// src/cli/mod.rs — CLI definition (clap derive)

pub mod render;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rollout-outreach",
    about = "Look up pending rollout stores and message them from one reusable tab",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Backend base URL (overrides backend.base_url)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Upload the rollout and/or store spreadsheets
    Upload {
        /// Rollout control spreadsheet (sent as `rollout`)
        #[arg(long)]
        rollout: Option<PathBuf>,
        /// Store data spreadsheet (sent as `lojas`)
        #[arg(long)]
        lojas: Option<PathBuf>,
    },
    /// Look up a store's rollout status
    Lookup {
        /// Store number; padded to three digits
        number: String,
        /// Open the messaging tab when the store needs contact
        #[arg(long)]
        contact: bool,
        /// Register the send after the lookup
        #[arg(long)]
        log: bool,
    },
    /// Download the send-log report
    Report {
        /// Output file (defaults to a timestamped name in the working directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactive session: lookups, contact and log share state
    Shell,
}
