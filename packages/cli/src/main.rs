#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Unified CLI entry point for the mailmetrics toolchain.
//!
//! `mailmetrics extract` runs the PDF extraction batch, `mailmetrics
//! serve` starts the dashboard server, and `mailmetrics campaigns` lists
//! the stored campaigns. Invoked without a subcommand, an interactive
//! `dialoguer` menu offers the same three actions.
//!
//! Uses `indicatif-log-bridge` (via [`progress::init_logger`]) to route
//! `log` output through `indicatif::MultiProgress` so that log lines and
//! progress bars never fight for the terminal.

mod interactive;
mod progress;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::MultiProgress;
use mailmetrics_dashboard::rates::{format_count, format_percent, safe_rate};
use mailmetrics_store::{DEFAULT_STORE_DIR, StoreError};

#[derive(Parser)]
#[command(name = "mailmetrics", about = "Email campaign report toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metrics from PDF reports into the campaign store
    Extract {
        /// Directory containing the PDF report files
        #[arg(long, default_value = ".")]
        reports: PathBuf,
        /// Store directory to (over)write
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,
    },
    /// Start the dashboard server over the campaign store
    Serve {
        /// Store directory to serve
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,
        /// Bind address (overrides `BIND_ADDR`, default 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port (overrides `PORT`, default 8080)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List stored campaigns with headline metrics
    Campaigns {
        /// Store directory to read
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi);
    };

    match command {
        Commands::Extract { reports, store } => run_extract(&multi, &reports, &store),
        Commands::Serve { store, bind, port } => run_serve(&store, bind, port),
        Commands::Campaigns { store } => list_campaigns(&store),
    }
}

/// Runs the extraction batch with a progress bar over the report files.
fn run_extract(
    multi: &MultiProgress,
    reports_dir: &Path,
    store_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let bar = progress::IndicatifProgress::files_bar(multi, "Extracting reports");
    let summary = mailmetrics_extract::run_extraction(reports_dir, store_dir, &bar)?;

    if summary.wrote_store {
        println!(
            "Extracted {} campaign(s) and {} location row(s) to {} ({} file(s) skipped).",
            summary.campaigns_written,
            summary.locations_written,
            store_dir.display(),
            summary.files_skipped
        );
    } else if summary.files_found == 0 {
        println!("No PDF files found in {}.", reports_dir.display());
    } else {
        println!(
            "No data could be extracted from {} PDF file(s); store left untouched.",
            summary.files_found
        );
    }

    Ok(())
}

/// Starts the dashboard server, blocking on the Actix system.
fn run_serve(
    store_dir: &Path,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    actix_web::rt::System::new()
        .block_on(mailmetrics_server::run_server(store_dir, bind, port))?;
    Ok(())
}

/// Prints a table of stored campaigns with headline columns.
fn list_campaigns(store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = match mailmetrics_store::read_store(store_dir) {
        Ok(store) => store,
        Err(StoreError::Missing { path }) => {
            println!(
                "Store not found at {}. Run `mailmetrics extract` first.",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if store.campaigns.is_empty() {
        println!("The store contains no campaigns.");
        return Ok(());
    }

    println!(
        "{:<30} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "Campaign", "Sent", "Delivered", "Opens", "Clicks", "Open Rate"
    );
    for campaign in &store.campaigns {
        println!(
            "{:<30} {:>12} {:>12} {:>12} {:>12} {:>10}",
            campaign.campaign,
            format_count(campaign.emails_sent),
            format_count(campaign.delivered),
            format_count(campaign.unique_opens),
            format_count(campaign.unique_clicks),
            format_percent(safe_rate(campaign.unique_opens, campaign.delivered)),
        );
    }
    println!("\n{} campaign(s) in {}.", store.campaigns.len(), store_dir.display());

    Ok(())
}
