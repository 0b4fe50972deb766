#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone binary for the dashboard server.
//!
//! The store directory comes from the `STORE_DIR` environment variable
//! (default `campaign_database`); bind address and port from
//! `BIND_ADDR`/`PORT`.

use std::path::PathBuf;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let store_dir = std::env::var("STORE_DIR")
        .map_or_else(|_| PathBuf::from(mailmetrics_store::DEFAULT_STORE_DIR), PathBuf::from);

    mailmetrics_server::run_server(&store_dir, None, None).await
}
