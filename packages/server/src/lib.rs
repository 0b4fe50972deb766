#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web dashboard server for the campaign store.
//!
//! Loads both store partitions fully into memory at startup and serves an
//! embedded single-page dashboard plus a small JSON API. The page's
//! campaign selector drives which view the API composes; all chart logic
//! lives server-side in `mailmetrics_dashboard`, the page only calls
//! `Plotly.newPlot` with the figures it is given.
//!
//! A missing store is reported and the server does not start — the
//! extractor has to run first.

mod handlers;

use std::path::Path;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use mailmetrics_store::{CampaignStore, StoreError, read_store};

/// Shared application state: an immutable snapshot of the store.
pub struct AppState {
    /// Both store partitions, loaded once at startup.
    pub store: CampaignStore,
}

/// Starts the dashboard server over the store at `store_dir`.
///
/// `bind_addr` and `port` override the `BIND_ADDR`/`PORT` environment
/// variables; the defaults are `127.0.0.1:8080`. This is a regular async
/// function — the caller provides the async runtime (e.g. via
/// `#[actix_web::main]` or `actix_web::rt::System`).
///
/// A missing or unreadable store is reported as an error message and the
/// function returns without serving anything.
///
/// # Errors
///
/// Returns an error if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(
    store_dir: &Path,
    bind_addr: Option<String>,
    port: Option<u16>,
) -> std::io::Result<()> {
    let store = match read_store(store_dir) {
        Ok(store) => store,
        Err(StoreError::Missing { path }) => {
            log::error!(
                "Store not found at {}. Run the extractor first.",
                path.display()
            );
            return Ok(());
        }
        Err(e) => {
            log::error!("Failed to load store: {e}");
            return Ok(());
        }
    };

    log::info!(
        "Loaded {} campaign row(s) and {} location row(s) from {}",
        store.campaigns.len(),
        store.locations.len(),
        store_dir.display()
    );

    let state = web::Data::new(AppState { store });

    let bind_addr = bind_addr
        .or_else(|| std::env::var("BIND_ADDR").ok())
        .unwrap_or_else(|| "127.0.0.1".to_owned());
    let port: u16 = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(8080);

    log::info!("Starting dashboard server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/campaigns", web::get().to(handlers::campaigns))
                    .route("/dashboard", web::get().to(handlers::dashboard)),
            )
            .route("/", web::get().to(handlers::index))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
