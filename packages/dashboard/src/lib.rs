#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived campaign metrics and dashboard view composition.
//!
//! Pure computation over an in-memory [`mailmetrics_store::CampaignStore`]:
//! zero-guarded derived rates, headline metric tiles, and complete Plotly
//! figure JSON for every chart of the aggregate and single-campaign views.
//! The serving layer passes the composed payloads straight to the page;
//! nothing here touches the network or the filesystem.

pub mod figures;
pub mod rates;
pub mod views;

pub use figures::{ChartSlot, DashboardPayload, MetricTile};
pub use views::{aggregate_view, campaign_view};
