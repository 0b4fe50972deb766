//! HTTP handler functions for the dashboard API.

use actix_web::{HttpResponse, web};
use mailmetrics_dashboard::{aggregate_view, campaign_view};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Dashboard page embedded at compile time; plotly.js comes from a CDN.
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the dashboard endpoint.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Campaign identifier; omitted for the aggregate view.
    pub campaign: Option<String>,
}

/// `GET /`
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/campaigns`
///
/// Returns campaign identifiers in store row order. Duplicate identifiers
/// are preserved as-is; the store does not deduplicate.
pub async fn campaigns(state: web::Data<AppState>) -> HttpResponse {
    let names: Vec<&str> = state
        .store
        .campaigns
        .iter()
        .map(|c| c.campaign.as_str())
        .collect();
    HttpResponse::Ok().json(names)
}

/// `GET /api/dashboard[?campaign=NAME]`
///
/// Composes the aggregate view, or the single-campaign view when a
/// campaign is selected. An unknown identifier is a 404.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQuery>,
) -> HttpResponse {
    match params.campaign.as_deref() {
        None => HttpResponse::Ok().json(aggregate_view(&state.store)),
        Some(name) => campaign_view(&state.store, name).map_or_else(
            || {
                log::warn!("Dashboard requested for unknown campaign: {name}");
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Unknown campaign: {name}")
                }))
            },
            |payload| HttpResponse::Ok().json(payload),
        ),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use mailmetrics_store::{CampaignRecord, CampaignStore};

    use super::*;

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            store: CampaignStore {
                campaigns: vec![
                    CampaignRecord {
                        campaign: "spring_launch".to_owned(),
                        emails_sent: 1000,
                        delivered: 980,
                        unique_opens: 400,
                        unique_clicks: 120,
                        ..CampaignRecord::default()
                    },
                    CampaignRecord {
                        campaign: "summer_sale".to_owned(),
                        ..CampaignRecord::default()
                    },
                ],
                locations: Vec::new(),
            },
        })
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new().app_data(test_state()).service(
                    web::scope("/api")
                        .route("/health", web::get().to(health))
                        .route("/campaigns", web::get().to(campaigns))
                        .route("/dashboard", web::get().to(dashboard)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test_app!();
        let resp: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/health").to_request())
                .await;
        assert_eq!(resp["healthy"], true);
    }

    #[actix_web::test]
    async fn campaigns_preserve_row_order() {
        let app = test_app!();
        let resp: Vec<String> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/campaigns").to_request(),
        )
        .await;
        assert_eq!(resp, vec!["spring_launch", "summer_sale"]);
    }

    #[actix_web::test]
    async fn aggregate_dashboard_has_six_charts() {
        let app = test_app!();
        let resp: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/dashboard").to_request(),
        )
        .await;
        assert_eq!(resp["title"], "Grand Summary of All Campaigns");
        assert_eq!(resp["charts"].as_array().unwrap().len(), 6);
    }

    #[actix_web::test]
    async fn single_campaign_dashboard_is_served() {
        let app = test_app!();
        let resp: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/dashboard?campaign=spring_launch")
                .to_request(),
        )
        .await;
        assert_eq!(resp["title"], "Detailed View: spring_launch");
        assert_eq!(resp["charts"].as_array().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn unknown_campaign_is_404() {
        let app = test_app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/dashboard?campaign=nope")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
