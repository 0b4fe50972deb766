//! Aggregate and single-campaign view composition.

use mailmetrics_store::{CampaignRecord, CampaignStore};

use crate::figures::{self, BLUE, ChartSlot, DashboardPayload, GREEN, MetricTile, ORANGE, RED};
use crate::rates::{format_count, format_percent, safe_rate};

/// Composes the summary view across all campaigns.
///
/// Headline rates are computed on the summed totals, never as an average
/// of per-campaign rates. The ranked bar charts use per-campaign rates.
#[must_use]
pub fn aggregate_view(store: &CampaignStore) -> DashboardPayload {
    let campaigns = &store.campaigns;

    let total_sent: u64 = campaigns.iter().map(|c| c.emails_sent).sum();
    let total_delivered: u64 = campaigns.iter().map(|c| c.delivered).sum();
    let total_opens: u64 = campaigns.iter().map(|c| c.unique_opens).sum();
    let total_clicks: u64 = campaigns.iter().map(|c| c.unique_clicks).sum();
    let total_bounces: u64 = campaigns.iter().map(|c| c.bounces).sum();

    let metrics = vec![
        MetricTile::new("Total Campaigns", format_count(campaigns.len() as u64)),
        MetricTile::new("Total Emails Sent", format_count(total_sent)),
        MetricTile::with_delta(
            "Total Delivered",
            format_count(total_delivered),
            format_percent(safe_rate(total_delivered, total_sent)),
        ),
        MetricTile::with_delta(
            "Total Bounces",
            format_count(total_bounces),
            format!("-{}", format_percent(safe_rate(total_bounces, total_sent))),
        ),
        MetricTile::with_delta(
            "Total Unique Opens",
            format_count(total_opens),
            format_percent(safe_rate(total_opens, total_delivered)),
        ),
        MetricTile::with_delta(
            "Total Unique Clicks",
            format_count(total_clicks),
            format_percent(safe_rate(total_clicks, total_opens)),
        ),
    ];

    let charts = vec![
        performance_chart(campaigns),
        engagement_chart(total_opens, total_clicks, total_bounces),
        open_rate_chart(campaigns),
        device_chart(campaigns),
        geo_chart(store),
        ctor_chart(campaigns),
    ];

    DashboardPayload {
        title: "Grand Summary of All Campaigns".to_owned(),
        metrics,
        charts,
    }
}

/// Composes the detail view for one campaign.
///
/// Duplicate identifiers are not deduplicated by the extractor; the first
/// matching row wins here. Returns `None` for an unknown identifier.
#[must_use]
pub fn campaign_view(store: &CampaignStore, name: &str) -> Option<DashboardPayload> {
    let campaign = store.campaigns.iter().find(|c| c.campaign == name)?;

    let metrics = vec![
        MetricTile::new("Emails Sent", format_count(campaign.emails_sent)),
        MetricTile::with_delta(
            "Delivered",
            format_count(campaign.delivered),
            format_percent(safe_rate(campaign.delivered, campaign.emails_sent)),
        ),
        MetricTile::with_delta(
            "Unique Opens",
            format_count(campaign.unique_opens),
            format_percent(safe_rate(campaign.unique_opens, campaign.delivered)),
        ),
        MetricTile::with_delta(
            "Unique Clicks",
            format_count(campaign.unique_clicks),
            format_percent(safe_rate(campaign.unique_clicks, campaign.unique_opens)),
        ),
        MetricTile::with_delta(
            "Bounces",
            format_count(campaign.bounces),
            format!(
                "-{}",
                format_percent(safe_rate(campaign.bounces, campaign.emails_sent))
            ),
        ),
        MetricTile::new("Unsubscribes", format_count(campaign.unsubscribes)),
    ];

    let charts = vec![
        funnel_chart(campaign),
        gauge_chart(campaign),
        bounce_chart(campaign),
        campaign_device_chart(campaign),
    ];

    Some(DashboardPayload {
        title: format!("Detailed View: {name}"),
        metrics,
        charts,
    })
}

// ── Aggregate charts ─────────────────────────────────────────────────────

fn performance_chart(campaigns: &[CampaignRecord]) -> ChartSlot {
    let id = "campaign-performance";
    let title = "Campaign Performance";

    let any_data = campaigns
        .iter()
        .any(|c| c.emails_sent + c.delivered + c.unique_opens + c.unique_clicks > 0);
    if !any_data {
        return ChartSlot::placeholder(id, title, "No campaign performance data to display.");
    }

    let names: Vec<String> = campaigns.iter().map(|c| c.campaign.clone()).collect();
    let series = [
        ("Emails Sent", BLUE, campaigns.iter().map(|c| c.emails_sent).collect()),
        ("Delivered", GREEN, campaigns.iter().map(|c| c.delivered).collect()),
        ("Unique Opens", RED, campaigns.iter().map(|c| c.unique_opens).collect()),
        ("Unique Clicks", ORANGE, campaigns.iter().map(|c| c.unique_clicks).collect()),
    ];

    ChartSlot::figure(id, title, figures::grouped_bar(&names, &series))
}

fn engagement_chart(opens: u64, clicks: u64, bounces: u64) -> ChartSlot {
    let id = "engagement-breakdown";
    let title = "Engagement Breakdown";

    if opens + clicks + bounces == 0 {
        return ChartSlot::placeholder(id, title, "No engagement data to display.");
    }

    ChartSlot::figure(
        id,
        title,
        figures::donut(
            &["Opens", "Clicks", "Bounces"],
            &[opens, clicks, bounces],
            &[RED, ORANGE, GREEN],
        ),
    )
}

fn open_rate_chart(campaigns: &[CampaignRecord]) -> ChartSlot {
    let id = "open-rate";
    let title = "Open Rate by Campaign";

    if campaigns.is_empty() {
        return ChartSlot::placeholder(id, title, "No campaigns to display.");
    }

    let rows = ranked_rates(campaigns, |c| safe_rate(c.unique_opens, c.delivered));
    ChartSlot::figure(id, title, figures::rate_bar(&rows))
}

fn device_chart(campaigns: &[CampaignRecord]) -> ChartSlot {
    let id = "device-usage";
    let title = "Device Usage";

    let mobile: u64 = campaigns.iter().map(|c| c.mobile).sum();
    let desktop: u64 = campaigns.iter().map(|c| c.desktop).sum();
    let tablet: u64 = campaigns.iter().map(|c| c.tablet).sum();

    if mobile + desktop + tablet == 0 {
        return ChartSlot::placeholder(id, title, "No device usage data available to display.");
    }

    ChartSlot::figure(
        id,
        title,
        figures::donut(
            &["Mobile", "Desktop", "Tablet"],
            &[mobile, desktop, tablet],
            &[RED, ORANGE, GREEN],
        ),
    )
}

fn geo_chart(store: &CampaignStore) -> ChartSlot {
    let id = "geo-opens";
    let title = "Geographical Open Rate";

    if store.locations.is_empty() {
        return ChartSlot::placeholder(id, title, "No location data available to display.");
    }

    // Sum opens by country, sorted by country name.
    let mut by_country = std::collections::BTreeMap::<String, u64>::new();
    for row in &store.locations {
        *by_country.entry(row.country.clone()).or_default() += row.opens;
    }
    let rows: Vec<(String, u64)> = by_country.into_iter().collect();

    ChartSlot::figure(id, title, figures::geo_bubble(&rows))
}

fn ctor_chart(campaigns: &[CampaignRecord]) -> ChartSlot {
    let id = "ctor";
    let title = "Click-to-Open Rate (CTOR) by Campaign";

    if campaigns.is_empty() {
        return ChartSlot::placeholder(id, title, "No campaigns to display.");
    }

    let rows = ranked_rates(campaigns, |c| safe_rate(c.unique_clicks, c.unique_opens));
    ChartSlot::figure(id, title, figures::rate_bar(&rows))
}

/// Per-campaign rates in ascending order (the ranked bar charts read
/// bottom-up, so the best campaign renders on top).
fn ranked_rates<F: Fn(&CampaignRecord) -> f64>(
    campaigns: &[CampaignRecord],
    rate: F,
) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = campaigns
        .iter()
        .map(|c| (c.campaign.clone(), rate(c)))
        .collect();
    rows.sort_by(|a, b| a.1.total_cmp(&b.1));
    rows
}

// ── Single-campaign charts ───────────────────────────────────────────────

fn funnel_chart(campaign: &CampaignRecord) -> ChartSlot {
    let id = "funnel";
    let title = "Email Funnel";

    // Three-way fallback: the full four-stage funnel when sent is known,
    // a three-stage funnel starting at delivered when only delivery data
    // exists, a placeholder when neither does.
    if campaign.emails_sent > 0 {
        ChartSlot::figure(
            id,
            title,
            figures::funnel(&[
                ("Emails Sent", campaign.emails_sent),
                ("Delivered", campaign.delivered),
                ("Unique Opens", campaign.unique_opens),
                ("Unique Clicks", campaign.unique_clicks),
            ]),
        )
    } else if campaign.delivered > 0 {
        ChartSlot::figure(
            id,
            title,
            figures::funnel(&[
                ("Delivered", campaign.delivered),
                ("Unique Opens", campaign.unique_opens),
                ("Unique Clicks", campaign.unique_clicks),
            ]),
        )
    } else {
        ChartSlot::placeholder(
            id,
            title,
            "No email delivery data for this campaign; funnel chart cannot be displayed.",
        )
    }
}

fn gauge_chart(campaign: &CampaignRecord) -> ChartSlot {
    let id = "open-rate-gauge";
    let title = "Open Rate Gauge";

    if campaign.delivered == 0 {
        return ChartSlot::placeholder(
            id,
            title,
            "No emails delivered; open rate cannot be calculated.",
        );
    }

    let rate = safe_rate(campaign.unique_opens, campaign.delivered) * 100.0;
    ChartSlot::figure(id, title, figures::gauge(rate, "Open Rate (%)"))
}

fn bounce_chart(campaign: &CampaignRecord) -> ChartSlot {
    let id = "bounce-breakdown";
    let title = "Bounce Breakdown";

    if campaign.hard_bounces + campaign.soft_bounces == 0 {
        return ChartSlot::placeholder(id, title, "No bounce data for this campaign.");
    }

    ChartSlot::figure(
        id,
        title,
        figures::donut(
            &["Hard Bounces", "Soft Bounces"],
            &[campaign.hard_bounces, campaign.soft_bounces],
            &[RED, ORANGE],
        ),
    )
}

fn campaign_device_chart(campaign: &CampaignRecord) -> ChartSlot {
    let id = "campaign-device-usage";
    let title = "Device Usage for this Campaign";

    if campaign.mobile + campaign.desktop + campaign.tablet == 0 {
        return ChartSlot::placeholder(id, title, "No device usage data for this campaign.");
    }

    ChartSlot::figure(
        id,
        title,
        figures::donut(
            &["Mobile", "Desktop", "Tablet"],
            &[campaign.mobile, campaign.desktop, campaign.tablet],
            &[RED, ORANGE, GREEN],
        ),
    )
}
