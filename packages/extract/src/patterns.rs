//! Metric pattern registry and per-report extraction.
//!
//! Each metric field owns an ordered list of regex alternatives loaded from
//! the embedded `patterns.toml`. There is no shared grammar — every list is
//! an independent, layout-specific heuristic, and that brittleness is
//! intentional: supporting a new report layout means adding a pattern
//! alternative, not changing a parser.

use std::collections::BTreeMap;
use std::str::FromStr as _;
use std::sync::LazyLock;

use mailmetrics_store::CampaignRecord;
use regex::Regex;
use serde::Deserialize;
use strum::IntoEnumIterator as _;
use strum_macros::{Display, EnumIter, EnumString};

/// Pattern config embedded at compile time.
const PATTERNS_TOML: &str = include_str!("../patterns.toml");

/// A metric field of the campaign record, keyed by its registry name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum MetricField {
    EmailsSent,
    Delivered,
    UniqueOpens,
    TotalOpens,
    UniqueClicks,
    Unsubscribes,
    Bounces,
    HardBounces,
    SoftBounces,
    Complaints,
    Forwards,
    Mobile,
    Desktop,
    Tablet,
}

/// Raw shape of `patterns.toml`.
#[derive(Debug, Deserialize)]
struct PatternConfig {
    fields: BTreeMap<String, Vec<String>>,
}

/// Compiled pattern alternatives for every metric field.
pub struct PatternRegistry {
    rules: BTreeMap<MetricField, Vec<Regex>>,
}

impl PatternRegistry {
    /// Parses and compiles the embedded config.
    ///
    /// Panics on a malformed registry — the config is embedded at compile
    /// time, so any failure here is a programmer error, surfaced at first
    /// use rather than per file.
    fn load() -> Self {
        let config: PatternConfig =
            toml::from_str(PATTERNS_TOML).unwrap_or_else(|e| panic!("Malformed patterns.toml: {e}"));

        let rules: BTreeMap<MetricField, Vec<Regex>> = config
            .fields
            .into_iter()
            .map(|(name, patterns)| {
                let field = MetricField::from_str(&name)
                    .unwrap_or_else(|_| panic!("Unknown metric field in patterns.toml: {name}"));
                let compiled = patterns
                    .iter()
                    .map(|p| {
                        Regex::new(p).unwrap_or_else(|e| {
                            panic!("Invalid pattern for {field}: {p}: {e}")
                        })
                    })
                    .collect();
                (field, compiled)
            })
            .collect();

        for field in MetricField::iter() {
            assert!(
                rules.contains_key(&field),
                "patterns.toml has no pattern list for {field}"
            );
        }

        Self { rules }
    }

    /// Returns the ordered pattern alternatives for one field.
    #[must_use]
    pub fn rules_for(&self, field: MetricField) -> &[Regex] {
        self.rules.get(&field).map_or(&[], Vec::as_slice)
    }
}

static REGISTRY: LazyLock<PatternRegistry> = LazyLock::new(PatternRegistry::load);

/// Matches one `"N Opens from <country>"` line of the opens-by-location
/// listing. The country capture is words and spaces on a single line, so
/// each listing line yields at most one pair.
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) Opens from ([\w ]+)").unwrap_or_else(|e| panic!("Invalid location pattern: {e}"))
});

/// Returns the shared compiled pattern registry.
#[must_use]
pub fn registry() -> &'static PatternRegistry {
    &REGISTRY
}

/// Extracts one metric from report text.
///
/// Tries the field's pattern alternatives in order; on the first matching
/// pattern, scans its capture groups in order and returns the first group
/// that parses as an integer. Returns 0 when no pattern matches — a missing
/// metric is indistinguishable from a true zero. Remaining alternatives are
/// never tried after a match.
#[must_use]
pub fn extract_metric(field: MetricField, text: &str) -> u64 {
    for pattern in registry().rules_for(field) {
        if let Some(caps) = pattern.captures(text) {
            return caps
                .iter()
                .skip(1)
                .flatten()
                .find_map(|group| group.as_str().parse().ok())
                .unwrap_or(0);
        }
    }
    0
}

/// Extracts all `(opens, country)` pairs from the report's free-text
/// opens-by-location listing.
///
/// Country names are trimmed of surrounding whitespace but not validated
/// against any real country list; malformed captures (e.g., trailing stray
/// words on the listing line) pass through uncorrected.
#[must_use]
pub fn extract_locations(text: &str) -> Vec<(u64, String)> {
    LOCATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let opens = caps[1].parse().ok()?;
            Some((opens, caps[2].trim().to_owned()))
        })
        .collect()
}

/// Extraction result for one report: the campaign row plus its location
/// pairs, not yet split into store partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReport {
    /// Campaign partition row.
    pub record: CampaignRecord,
    /// `(opens, country)` pairs in text order.
    pub locations: Vec<(u64, String)>,
}

/// Applies every field's patterns plus the location listing to one report's
/// decoded text. Pure: identical text always yields identical output.
#[must_use]
pub fn extract_report(campaign: &str, text: &str) -> ExtractedReport {
    let record = CampaignRecord {
        campaign: campaign.to_owned(),
        emails_sent: extract_metric(MetricField::EmailsSent, text),
        delivered: extract_metric(MetricField::Delivered, text),
        unique_opens: extract_metric(MetricField::UniqueOpens, text),
        total_opens: extract_metric(MetricField::TotalOpens, text),
        unique_clicks: extract_metric(MetricField::UniqueClicks, text),
        unsubscribes: extract_metric(MetricField::Unsubscribes, text),
        bounces: extract_metric(MetricField::Bounces, text),
        hard_bounces: extract_metric(MetricField::HardBounces, text),
        soft_bounces: extract_metric(MetricField::SoftBounces, text),
        complaints: extract_metric(MetricField::Complaints, text),
        forwards: extract_metric(MetricField::Forwards, text),
        mobile: extract_metric(MetricField::Mobile, text),
        desktop: extract_metric(MetricField::Desktop, text),
        tablet: extract_metric(MetricField::Tablet, text),
    };

    ExtractedReport {
        record,
        locations: extract_locations(text),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn every_field_has_patterns() {
        for field in MetricField::iter() {
            assert!(
                !registry().rules_for(field).is_empty(),
                "no patterns for {field}"
            );
        }
    }

    #[test]
    fn emails_sent_variants() {
        assert_eq!(extract_metric(MetricField::EmailsSent, "emails sent 1500"), 1500);
        assert_eq!(
            extract_metric(MetricField::EmailsSent, "1500\nTotal Emails Sent"),
            1500
        );
        assert_eq!(
            extract_metric(MetricField::EmailsSent, "Total Emails Sent\n1500"),
            1500
        );
        assert_eq!(extract_metric(MetricField::EmailsSent, "no numbers here"), 0);
    }

    #[test]
    fn delivered_variants() {
        assert_eq!(
            extract_metric(MetricField::Delivered, "Delivered 98.0% 980"),
            980
        );
        assert_eq!(extract_metric(MetricField::Delivered, "980\nDelivered"), 980);
        assert_eq!(extract_metric(MetricField::Delivered, "Bounced 20"), 0);
    }

    #[test]
    fn unique_opens_variants() {
        assert_eq!(
            extract_metric(MetricField::UniqueOpens, "Unique Opens 40.8% 400"),
            400
        );
        assert_eq!(
            extract_metric(MetricField::UniqueOpens, "Opened (Unique) 400"),
            400
        );
        assert_eq!(
            extract_metric(MetricField::UniqueOpens, "400\nOpened (Unique)"),
            400
        );
    }

    #[test]
    fn first_matching_pattern_wins() {
        // Both the inline and the stacked delivered layouts are present;
        // the inline alternative is listed first, so its value is used.
        let text = "Delivered 50.0% 500\n900\nDelivered";
        assert_eq!(extract_metric(MetricField::Delivered, text), 500);
    }

    #[test]
    fn bounce_type_variants() {
        assert_eq!(
            extract_metric(MetricField::HardBounces, "Hard Bounce 5 Contacts"),
            5
        );
        assert_eq!(
            extract_metric(MetricField::SoftBounces, "Soft Bounce\n15\nContacts"),
            15
        );
    }

    #[test]
    fn device_percentage_variants() {
        let text = "Mobile 60 %\nComputer 30%\nTablet 10 %";
        assert_eq!(extract_metric(MetricField::Mobile, text), 60);
        assert_eq!(extract_metric(MetricField::Desktop, text), 30);
        assert_eq!(extract_metric(MetricField::Tablet, text), 10);
    }

    #[test]
    fn locations_yield_one_pair_per_listing_line() {
        let text = "300 Opens from United States\n50 Opens from Canada \n7 Opens from New Zealand";
        let locations = extract_locations(text);
        assert_eq!(
            locations,
            vec![
                (300, "United States".to_owned()),
                (50, "Canada".to_owned()),
                (7, "New Zealand".to_owned()),
            ]
        );
    }

    #[test]
    fn locations_empty_on_no_listing() {
        assert!(extract_locations("Delivered 98.0% 980").is_empty());
    }

    #[test]
    fn extract_report_end_to_end() {
        let text = "Total Emails Sent\n1000\nDelivered 98.0% 980\nOpened (Unique) 400\n50 Opens from Canada";
        let report = extract_report("spring_launch", text);

        assert_eq!(report.record.campaign, "spring_launch");
        assert_eq!(report.record.emails_sent, 1000);
        assert_eq!(report.record.delivered, 980);
        assert_eq!(report.record.unique_opens, 400);
        assert_eq!(report.record.unique_clicks, 0);
        assert_eq!(report.locations, vec![(50, "Canada".to_owned())]);
    }

    #[test]
    fn extract_report_is_pure() {
        let text = "Delivered 98.0% 980\n10 Opens from France";
        assert_eq!(extract_report("a", text), extract_report("a", text));
    }
}
