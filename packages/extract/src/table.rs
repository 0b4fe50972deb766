//! Table shaping: per-file extraction results into store partitions.

use mailmetrics_store::{CampaignStore, LocationOpen};

use crate::patterns::ExtractedReport;

/// Assembles per-file extraction results into the two store partitions.
///
/// Each report's embedded location list is split out into standalone
/// [`LocationOpen`] rows tagged with the owning campaign identifier; the
/// campaign row itself carries no location data. Row order follows the
/// input report order.
#[must_use]
pub fn build_store(reports: Vec<ExtractedReport>) -> CampaignStore {
    let mut campaigns = Vec::with_capacity(reports.len());
    let mut locations = Vec::new();

    for report in reports {
        for (opens, country) in report.locations {
            locations.push(LocationOpen {
                campaign: report.record.campaign.clone(),
                country,
                opens,
            });
        }
        campaigns.push(report.record);
    }

    CampaignStore {
        campaigns,
        locations,
    }
}

#[cfg(test)]
mod tests {
    use mailmetrics_store::CampaignRecord;

    use super::*;

    fn report(campaign: &str, locations: Vec<(u64, &str)>) -> ExtractedReport {
        ExtractedReport {
            record: CampaignRecord {
                campaign: campaign.to_owned(),
                ..CampaignRecord::default()
            },
            locations: locations
                .into_iter()
                .map(|(opens, country)| (opens, country.to_owned()))
                .collect(),
        }
    }

    #[test]
    fn splits_location_lists_into_tagged_rows() {
        let store = build_store(vec![
            report("a", vec![(10, "Canada"), (20, "France")]),
            report("b", Vec::new()),
            report("c", vec![(5, "Japan")]),
        ]);

        assert_eq!(store.campaigns.len(), 3);
        // Location partition row count equals the total pairs extracted.
        assert_eq!(store.locations.len(), 3);
        assert_eq!(store.locations[0].campaign, "a");
        assert_eq!(store.locations[1].country, "France");
        assert_eq!(store.locations[2].campaign, "c");
        assert_eq!(store.locations[2].opens, 5);
    }

    #[test]
    fn preserves_report_order_and_duplicates() {
        let store = build_store(vec![report("dup", Vec::new()), report("dup", Vec::new())]);
        let names: Vec<&str> = store.campaigns.iter().map(|c| c.campaign.as_str()).collect();
        assert_eq!(names, vec!["dup", "dup"]);
    }
}
