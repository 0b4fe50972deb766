#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Campaign store row types and CSV partition I/O.
//!
//! The store is the sole contract between the extractor and the dashboard
//! viewer: a directory containing two CSV partitions, `Campaign_Data.csv`
//! (one row per extracted report) and `Location_Data.csv` (one row per
//! campaign/country pair). Partition names and column headers are fixed —
//! existing stores written by other tools must remain readable, so they are
//! never renamed.
//!
//! Writes are full-overwrite: a new extraction run replaces the previous
//! store contents entirely. Reads load both partitions fully into memory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Partition holding one row per extracted campaign report.
pub const CAMPAIGN_PARTITION: &str = "Campaign_Data";

/// Partition holding one row per (campaign, country) open count.
pub const LOCATION_PARTITION: &str = "Location_Data";

/// Default store directory, relative to the working directory.
pub const DEFAULT_STORE_DIR: &str = "campaign_database";

/// Column headers of the campaign partition, in row order.
pub const CAMPAIGN_COLUMNS: &[&str] = &[
    "Campaign",
    "Emails Sent",
    "Delivered",
    "Unique Opens",
    "Total Opens",
    "Unique Clicks",
    "Unsubscribes",
    "Bounces",
    "Hard Bounces",
    "Soft Bounces",
    "Complaints",
    "Forwards",
    "Mobile",
    "Desktop",
    "Tablet",
];

/// Column headers of the location partition, in row order.
pub const LOCATION_COLUMNS: &[&str] = &["Campaign", "Country", "Opens"];

/// Errors from reading or writing the campaign store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store directory or a required partition does not exist yet.
    #[error("store not found at {}", path.display())]
    Missing {
        /// Directory that was expected to contain the store.
        path: PathBuf,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization or deserialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One extracted campaign report.
///
/// Every metric defaults to 0 when its pattern was not found in the source
/// report; a missing metric is indistinguishable from a true zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Campaign identifier (source report file stem, verbatim).
    #[serde(rename = "Campaign")]
    pub campaign: String,
    /// Total emails sent.
    #[serde(rename = "Emails Sent")]
    pub emails_sent: u64,
    /// Emails that reached a recipient mailbox.
    #[serde(rename = "Delivered")]
    pub delivered: u64,
    /// Distinct recipients who opened the email.
    #[serde(rename = "Unique Opens")]
    pub unique_opens: u64,
    /// All open events, including repeats.
    #[serde(rename = "Total Opens")]
    pub total_opens: u64,
    /// Distinct recipients who clicked a link.
    #[serde(rename = "Unique Clicks")]
    pub unique_clicks: u64,
    /// Unsubscribe events.
    #[serde(rename = "Unsubscribes")]
    pub unsubscribes: u64,
    /// All delivery failures.
    #[serde(rename = "Bounces")]
    pub bounces: u64,
    /// Permanent delivery failures (invalid address).
    #[serde(rename = "Hard Bounces")]
    pub hard_bounces: u64,
    /// Temporary delivery failures (e.g., full mailbox).
    #[serde(rename = "Soft Bounces")]
    pub soft_bounces: u64,
    /// Spam complaints.
    #[serde(rename = "Complaints")]
    pub complaints: u64,
    /// Forward events.
    #[serde(rename = "Forwards")]
    pub forwards: u64,
    /// Percentage of opens on mobile devices.
    #[serde(rename = "Mobile")]
    pub mobile: u64,
    /// Percentage of opens on desktop ("Computer" in the report layout).
    #[serde(rename = "Desktop")]
    pub desktop: u64,
    /// Percentage of opens on tablets.
    #[serde(rename = "Tablet")]
    pub tablet: u64,
}

/// Open count for one (campaign, country) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOpen {
    /// Owning campaign identifier.
    #[serde(rename = "Campaign")]
    pub campaign: String,
    /// Country name as captured from the report, whitespace-trimmed.
    #[serde(rename = "Country")]
    pub country: String,
    /// Open count attributed to this country.
    #[serde(rename = "Opens")]
    pub opens: u64,
}

/// In-memory image of both store partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignStore {
    /// Campaign partition rows, in extraction order.
    pub campaigns: Vec<CampaignRecord>,
    /// Location partition rows, in extraction order.
    pub locations: Vec<LocationOpen>,
}

/// Returns the path of a named partition file inside a store directory.
#[must_use]
pub fn partition_path(dir: &Path, partition: &str) -> PathBuf {
    dir.join(format!("{partition}.csv"))
}

/// Writes both partitions to `dir`, replacing any previous store contents.
///
/// The directory is created if it does not exist. Headers are written even
/// when a partition has zero rows, so the column contract is always
/// present on disk.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or either partition
/// fails to serialize.
pub fn write_store(dir: &Path, store: &CampaignStore) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir)?;

    write_partition(dir, CAMPAIGN_PARTITION, CAMPAIGN_COLUMNS, &store.campaigns)?;
    write_partition(dir, LOCATION_PARTITION, LOCATION_COLUMNS, &store.locations)?;

    log::debug!(
        "Wrote {} campaign row(s) and {} location row(s) to {}",
        store.campaigns.len(),
        store.locations.len(),
        dir.display()
    );

    Ok(())
}

/// Writes one partition file: explicit header row, then serialized rows.
fn write_partition<T: Serialize>(
    dir: &Path,
    partition: &str,
    columns: &[&str],
    rows: &[T],
) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(partition_path(dir, partition))?;

    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Loads both partitions from `dir` fully into memory.
///
/// # Errors
///
/// Returns [`StoreError::Missing`] if the store directory or the campaign
/// partition does not exist, or an I/O/CSV error if a partition cannot be
/// read.
pub fn read_store(dir: &Path) -> Result<CampaignStore, StoreError> {
    if !partition_path(dir, CAMPAIGN_PARTITION).exists() {
        return Err(StoreError::Missing {
            path: dir.to_path_buf(),
        });
    }

    let campaigns = read_partition(dir, CAMPAIGN_PARTITION)?;
    let locations = read_partition(dir, LOCATION_PARTITION)?;

    log::debug!(
        "Loaded {} campaign row(s) and {} location row(s) from {}",
        campaigns.len(),
        locations.len(),
        dir.display()
    );

    Ok(CampaignStore {
        campaigns,
        locations,
    })
}

/// Reads one partition file into typed rows.
fn read_partition<T: for<'de> Deserialize<'de>>(
    dir: &Path,
    partition: &str,
) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::Reader::from_path(partition_path(dir, partition))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(StoreError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> CampaignStore {
        CampaignStore {
            campaigns: vec![
                CampaignRecord {
                    campaign: "spring_launch".to_owned(),
                    emails_sent: 1000,
                    delivered: 980,
                    unique_opens: 400,
                    unique_clicks: 120,
                    bounces: 20,
                    hard_bounces: 5,
                    soft_bounces: 15,
                    mobile: 60,
                    desktop: 30,
                    tablet: 10,
                    ..CampaignRecord::default()
                },
                CampaignRecord {
                    campaign: "summer_sale".to_owned(),
                    emails_sent: 500,
                    delivered: 450,
                    ..CampaignRecord::default()
                },
            ],
            locations: vec![
                LocationOpen {
                    campaign: "spring_launch".to_owned(),
                    country: "Canada".to_owned(),
                    opens: 50,
                },
                LocationOpen {
                    campaign: "spring_launch".to_owned(),
                    country: "United States".to_owned(),
                    opens: 300,
                },
            ],
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = sample_store();

        write_store(dir.path(), &store).unwrap();
        let loaded = read_store(dir.path()).unwrap();

        assert_eq!(loaded, store);
    }

    #[test]
    fn partition_headers_are_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write_store(dir.path(), &sample_store()).unwrap();

        let campaign_csv =
            std::fs::read_to_string(partition_path(dir.path(), CAMPAIGN_PARTITION)).unwrap();
        assert_eq!(
            campaign_csv.lines().next().unwrap(),
            "Campaign,Emails Sent,Delivered,Unique Opens,Total Opens,Unique Clicks,\
             Unsubscribes,Bounces,Hard Bounces,Soft Bounces,Complaints,Forwards,\
             Mobile,Desktop,Tablet"
        );

        let location_csv =
            std::fs::read_to_string(partition_path(dir.path(), LOCATION_PARTITION)).unwrap();
        assert_eq!(location_csv.lines().next().unwrap(), "Campaign,Country,Opens");
    }

    #[test]
    fn second_write_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        write_store(dir.path(), &sample_store()).unwrap();

        let replacement = CampaignStore {
            campaigns: vec![CampaignRecord {
                campaign: "autumn_digest".to_owned(),
                emails_sent: 10,
                ..CampaignRecord::default()
            }],
            locations: Vec::new(),
        };
        write_store(dir.path(), &replacement).unwrap();

        let loaded = read_store(dir.path()).unwrap();
        assert_eq!(loaded, replacement);
    }

    #[test]
    fn empty_partitions_still_carry_headers() {
        let dir = tempfile::tempdir().unwrap();
        write_store(dir.path(), &CampaignStore::default()).unwrap();

        let loaded = read_store(dir.path()).unwrap();
        assert!(loaded.campaigns.is_empty());
        assert!(loaded.locations.is_empty());
    }

    #[test]
    fn missing_store_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nonexistent");

        let err = read_store(&missing).unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
    }
}
