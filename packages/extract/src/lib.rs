#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF metric extraction for campaign reports.
//!
//! Reads every `.pdf` report in a directory, extracts a fixed set of named
//! metrics and the opens-by-location listing from each file's text layer
//! (via [`pdf_extract`]), and writes the results to the two-partition
//! campaign store.
//!
//! The batch is fault-isolated per file: a report whose text cannot be
//! decoded (including files protected beyond the trivial empty password) is
//! skipped with a diagnostic and the remaining files are processed. The
//! primary entry point is [`run_extraction`].

pub mod patterns;
pub mod progress;
pub mod table;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::patterns::ExtractedReport;
use crate::progress::ProgressCallback;

/// Errors from the extraction batch.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// PDF text extraction failed for a file.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the campaign store failed.
    #[error("Store error: {0}")]
    Store(#[from] mailmetrics_store::StoreError),
}

/// Outcome of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Report files found in the input directory.
    pub files_found: usize,
    /// Campaign rows written to the store.
    pub campaigns_written: usize,
    /// Location rows written to the store.
    pub locations_written: usize,
    /// Files skipped because decoding or processing failed.
    pub files_skipped: usize,
    /// Whether a store was written. `false` on an empty batch, which
    /// leaves any prior store untouched.
    pub wrote_store: bool,
}

/// Decodes the text layer of one PDF report.
///
/// # Errors
///
/// Returns [`ExtractError::Pdf`] on any decode failure, including files
/// that are access-protected beyond the decoder's empty-password default.
pub fn decode_text(path: &Path) -> Result<String, ExtractError> {
    pdf_extract::extract_text(path).map_err(|e| {
        ExtractError::Pdf(format!(
            "failed to extract text from {}: {e}",
            path.display()
        ))
    })
}

/// Lists the `.pdf` files in `dir` (extension compared case-insensitively),
/// sorted by file name so row order is deterministic across platforms.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_report_files(dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Decodes and extracts one report file.
///
/// The campaign identifier is the file stem, verbatim.
///
/// # Errors
///
/// Returns an error if the file's text layer cannot be decoded.
pub fn extract_file(path: &Path) -> Result<ExtractedReport, ExtractError> {
    let campaign = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let text = decode_text(path)?;
    Ok(patterns::extract_report(&campaign, &text))
}

/// Result of scanning one report directory.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScan {
    /// Successfully extracted reports, in file-name order.
    pub reports: Vec<ExtractedReport>,
    /// Report files found in the directory.
    pub files_found: usize,
    /// Files skipped because decoding or processing failed.
    pub files_skipped: usize,
}

/// Extracts every report file in `dir` sequentially.
///
/// Fault-isolated per work item: a file whose decode or processing fails
/// is skipped with a diagnostic and the remaining files are processed.
///
/// # Errors
///
/// Returns an error only if the directory itself cannot be listed.
pub fn extract_directory(
    dir: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<DirectoryScan, ExtractError> {
    let files = list_report_files(dir)?;
    progress.set_total(files.len() as u64);

    let mut reports: Vec<ExtractedReport> = Vec::with_capacity(files.len());
    let mut files_skipped = 0;

    for path in &files {
        progress.set_message(path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        ));

        match extract_file(path) {
            Ok(report) => reports.push(report),
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                files_skipped += 1;
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    Ok(DirectoryScan {
        reports,
        files_found: files.len(),
        files_skipped,
    })
}

/// Runs the full extraction batch: scan the report directory, shape the
/// tables, and overwrite the store.
///
/// An empty batch (no report files, or no file yielded data) is reported
/// and performs no write, leaving any prior store untouched.
///
/// # Errors
///
/// Returns an error if the input directory cannot be listed or the store
/// write fails.
pub fn run_extraction(
    reports_dir: &Path,
    store_dir: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<ExtractionSummary, ExtractError> {
    let start = Instant::now();
    log::info!(
        "Starting data extraction from PDF files in {}",
        reports_dir.display()
    );

    let scan = extract_directory(reports_dir, progress)?;

    if scan.files_found == 0 {
        log::warn!("No PDF files found in {}", reports_dir.display());
        return Ok(ExtractionSummary::default());
    }

    if scan.reports.is_empty() {
        log::warn!(
            "No data could be extracted from {} PDF file(s); store left untouched",
            scan.files_found
        );
        return Ok(ExtractionSummary {
            files_found: scan.files_found,
            files_skipped: scan.files_skipped,
            ..ExtractionSummary::default()
        });
    }

    let files_found = scan.files_found;
    let files_skipped = scan.files_skipped;
    let store = table::build_store(scan.reports);
    mailmetrics_store::write_store(store_dir, &store)?;

    let summary = ExtractionSummary {
        files_found,
        campaigns_written: store.campaigns.len(),
        locations_written: store.locations.len(),
        files_skipped,
        wrote_store: true,
    };

    log::info!(
        "Extracted {} campaign(s) and {} location row(s) to {} in {:.1?} ({} file(s) skipped)",
        summary.campaigns_written,
        summary.locations_written,
        store_dir.display(),
        start.elapsed(),
        summary.files_skipped
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use crate::progress::null_progress;

    use super::*;

    #[test]
    fn empty_directory_performs_no_write() {
        let reports = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        let store_dir = store.path().join("campaign_database");

        let summary =
            run_extraction(reports.path(), &store_dir, &null_progress()).unwrap();

        assert_eq!(summary, ExtractionSummary::default());
        assert!(!store_dir.exists());
    }

    #[test]
    fn undecodable_file_is_skipped_without_write() {
        let reports = tempfile::tempdir().unwrap();
        std::fs::write(reports.path().join("broken.pdf"), b"not a pdf at all").unwrap();
        let store = tempfile::tempdir().unwrap();
        let store_dir = store.path().join("campaign_database");

        let summary =
            run_extraction(reports.path(), &store_dir, &null_progress()).unwrap();

        assert_eq!(summary.files_found, 1);
        assert_eq!(summary.files_skipped, 1);
        assert!(!summary.wrote_store);
        assert!(!store_dir.exists());
    }

    #[test]
    fn listing_filters_and_sorts_by_name() {
        let reports = tempfile::tempdir().unwrap();
        std::fs::write(reports.path().join("b.pdf"), b"").unwrap();
        std::fs::write(reports.path().join("a.PDF"), b"").unwrap();
        std::fs::write(reports.path().join("notes.txt"), b"").unwrap();

        let files = list_report_files(reports.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn prior_store_survives_an_empty_batch() {
        let reports = tempfile::tempdir().unwrap();
        let store_root = tempfile::tempdir().unwrap();
        let store_dir = store_root.path().join("campaign_database");

        let prior = mailmetrics_store::CampaignStore {
            campaigns: vec![mailmetrics_store::CampaignRecord {
                campaign: "kept".to_owned(),
                ..mailmetrics_store::CampaignRecord::default()
            }],
            locations: Vec::new(),
        };
        mailmetrics_store::write_store(&store_dir, &prior).unwrap();

        run_extraction(reports.path(), &store_dir, &null_progress()).unwrap();

        let loaded = mailmetrics_store::read_store(&store_dir).unwrap();
        assert_eq!(loaded, prior);
    }
}
