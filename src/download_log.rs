use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::meeting::MeetingRecord;

pub const LOG_FILE: &str = "download_log.csv";
pub const MISSING_PROJECTIONS_FILE: &str = "missing_projections.txt";
pub const MISSING: &str = "missing";

pub const HEADER: [&str; 6] = [
    "timestamp",
    "meeting_date",
    "meeting_label",
    "statement_path",
    "projection_path",
    "source_url",
];

#[derive(Debug, Serialize)]
struct LogRow<'a> {
    timestamp: String,
    meeting_date: String,
    meeting_label: &'a str,
    statement_path: String,
    projection_path: String,
    source_url: &'a str,
}

/// Append-only CSV log of processed meetings plus a plain-text list of
/// meetings without projection materials. Re-runs append duplicate rows.
pub struct DownloadLogger {
    log_path: PathBuf,
    missing_projection_path: PathBuf,
}

impl DownloadLogger {
    /// Open the log under `base_dir`, writing the header row if the file is new.
    pub fn open(base_dir: &Path) -> Result<Self> {
        let logger = DownloadLogger {
            log_path: base_dir.join(LOG_FILE),
            missing_projection_path: base_dir.join(MISSING_PROJECTIONS_FILE),
        };
        logger.ensure_header()?;
        Ok(logger)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn ensure_header(&self) -> Result<()> {
        if self.log_path.exists() {
            return Ok(());
        }
        if let Some(dir) = self.log_path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }
        let mut writer = csv::Writer::from_path(&self.log_path)
            .with_context(|| format!("Failed to create {:?}", self.log_path))?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(())
    }

    pub fn record(
        &self,
        meeting: &MeetingRecord,
        statement_path: Option<&Path>,
        projection_path: Option<&Path>,
    ) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open {:?}", self.log_path))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(LogRow {
            timestamp: Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            meeting_date: meeting.meeting_date.format("%Y-%m-%d").to_string(),
            meeting_label: &meeting.label,
            statement_path: path_or_missing(statement_path),
            projection_path: path_or_missing(projection_path),
            source_url: &meeting.source_url,
        })?;
        writer.flush()?;

        if projection_path.is_none() {
            let mut missing = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.missing_projection_path)
                .with_context(|| format!("Failed to open {:?}", self.missing_projection_path))?;
            writeln!(
                missing,
                "{} {}: missing projection materials",
                meeting.meeting_date.format("%Y-%m-%d"),
                meeting.label
            )?;
        }
        Ok(())
    }
}

fn path_or_missing(path: Option<&Path>) -> String {
    match path {
        Some(p) => p.to_string_lossy().replace('\\', "/"),
        None => MISSING.to_string(),
    }
}
