use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{info, warn};

use crate::download_log::DownloadLogger;
use crate::meeting::{DocumentKind, MeetingRecord};

/// Download stats returned after completion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadStats {
    pub meetings: usize,
    pub statements: usize,
    pub projections: usize,
    pub failures: usize,
}

/// Paths written for one meeting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SavedDocuments {
    pub statement: Option<PathBuf>,
    pub projections: Option<PathBuf>,
}

impl SavedDocuments {
    fn set(&mut self, kind: DocumentKind, path: PathBuf) {
        match kind {
            DocumentKind::Statement => self.statement = Some(path),
            DocumentKind::Projections => self.projections = Some(path),
        }
    }
}

/// `<base_dir>/<year>/<stub>_<kind>.pdf`
pub fn document_path(base_dir: &Path, meeting: &MeetingRecord, kind: DocumentKind) -> PathBuf {
    base_dir
        .join(meeting.meeting_year().to_string())
        .join(format!("{}_{}.pdf", meeting.filename_stub(), kind.suffix()))
}

/// Download each meeting's documents one at a time, logging one row per meeting.
pub async fn download_documents(
    client: &Client,
    meetings: &[MeetingRecord],
    base_dir: &Path,
    logger: &DownloadLogger,
) -> Result<DownloadStats> {
    let pb = ProgressBar::new(meetings.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut stats = DownloadStats::default();
    info!("Downloading documents for {} meetings, logging to {:?}", meetings.len(), logger.log_path());

    for meeting in meetings {
        pb.set_message(meeting.meeting_date.to_string());
        let saved = download_meeting(client, meeting, base_dir, &mut stats).await?;
        logger.record(meeting, saved.statement.as_deref(), saved.projections.as_deref())?;
        stats.meetings += 1;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Processed {} meetings ({} statements, {} projections, {} failed documents)",
        stats.meetings, stats.statements, stats.projections, stats.failures
    );
    Ok(stats)
}

/// Fetch whichever documents `meeting` links to. A failed or non-PDF response
/// leaves that slot empty; only local write errors propagate.
pub async fn download_meeting(
    client: &Client,
    meeting: &MeetingRecord,
    base_dir: &Path,
    stats: &mut DownloadStats,
) -> Result<SavedDocuments> {
    let mut saved = SavedDocuments::default();

    for kind in DocumentKind::ALL {
        let Some(url) = meeting.document_url(kind) else {
            continue;
        };
        let Some(bytes) = fetch_pdf(client, url).await else {
            stats.failures += 1;
            continue;
        };

        let dest = document_path(base_dir, meeting, kind);
        if let Some(dir) = dest.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }
        fs::write(&dest, &bytes).with_context(|| format!("Failed to write {:?}", dest))?;

        match kind {
            DocumentKind::Statement => stats.statements += 1,
            DocumentKind::Projections => stats.projections += 1,
        }
        saved.set(kind, dest);
    }

    Ok(saved)
}

/// GET `url` and return the body only if the server calls it a PDF.
async fn fetch_pdf(client: &Client, url: &str) -> Option<Vec<u8>> {
    let response = match client.get(url).send().await.and_then(|r| r.error_for_status()) {
        Ok(r) => r,
        Err(e) => {
            warn!("Download failed for {}: {}", url, e);
            return None;
        }
    };

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !is_pdf(&content_type) {
        warn!("Skipping {}: content type {:?} is not a PDF", url, content_type);
        return None;
    }

    match response.bytes().await {
        Ok(b) => Some(b.to_vec()),
        Err(e) => {
            warn!("Failed to read body of {}: {}", url, e);
            None
        }
    }
}

fn is_pdf(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("pdf")
}
