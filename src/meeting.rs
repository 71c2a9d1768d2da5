use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

static SLUG_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9-]").unwrap());

/// One FOMC meeting row as read off the calendar page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRecord {
    pub meeting_date: NaiveDate,
    pub label: String,
    pub statement_url: Option<String>,
    pub projection_url: Option<String>,
    pub source_url: String,
}

impl MeetingRecord {
    pub fn meeting_year(&self) -> i32 {
        self.meeting_date.year()
    }

    /// `<YYYY-MM-DD>_<slug>`, where the slug is the lowercased label with
    /// spaces turned into hyphens and everything outside `[a-z0-9-]` dropped.
    pub fn filename_stub(&self) -> String {
        let lowered = self.label.to_lowercase().replace(' ', "-");
        let slug = SLUG_STRIP_RE.replace_all(&lowered, "");
        let slug = if slug.is_empty() { "fomc" } else { slug.as_ref() };
        format!("{}_{}", self.meeting_date.format("%Y-%m-%d"), slug)
    }

    pub fn document_url(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Statement => self.statement_url.as_deref(),
            DocumentKind::Projections => self.projection_url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Statement,
    Projections,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Statement, DocumentKind::Projections];

    pub fn suffix(self) -> &'static str {
        match self {
            DocumentKind::Statement => "statement",
            DocumentKind::Projections => "projections",
        }
    }
}
