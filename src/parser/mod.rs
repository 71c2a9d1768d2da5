pub mod dates;
pub mod links;
pub mod tree;

use std::sync::LazyLock;

use chrono::{Datelike, Local};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::meeting::MeetingRecord;
use dates::{extract_year, normalize_whitespace, parse_meeting_date};

static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static DATA_CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

const YEAR_ATTRS: &[&str] = &["id", "data-year", "aria-labelledby"];
const HEADING_TAGS: &[&str] = &["h2", "h3", "h4", "h5"];

pub const DEFAULT_YEARS: i32 = 10;

/// Parse the calendar page relative to the current local year.
pub fn parse_calendar(html: &str, source_url: &Url, max_years: i32) -> Vec<MeetingRecord> {
    parse_calendar_at(html, source_url, max_years, Local::now().year())
}

/// Rows → meeting records, keeping years >= `current_year - max_years + 1`.
/// Output is sorted by date; same-date rows keep page order.
pub fn parse_calendar_at(
    html: &str,
    source_url: &Url,
    max_years: i32,
    current_year: i32,
) -> Vec<MeetingRecord> {
    let document = Html::parse_document(html);
    let min_year = current_year - max_years + 1;
    let mut meetings = Vec::new();

    for row in document.select(&ROW_SEL) {
        let (Some(date_cell), Some(link_cell)) = (
            row.select(&HEADER_CELL_SEL).next(),
            row.select(&DATA_CELL_SEL).next(),
        ) else {
            continue;
        };

        let Some(year) = infer_year(row) else {
            continue;
        };
        if year < min_year {
            continue;
        }

        let date_text = element_text(date_cell);
        let Some(meeting_date) = parse_meeting_date(&date_text, year) else {
            debug!("Dropping row with unparsable date {:?} ({})", date_text, year);
            continue;
        };

        let doc_links = links::extract(link_cell, source_url);

        let description = element_text(link_cell);
        let label = if description.is_empty() {
            context_label(row).unwrap_or_else(|| format!("FOMC {}", year))
        } else {
            description
        };

        meetings.push(MeetingRecord {
            meeting_date,
            label,
            statement_url: doc_links.statement,
            projection_url: doc_links.projection,
            source_url: source_url.to_string(),
        });
    }

    meetings.sort_by_key(|m| m.meeting_date);
    meetings
}

/// Year from the closest ancestor whose id-like attributes or text mention `20xx`.
fn infer_year(row: ElementRef<'_>) -> Option<i32> {
    tree::nearest_labeled_ancestor(&row, |ancestor| {
        let el = ancestor.value();
        YEAR_ATTRS
            .iter()
            .filter_map(|attr| el.attr(attr))
            .find_map(extract_year)
            .or_else(|| extract_year(&ancestor.text().collect::<Vec<_>>().join(" ")))
    })
}

fn context_label(row: ElementRef<'_>) -> Option<String> {
    let heading = tree::preceding_element(row, HEADING_TAGS)?;
    Some(element_text(heading)).filter(|t| !t.is_empty())
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

// ── Tests ──
