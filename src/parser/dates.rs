use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(20\d{2})").unwrap());
static MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s+([0-9]{1,2})(?:-[0-9]{1,2})?").unwrap());

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// First `20xx` year found anywhere in `text`.
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_RE.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Parse calendar header text such as `"January 30-31"` or
/// `"Jan 31-Feb 1, 2024"` into a date in `year`. Ranges resolve to their
/// first day. Anything after a colon (e.g. `"March 19-20*: notation vote"`)
/// is ignored.
pub fn parse_meeting_date(raw: &str, year: i32) -> Option<NaiveDate> {
    let cleaned = normalize_whitespace(raw);
    let cleaned = cleaned.split(':').next().unwrap_or("");
    let cleaned = cleaned
        .replace(['\u{2013}', '\u{2014}'], "-")
        .replace(',', "");

    let caps = MONTH_DAY_RE.captures(&cleaned)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Full month names or any prefix of at least three letters ("Jan", "Sept").
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|i| i as u32 + 1)
}
