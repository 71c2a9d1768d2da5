use std::io;
use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No statements found for {0}")]
    NotFound(String),
    #[error("failed to read download log: {0}")]
    Io(#[from] io::Error),
    #[error("malformed download log: {0}")]
    Csv(#[from] csv::Error),
}

/// One download-log row as served by the API. The timestamp column is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogEntry {
    pub meeting_date: String,
    pub meeting_label: String,
    pub statement_path: String,
    pub projection_path: String,
    pub source_url: String,
}

impl CatalogEntry {
    pub fn year(&self) -> &str {
        self.meeting_date.split('-').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGroup {
    pub year: String,
    pub entries: Vec<CatalogEntry>,
}

/// Log entries grouped by year: years descending, each year's entries ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<YearGroup>,
}

impl Catalog {
    pub fn years(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.year.clone()).collect()
    }

    pub fn year(&self, year: &str) -> Result<&[CatalogEntry], CatalogError> {
        self.groups
            .iter()
            .find(|g| g.year == year)
            .map(|g| g.entries.as_slice())
            .ok_or_else(|| CatalogError::NotFound(year.to_string()))
    }
}

// Serialized as a JSON object; key order follows `groups`.
impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.year, &group.entries)?;
        }
        map.end()
    }
}

/// Read every row of the download log. A log that does not exist yet is empty.
pub fn load_entries(log_path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    if !log_path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(log_path)?;
    let entries = reader.deserialize().collect::<Result<Vec<CatalogEntry>, _>>()?;
    Ok(entries)
}

pub fn group_by_year(entries: Vec<CatalogEntry>) -> Catalog {
    let mut groups: Vec<YearGroup> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|g| g.year == entry.year()) {
            Some(group) => group.entries.push(entry),
            None => groups.push(YearGroup {
                year: entry.year().to_string(),
                entries: vec![entry],
            }),
        }
    }
    for group in &mut groups {
        group.entries.sort_by(|a, b| a.meeting_date.cmp(&b.meeting_date));
    }
    groups.sort_by(|a, b| b.year.cmp(&a.year));
    Catalog { groups }
}

pub fn load_catalog(log_path: &Path) -> Result<Catalog, CatalogError> {
    Ok(group_by_year(load_entries(log_path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LOG: &str = "\
timestamp,meeting_date,meeting_label,statement_path,projection_path,source_url
2025-01-02T00:00:00.000000,2023-12-12,December,data/2023/s.pdf,missing,https://fed.test/cal
2025-01-02T00:00:01.000000,2024-03-19,March,data/2024/m.pdf,data/2024/p.pdf,https://fed.test/cal
2025-01-02T00:00:02.000000,2024-01-30,\"Statement, January\",missing,missing,https://fed.test/cal
2025-01-02T00:00:03.000000,2015-03-17,March 2015,missing,missing,https://fed.test/cal
";

    fn entry(date: &str) -> CatalogEntry {
        CatalogEntry {
            meeting_date: date.into(),
            meeting_label: date.into(),
            statement_path: "missing".into(),
            projection_path: "missing".into(),
            source_url: "u".into(),
        }
    }

    #[test]
    fn loads_rows_and_ignores_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_log.csv");
        fs::write(&path, LOG).unwrap();

        let entries = load_entries(&path).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2].meeting_label, "Statement, January");
        assert_eq!(entries[1].projection_path, "data/2024/p.pdf");
    }

    #[test]
    fn missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_catalog(&dir.path().join("nope.csv")).unwrap();
        assert!(catalog.years().is_empty());
    }

    #[test]
    fn malformed_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_log.csv");
        fs::write(&path, "meeting_date\n2024-01-30\n").unwrap();
        assert!(matches!(load_entries(&path), Err(CatalogError::Csv(_))));
    }

    #[test]
    fn groups_years_descending_dates_ascending() {
        let catalog = group_by_year(vec![
            entry("2023-12-12"),
            entry("2024-03-19"),
            entry("2024-01-30"),
            entry("2015-03-17"),
            entry("2024-01-30"),
        ]);
        assert_eq!(catalog.years(), vec!["2024", "2023", "2015"]);
        let dates: Vec<&str> = catalog
            .year("2024")
            .unwrap()
            .iter()
            .map(|e| e.meeting_date.as_str())
            .collect();
        assert_eq!(dates, vec!["2024-01-30", "2024-01-30", "2024-03-19"]);
    }

    #[test]
    fn unknown_year_not_found() {
        let catalog = group_by_year(vec![entry("2024-01-30")]);
        let err = catalog.year("2099").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(err.to_string(), "No statements found for 2099");
    }

    #[test]
    fn serializes_in_year_order() {
        let catalog = group_by_year(vec![entry("2015-03-17"), entry("2024-01-30"), entry("2019-06-18")]);
        let json = serde_json::to_string(&catalog).unwrap();
        let p24 = json.find("\"2024\"").unwrap();
        let p19 = json.find("\"2019\"").unwrap();
        let p15 = json.find("\"2015\"").unwrap();
        assert!(p24 < p19 && p19 < p15);
    }
}
