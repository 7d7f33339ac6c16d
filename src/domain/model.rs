use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One CSV row. Values line up with the owning table's headers; an empty
/// cell is the absent marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub values: Vec<String>,
}

impl Record {
    pub fn new<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Value at `index`, or `None` when the cell is missing or empty.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values
            .get(index)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .or_else(|| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name.trim()))
        })
}

/// Profiles as read from the input CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl ProfileTable {
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    /// Exact header match first, then ASCII case-insensitive.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        find_column(&self.headers, name)
    }

    /// Every record's value for `column`; all `None` if the column is absent.
    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        match self.column_index(column) {
            Some(index) => self.records.iter().map(|r| r.get(index)).collect(),
            None => vec![None; self.records.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A profile row labeled with the country its location resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub record: Record,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTable {
    pub headers: Vec<String>,
    pub records: Vec<ResolvedRecord>,
}

impl ResolvedTable {
    /// Pairs each profile with its country. `countries` must be row-aligned.
    pub fn label(table: ProfileTable, countries: Vec<Option<String>>) -> Self {
        debug_assert_eq!(table.records.len(), countries.len());
        let records = table
            .records
            .into_iter()
            .zip(countries)
            .map(|(record, country)| ResolvedRecord { record, country })
            .collect();

        Self {
            headers: table.headers,
            records,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        find_column(&self.headers, name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Countries chosen by the user. Input order and duplicates are irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    countries: BTreeSet<String>,
}

impl Selection {
    pub fn new<I, T>(countries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.contains(country)
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(String::as_str)
    }

    /// Selected names that do not appear among `candidates`.
    pub fn unknown<'a>(&'a self, candidates: &[String]) -> Vec<&'a str> {
        self.iter()
            .filter(|country| !candidates.iter().any(|c| c == country))
            .collect()
    }
}

/// A named CSV document ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    pub filename: String,
    pub content: String,
}

impl DownloadPayload {
    pub fn new(filename: impl Into<String>, content: String) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// The three exports of one run.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub unfiltered: DownloadPayload,
    pub filtered: DownloadPayload,
    pub profile_urls: DownloadPayload,
    pub total_records: usize,
    pub filtered_records: usize,
}

impl ExportBundle {
    pub fn payloads(&self) -> [&DownloadPayload; 3] {
        [&self.unfiltered, &self.filtered, &self.profile_urls]
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_path: String,
    pub total_records: usize,
    pub filtered_records: usize,
    pub countries: Vec<String>,
    pub files: Vec<String>,
}
