use crate::config::ExportFilenames;
use crate::domain::model::{DownloadPayload, ExportBundle, ResolvedTable};
use crate::utils::error::{LocationFilterError, Result};
use std::collections::BTreeSet;

pub const COUNTRY_COLUMN: &str = "Country";

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub url_column: String,
    pub drop_columns: Vec<String>,
    pub filenames: ExportFilenames,
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| LocationFilterError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Every column in input order plus a trailing `Country` column, with a
/// header row. Columns named in `drop_columns` are left out; names that do
/// not exist are ignored. An input column already called `Country` is
/// replaced by the resolved one.
pub fn labeled_csv(table: &ResolvedTable, drop_columns: &[String]) -> Result<String> {
    let mut dropped: BTreeSet<usize> = drop_columns
        .iter()
        .filter_map(|name| {
            let index = table.column_index(name);
            if index.is_none() {
                tracing::debug!("column '{}' not present, nothing to drop", name);
            }
            index
        })
        .collect();
    if let Some(index) = table.column_index(COUNTRY_COLUMN) {
        dropped.insert(index);
    }

    let kept: Vec<usize> = (0..table.headers.len())
        .filter(|index| !dropped.contains(index))
        .collect();

    let mut writer = csv_writer();

    let mut header: Vec<&str> = kept.iter().map(|&i| table.headers[i].as_str()).collect();
    header.push(COUNTRY_COLUMN);
    writer.write_record(&header)?;

    for resolved in &table.records {
        let mut row: Vec<&str> = kept
            .iter()
            .map(|&i| resolved.record.values.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        row.push(resolved.country.as_deref().unwrap_or(""));
        writer.write_record(&row)?;
    }

    finish(writer)
}

/// Only the profile URLs, one per line, no header. Rows with an empty or
/// missing URL are skipped.
pub fn url_only_csv(table: &ResolvedTable, url_column: &str) -> Result<String> {
    let Some(index) = table.column_index(url_column) else {
        tracing::warn!("⚠️ no '{}' column, URL export will be empty", url_column);
        return Ok(String::new());
    };

    let mut writer = csv_writer();
    for url in table
        .records
        .iter()
        .filter_map(|resolved| resolved.record.get(index))
        .filter(|url| !url.trim().is_empty())
    {
        writer.write_record([url])?;
    }

    finish(writer)
}

/// The three payloads of a run: unfiltered labeled, filtered labeled and
/// filtered URLs.
pub fn export_bundle(
    unfiltered: &ResolvedTable,
    filtered: &ResolvedTable,
    options: &ExportOptions,
) -> Result<ExportBundle> {
    let names = &options.filenames;

    Ok(ExportBundle {
        unfiltered: DownloadPayload::new(
            &names.unfiltered,
            labeled_csv(unfiltered, &options.drop_columns)?,
        ),
        filtered: DownloadPayload::new(
            &names.filtered,
            labeled_csv(filtered, &options.drop_columns)?,
        ),
        profile_urls: DownloadPayload::new(
            &names.profile_urls,
            url_only_csv(filtered, &options.url_column)?,
        ),
        total_records: unfiltered.len(),
        filtered_records: filtered.len(),
    })
}
