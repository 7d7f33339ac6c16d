use crate::core::export::{export_bundle, ExportOptions};
use crate::core::filter::apply_selection;
use crate::core::normalizer::normalize_location;
use crate::core::reader::parse_profiles;
use crate::core::resolver::CountryResolver;
use crate::core::{ConfigProvider, Geocoder, Pipeline, Storage};
use crate::domain::model::{ExportBundle, ProfileTable, ResolvedTable, Selection};
use crate::utils::error::{LocationFilterError, Result};
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

/// CSV in, countries resolved, three CSV exports out.
pub struct LocationPipeline<S: Storage, C: ConfigProvider, G: Geocoder> {
    storage: S,
    config: C,
    resolver: CountryResolver<G>,
}

impl<S: Storage, C: ConfigProvider, G: Geocoder> LocationPipeline<S, C, G> {
    pub fn new(storage: S, config: C, resolver: CountryResolver<G>) -> Self {
        Self {
            storage,
            config,
            resolver,
        }
    }

    pub fn resolver(&self) -> &CountryResolver<G> {
        &self.resolver
    }

    fn output_file(&self, filename: &str) -> String {
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }

    /// Geocoder queries, one per row, optionally normalized.
    fn queries(&self, table: &ProfileTable) -> Vec<Option<String>> {
        let locations = table.column_values(self.config.location_column());
        if self.config.normalize_locations() {
            locations.into_iter().map(normalize_location).collect()
        } else {
            locations
                .into_iter()
                .map(|location| location.map(str::to_string))
                .collect()
        }
    }

    fn zip_bundle(&self, bundle: &ExportBundle) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for payload in bundle.payloads() {
            zip.start_file::<_, ()>(payload.filename.as_str(), FileOptions::default())?;
            zip.write_all(payload.as_bytes())?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, G: Geocoder> Pipeline for LocationPipeline<S, C, G> {
    async fn extract(&self) -> Result<ProfileTable> {
        let input = self.config.input_path();
        tracing::info!("📥 Reading profiles from {}", input);

        let data = self.storage.read_file(input).await?;
        let table = parse_profiles(&data)?;

        let location_column = self.config.location_column();
        if table.column_index(location_column).is_none() {
            return Err(LocationFilterError::MissingColumnError {
                column: location_column.to_string(),
            });
        }
        if table.column_index(self.config.url_column()).is_none() {
            tracing::warn!(
                "⚠️ No '{}' column in {}, the URL export will be empty",
                self.config.url_column(),
                input
            );
        }

        tracing::info!("📊 Extracted {} profiles", table.len());
        Ok(table)
    }

    async fn transform(&self, table: ProfileTable) -> Result<ResolvedTable> {
        tracing::info!(
            "🔧 Resolving countries for {} profiles (normalize: {})",
            table.len(),
            self.config.normalize_locations()
        );

        let queries = self.queries(&table);
        let countries = self.resolver.resolve_all(&queries).await?;

        let stats = self.resolver.stats();
        tracing::info!(
            "✅ Resolution done: {} resolved, {} unresolved, {} cache hits, {} provider calls",
            stats.resolved,
            stats.unresolved,
            stats.cache_hits,
            stats.provider_calls
        );
        if stats.degraded > 0 {
            tracing::warn!("⚠️ {} lookups failed and were left blank", stats.degraded);
        }

        Ok(ResolvedTable::label(table, countries))
    }

    fn export(&self, table: &ResolvedTable, selection: &Selection) -> Result<ExportBundle> {
        let filtered = apply_selection(table, selection);
        tracing::info!(
            "🔎 {} of {} profiles match the selection",
            filtered.len(),
            table.len()
        );

        let options = ExportOptions {
            url_column: self.config.url_column().to_string(),
            drop_columns: self.config.drop_columns().to_vec(),
            filenames: self.config.export_filenames(),
        };
        export_bundle(table, &filtered, &options)
    }

    async fn load(&self, bundle: ExportBundle) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for payload in bundle.payloads() {
            let path = self.output_file(&payload.filename);
            tracing::debug!("Writing {} ({} bytes)", path, payload.content.len());
            self.storage.write_file(&path, payload.as_bytes()).await?;
            written.push(path);
        }

        if self.config.bundle_zip() {
            let zip_data = self.zip_bundle(&bundle)?;
            let path = self.output_file(&self.config.export_filenames().archive);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), path);
            self.storage.write_file(&path, &zip_data).await?;
            written.push(path);
        }

        tracing::info!("💾 Wrote {} files to {}", written.len(), self.config.output_path());
        Ok(written)
    }

    fn selection(&self) -> Selection {
        Selection::new(self.config.selected_countries())
    }

    fn output_path(&self) -> &str {
        self.config.output_path()
    }
}
