use crate::config::{ExportFilenames, GeocoderSettings, ProviderErrorPolicy};
use crate::domain::model::{ExportBundle, ProfileTable, ResolvedTable, Selection};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn location_column(&self) -> &str;
    fn url_column(&self) -> &str;
    fn normalize_locations(&self) -> bool;
    fn drop_columns(&self) -> &[String];
    fn selected_countries(&self) -> &[String];
    fn bundle_zip(&self) -> bool;
    fn export_filenames(&self) -> ExportFilenames;
    fn geocoder_settings(&self) -> GeocoderSettings;
    fn cache_ttl(&self) -> Duration;
    fn concurrent_requests(&self) -> usize;
    fn provider_error_policy(&self) -> ProviderErrorPolicy;
}

/// Outcome of a single geocoding request that the provider answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Formatted address of the best match.
    Found(String),
    NotFound,
    TimedOut,
}

/// A geocoding provider. Failures other than "no match" and "timed out"
/// come back as `Err`.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Lookup>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ProfileTable>;
    async fn transform(&self, table: ProfileTable) -> Result<ResolvedTable>;
    fn export(&self, table: &ResolvedTable, selection: &Selection) -> Result<ExportBundle>;
    /// Persists the bundle and returns the paths written.
    async fn load(&self, bundle: ExportBundle) -> Result<Vec<String>>;
    fn selection(&self) -> Selection;
    fn output_path(&self) -> &str;
}
