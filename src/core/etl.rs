use crate::core::filter::distinct_countries;
use crate::core::{Pipeline, ResolvedTable};
use crate::domain::model::RunSummary;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Reads the input and labels every row with its country.
    pub async fn resolve(&self) -> Result<ResolvedTable> {
        let table = self.pipeline.extract().await?;
        self.pipeline.transform(table).await
    }

    /// The countries a user can choose from.
    pub async fn countries(&self) -> Result<Vec<String>> {
        let resolved = self.resolve().await?;
        Ok(distinct_countries(&resolved))
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting location filter run");

        let resolved = self.resolve().await?;
        let countries = distinct_countries(&resolved);
        tracing::info!("🌍 Countries found: {}", countries.join(", "));

        let selection = self.pipeline.selection();
        if selection.is_empty() {
            tracing::info!("No countries selected, the filtered exports keep every row");
        }
        for unknown in selection.unknown(&countries) {
            tracing::warn!("⚠️ Selected country '{}' does not appear in the data", unknown);
        }

        let bundle = self.pipeline.export(&resolved, &selection)?;
        let (total_records, filtered_records) = (bundle.total_records, bundle.filtered_records);

        let files = self.pipeline.load(bundle).await?;

        Ok(RunSummary {
            output_path: self.pipeline.output_path().to_string(),
            total_records,
            filtered_records,
            countries,
            files,
        })
    }
}
