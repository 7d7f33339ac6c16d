//! Wiring shared by the binaries: build the adapters from a config, run the
//! engine, and report failures the same way everywhere.

use crate::adapters::{LocalStorage, NominatimGeocoder};
use crate::core::cache::CountryCache;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::LocationPipeline;
use crate::core::resolver::CountryResolver;
use crate::core::ConfigProvider;
use crate::domain::model::RunSummary;
use crate::utils::error::{LocationFilterError, Result};
use std::sync::Arc;

pub type LocationEngine<C> = EtlEngine<LocationPipeline<LocalStorage, C, NominatimGeocoder>>;

/// Engine backed by the local filesystem and Nominatim.
pub fn build_engine<C: ConfigProvider>(config: C) -> Result<LocationEngine<C>> {
    let geocoder = NominatimGeocoder::new(&config.geocoder_settings())?;
    let cache = Arc::new(CountryCache::new(config.cache_ttl()));
    let resolver = CountryResolver::from_config(geocoder, cache, &config);
    let pipeline = LocationPipeline::new(LocalStorage::default(), config, resolver);
    Ok(EtlEngine::new(pipeline))
}

pub enum Outcome {
    Countries(Vec<String>),
    Exported(RunSummary),
}

pub async fn run<C: ConfigProvider>(config: C, list_countries: bool) -> Result<Outcome> {
    let engine = build_engine(config)?;
    if list_countries {
        Ok(Outcome::Countries(engine.countries().await?))
    } else {
        Ok(Outcome::Exported(engine.run().await?))
    }
}

pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Countries(countries) => {
            if countries.is_empty() {
                println!("No countries could be resolved from the input.");
            }
            for country in countries {
                println!("{}", country);
            }
        }
        Outcome::Exported(summary) => {
            tracing::info!("✅ Location filter completed successfully!");
            println!("✅ Location filter completed successfully!");
            println!(
                "📊 {} of {} profiles matched the selection",
                summary.filtered_records, summary.total_records
            );
            println!("🌍 Countries: {}", summary.countries.join(", "));
            for file in &summary.files {
                println!("📁 {}", file);
            }
        }
    }
}

/// Logs the failure and returns the process exit code for it.
pub fn report_failure(e: &LocationFilterError) -> i32 {
    tracing::error!(
        "❌ Location filter failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    e.exit_code()
}
