pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{LocalStorage, NominatimGeocoder};
pub use core::{
    cache::CountryCache, etl::EtlEngine, pipeline::LocationPipeline, resolver::CountryResolver,
};
pub use utils::error::{LocationFilterError, Result};
