pub mod cache;
pub mod etl;
pub mod export;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod resolver;

pub use crate::domain::model::{ProfileTable, Record, ResolvedTable, Selection};
pub use crate::domain::ports::{ConfigProvider, Geocoder, Lookup, Pipeline, Storage};
pub use crate::utils::error::Result;
