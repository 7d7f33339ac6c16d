use crate::config::GeocoderSettings;
use crate::domain::ports::{Geocoder, Lookup};
use crate::utils::error::{LocationFilterError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Place {
    display_name: String,
}

/// Geocoder backed by a Nominatim `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    language: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            language: settings.language.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.endpoint)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Lookup> {
        tracing::debug!("📡 Geocoding '{}' via {}", query, self.endpoint);

        let request = self.client.get(self.search_url()).query(&[
            ("q", query),
            ("format", "jsonv2"),
            ("limit", "1"),
            ("accept-language", self.language.as_str()),
        ]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Ok(Lookup::TimedOut),
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        tracing::debug!("Geocoder response status: {}", status);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Ok(Lookup::TimedOut),
            Err(e) => return Err(e.into()),
        };

        if !status.is_success() {
            return Err(LocationFilterError::ProviderError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let places: Vec<Place> = serde_json::from_str(&body)?;
        Ok(places
            .into_iter()
            .next()
            .map(|place| Lookup::Found(place.display_name))
            .unwrap_or(Lookup::NotFound))
    }
}
