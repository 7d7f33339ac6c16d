use httpmock::prelude::*;
use location_filter::config::{GeocoderSettings, ProviderErrorPolicy};
use location_filter::core::ConfigProvider;
use location_filter::{
    CountryCache, CountryResolver, EtlEngine, LocalStorage, LocationFilterError, LocationPipeline,
    NominatimGeocoder, TomlConfig,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const PROFILES: &str = "Name,Location,Profile URL\n\
Ann,Greater London Area,u1\n\
Bob,\"Paris, France\",u2\n\
Cy,,u3\n";

fn write_input(dir: &TempDir, content: &str) {
    std::fs::write(dir.path().join("profiles.csv"), content).unwrap();
}

fn read_output(dir: &TempDir, file: &str) -> String {
    std::fs::read_to_string(dir.path().join("out").join(file)).unwrap()
}

fn toml_config(endpoint: &str, extra: &str) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[input]
path = "profiles.csv"

[geocoder]
endpoint = "{}"
user_agent = "location-filter-tests"

[export]
output_path = "out"

{}
"#,
        endpoint, extra
    ))
    .unwrap()
}

fn engine_with_settings<C: ConfigProvider>(
    dir: &TempDir,
    config: C,
    settings: GeocoderSettings,
) -> EtlEngine<LocationPipeline<LocalStorage, C, NominatimGeocoder>> {
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    let geocoder = NominatimGeocoder::new(&settings).unwrap();
    let cache = Arc::new(CountryCache::new(config.cache_ttl()));
    let resolver = CountryResolver::from_config(geocoder, cache, &config);
    EtlEngine::new(LocationPipeline::new(storage, config, resolver))
}

fn engine<C: ConfigProvider>(
    dir: &TempDir,
    config: C,
) -> EtlEngine<LocationPipeline<LocalStorage, C, NominatimGeocoder>> {
    let settings = config.geocoder_settings();
    engine_with_settings(dir, config, settings)
}

fn mock_places(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
    let london = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("q", "london")
            .query_param("accept-language", "en");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"display_name": "London, Greater London, England, United Kingdom"}
            ]));
    });
    let paris = server.mock(|when, then| {
        when.method(GET).path("/search").query_param("q", "paris, france");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"display_name": "Paris, Île-de-France, Metropolitan France, France"}
            ]));
    });
    (london, paris)
}

#[tokio::test]
async fn test_end_to_end_filter_by_country() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, PROFILES);

    let server = MockServer::start();
    let (london, paris) = mock_places(&server);

    let config = toml_config(&server.base_url(), "[filter]\ncountries = [\"France\"]\n");
    let summary = engine(&dir, config).run().await.unwrap();

    london.assert();
    paris.assert();

    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.filtered_records, 1);
    assert_eq!(summary.countries, vec!["France", "United Kingdom"]);

    assert_eq!(
        read_output(&dir, "unfiltered_data.csv"),
        "Name,Location,Profile URL,Country\n\
Ann,Greater London Area,u1,United Kingdom\n\
Bob,\"Paris, France\",u2,France\n\
Cy,,u3,\n"
    );
    assert_eq!(
        read_output(&dir, "filtered_data.csv"),
        "Name,Location,Profile URL,Country\nBob,\"Paris, France\",u2,France\n"
    );
    assert_eq!(read_output(&dir, "profile_urls.csv"), "u2\n");
}

#[tokio::test]
async fn test_list_countries_then_run_reuses_cache() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, PROFILES);

    let server = MockServer::start();
    let (london, paris) = mock_places(&server);

    let engine = engine(&dir, toml_config(&server.base_url(), ""));

    let countries = engine.countries().await.unwrap();
    assert_eq!(countries, vec!["France", "United Kingdom"]);

    let summary = engine.run().await.unwrap();
    assert_eq!(summary.filtered_records, 3);
    assert_eq!(read_output(&dir, "profile_urls.csv"), "u1\nu2\nu3\n");

    london.assert_hits(1);
    paris.assert_hits(1);
}

#[tokio::test]
async fn test_drop_columns_and_zip_bundle() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, PROFILES);

    let server = MockServer::start();
    mock_places(&server);

    let mut config = toml_config(&server.base_url(), "");
    config.export.drop_columns = vec!["Name".to_string()];
    config.export.zip = true;
    config.filter.countries = vec!["United Kingdom".to_string()];

    let summary = engine(&dir, config).run().await.unwrap();
    assert_eq!(summary.files.len(), 4);

    assert_eq!(
        read_output(&dir, "filtered_data.csv"),
        "Location,Profile URL,Country\nGreater London Area,u1,United Kingdom\n"
    );

    let zip_path = dir.path().join("out").join("location_filter_output.zip");
    assert!(Path::new(&zip_path).exists());
    let archive = zip::ZipArchive::new(std::fs::File::open(zip_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 3);
}

#[tokio::test]
async fn test_timeout_leaves_country_blank() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, "Location,Profile URL\nSlow Town,u1\n");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .delay(Duration::from_millis(1500))
            .json_body(serde_json::json!([]));
    });

    let config = toml_config(&server.base_url(), "");
    let settings = GeocoderSettings {
        timeout: Duration::from_millis(200),
        ..config.geocoder_settings()
    };
    let summary = engine_with_settings(&dir, config, settings)
        .run()
        .await
        .unwrap();

    assert!(summary.countries.is_empty());
    assert_eq!(
        read_output(&dir, "unfiltered_data.csv"),
        "Location,Profile URL,Country\nSlow Town,u1,\n"
    );
}

#[tokio::test]
async fn test_provider_error_aborts_by_default() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, PROFILES);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(503).body("busy");
    });

    let config = toml_config(&server.base_url(), "");
    assert_eq!(config.provider_error_policy(), ProviderErrorPolicy::Abort);

    let err = engine(&dir, config).run().await.unwrap_err();
    assert!(matches!(err, LocationFilterError::ProviderError { status: 503, .. }));
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_provider_error_degrades_when_configured() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, PROFILES);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(503).body("busy");
    });

    let mut config = toml_config(&server.base_url(), "");
    config.geocoder.on_error = ProviderErrorPolicy::Degrade;

    let summary = engine(&dir, config).run().await.unwrap();
    assert!(summary.countries.is_empty());
    assert_eq!(summary.filtered_records, 3);
}

#[tokio::test]
async fn test_missing_location_column_fails() {
    let dir = TempDir::new().unwrap();
    write_input(&dir, "Name,Profile URL\nAnn,u1\n");

    let server = MockServer::start();
    let config = toml_config(&server.base_url(), "");

    let err = engine(&dir, config).run().await.unwrap_err();
    assert!(matches!(err, LocationFilterError::MissingColumnError { ref column } if column == "Location"));
    assert_eq!(err.exit_code(), 1);
}

#[cfg(feature = "cli")]
#[tokio::test]
async fn test_cli_config_drives_the_same_run() {
    use clap::Parser;
    use location_filter::CliConfig;

    let dir = TempDir::new().unwrap();
    write_input(&dir, PROFILES);

    let server = MockServer::start();
    mock_places(&server);

    let config = CliConfig::parse_from([
        "location-filter",
        "--input",
        "profiles.csv",
        "--output-path",
        "out",
        "--country",
        "United Kingdom",
        "--geocoder-endpoint",
        server.base_url().as_str(),
        "--concurrent-requests",
        "2",
    ]);

    let summary = engine(&dir, config).run().await.unwrap();
    assert_eq!(summary.filtered_records, 1);
    assert_eq!(read_output(&dir, "profile_urls.csv"), "u1\n");
}
