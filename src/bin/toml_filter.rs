use clap::Parser;
use location_filter::app;
use location_filter::config::toml_config::TomlConfig;
use location_filter::core::ConfigProvider;
use location_filter::utils::{logger, validation::Validate};

#[derive(Parser)]
#[command(name = "toml-location-filter")]
#[command(about = "Location filter driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "location-filter.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Replace the configured country selection
    #[arg(long = "country", value_delimiter = ',')]
    countries: Option<Vec<String>>,

    /// Print the countries found in the input and exit
    #[arg(long)]
    list_countries: bool,

    /// Show the effective configuration without reading the input
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("🚀 Starting TOML-based location filter");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(countries) = args.countries.clone() {
        tracing::info!("🔧 Country selection overridden to: {}", countries.join(", "));
        config.filter.countries = countries;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No input read, no geocoding performed");
        return;
    }

    match app::run(config, args.list_countries).await {
        Ok(outcome) => app::print_outcome(&outcome),
        Err(e) => {
            let exit_code = app::report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let geocoder = config.geocoder_settings();
    let filenames = config.export_filenames();

    println!("📋 Configuration Summary:");
    println!("  Input: {}", config.input_path());
    println!(
        "  Columns: location='{}', url='{}'",
        config.location_column(),
        config.url_column()
    );
    println!("  Normalize locations: {}", config.normalize_locations());
    println!(
        "  Geocoder: {} (timeout {}s, language {})",
        geocoder.endpoint,
        geocoder.timeout.as_secs(),
        geocoder.language
    );
    println!("  Concurrent Requests: {}", config.concurrent_requests());
    println!("  On provider error: {:?}", config.provider_error_policy());
    println!("  Cache TTL: {}h", config.cache_ttl().as_secs() / 3600);

    let selected = config.selected_countries();
    if selected.is_empty() {
        println!("  Countries: (all)");
    } else {
        println!("  Countries: {}", selected.join(", "));
    }

    if !config.drop_columns().is_empty() {
        println!("  Dropped columns: {}", config.drop_columns().join(", "));
    }

    println!("  Output: {}", config.output_path());
    println!(
        "  Files: {}, {}, {}",
        filenames.unfiltered, filenames.filtered, filenames.profile_urls
    );
    if config.bundle_zip() {
        println!("  Archive: {}", filenames.archive);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
}
