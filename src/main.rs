use clap::Parser;
use location_filter::app;
use location_filter::utils::{logger, validation::Validate};
use location_filter::CliConfig;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting location-filter CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let list_countries = config.list_countries;
    match app::run(config, list_countries).await {
        Ok(outcome) => app::print_outcome(&outcome),
        Err(e) => {
            let exit_code = app::report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
