use clap::Parser;
use club_booking::api::{create_router, ApiState};
use club_booking::utils::error::{BookingError, ErrorSeverity};
use club_booking::utils::{logger, validation::Validate};
use club_booking::{BookingConfig, BookingService, CliConfig, JsonRepository, LocalStorage, SystemClock};
use std::sync::Arc;

fn exit_with(e: &BookingError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Critical => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match BookingConfig::from_file_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }

    tracing::info!("Starting club-booking {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Configuration: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let storage = LocalStorage::new(config.data_directory());
    let repository = JsonRepository::new(
        storage,
        config.data.clubs_file.clone(),
        config.data.competitions_file.clone(),
    );

    // Nothing can be served without both collections.
    let service = match BookingService::load(repository, SystemClock).await {
        Ok(service) => service,
        Err(e) => exit_with(&e),
    };

    let app = create_router(Arc::new(ApiState { service }));
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("📡 Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
