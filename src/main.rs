use bus_temperature_api::{
    create_pool,
    handlers::AppState,
    repositories::PgReadingRepository,
    routes,
    services::ReadingService,
    Config,
};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},bus_temperature_api=debug", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting bus-temperature-api");
    tracing::info!(table = %config.database.table, "Configuration loaded");

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    let repository = PgReadingRepository::new(pool);
    let service = ReadingService::new(Arc::new(repository), config.database.table.clone());

    let app = routes::create_router(AppState {
        service,
        uniform_error_status: config.server.uniform_error_status,
    });

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Application shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
