use space_booking_api::{app, config, middleware, services};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Space Booking API server"
    );

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;
    info!("Database connection pool created");

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Database migrations completed");

    let outcome = services::staff_bootstrap::bootstrap_staff(&pool, &config.admin).await?;
    info!(?outcome, "Staff bootstrap finished");

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool)?;

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
