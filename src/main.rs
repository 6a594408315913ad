use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    metis_api::logging::init();

    // Initialize configuration (this loads the config singleton)
    let config = metis_api::config::config();
    info!("Starting Metis API in {:?} mode", config.environment);

    metis_api::server::serve(config).await
}
