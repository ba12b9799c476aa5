use devconnect_api::config::AppConfig;
use devconnect_api::state::AppState;
use devconnect_api::{app, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    let pool = database::connect(&config.database_url).await?;
    database::migrate(&pool).await?;

    let port = config.port;
    let state = AppState::new(config, pool)?;
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("🚀 DevConnect API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
