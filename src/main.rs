use augur::config::Config;
use augur::{app, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Starting Augur on {}:{} (primary {}, fallback {})",
        config.host, config.port, config.fetch.coingecko_api_url, config.fetch.coincap_api_url
    );
    if config.telegram.bot_token.is_none() || config.telegram.chat_id.is_none() {
        info!("Telegram alerts not configured; strong signals will be reported but not pushed");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let app = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
