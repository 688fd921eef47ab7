use deskhub_proxy::ProxyConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the deskhub front-end server
///
/// Serves the built single-page bundle and forwards `/api` and `/socket.io` to the backend,
/// so the browser sees a single origin.
///
/// # Environment Variables
/// - `PORT`: listen port (default: 3000)
/// - `BACKEND_URL`: backend origin (default: "http://localhost:5000")
/// - `FRONTEND_BUILD_DIR`: directory holding `index.html` and assets (default: "./frontend/build")
///
/// # Returns
/// * `Ok(())` - If the server runs until shutdown
/// * `Err(anyhow::Error)` - If the configuration is invalid or the port cannot be bound
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deskhub_run=info".parse()?)
                .add_directive("deskhub_proxy=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProxyConfig::from_env_values(
        std::env::var("PORT").ok(),
        std::env::var("BACKEND_URL").ok(),
        std::env::var("FRONTEND_BUILD_DIR").ok(),
    )?;
    tracing::debug!(?config, "resolved proxy configuration");

    deskhub_proxy::serve(config).await?;
    Ok(())
}
