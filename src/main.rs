use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url_summarizer::{
    config::Config,
    cookies::prepare_cookie_file,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("url_summarizer=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let mut config = Config::load()?;
    if config.groq_api_key.is_none() {
        error!("GROQ API Key not found. Please check your environment variables.");
    }

    config.youtube.cookie_file = prepare_cookie_file(&config.cookie_export_path, &config.cookie_file_path);

    let server_addr = config.server_addr;
    let app_state = AppState::new(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;

    info!("Listening on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
