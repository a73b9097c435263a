use std::sync::Arc;

use task_garden::api::{AppState, cors_layer, garden_routes};
use task_garden::chat::ChatService;
use task_garden::config::ServerConfig;
use task_garden::garden::GardenStore;
use task_garden::llm::{LlmConfig, create_provider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env()?;
    let llm_config = LlmConfig::from_env()?;

    eprintln!("🌱 Task Garden v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Environment: {}", server_config.environment);
    eprintln!("   LLM: {} ({})", llm_config.backend, llm_config.model);
    eprintln!(
        "   CORS: {}",
        server_config
            .frontend_url
            .as_deref()
            .unwrap_or("all origins")
    );

    if !llm_config.has_api_key() {
        tracing::warn!(
            var = llm_config.backend.api_key_var(),
            "API key not set; chat requests will fail until it is configured"
        );
    }

    let llm = create_provider(&llm_config)?;

    // ── State ────────────────────────────────────────────────────────────
    let store = GardenStore::new();
    let chat = Arc::new(ChatService::new(Arc::clone(&store), llm));

    let app = garden_routes(AppState { store, chat })
        .layer(cors_layer(server_config.frontend_url.as_deref())?);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", server_config.port)).await?;
    tracing::info!(port = server_config.port, "Garden API server started");
    eprintln!("   API: http://0.0.0.0:{}/api\n", server_config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
