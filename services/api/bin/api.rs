//! Main Entrypoint for the Tutor API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Loading and validating the course catalog and tutor instructions.
//! 3. Initializing the AI client and the lesson engine.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tutor_api::{config::Config, router::create_router, state::AppState};
use tutor_core::{
    catalog::CourseCatalog,
    llm_client::{OpenAICompatibleClient, TutorClient},
    progression::LessonEngine,
    prompts::PromptSet,
};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Load Course Content ---
    let catalog = Arc::new(
        CourseCatalog::load(&config.catalog_path).context("Failed to load course catalog")?,
    );
    catalog
        .get_course(&config.default_course_id)
        .context("DEFAULT_COURSE_ID does not name a course in the catalog")?;
    let prompts = Arc::new(
        PromptSet::load(&config.prompts_path).context("Failed to load prompt overrides")?,
    );

    // --- 4. Initialize Shared Services ---
    info!(provider = ?config.provider, base_url = %config.base_url, "Configuring tutor AI client.");
    let openai_config = OpenAIConfig::new()
        .with_api_key(&config.api_key)
        .with_api_base(&config.base_url);
    let tutor: Arc<dyn TutorClient> = Arc::new(OpenAICompatibleClient::new(
        openai_config,
        config.generation_settings(),
    ));

    let app_state = Arc::new(AppState {
        engine: Arc::new(LessonEngine::new(catalog, tutor, prompts)),
        default_course_id: Arc::new(config.default_course_id.clone()),
    });

    // --- 5. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 6. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
