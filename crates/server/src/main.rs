use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use albumdrop_core::{
    create_authenticator, load_config, validate_config, Authenticator, BlockingBridge,
    CacheIndex, CacheLocator, ContentLibrary, DeliveryNotifier, DirectoryCacheIndex,
    DownloadOrchestrator, RequestDispatcher, SanitizedConfig, SubprocessLibrary, TokioSpawner,
    Transport,
};
use albumdrop_server::api::create_router;
use albumdrop_server::onebot::OneBotClient;
use albumdrop_server::state::AppState;

// Blocking library calls run on tokio's blocking pool, so a single scheduler
// thread is enough for the listener and every orchestration task.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ALBUMDROP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        config = %serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default(),
        "Configuration loaded successfully"
    );

    // Working directories
    tokio::fs::create_dir_all(&config.output.download_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create download directory {:?}",
                config.output.download_dir
            )
        })?;
    if let Some(parent) = config
        .library
        .config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create library config directory {:?}", parent))?;
    }

    // Content library and cache index
    let library: Arc<dyn ContentLibrary> = Arc::new(SubprocessLibrary::new(
        config.library.clone(),
        &config.output,
    ));
    info!(
        library = library.name(),
        program = %config.library.program,
        "Content library initialized"
    );
    let index: Arc<dyn CacheIndex> =
        Arc::new(DirectoryCacheIndex::new(config.output.download_dir.clone()));

    // Bot host transport
    let transport: Arc<dyn Transport> = Arc::new(
        OneBotClient::new(&config.onebot).context("Failed to create OneBot client")?,
    );
    info!("Using OneBot API at {}", config.onebot.api_url);

    // Orchestration
    let bridge = BlockingBridge::new();
    let notifier = DeliveryNotifier::new(transport);
    let orchestrator = Arc::new(DownloadOrchestrator::new(
        CacheLocator::new(config.output.clone(), index, bridge),
        Arc::clone(&library),
        bridge,
        notifier.clone(),
    ));
    let dispatcher = Arc::new(RequestDispatcher::new(
        orchestrator,
        library,
        bridge,
        notifier,
        Arc::new(TokioSpawner),
    ));

    // Create authenticator
    let authenticator: Arc<dyn Authenticator> = Arc::from(
        create_authenticator(&config.auth).context("Failed to create authenticator")?,
    );
    info!("Using authenticator: {}", authenticator.method_name());

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, authenticator, dispatcher));

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    // Detached orchestration tasks are dropped with the runtime
    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
