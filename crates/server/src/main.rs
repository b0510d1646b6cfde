//! famfeed server entry point.

use std::sync::Arc;

use famfeed_api::AppState;
use famfeed_common::{Config, LocalStorage, MediaStorage, resolve_data_dir};
use famfeed_core::{MemberService, PostService, SetupService};
use famfeed_db::repositories::{FamilyMemberRepository, PostRepository, SettingsRepository};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "famfeed=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;
    init_tracing(config.log.json);

    info!("Starting famfeed server...");

    // Pick the data directory
    let (data_dir, fell_back) = resolve_data_dir(&config.storage.data_dir)?;
    if fell_back {
        warn!(
            configured = %config.storage.data_dir.display(),
            using = %data_dir.display(),
            "Data directory is not writable, using a temporary one; data will not survive a restart"
        );
    }
    let uploads_dir = Config::uploads_path(&data_dir);
    std::fs::create_dir_all(&uploads_dir)?;
    info!(data_dir = %data_dir.display(), "Using data directory");

    // Connect to database
    let db = famfeed_db::init(&Config::database_path(&data_dir)).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    famfeed_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize services
    let storage: MediaStorage = Arc::new(LocalStorage::new(
        uploads_dir.clone(),
        "/uploads".to_string(),
    ));
    let setup_service = SetupService::new(SettingsRepository::new(Arc::clone(&db)));
    let member_service = MemberService::new(FamilyMemberRepository::new(Arc::clone(&db)));
    let post_service = PostService::new(
        PostRepository::new(Arc::clone(&db)),
        storage,
        config.feed.tz()?,
        config.feed.calendar_days,
    );

    let state = AppState::new(
        setup_service,
        member_service,
        post_service,
        &config.server.secret,
        &config.admin.pin,
    );

    // Build router
    let app = famfeed_api::app(state, &uploads_dir, config.storage.max_upload_bytes)
        .layer(TraceLayer::new_for_http());

    // Start server with graceful shutdown
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
