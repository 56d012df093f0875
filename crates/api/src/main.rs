use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridgeline_api::config::ServerConfig;
use ridgeline_api::router::build_app_router;
use ridgeline_api::state::{AppState, Services};
use ridgeline_crm::contractors_cloud::{CcConfig, ContractorsCloudClient};
use ridgeline_crm::hover::{HoverClient, HoverConfig};
use ridgeline_documents::email::{EmailConfig, MailTransport, SmtpMailer};
use ridgeline_documents::pdf::HttpPdfRenderer;
use ridgeline_documents::storage::ArtifactStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridgeline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = ridgeline_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    ridgeline_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    ridgeline_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External services (each optional; missing configuration
    //     disables the operations that need it) ---
    let renderer = HttpPdfRenderer::from_env()
        .map(|r| Arc::new(r) as Arc<dyn ridgeline_documents::pdf::PdfRenderer>);
    let artifacts = ArtifactStore::from_env().await.map(Arc::new);
    let mailer =
        EmailConfig::from_env().map(|c| Arc::new(SmtpMailer::new(c)) as Arc<dyn MailTransport>);
    let contractors_cloud = CcConfig::from_env().map(|c| Arc::new(ContractorsCloudClient::new(c)));
    let hover = HoverConfig::from_env().map(|c| Arc::new(HoverClient::new(c)));

    tracing::info!(
        pdf = renderer.is_some(),
        storage = artifacts.is_some(),
        email = mailer.is_some(),
        contractors_cloud = contractors_cloud.is_some(),
        hover = hover.is_some(),
        "External services configured"
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        services: Arc::new(Services {
            renderer,
            artifacts,
            mailer,
            contractors_cloud,
            hover,
        }),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
