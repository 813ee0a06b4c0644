//! HTTP server: shared context, router construction, and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::{middleware, Router};
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::manifest::{self, Chapter};
use crate::streaming;
use crate::template;

pub mod cors;
pub mod routes_api;
pub mod routes_pages;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s. Everything inside
/// is immutable after startup, so handlers need no synchronization.
#[derive(Clone)]
pub struct AppContext {
    /// Application configuration snapshot.
    pub config: Arc<Config>,
    /// Resolved chapter manifest, in playback order.
    pub manifest: Arc<Vec<Chapter>>,
    /// Pre-rendered player page.
    pub player_html: Arc<String>,
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(routes_pages::player_page))
        .route("/index.html", get(routes_pages::player_page))
        .route("/health", get(routes_api::health_check))
        .route("/api/chapters", get(routes_api::list_chapters))
        .route("/download-all", get(streaming::download_all))
        .route("/audio/{*name}", get(streaming::stream_chapter))
        .fallback(routes_pages::not_found)
        .layer(middleware::from_fn(cors::cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Start the HTTP server.
///
/// Resolves the chapter manifest (the only fatal startup step), renders the
/// player shell, then serves until a shutdown signal arrives.
pub async fn start(config: Config) -> Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let chapters = manifest::resolve(&config.library)?;
    let player_html = template::load_shell(&config.library);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext {
        config: Arc::new(config),
        manifest: Arc::new(chapters),
        player_html: Arc::new(player_html),
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Audiobook server running on http://{local_addr}");
    tracing::info!(
        "Title: {} | Author: {}",
        ctx.config.library.title,
        ctx.config.library.author
    );
    tracing::info!(
        "Chapters: {} | Audio dir: {}",
        ctx.manifest.len(),
        ctx.config.library.audio_dir.display()
    );

    let app = build_router(ctx);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
