//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temp audio directory and a
//! default config pointing at it, plus fixture writers for chapter files and
//! sidecar manifests. [`TestHarness::spawn`] resolves the manifest, starts
//! Axum on a random port, and returns the bound address for HTTP-level
//! testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use chaptercast::config::Config;
use chaptercast::manifest;
use chaptercast::server::{build_router, AppContext};
use chaptercast::template;

/// Test harness wrapping a temp audio root and the config that points at it.
pub struct TestHarness {
    pub dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    /// Create a new harness with default configuration and an empty audio
    /// directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp audio dir");
        let mut config = Config::default();
        config.library.audio_dir = dir.path().to_path_buf();
        config.library.title = "Test Book".into();
        config.library.author = "Test Author".into();
        Self { dir, config }
    }

    /// Create a harness with a custom book title.
    pub fn with_title(title: &str) -> Self {
        let mut harness = Self::new();
        harness.config.library.title = title.into();
        harness
    }

    /// Write a chapter fixture file into the audio root.
    pub fn write_chapter(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).expect("failed to write chapter fixture");
        path
    }

    /// Write a sidecar manifest into the audio root.
    pub fn write_sidecar(&self, json: &str) {
        std::fs::write(self.dir.path().join("chapters.json"), json)
            .expect("failed to write sidecar fixture");
    }

    /// Resolve the manifest, start an Axum server on a random port, and
    /// return the bound socket address.
    pub async fn spawn(&self) -> SocketAddr {
        let chapters =
            manifest::resolve(&self.config.library).expect("manifest resolution failed");
        let player_html = template::load_shell(&self.config.library);

        let ctx = AppContext {
            config: Arc::new(self.config.clone()),
            manifest: Arc::new(chapters),
            player_html: Arc::new(player_html),
        };
        let app = build_router(ctx);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }
}

/// Fixture bytes with a recognizable repeating pattern.
pub fn pattern_bytes(len: usize) -> Vec<u8> {
    (0..=255u8).cycle().take(len).collect()
}
