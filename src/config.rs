//! Application configuration.
//!
//! Configuration is resolved once at process start from three layers, later
//! layers winning: a TOML config file, environment variables matching the
//! classic deployment interface (`PORT`, `AUDIO_DIR`, `TITLE`, ...), and CLI
//! flags applied by the caller.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Audiobook library settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding the chapter audio files.
    pub audio_dir: PathBuf,

    /// Book title shown in the player and used for the download filename.
    pub title: String,

    /// Author shown in the player.
    pub author: String,

    /// Inline JSON chapter list; takes precedence over the sidecar file and
    /// directory discovery when it parses.
    pub chapters_json: Option<String>,

    /// Path to a custom player HTML template. The bundled page is used when
    /// unset or unreadable.
    pub template_path: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from("./audio"),
            title: "Audiobook".to_string(),
            author: "Unknown".to_string(),
            chapters_json: None,
            template_path: None,
        }
    }
}

impl Config {
    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.library.title.trim().is_empty() {
            warnings.push("library.title is empty".into());
        }

        if !self.library.audio_dir.is_dir() {
            warnings.push(format!(
                "library.audio_dir does not exist: {}",
                self.library.audio_dir.display()
            ));
        }

        warnings
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./chaptercast.toml",
        "~/.config/chaptercast/config.toml",
        "/etc/chaptercast/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// The variable names match the original deployment interface so existing
/// wrappers keep working: `PORT`, `AUDIO_DIR`, `TITLE`, `AUTHOR`,
/// `CHAPTERS_JSON`, `HTML_FILE`.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => tracing::warn!(value = %port, "ignoring unparseable PORT override"),
        }
    }
    if let Ok(dir) = std::env::var("AUDIO_DIR") {
        config.library.audio_dir = PathBuf::from(dir);
    }
    if let Ok(title) = std::env::var("TITLE") {
        config.library.title = title;
    }
    if let Ok(author) = std::env::var("AUTHOR") {
        config.library.author = author;
    }
    if let Ok(json) = std::env::var("CHAPTERS_JSON") {
        config.library.chapters_json = Some(json);
    }
    if let Ok(template) = std::env::var("HTML_FILE") {
        config.library.template_path = Some(PathBuf::from(template));
    }
}
