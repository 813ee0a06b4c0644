//! Player shell rendering.
//!
//! The player page is a single HTML file with two placeholder tokens,
//! `{{TITLE}}` and `{{AUTHOR}}`. A custom template can be supplied via the
//! config; the bundled page is the fallback. Because the config and manifest
//! are immutable for the lifetime of a run, the shell is rendered once at
//! startup and served from memory.

use crate::config::LibraryConfig;

/// Bundled default player page.
pub const DEFAULT_PLAYER_HTML: &str = include_str!("../static/player.html");

/// Substitute the title and author tokens in a template.
pub fn render(template: &str, title: &str, author: &str) -> String {
    template
        .replace("{{TITLE}}", title)
        .replace("{{AUTHOR}}", author)
}

/// Load the player template and render it for the configured library.
///
/// Falls back to the bundled page when the configured template path cannot
/// be read.
pub fn load_shell(library: &LibraryConfig) -> String {
    let template = match &library.template_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read player template, using bundled page"
                );
                DEFAULT_PLAYER_HTML.to_string()
            }
        },
        None => DEFAULT_PLAYER_HTML.to_string(),
    };

    render(&template, &library.title, &library.author)
}
