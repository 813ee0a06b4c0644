//! Chapter manifest resolution.
//!
//! The manifest is the ordered list of chapters for a run, resolved exactly
//! once at startup and shared read-only with every request handler. Three
//! sources are tried in priority order, first success wins:
//!
//! 1. Inline JSON from the config (`library.chapters_json` / `CHAPTERS_JSON`)
//! 2. A `chapters.json` sidecar file inside the audio root
//! 3. Directory discovery: `.mp3` files sorted by name, titled "Chapter N"
//!
//! Parse failures fall through to the next source. An unreadable audio root
//! during discovery is the only fatal condition.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::LibraryConfig;

/// Fixed name of the sidecar manifest file inside the audio root.
pub const SIDECAR_FILE: &str = "chapters.json";

/// File extension recognized during directory discovery.
const CHAPTER_EXTENSION: &str = "mp3";

/// One logical audio segment: a display title and a backing file name
/// relative to the audio root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub file: String,
    pub title: String,
}

/// Resolve the chapter manifest for this run.
pub fn resolve(library: &LibraryConfig) -> Result<Vec<Chapter>> {
    if let Some(raw) = &library.chapters_json {
        match serde_json::from_str::<Vec<Chapter>>(raw) {
            Ok(chapters) => {
                tracing::info!(count = chapters.len(), "chapter manifest loaded from inline JSON");
                return Ok(chapters);
            }
            Err(e) => {
                tracing::debug!(error = %e, "inline chapter JSON did not parse, trying next source");
            }
        }
    }

    let sidecar = library.audio_dir.join(SIDECAR_FILE);
    if sidecar.exists() {
        match read_sidecar(&sidecar) {
            Ok(chapters) => {
                tracing::info!(
                    count = chapters.len(),
                    path = %sidecar.display(),
                    "chapter manifest loaded from sidecar file"
                );
                return Ok(chapters);
            }
            Err(e) => {
                tracing::warn!(
                    path = %sidecar.display(),
                    error = %e,
                    "sidecar manifest unreadable, falling back to directory scan"
                );
            }
        }
    }

    let chapters = scan_directory(&library.audio_dir)?;
    tracing::info!(
        count = chapters.len(),
        dir = %library.audio_dir.display(),
        "chapter manifest discovered from directory scan"
    );
    Ok(chapters)
}

fn read_sidecar(path: &Path) -> Result<Vec<Chapter>> {
    let content = std::fs::read_to_string(path)?;
    let chapters = serde_json::from_str(&content)?;
    Ok(chapters)
}

/// Enumerate chapter files in the audio root, sorted lexicographically, with
/// synthesized "Chapter N" titles.
fn scan_directory(dir: &Path) -> Result<Vec<Chapter>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read audio directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read audio directory {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let is_chapter = Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CHAPTER_EXTENSION));
        if is_chapter {
            files.push(name.to_string());
        }
    }

    files.sort();

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(i, file)| Chapter {
            title: format!("Chapter {}", i + 1),
            file,
        })
        .collect())
}
