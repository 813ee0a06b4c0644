//! Aggregate "download all" streaming.
//!
//! Serves every chapter file as one continuous byte stream with a fixed
//! Content-Length. The plan is built by stat-ing each chapter in manifest
//! order; files missing at plan time are skipped and excluded from the
//! total. After the headers are written the advertised length is a promise:
//! each file's size is re-verified right before its bytes go out, and any
//! open failure, size drift, or short read aborts the body stream so the
//! client sees a detectable truncation instead of a silently corrupt file.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_core::Stream;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_stream::StreamExt;
use tokio_util::io::ReaderStream;

use super::STREAM_CHUNK_SIZE;
use crate::manifest::Chapter;
use crate::server::AppContext;

/// One chapter file admitted to the download plan.
#[derive(Debug)]
struct PlannedFile {
    path: PathBuf,
    size: u64,
}

/// Ordered file list and combined length for an aggregate download.
#[derive(Debug)]
struct StreamPlan {
    total: u64,
    files: Vec<PlannedFile>,
}

/// GET /download-all
///
/// Stream the concatenation of all chapter files, in manifest order, as a
/// single attachment.
pub async fn download_all(State(ctx): State<AppContext>) -> Response {
    let plan = build_plan(&ctx.config.library.audio_dir, &ctx.manifest).await;
    let total = plan.total;

    let filename = format!("{}_Audiobook.mp3", sanitize_title(&ctx.config.library.title));

    tracing::info!(
        files = plan.files.len(),
        total_bytes = total,
        "starting aggregate download"
    );

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE.as_str(),
                "application/octet-stream".to_string(),
            ),
            (header::CONTENT_LENGTH.as_str(), total.to_string()),
            (
                header::CONTENT_DISPOSITION.as_str(),
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Body::from_stream(concat_stream(plan)),
    )
        .into_response()
}

/// Stat every chapter file in manifest order. Missing files are excluded
/// from both the file list and the byte total.
async fn build_plan(audio_dir: &Path, chapters: &[Chapter]) -> StreamPlan {
    let mut files = Vec::with_capacity(chapters.len());
    let mut total = 0u64;

    for chapter in chapters {
        let path = audio_dir.join(&chapter.file);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                total += meta.len();
                files.push(PlannedFile {
                    path,
                    size: meta.len(),
                });
            }
            _ => {
                tracing::debug!(file = %chapter.file, "skipping missing chapter file in download plan");
            }
        }
    }

    StreamPlan { total, files }
}

/// Produce the concatenated body: each planned file streamed fully, in
/// order, back to back. File N+1 never starts before file N's bytes are all
/// emitted.
fn concat_stream(plan: StreamPlan) -> impl Stream<Item = io::Result<Bytes>> {
    async_stream::try_stream! {
        for entry in plan.files {
            let file = match File::open(&entry.path).await {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path.display(),
                        error = %e,
                        "aborting aggregate download: chapter file unreadable"
                    );
                    Err(e)?
                }
            };

            // The plan's sizes are baked into Content-Length; a file that
            // changed since planning would corrupt the framing.
            let actual = file.metadata().await?.len();
            ensure_len(&entry.path, entry.size, actual)?;

            let mut reader = ReaderStream::with_capacity(file.take(entry.size), STREAM_CHUNK_SIZE);
            let mut sent = 0u64;
            while let Some(chunk) = reader.next().await {
                let chunk = chunk?;
                sent += chunk.len() as u64;
                yield chunk;
            }
            ensure_len(&entry.path, entry.size, sent)?;
        }
    }
}

fn ensure_len(path: &Path, expected: u64, actual: u64) -> io::Result<()> {
    if expected == actual {
        return Ok(());
    }
    tracing::warn!(
        path = %path.display(),
        expected,
        actual,
        "aborting aggregate download: chapter byte count mismatch"
    );
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!(
            "{}: expected {expected} bytes, streamed {actual}",
            path.display()
        ),
    ))
}

/// Reduce a book title to a filesystem-safe attachment name: characters
/// outside `[A-Za-z0-9 _-]` are stripped, then runs of spaces collapse to a
/// single underscore.
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_space = false;

    for c in title.chars() {
        if c == ' ' {
            if !prev_space {
                out.push('_');
            }
            prev_space = true;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
            prev_space = false;
        }
        // Everything else is stripped without breaking a space run.
    }

    out
}
