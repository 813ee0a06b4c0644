//! Single chapter file streaming with HTTP range support.
//!
//! Serves one backing file per request, whole (200) or windowed (206), in
//! 64KB chunks via `ReaderStream` so memory stays bounded regardless of file
//! size. The file handle lives inside the response body stream and is
//! released when the body finishes or the client disconnects.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::{self, RangePlan};
use super::STREAM_CHUNK_SIZE;
use crate::error::Error;
use crate::server::AppContext;

/// GET /audio/{*name}
///
/// Serve one chapter file with range support. Only the final path segment of
/// the captured tail is used to locate the file inside the audio root, so
/// client-supplied directory components can never escape it.
pub async fn stream_chapter(
    State(ctx): State<AppContext>,
    Path(raw): Path<String>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let name = chapter_file_name(&raw).ok_or_else(|| Error::not_found("chapter file", &raw))?;
    let path = ctx.config.library.audio_dir.join(name);

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|_| Error::not_found("chapter file", name))?;
    if !metadata.is_file() {
        return Err(Error::not_found("chapter file", name));
    }
    let file_size = metadata.len();

    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let plan = range::plan(range_header, file_size)?;
    let content_type = content_type_for(name);

    let mut file = File::open(&path)
        .await
        .map_err(|_| Error::not_found("chapter file", name))?;

    match plan {
        RangePlan::Whole => {
            let stream = ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE);

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE.as_str(), content_type.to_string()),
                    (header::CONTENT_LENGTH.as_str(), file_size.to_string()),
                    (header::ACCEPT_RANGES.as_str(), "bytes".to_string()),
                ],
                Body::from_stream(stream),
            )
                .into_response())
        }
        RangePlan::Partial { start, end } => {
            let length = end - start + 1;

            file.seek(SeekFrom::Start(start)).await?;

            // Take limits reads to exactly `length` bytes.
            let stream = ReaderStream::with_capacity(file.take(length), STREAM_CHUNK_SIZE);

            Ok((
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE.as_str(), content_type.to_string()),
                    (
                        header::CONTENT_RANGE.as_str(),
                        format!("bytes {start}-{end}/{file_size}"),
                    ),
                    (header::CONTENT_LENGTH.as_str(), length.to_string()),
                    (header::ACCEPT_RANGES.as_str(), "bytes".to_string()),
                ],
                Body::from_stream(stream),
            )
                .into_response())
        }
    }
}

/// Extract the file name from a client-supplied path tail.
///
/// Only the final segment is kept; hidden files and dot segments are
/// rejected.
fn chapter_file_name(raw: &str) -> Option<&str> {
    let name = raw.rsplit('/').next().unwrap_or(raw);
    let name = name.rsplit('\\').next().unwrap_or(name);
    if name.is_empty() || name.starts_with('.') {
        return None;
    }
    Some(name)
}

/// Guess the MIME type from the file extension.
fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or("");

    match ext.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "m4a" | "m4b" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_plain() {
        assert_eq!(chapter_file_name("ch01.mp3"), Some("ch01.mp3"));
    }

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(chapter_file_name("a/b/ch01.mp3"), Some("ch01.mp3"));
        assert_eq!(chapter_file_name("../../etc/passwd"), Some("passwd"));
        assert_eq!(chapter_file_name("..\\..\\boot.ini"), Some("boot.ini"));
    }

    #[test]
    fn file_name_rejects_dot_segments() {
        assert_eq!(chapter_file_name(""), None);
        assert_eq!(chapter_file_name("a/"), None);
        assert_eq!(chapter_file_name(".."), None);
        assert_eq!(chapter_file_name("a/.."), None);
        assert_eq!(chapter_file_name(".hidden.mp3"), None);
    }

    #[test]
    fn content_type_audio_variants() {
        assert_eq!(content_type_for("ch.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("CH.MP3"), "audio/mpeg");
        assert_eq!(content_type_for("ch.m4b"), "audio/mp4");
        assert_eq!(content_type_for("ch.flac"), "audio/flac");
        assert_eq!(content_type_for("ch.ogg"), "audio/ogg");
        assert_eq!(content_type_for("ch.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
