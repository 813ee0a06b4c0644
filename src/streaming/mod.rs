//! Chapter audio streaming.
//!
//! Two serving paths share the range/plan machinery:
//!
//! - `GET /audio/{name}` - single chapter file with HTTP range support
//! - `GET /download-all` - every chapter file concatenated into one response

pub mod aggregate;
pub mod direct;
pub mod range;

pub use aggregate::{download_all, sanitize_title};
pub use direct::stream_chapter;

/// Chunk size for file read streams.
pub(crate) const STREAM_CHUNK_SIZE: usize = 64 * 1024;
