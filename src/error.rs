//! Unified error type for the chaptercast application.
//!
//! Request handlers return [`Error`] directly; the [`IntoResponse`] impl maps
//! each variant to an HTTP status via [`Error::http_status`] and writes a
//! short plain-text body.

use std::fmt;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Unified error type covering all failure modes in chaptercast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "chapter file").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The request carried a Range header that cannot be satisfied.
    #[error("range not satisfiable for resource of {size} bytes")]
    RangeNotSatisfiable {
        /// Total size of the resource, echoed in the `Content-Range` header.
        size: u64,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        }

        match self {
            Error::RangeNotSatisfiable { size } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(
                    header::CONTENT_RANGE.as_str(),
                    format!("bytes */{size}"),
                )],
                Body::empty(),
            )
                .into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
