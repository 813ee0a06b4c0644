//! JSON API handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::server::AppContext;

/// One chapter as exposed to the player UI.
#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub id: usize,
    pub title: String,
    pub url: String,
}

/// GET /api/chapters -- the manifest in playback order.
pub async fn list_chapters(State(ctx): State<AppContext>) -> Json<Vec<ChapterResponse>> {
    let chapters = ctx
        .manifest
        .iter()
        .enumerate()
        .map(|(id, chapter)| ChapterResponse {
            id,
            title: chapter.title.clone(),
            url: format!("/audio/{}", chapter.file),
        })
        .collect();

    Json(chapters)
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
