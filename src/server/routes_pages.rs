//! Page handlers: the player shell and the plain-text 404 fallback.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::server::AppContext;

/// GET / and GET /index.html -- the pre-rendered player page.
pub async fn player_page(State(ctx): State<AppContext>) -> Html<String> {
    Html(ctx.player_html.as_ref().clone())
}

/// Fallback for unmatched paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
