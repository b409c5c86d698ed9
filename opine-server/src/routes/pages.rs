//! Index and health

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Serialize;
use serde_json::json;

use crate::auth;
use crate::db;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET / : every business, newest first, with review counts.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> AppResult<Html<String>> {
    let user = auth::current_user(&state, &jar).await?;
    let businesses = db::list_businesses(state.pool()).await?;

    state.render(
        "index",
        &json!({
            "title": "Businesses",
            "current_user": user.as_ref().map(|u| u.username.as_str()),
            "current_user_id": user.as_ref().map(|u| u.id),
            "businesses": businesses,
        }),
    )
}
