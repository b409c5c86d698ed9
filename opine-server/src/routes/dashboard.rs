//! Owner dashboard and chart images

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde_json::json;

use opine_core::{
    render_histogram, render_location_pie, Business, BusinessStats, RatingCategory, User,
};

use crate::auth;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Outcome of the owner gate.
enum OwnerAccess {
    Granted { business: Business, owner: User },
    Denied(Redirect),
}

/// Unknown ids 404; anyone who is not the owner is silently sent home,
/// whether logged in or not.
async fn owner_gate(state: &AppState, jar: &CookieJar, id: i64) -> AppResult<OwnerAccess> {
    let business = db::get_business(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Business {} not found", id)))?;

    match auth::current_user(state, jar).await? {
        Some(user) if user.id == business.owner_id => Ok(OwnerAccess::Granted {
            business,
            owner: user,
        }),
        _ => Ok(OwnerAccess::Denied(Redirect::to("/"))),
    }
}

/// GET /dashboard/{id}
pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let (business, owner) = match owner_gate(&state, &jar, id).await? {
        OwnerAccess::Granted { business, owner } => (business, owner),
        OwnerAccess::Denied(redirect) => return Ok(redirect.into_response()),
    };

    let reviews = db::list_reviews(state.pool(), business.id).await?;
    let stats = BusinessStats::from_reviews(&reviews);

    let categories: Vec<_> = RatingCategory::ALL
        .iter()
        .map(|c| json!({"key": c.as_str(), "label": c.label()}))
        .collect();
    let location_summary: Vec<_> = stats
        .location
        .slices()
        .into_iter()
        .map(|(location, count, percentage)| {
            json!({
                "label": location.label(),
                "count": count,
                "percentage": format!("{:.1}", percentage),
            })
        })
        .collect();

    let page = state.render(
        "dashboard",
        &json!({
            "title": format!("Dashboard · {}", business.name),
            "current_user": owner.username,
            "business": business,
            "total_reviews": stats.total_reviews,
            "has_reviews": stats.has_reviews(),
            "categories": categories,
            "location_summary": location_summary,
        }),
    )?;
    Ok(page.into_response())
}

/// GET /dashboard/{id}/charts/{kind}
///
/// `kind` is one of `place.svg`, `price.svg`, `installations.svg`,
/// `service.svg`, `location.svg`. Same gate as the dashboard page; a
/// business with no reviews has no charts, so these 404.
pub async fn chart(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((id, kind)): Path<(i64, String)>,
) -> AppResult<Response> {
    let business = match owner_gate(&state, &jar, id).await? {
        OwnerAccess::Granted { business, .. } => business,
        OwnerAccess::Denied(redirect) => return Ok(redirect.into_response()),
    };

    let reviews = db::list_reviews(state.pool(), business.id).await?;
    let stats = BusinessStats::from_reviews(&reviews);

    let kind = kind.strip_suffix(".svg").unwrap_or(&kind);
    let svg = if kind == "location" {
        render_location_pie(&stats.location)?
    } else {
        let category = RatingCategory::parse(kind)
            .ok_or_else(|| AppError::NotFound(format!("Unknown chart '{}'", kind)))?;
        render_histogram(category, stats.histogram(category))?
    };

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
