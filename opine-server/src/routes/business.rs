//! Businesses and review submission

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use opine_core::{NewBusiness, NewReview, RawReview, ReviewWithAuthor, RATING_MAX, RATING_MIN};

use crate::auth;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BusinessForm {
    pub name: String,
}

/// Review shaped for the business page.
#[derive(Debug, Serialize)]
struct ReviewView {
    author: String,
    rating_place: i64,
    rating_price: i64,
    rating_installations: i64,
    rating_service: i64,
    location_label: &'static str,
    comment: String,
    updated_at: String,
}

impl From<&ReviewWithAuthor> for ReviewView {
    fn from(review: &ReviewWithAuthor) -> Self {
        Self {
            author: review.author.clone(),
            rating_place: review.rating_place,
            rating_price: review.rating_price,
            rating_installations: review.rating_installations,
            rating_service: review.rating_service,
            location_label: review.location_label(),
            comment: review.comment.clone(),
            updated_at: review.updated_at.format("%Y-%m-%d").to_string(),
        }
    }
}

pub async fn create_business_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Response> {
    let Some(user) = auth::current_user(&state, &jar).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let page = state.render(
        "create_business",
        &json!({
            "title": "Add a business",
            "current_user": user.username,
        }),
    )?;
    Ok(page.into_response())
}

/// POST /create_business
pub async fn create_business(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<BusinessForm>,
) -> AppResult<Response> {
    let Some(user) = auth::current_user(&state, &jar).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let new_business = NewBusiness::validated(&form.name, user.id)?;
    let business = db::insert_business(state.pool(), &new_business).await?;
    info!(
        business_id = business.id,
        owner_id = user.id,
        name = %business.name,
        "Created business"
    );

    Ok(Redirect::to("/").into_response())
}

/// GET /business/{id} : detail page with every review and, for a logged-in
/// caller, their own review prefilled in the form.
pub async fn business_detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let business = db::get_business(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Business {} not found", id)))?;

    let user = auth::current_user(&state, &jar).await?;
    let reviews: Vec<ReviewView> = db::list_reviews_with_authors(state.pool(), id)
        .await?
        .iter()
        .map(ReviewView::from)
        .collect();

    let my_review = match &user {
        Some(user) => db::find_review(state.pool(), user.id, id).await?,
        None => None,
    };

    let page = state.render(
        "business",
        &json!({
            "title": business.name.clone(),
            "current_user": user.as_ref().map(|u| u.username.as_str()),
            "business": business,
            "review_count": reviews.len(),
            "reviews": reviews,
            "my_review": my_review,
            "rating_scale": (RATING_MIN..=RATING_MAX).collect::<Vec<u8>>(),
        }),
    )?;
    Ok(page.into_response())
}

/// POST /business/{id}
///
/// One review per (user, business): a repeat submission replaces the
/// caller's earlier one.
pub async fn submit_review(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(raw): Form<RawReview>,
) -> AppResult<Response> {
    let Some(user) = auth::current_user(&state, &jar).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let business = db::get_business(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Business {} not found", id)))?;

    let review = NewReview::validated(user.id, business.id, &raw)?;
    let saved = db::upsert_review(state.pool(), &review).await?;
    info!(
        review_id = saved.id,
        user_id = user.id,
        business_id = business.id,
        "Saved review"
    );

    Ok(Redirect::to(&format!("/business/{}", business.id)).into_response())
}
