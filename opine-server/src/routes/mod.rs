//! Route handlers
//!
//! Organized by concern:
//! - pages: index and health
//! - auth: register, login, logout
//! - business: creating businesses and submitting reviews
//! - dashboard: owner stats page and chart images

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod business;
pub mod dashboard;
pub mod pages;

/// Every application route, ready to be layered and given state.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        // Accounts
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        // Businesses and reviews
        .route(
            "/create_business",
            get(business::create_business_form).post(business::create_business),
        )
        .route(
            "/business/{id}",
            get(business::business_detail).post(business::submit_review),
        )
        // Owner dashboard
        .route("/dashboard/{id}", get(dashboard::dashboard))
        .route("/dashboard/{id}/charts/{kind}", get(dashboard::chart))
}
