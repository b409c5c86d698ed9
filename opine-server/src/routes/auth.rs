//! Register, login, logout

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use opine_core::validation::{validate_password, validate_username};
use opine_core::NewUser;

use crate::auth::{self, SESSION_COOKIE};
use crate::db;
use crate::error::AppResult;
use crate::state::AppState;

/// Username/password pair shared by the register and login forms.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

pub async fn register_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Response> {
    let user = auth::current_user(&state, &jar).await?;
    let page = state.render(
        "register",
        &json!({
            "title": "Register",
            "current_user": user.as_ref().map(|u| u.username.as_str()),
        }),
    )?;
    Ok(page.into_response())
}

/// POST /register
///
/// A taken username re-renders the form with a message rather than
/// surfacing the constraint violation as a server error.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    validate_username(&form.username)?;
    validate_password(&form.password)?;

    let new_user = NewUser {
        username: form.username.clone(),
        password_hash: auth::hash_password(&form.password)?,
    };

    match db::insert_user(state.pool(), &new_user).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "Registered user");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) if db::is_unique_violation(&e) => {
            let page = state.render(
                "register",
                &json!({
                    "title": "Register",
                    "error": format!("Username '{}' is already taken.", form.username),
                    "username": form.username,
                }),
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let user = auth::current_user(&state, &jar).await?;
    let page = state.render(
        "login",
        &json!({
            "title": "Log in",
            "current_user": user.as_ref().map(|u| u.username.as_str()),
        }),
    )?;
    Ok(page.into_response())
}

/// POST /login
///
/// Unknown usernames and wrong passwords get the same message; neither
/// reveals which half was wrong.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let user = db::get_user_by_username(state.pool(), &form.username).await?;
    let verified = match &user {
        Some(user) => auth::verify_password(&form.password, &user.password_hash)?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        let page = state.render(
            "login",
            &json!({
                "title": "Log in",
                "error": "Invalid username or password.",
                "username": form.username,
            }),
        )?;
        return Ok(page.into_response());
    };

    let token = state.sessions().create(user.id);
    info!(user_id = user.id, username = %user.username, "Logged in");

    let jar = jar.add(auth::session_cookie(token));
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /logout
///
/// Revokes the server-side token and expires the cookie. Without a live
/// session there is nothing to revoke, so it just bounces to /login.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let user = auth::current_user(&state, &jar).await?;
    if user.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions().revoke(cookie.value());
    }

    let jar = jar.remove(auth::removal_cookie());
    Ok((jar, Redirect::to("/")).into_response())
}
