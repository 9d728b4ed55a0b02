//! Registration, login and logout

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{routing::get, Extension, Form, Router};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use super::{error_flashes, page_context, render};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{flash, safe_next, session, Flash, FlashLevel, Viewer};
use crate::db::repos::DbError;
use crate::db::UserRepo;
use crate::http::error::PageError;
use crate::models::{LoginForm, RegistrationForm};
use crate::state::AppState;
use crate::views;

const DUPLICATE_ACCOUNT: &str = "Username or email is already registered.";
const BAD_CREDENTIALS: &str = "Invalid username or password.";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// GET /register
async fn register_form(Extension(viewer): Extension<Viewer>, jar: SignedCookieJar) -> Response {
    let (jar, ctx) = page_context(jar, &viewer);
    render(StatusCode::OK, jar, views::auth::register(&ctx, "", ""))
}

/// POST /register
///
/// On success the new user is logged in straight away.
async fn register(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    jar: SignedCookieJar,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, PageError> {
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => {
            let (jar, mut ctx) = page_context(jar, &viewer);
            ctx.flashes.extend(error_flashes(&errors));
            let html = views::auth::register(&ctx, &form.username, &form.email);
            return Ok(render(StatusCode::UNPROCESSABLE_ENTITY, jar, html));
        }
    };

    let hash = hash_password_blocking(
        registration.password.as_str().to_owned(),
        state.bcrypt_cost(),
    )
    .await?;

    let user = match UserRepo::new(state.pool())
        .create(&registration.username, &registration.email, &hash)
        .await
    {
        Ok(user) => user,
        Err(DbError::Conflict { .. }) => {
            tracing::debug!(username = %registration.username.as_str(), "Duplicate registration");
            let (jar, ctx) = page_context(jar, &viewer);
            let ctx = ctx.flash(Flash::danger(DUPLICATE_ACCOUNT));
            let html = views::auth::register(&ctx, &form.username, &form.email);
            return Ok(render(StatusCode::CONFLICT, jar, html));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let jar = session::login(jar, user.id, state.session());
    let jar = flash::push(jar, FlashLevel::Success, "Registration successful!");
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /login
async fn login_form(
    Extension(viewer): Extension<Viewer>,
    jar: SignedCookieJar,
    Query(query): Query<NextQuery>,
) -> Response {
    let (jar, ctx) = page_context(jar, &viewer);
    render(
        StatusCode::OK,
        jar,
        views::auth::login(&ctx, "", query.next.as_deref()),
    )
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let username = form.username.trim();

    let authenticated = if form.is_complete() {
        match UserRepo::new(state.pool()).find_credentials(username).await? {
            Some(creds) => {
                let ok = verify_password_blocking(form.password.clone(), creds.password_hash).await?;
                ok.then_some(creds.id)
            }
            None => None,
        }
    } else {
        None
    };

    let Some(user_id) = authenticated else {
        tracing::info!(username = %username, "Failed login");
        let (jar, ctx) = page_context(jar, &viewer);
        let ctx = ctx.flash(Flash::danger(BAD_CREDENTIALS));
        let html = views::auth::login(&ctx, username, form.next.as_deref());
        return Ok(render(StatusCode::UNAUTHORIZED, jar, html));
    };

    tracing::info!(user_id, "User logged in");

    let jar = session::login(jar, user_id, state.session());
    let jar = flash::push(jar, FlashLevel::Success, "You are now logged in.");
    let target = safe_next(form.next.as_deref());
    Ok((jar, Redirect::to(&target)).into_response())
}

/// GET|POST /logout
async fn logout(Extension(viewer): Extension<Viewer>, jar: SignedCookieJar) -> Response {
    if let Some(user) = viewer.user() {
        tracing::info!(user_id = user.id, "User logged out");
    }

    let jar = session::logout(jar);
    let jar = flash::push(jar, FlashLevel::Info, "You have been logged out.");
    (jar, Redirect::to("/")).into_response()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout).post(logout))
}
