//! Authoring routes: create, edit, delete
//!
//! All of these sit behind `require_login`. Edit and delete check
//! ownership before touching anything, and the repository repeats the
//! owner check in its `WHERE` clause.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{
    routing::{get, post},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;

use super::{page_context, render};
use crate::auth::{flash, CurrentUser, Flash, FlashLevel, Viewer};
use crate::db::{Post, PostRepo};
use crate::http::error::PageError;
use crate::http::extractors::PostId;
use crate::models::{PostForm, ValidationError};
use crate::state::AppState;
use crate::views;
use crate::views::posts::EditorMode;

const FILL_ALL_FIELDS: &str = "Please fill in all fields.";

/// Result of looking up a post for modification
enum Ownership {
    Owned(Post),
    Missing,
    Foreign,
}

async fn ownership(state: &AppState, id: i64, user: &CurrentUser) -> Result<Ownership, PageError> {
    Ok(match PostRepo::new(state.pool()).find(id).await? {
        None => Ownership::Missing,
        Some(post) if post.user_id == user.id => Ownership::Owned(post),
        Some(_) => Ownership::Foreign,
    })
}

/// Flash and go home when the post cannot be modified by this user.
fn refuse(jar: SignedCookieJar, ownership: &Ownership, foreign_message: &str) -> Response {
    let jar = match ownership {
        Ownership::Missing => flash::push(jar, FlashLevel::Warning, "Post not found."),
        _ => flash::push(jar, FlashLevel::Danger, foreign_message),
    };
    (jar, Redirect::to("/")).into_response()
}

/// Messages for a rejected post form. Any empty field collapses into a
/// single "fill in all fields" message.
fn form_errors(errors: &[ValidationError]) -> Vec<Flash> {
    let mut flashes: Vec<Flash> = Vec::new();
    if errors
        .iter()
        .any(|e| matches!(e, ValidationError::Empty { .. }))
    {
        flashes.push(Flash::danger(FILL_ALL_FIELDS));
    }
    flashes.extend(
        errors
            .iter()
            .filter(|e| !matches!(e, ValidationError::Empty { .. }))
            .map(|e| Flash::danger(e.to_string())),
    );
    flashes
}

fn rejected_form(
    jar: SignedCookieJar,
    viewer: &Viewer,
    mode: EditorMode,
    form: &PostForm,
    errors: &[ValidationError],
) -> Response {
    let (jar, mut ctx) = page_context(jar, viewer);
    ctx.flashes.extend(form_errors(errors));
    let html = views::posts::editor(&ctx, mode, &form.title, &form.content);
    render(StatusCode::UNPROCESSABLE_ENTITY, jar, html)
}

/// GET /create
async fn create_form(Extension(viewer): Extension<Viewer>, jar: SignedCookieJar) -> Response {
    let (jar, ctx) = page_context(jar, &viewer);
    render(
        StatusCode::OK,
        jar,
        views::posts::editor(&ctx, EditorMode::Create, "", ""),
    )
}

/// POST /create
async fn create(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Extension(user): Extension<CurrentUser>,
    jar: SignedCookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let (title, body) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return Ok(rejected_form(jar, &viewer, EditorMode::Create, &form, &errors)),
    };

    let html = body.to_html();
    let id = PostRepo::new(state.pool())
        .create(user.id, &title, &body, &html)
        .await?;

    tracing::info!(post_id = id, user_id = user.id, "Post created");

    let jar = flash::push(jar, FlashLevel::Success, "Post created.");
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /edit/{id}
async fn edit_form(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Extension(user): Extension<CurrentUser>,
    jar: SignedCookieJar,
    PostId(id): PostId,
) -> Result<Response, PageError> {
    let post = match ownership(&state, id, &user).await? {
        Ownership::Owned(post) => post,
        other => return Ok(refuse(jar, &other, "You can only edit your own posts.")),
    };

    let (jar, ctx) = page_context(jar, &viewer);
    let html = views::posts::editor(&ctx, EditorMode::Edit(post.id), &post.title, &post.content_md);
    Ok(render(StatusCode::OK, jar, html))
}

/// POST /edit/{id}
async fn edit(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Extension(user): Extension<CurrentUser>,
    jar: SignedCookieJar,
    PostId(id): PostId,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    match ownership(&state, id, &user).await? {
        Ownership::Owned(_) => {}
        other => return Ok(refuse(jar, &other, "You can only edit your own posts.")),
    }

    let (title, body) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return Ok(rejected_form(jar, &viewer, EditorMode::Edit(id), &form, &errors)),
    };

    let html = body.to_html();
    let updated = PostRepo::new(state.pool())
        .update(id, user.id, &title, &body, &html)
        .await?;

    // Deleted between the ownership check and the update
    if !updated {
        return Ok(refuse(jar, &Ownership::Missing, ""));
    }

    tracing::info!(post_id = id, user_id = user.id, "Post updated");

    let jar = flash::push(jar, FlashLevel::Success, "Post updated.");
    Ok((jar, Redirect::to("/profile")).into_response())
}

/// POST /delete/{id}
async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: SignedCookieJar,
    PostId(id): PostId,
) -> Result<Response, PageError> {
    match ownership(&state, id, &user).await? {
        Ownership::Owned(_) => {}
        other => return Ok(refuse(jar, &other, "You can only delete your own posts.")),
    }

    if !PostRepo::new(state.pool()).delete(id, user.id).await? {
        return Ok(refuse(jar, &Ownership::Missing, ""));
    }

    tracing::info!(post_id = id, user_id = user.id, "Post deleted");

    let jar = flash::push(jar, FlashLevel::Info, "Post deleted.");
    Ok((jar, Redirect::to("/profile")).into_response())
}

/// Routes that require a signed-in user
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", get(create_form).post(create))
        .route("/edit/{id}", get(edit_form).post(edit))
        .route("/delete/{id}", post(delete))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_collapse_into_one_message() {
        let errors = vec![
            ValidationError::Empty { field: "title" },
            ValidationError::Empty { field: "content" },
        ];
        let flashes = form_errors(&errors);
        assert_eq!(flashes, vec![Flash::danger(FILL_ALL_FIELDS)]);
    }

    #[test]
    fn other_errors_are_listed() {
        let errors = vec![
            ValidationError::Empty { field: "content" },
            ValidationError::TooLong {
                field: "title",
                max: 200,
            },
        ];
        let flashes = form_errors(&errors);
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].message, FILL_ALL_FIELDS);
        assert!(flashes[1].message.contains("title"));
    }
}
