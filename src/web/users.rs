//! User pages: list, sign-up, view, edit, delete, CSV download.
//!
//! Creating a user is the one unauthenticated mutation; everything else
//! forwards the bearer token from the login cookie.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Form};
use handlebars::html_escape;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::security::csrf::CsrfToken;
use crate::upstream::UserFilters;
use crate::web::flash::Flash;
use crate::web::forms::{FormErrors, UserFilterForm, UserForm};
use crate::web::templates::Page;
use crate::web::{bearer_token, filter_query, non_empty, redirect_with_flash};

fn to_filters(form: &UserFilterForm) -> UserFilters {
    UserFilters {
        sort: non_empty(&form.sort),
        email_address: non_empty(&form.email_address),
    }
}

/// `GET /users`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<UserFilterForm>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let filters = to_filters(&filter);
    let users = state.users.list(&token, &filters).await?;

    let query = filter_query(&[
        ("sort", filters.sort.as_deref()),
        ("email_address", filters.email_address.as_deref()),
    ]);

    let form = serde_json::json!({
        "sort": filter.sort.as_deref().unwrap_or("email_address"),
        "email_address": filter.email_address.as_deref().unwrap_or(""),
    });

    Page::new("users_list", "Users")
        .with("users", users)
        .with("form", form)
        .with("query", query)
        .render(&state.config.security.secret_key, &headers)
}

/// `GET /users/new`
pub async fn new_form(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    render_form(
        &state,
        &headers,
        "Create a new user",
        "/users/new",
        UserForm::default(),
        FormErrors::new(),
        csrf,
    )
}

/// `POST /users/new`
pub async fn create(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return render_form(
            &state,
            &headers,
            "Create a new user",
            "/users/new",
            form,
            errors,
            csrf,
        );
    }

    let user = state
        .users
        .create(&form.email_address, &form.password)
        .await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok(redirect_with_flash(
        &state.config.security,
        "/users",
        Flash::success(format!(
            "<a href=\"/users/{}\" class=\"alert-link\">{}</a> has been created.",
            user.id,
            html_escape(&user.email_address),
        )),
    ))
}

/// `GET /users/{id}`
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let user = state.users.get(&token, id).await?;

    let title = user.email_address.clone();
    Page::new("user_view", &title)
        .with("user", user)
        .render(&state.config.security.secret_key, &headers)
}

/// `GET /users/{id}/edit`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let user = state.users.get(&token, id).await?;

    let form = UserForm {
        email_address: user.email_address.clone(),
        ..Default::default()
    };

    render_form(
        &state,
        &headers,
        &format!("Edit {}", user.email_address),
        &format!("/users/{}/edit", id),
        form,
        FormErrors::new(),
        csrf,
    )
}

/// `POST /users/{id}/edit`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    if let Err(errors) = form.validate() {
        return render_form(
            &state,
            &headers,
            "Edit user",
            &format!("/users/{}/edit", id),
            form,
            errors,
            csrf,
        );
    }

    let user = state
        .users
        .edit(&token, id, &form.email_address, &form.password)
        .await?;
    tracing::info!(user_id = %user.id, "User updated");

    Ok(redirect_with_flash(
        &state.config.security,
        "/users",
        Flash::success(format!(
            "Your changes to <a href=\"/users/{}\" class=\"alert-link\">{}</a> have been saved.",
            user.id,
            html_escape(&user.email_address),
        )),
    ))
}

/// `GET /users/{id}/delete`
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let user = state.users.get(&token, id).await?;

    Page::new("user_delete", &format!("Delete {}", user.email_address))
        .with("user", user)
        .render(&state.config.security.secret_key, &headers)
}

/// `POST /users/{id}/delete`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let user = state.users.get(&token, id).await?;

    state.users.delete(&token, id).await?;
    tracing::info!(user_id = %id, "User deleted");

    Ok(redirect_with_flash(
        &state.config.security,
        "/users",
        Flash::success(format!(
            "{} has been deleted.",
            html_escape(&user.email_address)
        )),
    ))
}

/// `GET /users/download`
pub async fn download(
    State(state): State<AppState>,
    Query(filter): Query<UserFilterForm>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let csv = state.users.list_csv(&token, &to_filters(&filter)).await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"users.csv\""),
        ],
        csv,
    )
        .into_response())
}

fn render_form(
    state: &AppState,
    headers: &HeaderMap,
    heading: &str,
    action: &str,
    form: UserForm,
    errors: FormErrors,
    csrf: CsrfToken,
) -> Result<Response, AppError> {
    // Passwords are never echoed back into the form.
    let form = UserForm {
        email_address: form.email_address,
        ..Default::default()
    };

    Page::new("user_form", heading)
        .with("heading", heading)
        .with("action", action)
        .with("form", form)
        .with("errors", errors)
        .with("csrf_token", csrf.0)
        .render(&state.config.security.secret_key, headers)
}
