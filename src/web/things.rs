//! Thing pages: list, create, view, edit, delete, CSV download.
//!
//! Every upstream call forwards the bearer token from the login cookie;
//! browsing things without signing in surfaces as the 401 page.

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
use crate::upstream::ThingFilters;
use crate::web::flash::Flash;
use crate::web::forms::{FormErrors, ThingFilterForm, ThingForm, COLOURS};
use crate::web::templates::Page;
use crate::web::{bearer_token, filter_query, non_empty, redirect_with_flash};

fn to_filters(form: &ThingFilterForm) -> ThingFilters {
    ThingFilters {
        sort: non_empty(&form.sort),
        name: non_empty(&form.name),
        colour: non_empty(&form.colour),
    }
}

/// `GET /things`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ThingFilterForm>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let filters = to_filters(&filter);
    let things = state.things.list(&token, &filters).await?;

    let query = filter_query(&[
        ("sort", filters.sort.as_deref()),
        ("name", filters.name.as_deref()),
        ("colour", filters.colour.as_deref()),
    ]);

    let form = serde_json::json!({
        "sort": filter.sort.as_deref().unwrap_or("name"),
        "name": filter.name.as_deref().unwrap_or(""),
        "colour": filter.colour.as_deref().unwrap_or(""),
    });

    Page::new("things_list", "Things")
        .with("things", things)
        .with("form", form)
        .with("colours", COLOURS)
        .with("query", query)
        .render(&state.config.security.secret_key, &headers)
}

/// `GET /things/new`
pub async fn new_form(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    render_form(
        &state,
        &headers,
        "Create a new thing",
        "/things/new",
        ThingForm::default(),
        FormErrors::new(),
        csrf,
    )
}

/// `POST /things/new`
pub async fn create(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<ThingForm>,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    if let Err(errors) = form.validate() {
        return render_form(
            &state,
            &headers,
            "Create a new thing",
            "/things/new",
            form,
            errors,
            csrf,
        );
    }

    let thing = state.things.create(&token, &form.name, &form.colour).await?;
    tracing::info!(thing_id = %thing.id, "Thing created");

    Ok(redirect_with_flash(
        &state.config.security,
        "/things",
        Flash::success(format!(
            "<a href=\"/things/{}\" class=\"alert-link\">{}</a> has been created.",
            thing.id,
            html_escape(&thing.name),
        )),
    ))
}

/// `GET /things/{id}`
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let thing = state.things.get(&token, id).await?;

    let title = thing.name.clone();
    Page::new("thing_view", &title)
        .with("thing", thing)
        .render(&state.config.security.secret_key, &headers)
}

/// `GET /things/{id}/edit`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let thing = state.things.get(&token, id).await?;

    let form = ThingForm {
        name: thing.name.clone(),
        colour: thing.colour.clone(),
    };

    render_form(
        &state,
        &headers,
        &format!("Edit {}", thing.name),
        &format!("/things/{}/edit", id),
        form,
        FormErrors::new(),
        csrf,
    )
}

/// `POST /things/{id}/edit`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<ThingForm>,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    if let Err(errors) = form.validate() {
        return render_form(
            &state,
            &headers,
            "Edit thing",
            &format!("/things/{}/edit", id),
            form,
            errors,
            csrf,
        );
    }

    let thing = state
        .things
        .edit(&token, id, &form.name, &form.colour)
        .await?;
    tracing::info!(thing_id = %thing.id, "Thing updated");

    Ok(redirect_with_flash(
        &state.config.security,
        "/things",
        Flash::success(format!(
            "Your changes to <a href=\"/things/{}\" class=\"alert-link\">{}</a> have been saved.",
            thing.id,
            html_escape(&thing.name),
        )),
    ))
}

/// `GET /things/{id}/delete`
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let thing = state.things.get(&token, id).await?;

    Page::new("thing_delete", &format!("Delete {}", thing.name))
        .with("thing", thing)
        .render(&state.config.security.secret_key, &headers)
}

/// `POST /things/{id}/delete`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let thing = state.things.get(&token, id).await?;

    state.things.delete(&token, id).await?;
    tracing::info!(thing_id = %id, "Thing deleted");

    Ok(redirect_with_flash(
        &state.config.security,
        "/things",
        Flash::success(format!("{} has been deleted.", html_escape(&thing.name))),
    ))
}

/// `GET /things/download`
pub async fn download(
    State(state): State<AppState>,
    Query(filter): Query<ThingFilterForm>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let csv = state.things.list_csv(&token, &to_filters(&filter)).await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"things.csv\""),
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
    form: ThingForm,
    errors: FormErrors,
    csrf: CsrfToken,
) -> Result<Response, AppError> {
    Page::new("thing_form", heading)
        .with("heading", heading)
        .with("action", action)
        .with("form", form)
        .with("errors", errors)
        .with("colours", COLOURS)
        .with("csrf_token", csrf.0)
        .render(&state.config.security.secret_key, headers)
}
