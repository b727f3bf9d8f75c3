//! Point pages: list, create, view, edit, delete, CSV download.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Form};
use geojson::{Geometry, Value};
use handlebars::html_escape;
use uuid::Uuid;

use crate::geo::PointView;
use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::security::csrf::CsrfToken;
use crate::upstream::PointFilters;
use crate::web::flash::Flash;
use crate::web::forms::{FormErrors, PointFilterForm, PointForm};
use crate::web::templates::Page;
use crate::web::{filter_query, non_empty, redirect_with_flash};

fn to_filters(form: &PointFilterForm) -> PointFilters {
    PointFilters {
        sort: non_empty(&form.sort),
        name: non_empty(&form.name),
    }
}

fn point_geometry(latitude: f64, longitude: f64) -> Geometry {
    // GeoJSON positions are lon-first.
    Geometry::new(Value::Point(vec![longitude, latitude]))
}

/// `GET /points`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PointFilterForm>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let filters = to_filters(&filter);
    let collection = state.points.list(&filters).await?;
    let points = collection
        .features
        .iter()
        .map(PointView::from_feature)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::Upstream)?;

    let query = filter_query(&[
        ("sort", filters.sort.as_deref()),
        ("name", filters.name.as_deref()),
    ]);

    let form = serde_json::json!({
        "sort": filter.sort.as_deref().unwrap_or("name"),
        "name": filter.name.as_deref().unwrap_or(""),
    });

    Page::new("points_list", "Points")
        .with("points", points)
        .with("form", form)
        .with("query", query)
        .render(&state.config.security.secret_key, &headers)
}

/// `GET /points/new`
pub async fn new_form(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    render_form(
        &state,
        &headers,
        "Create a new point",
        "/points/new",
        PointForm::default(),
        FormErrors::new(),
        csrf,
    )
}

/// `POST /points/new`
pub async fn create(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<PointForm>,
) -> Result<Response, AppError> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return render_form(
                &state,
                &headers,
                "Create a new point",
                "/points/new",
                form,
                errors,
                csrf,
            )
        }
    };

    let geometry = point_geometry(valid.latitude, valid.longitude);
    let feature = state.points.create(&valid.name, &geometry).await?;
    let point = PointView::from_feature(&feature).map_err(AppError::Upstream)?;
    tracing::info!(point_id = %point.id, "Point created");

    Ok(redirect_with_flash(
        &state.config.security,
        "/points",
        Flash::success(format!(
            "<a href=\"/points/{}\" class=\"alert-link\">{}</a> has been created.",
            point.id,
            html_escape(&point.name),
        )),
    ))
}

/// `GET /points/{id}`
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let feature = state.points.get(id).await?;
    let point = PointView::from_feature(&feature).map_err(AppError::Upstream)?;

    let title = point.name.clone();
    Page::new("point_view", &title)
        .with("point", point)
        .render(&state.config.security.secret_key, &headers)
}

/// `GET /points/{id}/edit`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let feature = state.points.get(id).await?;
    let point = PointView::from_feature(&feature).map_err(AppError::Upstream)?;

    let form = PointForm {
        name: point.name.clone(),
        latitude: point.latitude.to_string(),
        longitude: point.longitude.to_string(),
    };

    render_form(
        &state,
        &headers,
        &format!("Edit {}", point.name),
        &format!("/points/{}/edit", id),
        form,
        FormErrors::new(),
        csrf,
    )
}

/// `POST /points/{id}/edit`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<PointForm>,
) -> Result<Response, AppError> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return render_form(
                &state,
                &headers,
                "Edit point",
                &format!("/points/{}/edit", id),
                form,
                errors,
                csrf,
            )
        }
    };

    let geometry = point_geometry(valid.latitude, valid.longitude);
    let feature = state.points.edit(id, &valid.name, &geometry).await?;
    let point = PointView::from_feature(&feature).map_err(AppError::Upstream)?;
    tracing::info!(point_id = %point.id, "Point updated");

    Ok(redirect_with_flash(
        &state.config.security,
        "/points",
        Flash::success(format!(
            "Your changes to <a href=\"/points/{}\" class=\"alert-link\">{}</a> have been saved.",
            point.id,
            html_escape(&point.name),
        )),
    ))
}

/// `GET /points/{id}/delete`
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let feature = state.points.get(id).await?;
    let point = PointView::from_feature(&feature).map_err(AppError::Upstream)?;

    Page::new("point_delete", &format!("Delete {}", point.name))
        .with("point", point)
        .render(&state.config.security.secret_key, &headers)
}

/// `POST /points/{id}/delete`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let feature = state.points.get(id).await?;
    let point = PointView::from_feature(&feature).map_err(AppError::Upstream)?;

    state.points.delete(id).await?;
    tracing::info!(point_id = %id, "Point deleted");

    Ok(redirect_with_flash(
        &state.config.security,
        "/points",
        Flash::success(format!("{} has been deleted.", html_escape(&point.name))),
    ))
}

/// `GET /points/download`
pub async fn download(
    State(state): State<AppState>,
    Query(filter): Query<PointFilterForm>,
) -> Result<Response, AppError> {
    let csv = state.points.list_csv(&to_filters(&filter)).await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"points.csv\""),
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
    form: PointForm,
    errors: FormErrors,
    csrf: CsrfToken,
) -> Result<Response, AppError> {
    Page::new("point_form", heading)
        .with("heading", heading)
        .with("action", action)
        .with("form", form)
        .with("errors", errors)
        .with("csrf_token", csrf.0)
        .render(&state.config.security.secret_key, headers)
}
