//! Index map page and the cookie-consent page.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::{Extension, Form};

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::map::MapPage;
use crate::security::csrf::CsrfToken;
use crate::security::headers::CspNonce;
use crate::upstream::PointFilters;
use crate::web::cookies::{self, SetCookie};
use crate::web::flash::Flash;
use crate::web::forms::CookiesForm;
use crate::web::templates::Page;
use crate::web::redirect_with_flash;

const POLICY_COOKIE: &str = "cookies_policy";
const ONE_YEAR_SECS: i64 = 31_557_600;

/// `GET /`: the map, fitted to every point the upstream knows about.
pub async fn index(
    State(state): State<AppState>,
    Extension(nonce): Extension<CspNonce>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let collection = state.points.list(&PointFilters::default()).await?;
    tracing::debug!(features = collection.features.len(), "Rendering map page");

    let map = MapPage::build(&state.config.map, collection).map_err(AppError::Upstream)?;

    Page::new("index", "Map")
        .with("map", map)
        .with("nonce", nonce.0)
        .render(&state.config.security.secret_key, &headers)
}

/// `GET /cookies`: consent form, pre-filled from the current policy.
pub async fn cookies_page(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let form = read_policy(&headers);
    render_cookies(&state, &headers, form, None, csrf)
}

/// `POST /cookies`: store the consent choice for a year.
pub async fn cookies_submit(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<CookiesForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(()) => {
            let mut response = redirect_with_flash(
                &state.config.security,
                "/cookies",
                Flash::success("You\u{2019}ve set your cookie preferences."),
            );
            let policy = write_policy(&form);
            let cookie = SetCookie::new(POLICY_COOKIE, &policy)
                .max_age(ONE_YEAR_SECS)
                .http_only(false)
                .secure(state.config.security.cookie_secure);
            cookies::set(response.headers_mut(), &cookie);
            Ok(response)
        }
        Err(errors) => render_cookies(&state, &headers, form, Some(errors), csrf),
    }
}

fn render_cookies(
    state: &AppState,
    headers: &HeaderMap,
    form: CookiesForm,
    errors: Option<crate::web::forms::FormErrors>,
    csrf: CsrfToken,
) -> Result<Response, AppError> {
    Page::new("cookies", "Cookies")
        .with("form", form)
        .with("errors", errors.unwrap_or_default())
        .with("csrf_token", csrf.0)
        .render(&state.config.security.secret_key, headers)
}

/// Current policy from the consent cookie; reject-all when absent.
fn read_policy(headers: &HeaderMap) -> CookiesForm {
    let mut form = CookiesForm {
        functional: "no".to_string(),
        analytics: "no".to_string(),
    };
    let Some(raw) = cookies::get(headers, POLICY_COOKIE) else {
        return form;
    };
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "functional" => form.functional = value.into_owned(),
            "analytics" => form.analytics = value.into_owned(),
            _ => {}
        }
    }
    form
}

fn write_policy(form: &CookiesForm) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("functional", &form.functional)
        .append_pair("analytics", &form.analytics)
        .finish()
}
