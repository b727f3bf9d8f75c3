//! Login page: exchanges credentials for the bearer-token cookie.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form};

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::security::csrf::CsrfToken;
use crate::web::cookies::{self, SetCookie};
use crate::web::forms::{FormErrors, LoginForm};
use crate::web::templates::Page;
use crate::web::TOKEN_COOKIE;

/// `GET /auth/login`
pub async fn login_form(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    render_form(&state, &headers, LoginForm::default(), FormErrors::new(), csrf)
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return render_form(&state, &headers, form, errors, csrf);
    }

    let token = state
        .auth
        .login(&form.email_address, &form.password)
        .await?;
    tracing::info!("Login succeeded");

    let mut response = Redirect::to("/").into_response();
    let cookie = SetCookie::new(TOKEN_COOKIE, &token.token)
        .secure(state.config.security.cookie_secure);
    cookies::set(response.headers_mut(), &cookie);
    Ok(response)
}

fn render_form(
    state: &AppState,
    headers: &HeaderMap,
    form: LoginForm,
    errors: FormErrors,
    csrf: CsrfToken,
) -> Result<Response, AppError> {
    // The password is never echoed back into the form.
    let form = LoginForm {
        email_address: form.email_address,
        ..Default::default()
    };

    Page::new("login", "Log in")
        .with("form", form)
        .with("errors", errors)
        .with("csrf_token", csrf.0)
        .render(&state.config.security.secret_key, headers)
}
