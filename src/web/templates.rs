//! Page template registry and rendering.
//!
//! Templates are embedded in the binary and registered once. The `json`
//! helper serializes a context value for safe embedding inside an inline
//! script; `stringeq` drives checked/selected states in forms.

use std::sync::OnceLock;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::AppError;
use crate::web::flash::{self, Flash};

static REGISTRY: OnceLock<Handlebars<'static>> = OnceLock::new();

/// The shared template registry.
pub fn registry() -> &'static Handlebars<'static> {
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(json: |v: Value| script_safe_json(&v));
    handlebars.register_helper("json", Box::new(json));

    handlebars_helper!(stringeq: |s1: String, s2: String| s1.eq(&s2));
    handlebars.register_helper("stringeq", Box::new(stringeq));

    let templates: &[(&str, &str)] = &[
        ("layout", include_str!("../../templates/layout.hbs")),
        ("index", include_str!("../../templates/index.hbs")),
        ("cookies", include_str!("../../templates/cookies.hbs")),
        ("error", include_str!("../../templates/error.hbs")),
        ("login", include_str!("../../templates/login.hbs")),
        ("points_list", include_str!("../../templates/points/list.hbs")),
        ("point_form", include_str!("../../templates/points/form.hbs")),
        ("point_view", include_str!("../../templates/points/view.hbs")),
        ("point_delete", include_str!("../../templates/points/delete.hbs")),
        ("things_list", include_str!("../../templates/things/list.hbs")),
        ("thing_form", include_str!("../../templates/things/form.hbs")),
        ("thing_view", include_str!("../../templates/things/view.hbs")),
        ("thing_delete", include_str!("../../templates/things/delete.hbs")),
        ("users_list", include_str!("../../templates/users/list.hbs")),
        ("user_form", include_str!("../../templates/users/form.hbs")),
        ("user_view", include_str!("../../templates/users/view.hbs")),
        ("user_delete", include_str!("../../templates/users/delete.hbs")),
    ];
    for (name, source) in templates {
        handlebars
            .register_template_string(name, source)
            .expect("embedded template must parse");
    }

    handlebars
}

/// Serialize a value as JSON that is inert inside a `<script>` element.
fn script_safe_json(value: &Value) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

/// A page under construction.
pub struct Page {
    template: &'static str,
    context: serde_json::Map<String, Value>,
}

impl Page {
    pub fn new(template: &'static str, title: &str) -> Self {
        let mut context = serde_json::Map::new();
        context.insert("title".to_string(), Value::String(title.to_string()));
        Self { template, context }
    }

    /// Add a context value for the template.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.context.insert(key.to_string(), value);
        self
    }

    /// Render to a response, consuming any pending flash message.
    pub fn render(mut self, secret: &str, request_headers: &HeaderMap) -> Result<Response, AppError> {
        let flash: Option<Flash> = flash::peek(request_headers, secret);
        let had_flash = flash.is_some();
        if let Some(flash) = flash {
            self.context
                .insert("flash".to_string(), serde_json::to_value(flash).unwrap_or(Value::Null));
        }

        let body = registry().render(self.template, &Value::Object(self.context))?;
        let mut response = Html(body).into_response();
        if had_flash {
            flash::clear(response.headers_mut());
        }
        Ok(response)
    }
}

/// Render the error page. Falls back to bare markup if the template
/// itself fails; the error path has to produce something.
pub fn error_page(status: StatusCode, title: &str, description: &str) -> String {
    let context = serde_json::json!({
        "title": title,
        "status": status.as_u16(),
        "description": description,
    });
    registry().render("error", &context).unwrap_or_else(|_| {
        format!(
            "<!doctype html><html><body><h1>{}</h1><p>{}</p></body></html>",
            title, description
        )
    })
}
