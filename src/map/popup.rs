//! Per-feature popup binding.
//!
//! A feature gets a popup exactly when it carries a non-empty string `name`
//! property, and the popup displays exactly that name. The text is escaped
//! here, server-side, so point names can never smuggle markup into the page.

use geojson::{Feature, FeatureCollection};

/// Property the rendered page reads popup content from.
pub const POPUP_PROPERTY: &str = "popup";

/// Popup text for one feature: the `name` property, or nothing.
pub fn popup_text(feature: &Feature) -> Option<&str> {
    let name = feature.properties.as_ref()?.get("name")?.as_str()?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Bind popups across a collection by writing the escaped popup content
/// into each selected feature's properties. Features without a usable name
/// are left untouched.
pub fn bind_popups(collection: &mut FeatureCollection) {
    for feature in &mut collection.features {
        let Some(text) = popup_text(feature).map(escape) else {
            continue;
        };
        if let Some(properties) = feature.properties.as_mut() {
            properties.insert(POPUP_PROPERTY.to_string(), serde_json::Value::String(text));
        }
    }
}

/// Minimal HTML escape; popups render as text, not markup.
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
