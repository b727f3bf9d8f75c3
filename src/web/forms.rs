//! Form types and validation.
//!
//! Forms deserialize permissively (every field a string) so that a bad
//! submission re-renders the form with per-field messages instead of a
//! framework-level rejection. `validate()` produces the typed values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name → message, rendered inline next to each field.
pub type FormErrors = BTreeMap<String, String>;

/// Colours a thing may have.
pub const COLOURS: &[&str] = &[
    "red", "green", "blue", "yellow", "orange", "purple", "black", "white",
];

fn err(errors: &mut FormErrors, field: &str, message: &str) {
    errors.insert(field.to_string(), message.to_string());
}

/// Structural email check: one local part, one domain with a dot.
fn email_is_valid(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
        && !domain.contains('@')
}

/// Create/edit form for a point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PointForm {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

/// A point form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointForm {
    pub fn validate(&self) -> Result<ValidPoint, FormErrors> {
        let mut errors = FormErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            err(&mut errors, "name", "Enter a name");
        } else if name.len() > 32 {
            err(&mut errors, "name", "Name must be 32 characters or fewer");
        }

        let latitude = match self.latitude.trim().parse::<f64>() {
            Ok(v) if (-90.0..=90.0).contains(&v) => Some(v),
            Ok(_) => {
                err(&mut errors, "latitude", "Latitude must be between -90 and 90");
                None
            }
            Err(_) => {
                err(&mut errors, "latitude", "Enter a latitude");
                None
            }
        };

        let longitude = match self.longitude.trim().parse::<f64>() {
            Ok(v) if (-180.0..=180.0).contains(&v) => Some(v),
            Ok(_) => {
                err(&mut errors, "longitude", "Longitude must be between -180 and 180");
                None
            }
            Err(_) => {
                err(&mut errors, "longitude", "Enter a longitude");
                None
            }
        };

        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) if errors.is_empty() => Ok(ValidPoint {
                name: name.to_string(),
                latitude,
                longitude,
            }),
            _ => Err(errors),
        }
    }
}

/// Create/edit form for a thing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThingForm {
    pub name: String,
    pub colour: String,
}

impl ThingForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            err(&mut errors, "name", "Enter a name");
        } else if name.len() > 32 {
            err(&mut errors, "name", "Name must be 32 characters or fewer");
        }

        if !COLOURS.contains(&self.colour.as_str()) {
            err(&mut errors, "colour", "Select a colour");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Sign-up/edit form for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub email_address: String,
    pub password: String,
    pub confirm_password: String,
}

impl UserForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validate_email(&mut errors, &self.email_address);
        validate_password(&mut errors, &self.password);

        if self.confirm_password.is_empty() {
            err(&mut errors, "confirm_password", "Confirm your password");
        } else if self.confirm_password != self.password {
            err(&mut errors, "confirm_password", "Passwords must match.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email_address: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validate_email(&mut errors, &self.email_address);
        validate_password(&mut errors, &self.password);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_email(errors: &mut FormErrors, email_address: &str) {
    if email_address.is_empty() {
        err(errors, "email_address", "Enter an email address");
    } else if email_address.len() > 256 {
        err(
            errors,
            "email_address",
            "Email address must be 256 characters or fewer",
        );
    } else if !email_is_valid(email_address) {
        err(
            errors,
            "email_address",
            "Enter an email address in the correct format",
        );
    }
}

fn validate_password(errors: &mut FormErrors, password: &str) {
    if password.is_empty() {
        err(errors, "password", "Enter a password");
    } else if password.len() < 8 || password.len() > 72 {
        err(
            errors,
            "password",
            "Password must be between 8 and 72 characters",
        );
    }
}

/// Cookie consent form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CookiesForm {
    pub functional: String,
    pub analytics: String,
}

impl CookiesForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if !matches!(self.functional.as_str(), "yes" | "no") {
            err(
                &mut errors,
                "functional",
                "Select yes if you want to accept functional cookies",
            );
        }
        if !matches!(self.analytics.as_str(), "yes" | "no") {
            err(
                &mut errors,
                "analytics",
                "Select yes if you want to accept analytics cookies",
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// List filter query for points (no validation, absent means unfiltered).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PointFilterForm {
    pub sort: Option<String>,
    pub name: Option<String>,
}

/// List filter query for things.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ThingFilterForm {
    pub sort: Option<String>,
    pub name: Option<String>,
    pub colour: Option<String>,
}

/// List filter query for users.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UserFilterForm {
    pub sort: Option<String>,
    pub email_address: Option<String>,
}
