use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    entities::option_fields::OptionField,
    errors::{new_validation_error, AppError},
};

static GITHUB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://github\.com/.+").expect("valid github url pattern")
});

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color pattern")
});

static USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username pattern")
});

// ───── Parsing ──────────────────────────────────────────────────────

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn trim_opt(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

/// Trims and drops empty strings.
pub fn trim_opt_nonempty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn trim_all(values: Option<Vec<String>>) -> Option<Vec<String>> {
    values.map(|v| v.into_iter().map(|s| s.trim().to_string()).collect())
}

/// Collects derive-level violations, leaving room for cross-field checks.
pub fn violations<T: Validate>(payload: &T) -> ValidationErrors {
    payload.validate().err().unwrap_or_else(ValidationErrors::new)
}

/// Unwraps a field that validation has already proven present.
pub fn present<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::invalid_field(field, "Field is required"))
}

/// Parses a date that validation has already accepted.
pub fn parse_required_date(raw: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    parse_date(raw).ok_or_else(|| AppError::invalid_field(field, "Please enter a valid date"))
}

// ───── Field validators ─────────────────────────────────────────────

pub fn validate_date(raw: &str) -> Result<(), ValidationError> {
    match parse_date(raw) {
        Some(_) => Ok(()),
        None => Err(new_validation_error("invalid_date", "Please enter a valid date")),
    }
}

pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(new_validation_error("invalid_url", "Please enter a valid URL")),
    }
}

pub fn validate_github_url(url: &str) -> Result<(), ValidationError> {
    if GITHUB_URL.is_match(url) {
        Ok(())
    } else {
        Err(new_validation_error("invalid_github_url", "Please enter a valid GitHub URL"))
    }
}

pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        Err(new_validation_error("invalid_color", "Please enter a valid hex color code"))
    }
}

pub fn validate_username_chars(username: &str) -> Result<(), ValidationError> {
    if USERNAME.is_match(username) {
        Ok(())
    } else {
        Err(new_validation_error(
            "invalid_username",
            "Username can only contain letters, numbers, and underscores",
        ))
    }
}

/// Fails with `message` when a supplied string is empty after trimming.
pub fn non_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(new_validation_error("required", message))
    } else {
        Ok(())
    }
}

pub fn validate_technologies(technologies: &[String]) -> Result<(), ValidationError> {
    if technologies.iter().any(|t| t.trim().is_empty()) {
        return Err(new_validation_error("empty_technology", "Technologies cannot contain empty entries"));
    }
    Ok(())
}

/// Images are absolute http(s) URLs or site-relative paths.
pub fn validate_image_urls(images: &[String]) -> Result<(), ValidationError> {
    for image in images {
        if image.starts_with('/') && image.len() > 1 {
            continue;
        }
        if validate_http_url(image).is_err() {
            return Err(new_validation_error("invalid_image", "Images must be URLs or site paths"));
        }
    }
    Ok(())
}

// ───── OptionField variants ─────────────────────────────────────────

pub fn validate_optional_http_url(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(url) => validate_http_url(url),
        None => Ok(()),
    }
}

pub fn validate_optional_github_url(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(url) => validate_github_url(url),
        None => Ok(()),
    }
}

pub fn validate_optional_hex_color(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(color) => validate_hex_color(color),
        None => Ok(()),
    }
}

pub fn validate_optional_date(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(raw) => validate_date(raw),
        None => Ok(()),
    }
}

/// Length bound for a patchable string, counted in characters.
pub fn validate_optional_max_chars(
    value: &OptionField<String>,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(s) if s.chars().count() > max => Err(new_validation_error("length", message)),
        _ => Ok(()),
    }
}
