//! Input validation utilities for query parameters

use regex::Regex;

use crate::utils::error::{AppError, AppResult};

/// Parse a boolean flag that must be spelled exactly `true` or `false`.
///
/// A missing flag falls back to `default`.
pub fn parse_bool_flag(name: &str, value: Option<&str>, default: bool) -> AppResult<bool> {
    match value {
        None => Ok(default),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(AppError::BadRequest(format!(
            "The value for '{}' parameter should be 'true' or 'false'",
            name
        ))),
    }
}

/// Parse an optional integer parameter; blank counts as absent.
pub fn parse_optional_int(name: &str, value: Option<&str>) -> AppResult<Option<i64>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            AppError::BadRequest(format!(
                "The value for '{}' parameter should be an integer, got '{}'",
                name, raw
            ))
        }),
    }
}

/// Compile an optional regular expression parameter; blank counts as absent.
pub fn parse_optional_regex(name: &str, value: Option<&str>) -> AppResult<Option<Regex>> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => Regex::new(raw).map(Some).map_err(|e| {
            AppError::BadRequest(format!(
                "The value for '{}' parameter is not a valid regular expression: {}",
                name, e
            ))
        }),
    }
}

/// Parse a 1-based page number; absent means the first page.
pub fn parse_page(value: Option<&str>) -> AppResult<u32> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(1);
    };

    match raw.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(AppError::BadRequest(format!(
            "The value for 'page' parameter should be a positive integer, got '{}'",
            raw
        ))),
    }
}
