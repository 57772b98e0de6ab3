//! Response envelope handling
//!
//! The API reports most failures inside a 200 response. Three shapes are
//! recognized:
//!
//! - `{"valid": 0, "errors": [{"code": "...", "description": "..."}]}`
//! - `{"error": "invalid_token", "error_description": "..."}`
//! - `[{"code": "...", "description": "..."}]`

use crate::error::{ApiErrorDetail, Error, Result};
use crate::types::{de, flag, Id, JsonObject, JsonValue};

/// Error codes that mean the access token must be renewed
const TOKEN_ERROR_CODES: &[&str] = &["invalid_token", "expired_token"];

/// Error details carried by a response body, if it is an error envelope
pub fn extract_errors(body: &JsonValue) -> Option<Vec<ApiErrorDetail>> {
    match body {
        JsonValue::Object(map) => {
            if let Some(error) = map.get("error").and_then(JsonValue::as_str) {
                let description = map
                    .get("error_description")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default();
                return Some(vec![ApiErrorDetail::new(error, description)]);
            }

            let valid = map.get("valid").and_then(flag::from_value);
            if valid == Some(false) {
                let mut errors = map.get("errors").map(error_list).unwrap_or_default();
                if errors.is_empty() {
                    errors.push(ApiErrorDetail::new("invalid", "Request was not accepted"));
                }
                return Some(errors);
            }

            None
        }
        JsonValue::Array(items) if !items.is_empty() && items.iter().all(is_error_entry) => {
            Some(error_list(body))
        }
        _ => None,
    }
}

/// True when any detail asks for a new access token
pub fn is_token_error(errors: &[ApiErrorDetail]) -> bool {
    errors
        .iter()
        .any(|e| TOKEN_ERROR_CODES.contains(&e.code.as_str()))
}

fn is_error_entry(item: &JsonValue) -> bool {
    match item {
        JsonValue::Object(map) => {
            map.contains_key("code")
                && map.contains_key("description")
                && map.keys().all(|k| !k.ends_with("_id"))
        }
        _ => false,
    }
}

fn error_list(value: &JsonValue) -> Vec<ApiErrorDetail> {
    match value {
        JsonValue::Array(items) => items.iter().map(error_entry).collect(),
        // Some endpoints key errors by field name
        JsonValue::Object(map) => map
            .iter()
            .map(|(field, v)| match v {
                JsonValue::String(s) => ApiErrorDetail::new(field.as_str(), s.as_str()),
                other => ApiErrorDetail::new(field.as_str(), other.to_string()),
            })
            .collect(),
        JsonValue::String(s) => vec![ApiErrorDetail::new(s.as_str(), "")],
        _ => Vec::new(),
    }
}

fn error_entry(item: &JsonValue) -> ApiErrorDetail {
    match item {
        JsonValue::Object(_) => serde_json::from_value(item.clone()).unwrap_or_default(),
        JsonValue::String(s) => ApiErrorDetail::new(s.as_str(), ""),
        other => ApiErrorDetail::new(other.to_string(), ""),
    }
}

/// True for bodies that mean "nothing found"
pub fn is_empty_result(body: &JsonValue) -> bool {
    match body {
        JsonValue::Null | JsonValue::Bool(false) => true,
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Read `{"count": n}`
pub fn parse_count(endpoint: &str, body: &JsonValue) -> Result<u64> {
    body.get("count")
        .and_then(de::as_u64)
        .ok_or_else(|| Error::decode(endpoint, format!("expected {{\"count\": n}}, got {body}")))
}

/// Read a mutation answer `{"valid": 1, "<id_field>": n}`
pub fn parse_mutation(endpoint: &str, body: &JsonValue, id_field: &str) -> Result<Id> {
    let map = as_object(endpoint, body)?;
    ensure_valid(endpoint, map)?;
    map.get(id_field)
        .and_then(de::as_u64)
        .ok_or_else(|| Error::decode(endpoint, format!("response is missing '{id_field}'")))
}

/// Read a delete answer `{"valid": 1}`
pub fn parse_deleted(endpoint: &str, body: &JsonValue) -> Result<()> {
    let map = as_object(endpoint, body)?;
    ensure_valid(endpoint, map)
}

fn as_object<'a>(endpoint: &str, body: &'a JsonValue) -> Result<&'a JsonObject> {
    body.as_object()
        .ok_or_else(|| Error::decode(endpoint, format!("expected an object, got {body}")))
}

fn ensure_valid(endpoint: &str, map: &JsonObject) -> Result<()> {
    match map.get("valid").and_then(flag::from_value) {
        Some(true) => Ok(()),
        Some(false) => Err(Error::api(
            endpoint,
            vec![ApiErrorDetail::new("invalid", "Request was not accepted")],
        )),
        None => Err(Error::decode(endpoint, "response is missing 'valid'")),
    }
}
