//
//  bitbucket-v1
//  api/common/form.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Form encoding for v1 write requests.
//!
//! The v1 API takes `application/x-www-form-urlencoded` bodies for creates
//! and updates. Request models are turned into a flat string map here and
//! handed to `reqwest`'s form support.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// Flattens a serializable request model into form fields.
///
/// The model must serialize to a JSON object. `null` fields are skipped,
/// strings are copied as-is, numbers and booleans are stringified. Nested
/// objects and arrays have no form representation and are rejected.
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::api::common::to_form_fields;
/// use bitbucket_v1::api::models::IssueRequest;
///
/// let request = IssueRequest {
///     title: Some("Crash on save".to_string()),
///     kind: Some("bug".to_string()),
///     ..Default::default()
/// };
///
/// let fields = to_form_fields(&request).unwrap();
/// assert_eq!(fields.get("title").map(String::as_str), Some("Crash on save"));
/// assert!(!fields.contains_key("priority"));
/// ```
pub fn to_form_fields<T: Serialize>(value: &T) -> Result<BTreeMap<String, String>, ApiError> {
    let object = match serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))? {
        Value::Object(map) => map,
        other => {
            return Err(ApiError::Encode(format!(
                "expected an object, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut fields = BTreeMap::new();
    for (key, value) in object {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(ApiError::Encode(format!(
                    "field '{}' is not a scalar value",
                    key
                )))
            }
        };
        fields.insert(key, text);
    }

    Ok(fields)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
