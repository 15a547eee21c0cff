//
//  bitbucket-v1
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! Shared error type and request-encoding helpers used by the client and
//! every controller.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`to_form_fields`] - Flattens a request model into v1 form fields
//! - [`error_message`] - Pulls a human readable message out of an error body
//!
//! # Example
//!
//! ```rust
//! use bitbucket_v1::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::AuthRequired) => println!("Please authenticate first"),
//!         Err(ApiError::NotFound(resource)) => println!("Resource not found: {}", resource),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use reqwest::StatusCode;
use thiserror::Error;

mod form;

pub use form::*;

/// Unified error type for all Bitbucket API operations.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `AuthRequired` | No authentication credentials provided | 401 |
/// | `AuthFailed` | Invalid or expired credentials | 401 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `RateLimited` | Too many requests, retry later | 429 |
/// | `Forbidden` | Insufficient permissions | 403 |
/// | `BadRequest` | Invalid request parameters | 400 |
/// | `ServerError` | Internal server error | 5xx |
/// | `Network` | Network connectivity issues | N/A |
/// | `Decode` | Response body was not the expected JSON | N/A |
/// | `Encode` | Request model could not be sent as form fields | N/A |
/// | `Unknown` | Unexpected or unclassified errors | N/A |
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::api::common::ApiError;
///
/// fn fetch_issue() -> Result<(), ApiError> {
///     Err(ApiError::NotFound("/repositories/owner/repo/issues/42".to_string()))
/// }
///
/// match fetch_issue() {
///     Ok(_) => println!("Issue fetched successfully"),
///     Err(ApiError::NotFound(resource)) => eprintln!("Could not find: {}", resource),
///     Err(e) => eprintln!("Unexpected error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication credentials are required but not provided.
    #[error("Authentication required")]
    AuthRequired,

    /// Authentication failed due to invalid or expired credentials.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    ///
    /// Carries the request path that produced the 404.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Access to the resource is forbidden.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The request was malformed or contained invalid parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal server error occurred on the Bitbucket server.
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected model.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request model could not be flattened into form fields.
    #[error("Cannot encode request: {0}")]
    Encode(String),

    /// An unknown or unexpected error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Maps a non-success HTTP response to an error variant.
    ///
    /// # Parameters
    ///
    /// * `status` - The HTTP status code of the response
    /// * `path` - The request path, reported for 404s
    /// * `body` - The raw response body
    pub fn from_response(status: StatusCode, path: &str, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            StatusCode::UNAUTHORIZED => {
                if body.trim().is_empty() {
                    Self::AuthRequired
                } else {
                    Self::AuthFailed(message)
                }
            }
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(path.to_string()),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            s if s.is_server_error() => Self::ServerError(message),
            _ => Self::Unknown(format!("API error ({}): {}", status, message)),
        }
    }

    /// Returns `true` for errors caused by missing or rejected credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::AuthFailed(_))
    }
}

/// Extracts a user-friendly message from a Bitbucket error body.
///
/// Recognised shapes, tried in order:
///
/// ```json
/// {"error": {"message": "..."}}
/// {"errors": [{"message": "..."}]}
/// {"error": {"detail": "..."}}
/// {"message": "..."}
/// ```
///
/// The v1 API frequently answers with plain text, in which case the trimmed
/// body itself is the message. Returns `None` for an empty body.
pub fn error_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return Some(message.to_string());
        }

        if let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return Some(message.to_string());
        }

        if let Some(detail) = json
            .get("error")
            .and_then(|e| e.get("detail"))
            .and_then(|m| m.as_str())
        {
            return Some(detail.to_string());
        }

        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error": {"message": "Bad title"}}"#).as_deref(),
            Some("Bad title")
        );
        assert_eq!(
            error_message(r#"{"errors": [{"message": "first"}, {"message": "second"}]}"#).as_deref(),
            Some("first")
        );
        assert_eq!(
            error_message(r#"{"error": {"detail": "details here"}}"#).as_deref(),
            Some("details here")
        );
        assert_eq!(error_message(r#"{"message": "plain"}"#).as_deref(), Some("plain"));
        assert_eq!(error_message("  Not Found \n").as_deref(), Some("Not Found"));
        assert_eq!(error_message("   "), None);
    }

    #[test]
    fn test_from_response_status_mapping() {
        assert!(matches!(
            ApiError::from_response(StatusCode::UNAUTHORIZED, "/x", ""),
            ApiError::AuthRequired
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::UNAUTHORIZED, "/x", "Bad credentials"),
            ApiError::AuthFailed(m) if m == "Bad credentials"
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::NOT_FOUND, "/repositories/a/b", "nope"),
            ApiError::NotFound(p) if p == "/repositories/a/b"
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::TOO_MANY_REQUESTS, "/x", ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::BAD_GATEWAY, "/x", "upstream"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::CONFLICT, "/x", "conflict"),
            ApiError::Unknown(_)
        ));
    }

    #[test]
    fn test_is_auth_error() {
        assert!(ApiError::AuthRequired.is_auth_error());
        assert!(ApiError::AuthFailed("x".into()).is_auth_error());
        assert!(!ApiError::RateLimited.is_auth_error());
    }
}
