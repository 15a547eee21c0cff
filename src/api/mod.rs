//
//  bitbucket-v1
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! Bindings for the Bitbucket REST API v1 at `api.bitbucket.org/1.0`.
//!
//! ## Architecture
//!
//! - [`client`]: Shared HTTP client with authentication, form encoding and caching
//! - [`cache`]: In-memory GET response cache
//! - [`controllers`]: Resource controllers (user → repository → issues → comments)
//! - [`models`]: Typed request and response documents
//! - [`common`]: Error type and request-encoding helpers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_v1::api::BitbucketClient;
//! use bitbucket_v1::api::models::IssueRequest;
//! use bitbucket_v1::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), bitbucket_v1::api::ApiError> {
//! let client = BitbucketClient::new()?
//!     .with_auth(AuthCredential::basic("jdoe", "app-password"));
//!
//! let issues = client.repository("jdoe", "tools").issues();
//! let page = issues.get_issues(0, 15).await?;
//! println!("{} issues", page.count);
//!
//! let created = issues
//!     .create(&IssueRequest {
//!         title: Some("Crash on save".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! issues.issue(created.local_id).delete_issue().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Non-success responses are mapped onto [`ApiError`]:
//!
//! - `AuthRequired` / `AuthFailed`: 401 Unauthorized
//! - `Forbidden`: 403 Forbidden
//! - `NotFound`: 404 Not Found
//! - `RateLimited`: 429 Too Many Requests
//! - `ServerError`: 5xx Server Errors

pub mod cache;
pub mod client;
pub mod common;
pub mod controllers;
pub mod models;

pub use client::{ApiResult, BitbucketClient};
pub use common::ApiError;
