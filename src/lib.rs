//
//  bitbucket-v1
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket v1 Library
//!
//! A client for the Bitbucket REST API v1 (`https://api.bitbucket.org/1.0`)
//! and the `bbv1` command-line tool built on it.
//!
//! ## Overview
//!
//! Resources are reached through a chain of lightweight controllers, each
//! holding a reference to one shared [`BitbucketClient`]. A controller's URI
//! is its parent's URI plus its own segment:
//!
//! ```text
//! /repositories/{owner}/{slug}
//! /repositories/{owner}/{slug}/issues
//! /repositories/{owner}/{slug}/issues/{id}
//! /repositories/{owner}/{slug}/issues/{id}/comments
//! /repositories/{owner}/{slug}/issues/{id}/comments/{comment_id}
//! ```
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client, response cache, controllers and models
//! - [`auth`]: Credentials and keyring storage
//! - [`config`]: Configuration file management
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Output formatting (Table, JSON)
//! - [`interactive`]: Prompts and editor integration
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_v1::api::BitbucketClient;
//!
//! # async fn example() -> Result<(), bitbucket_v1::api::ApiError> {
//! let client = BitbucketClient::new()?;
//! let issue = client
//!     .repository("jdoe", "tools")
//!     .issues()
//!     .issue(7)
//!     .get_issue()
//!     .await?;
//! println!("#{} {}", issue.local_id, issue.title);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// Bitbucket REST API v1 client.
///
/// The client handles authentication, form encoding of write requests,
/// response caching and error mapping.
pub mod api;

/// Credentials and secure storage in the system keychain.
pub mod auth;

/// Configuration file management.
///
/// The config lives in platform-specific locations:
/// - Linux: `~/.config/bbv1/config.toml`
/// - macOS: `~/Library/Application Support/bbv1/config.toml`
/// - Windows: `%APPDATA%\bbv1\config.toml`
pub mod config;

/// Output formatting for different modes.
pub mod output;

/// Interactive prompts and editor integration.
pub mod interactive;

/// Time, string and browser helpers.
pub mod util;

pub use api::BitbucketClient;
pub use cli::Cli;
pub use config::Config;

/// Name of the CLI binary, also used for configuration paths.
pub const APP_NAME: &str = "bbv1";

/// Application version, from Cargo.toml.
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::VERSION;
///
/// println!("bbv1 version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// - `0`: Success
/// - `1`: General error
/// - `4`: Authentication required, rejected or forbidden
/// - `8`: Resource not found
/// - `32`: API rate limit exceeded
///
/// Usage errors exit with `2` through clap.
pub mod exit_codes {
    use crate::api::ApiError;

    pub const SUCCESS: i32 = 0;

    pub const ERROR: i32 = 1;

    /// Run `bbv1 auth login` to authenticate.
    pub const AUTH_ERROR: i32 = 4;

    pub const NOT_FOUND: i32 = 8;

    pub const RATE_LIMIT: i32 = 32;

    /// Picks the exit code for a failed command.
    ///
    /// Looks through the error's context chain for an [`ApiError`]; anything
    /// else is a general error.
    ///
    /// ```rust
    /// use anyhow::Context;
    /// use bitbucket_v1::api::ApiError;
    /// use bitbucket_v1::exit_codes;
    ///
    /// let err = Err::<(), _>(ApiError::NotFound("/users/ghost".into()))
    ///     .context("Failed to load user")
    ///     .unwrap_err();
    /// assert_eq!(exit_codes::for_error(&err), exit_codes::NOT_FOUND);
    /// ```
    pub fn for_error(err: &anyhow::Error) -> i32 {
        let api_error = err.chain().find_map(|e| e.downcast_ref::<ApiError>());
        match api_error {
            Some(e) if e.is_auth_error() => AUTH_ERROR,
            Some(ApiError::Forbidden(_)) => AUTH_ERROR,
            Some(ApiError::NotFound(_)) => NOT_FOUND,
            Some(ApiError::RateLimited) => RATE_LIMIT,
            _ => ERROR,
        }
    }

}
