//
//  bitbucket-v1
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Bitbucket v1 API
//!
//! This module provides the shared HTTP client every controller delegates to.
//! It handles base URL resolution, authentication, form encoding of write
//! requests, JSON decoding of responses and the response cache.
//!
//! ## Features
//!
//! - Authentication header injection
//! - Form-encoded request bodies, JSON responses
//! - Optional in-memory GET cache with prefix invalidation
//! - Status code mapping onto [`ApiError`]
//! - Custom User-Agent header

use std::collections::BTreeMap;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use super::cache::ResponseCache;
use super::common::{to_form_fields, ApiError};
use super::controllers::{RepositoryController, UserController, UsersController};
use crate::auth::AuthCredential;
use crate::config::{api_base_url, Config, DEFAULT_API_HOST};

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// The HTTP client shared by every controller.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bitbucket_v1::api::BitbucketClient;
/// use bitbucket_v1::auth::AuthCredential;
///
/// let client = BitbucketClient::new()?
///     .with_auth(AuthCredential::basic("jdoe", "app-password"))
///     .with_cache(true);
///
/// assert_eq!(client.base_url(), "https://api.bitbucket.org/1.0");
/// # Ok::<(), bitbucket_v1::api::ApiError>(())
/// ```
///
/// # Navigating resources
///
/// ```rust,no_run
/// use bitbucket_v1::api::BitbucketClient;
///
/// # async fn example() -> Result<(), bitbucket_v1::api::ApiError> {
/// let client = BitbucketClient::new()?;
/// let issue = client.repository("jdoe", "project").issues().issue(42).get_issue().await?;
/// println!("#{} {}", issue.local_id, issue.title);
/// # Ok(())
/// # }
/// ```
pub struct BitbucketClient {
    /// The underlying HTTP client
    http: Client,
    /// API root, without a trailing slash (e.g. `https://api.bitbucket.org/1.0`)
    base_url: String,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
    /// GET response cache
    cache: ResponseCache,
}

impl BitbucketClient {
    /// Creates a client for the public Bitbucket v1 API at
    /// `https://api.bitbucket.org/1.0`, with caching disabled.
    pub fn new() -> ApiResult<Self> {
        Self::with_base_url(&api_base_url(DEFAULT_API_HOST))
    }

    /// Creates a client rooted at an arbitrary base URL.
    ///
    /// A trailing slash on `base_url` is ignored. Useful for proxies and for
    /// pointing the client at a local test server.
    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("bbv1/{}", crate::VERSION))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
            cache: ResponseCache::new(false),
        })
    }

    /// Creates a client from the loaded configuration.
    ///
    /// The base URL comes from [`Config::api_base_url`] and caching follows
    /// `cache.enabled`. Credentials are not part of the config file and must
    /// be attached with [`with_auth`](Self::with_auth).
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Ok(Self::with_base_url(&config.api_base_url())?.with_cache(config.cache.enabled))
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Enables or disables the GET response cache.
    ///
    /// Replacing the cache discards anything stored so far.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = ResponseCache::new(enabled);
        self
    }

    /// Returns the API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `true` if credentials have been attached.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Returns the response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Joins `path` onto the base URL.
    ///
    /// Controller URIs always start with `/`; a missing leading slash is
    /// added so both spellings resolve to the same resource.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Entry point for `/users/...` resources.
    pub fn users(&self) -> UsersController<'_> {
        UsersController::new(self)
    }

    /// Shortcut for `users().user(username)`.
    pub fn user(&self, username: &str) -> UserController<'_> {
        self.users().user(username)
    }

    /// Shortcut for `user(owner).repository(slug)`.
    pub fn repository(&self, owner: &str, slug: &str) -> RepositoryController<'_> {
        self.user(owner).repository(slug)
    }

    /// Makes a GET request, using the cache when it is enabled.
    ///
    /// Equivalent to `get_with_cache(path, false)`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.get_with_cache(path, false).await
    }

    /// Makes a GET request through the response cache.
    ///
    /// With `force_cache_invalidation` set, any cached body for `path` is
    /// dropped before the request so the response always comes from the
    /// server. Successful bodies are stored under `path` when caching is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx or the
    /// body cannot be decoded into `T`.
    pub async fn get_with_cache<T: DeserializeOwned>(
        &self,
        path: &str,
        force_cache_invalidation: bool,
    ) -> ApiResult<T> {
        if force_cache_invalidation && self.cache.remove(path) {
            debug!(path, "dropped cached response");
        }

        if let Some(body) = self.cache.get(path) {
            trace!(path, "cache hit");
            return Ok(serde_json::from_str(&body)?);
        }

        let body = self.send(path, self.http.get(self.url_for(path))).await?;
        let value = serde_json::from_str(&body)?;
        self.cache.insert(path, body);
        Ok(value)
    }

    /// Makes a POST request with `body` flattened into form fields.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let fields = to_form_fields(body)?;
        self.post_fields(path, &fields).await
    }

    /// Makes a POST request with explicit form fields.
    pub async fn post_fields<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &BTreeMap<String, String>,
    ) -> ApiResult<T> {
        let request = self.http.post(self.url_for(path)).form(fields);
        let body = self.send(path, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Makes a PUT request with `body` flattened into form fields.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let fields = to_form_fields(body)?;
        self.put_fields(path, &fields).await
    }

    /// Makes a PUT request with explicit form fields.
    pub async fn put_fields<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &BTreeMap<String, String>,
    ) -> ApiResult<T> {
        let request = self.http.put(self.url_for(path)).form(fields);
        let body = self.send(path, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Makes a DELETE request. The response body is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(path, self.http.delete(self.url_for(path))).await?;
        Ok(())
    }

    /// Drops every cached response whose path starts with `prefix`.
    pub fn invalidate_cache(&self, prefix: &str) {
        let removed = self.cache.invalidate_prefix(prefix);
        if removed > 0 {
            debug!(prefix, removed, "invalidated cached responses");
        }
    }

    /// Drops the cached response for `path` and everything below it.
    pub fn invalidate_path(&self, path: &str) {
        let removed = self.cache.invalidate_path(path);
        if removed > 0 {
            debug!(path, removed, "invalidated cached responses");
        }
    }

    /// Applies credentials, sends the request and returns the body text of a
    /// successful response.
    async fn send(&self, path: &str, mut request: RequestBuilder) -> ApiResult<String> {
        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "bitbucket response");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, path, &text));
        }

        Ok(response.text().await?)
    }
}

impl std::fmt::Debug for BitbucketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitbucketClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.auth.is_some())
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}
