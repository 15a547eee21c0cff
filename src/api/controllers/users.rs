//
//  bitbucket-v1
//  api/controllers/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::{Controller, RepositoryController};
use crate::api::client::ApiResult;
use crate::api::models::UserInfo;
use crate::api::BitbucketClient;

/// Entry point for `/users`.
#[derive(Debug, Clone, Copy)]
pub struct UsersController<'a> {
    client: &'a BitbucketClient,
}

impl<'a> UsersController<'a> {
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// Access a specific user by account name.
    pub fn user(&self, username: &str) -> UserController<'a> {
        UserController::new(self.client, username)
    }

    /// Fetches the authenticated account from `/user`.
    ///
    /// Fails with an auth error when the client has no valid credentials,
    /// which makes it the cheapest way to verify a login.
    pub async fn current(&self) -> ApiResult<UserInfo> {
        self.client.get_with_cache("/user", true).await
    }
}

impl Controller for UsersController<'_> {
    fn client(&self) -> &BitbucketClient {
        self.client
    }

    fn uri(&self) -> String {
        "/users".to_string()
    }
}

/// A single account, `/users/{username}`.
///
/// Also acts as the owner of the repositories reached through
/// [`repository`](Self::repository).
#[derive(Debug, Clone)]
pub struct UserController<'a> {
    client: &'a BitbucketClient,
    username: String,
}

impl<'a> UserController<'a> {
    pub fn new(client: &'a BitbucketClient, username: &str) -> Self {
        Self {
            client,
            username: username.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fetches the account and its repositories.
    pub async fn get_info(&self, force_cache_invalidation: bool) -> ApiResult<UserInfo> {
        self.client
            .get_with_cache(&self.uri(), force_cache_invalidation)
            .await
    }

    /// Access a repository owned by this user.
    pub fn repository(&self, slug: &str) -> RepositoryController<'a> {
        RepositoryController::new(self.client, self.clone(), slug)
    }
}

impl Controller for UserController<'_> {
    fn client(&self) -> &BitbucketClient {
        self.client
    }

    fn uri(&self) -> String {
        format!("/users/{}", self.username)
    }
}
