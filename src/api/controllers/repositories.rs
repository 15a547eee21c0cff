//
//  bitbucket-v1
//  api/controllers/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::{Controller, IssuesController, UserController};
use crate::api::client::ApiResult;
use crate::api::models::Repository;
use crate::api::BitbucketClient;

/// A repository, `/repositories/{owner}/{slug}`.
#[derive(Debug, Clone)]
pub struct RepositoryController<'a> {
    client: &'a BitbucketClient,
    owner: UserController<'a>,
    slug: String,
}

impl<'a> RepositoryController<'a> {
    pub fn new(client: &'a BitbucketClient, owner: UserController<'a>, slug: &str) -> Self {
        Self {
            client,
            owner,
            slug: slug.to_string(),
        }
    }

    /// The owning account.
    pub fn owner(&self) -> &UserController<'a> {
        &self.owner
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Fetches the repository metadata.
    pub async fn get_info(&self, force_cache_invalidation: bool) -> ApiResult<Repository> {
        self.client
            .get_with_cache(&self.uri(), force_cache_invalidation)
            .await
    }

    /// The repository's issue tracker.
    pub fn issues(&self) -> IssuesController<'a> {
        IssuesController::new(self.client, self.clone())
    }
}

impl Controller for RepositoryController<'_> {
    fn client(&self) -> &BitbucketClient {
        self.client
    }

    fn uri(&self) -> String {
        format!("/repositories/{}/{}", self.owner.username(), self.slug)
    }
}
