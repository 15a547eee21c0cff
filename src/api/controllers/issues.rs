//
//  bitbucket-v1
//  api/controllers/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::collections::BTreeMap;

use tracing::debug;

use super::{encode_component, CommentsController, Controller, RepositoryController};
use crate::api::client::ApiResult;
use crate::api::models::{Followers, Issue, IssueRequest, Issues};
use crate::api::BitbucketClient;

/// Page size used by [`IssuesController::get_issues_default`].
pub const DEFAULT_LIMIT: u32 = 15;

/// A repository's issue tracker, `<repository>/issues`.
#[derive(Debug, Clone)]
pub struct IssuesController<'a> {
    client: &'a BitbucketClient,
    repository: RepositoryController<'a>,
}

impl<'a> IssuesController<'a> {
    pub fn new(client: &'a BitbucketClient, repository: RepositoryController<'a>) -> Self {
        Self { client, repository }
    }

    /// The repository these issues belong to.
    pub fn repository(&self) -> &RepositoryController<'a> {
        &self.repository
    }

    /// Access a specific issue by its number.
    pub fn issue(&self, id: u64) -> IssueController<'a> {
        IssueController::new(self.client, self.repository.clone(), id)
    }

    /// Full-text search over the repository's issues.
    ///
    /// The term is percent-encoded into `?search=`.
    pub async fn search(&self, term: &str) -> ApiResult<Issues> {
        let path = format!("{}/?search={}", self.uri(), encode_component(term));
        self.client.get(&path).await
    }

    /// Fetches one page of issues.
    ///
    /// * `start` - Offset of the first issue in the page
    /// * `limit` - Maximum number of issues in the page
    pub async fn get_issues(&self, start: u32, limit: u32) -> ApiResult<Issues> {
        let path = format!("{}/?start={}&limit={}", self.uri(), start, limit);
        self.client.get(&path).await
    }

    /// Fetches the first page with the default page size.
    pub async fn get_issues_default(&self) -> ApiResult<Issues> {
        self.get_issues(0, DEFAULT_LIMIT).await
    }

    /// Creates an issue. `request.title` is required by the server.
    pub async fn create(&self, request: &IssueRequest) -> ApiResult<Issue> {
        let uri = self.uri();
        let issue = self.client.post(&uri, request).await?;
        self.client.invalidate_cache(&uri);
        Ok(issue)
    }

    /// Updates the issue with the given number.
    pub async fn update(&self, id: u64, request: &IssueRequest) -> ApiResult<Issue> {
        self.issue(id).update(request).await
    }

    /// Updates the issue with the given number from raw form fields.
    pub async fn update_fields(
        &self,
        id: u64,
        fields: &BTreeMap<String, String>,
    ) -> ApiResult<Issue> {
        self.issue(id).update_fields(fields).await
    }
}

impl Controller for IssuesController<'_> {
    fn client(&self) -> &BitbucketClient {
        self.client
    }

    fn uri(&self) -> String {
        format!("{}/issues", self.repository.uri())
    }
}

/// A single issue, `<repository>/issues/{id}`.
#[derive(Debug, Clone)]
pub struct IssueController<'a> {
    client: &'a BitbucketClient,
    repository: RepositoryController<'a>,
    id: u64,
}

impl<'a> IssueController<'a> {
    pub fn new(client: &'a BitbucketClient, repository: RepositoryController<'a>, id: u64) -> Self {
        Self {
            client,
            repository,
            id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The repository this issue belongs to.
    pub fn repository(&self) -> &RepositoryController<'a> {
        &self.repository
    }

    /// The comments on this issue.
    pub fn comments(&self) -> CommentsController<'a> {
        CommentsController::new(self.client, self.clone())
    }

    /// Fetches the issue.
    pub async fn get_issue(&self) -> ApiResult<Issue> {
        self.client.get(&self.uri()).await
    }

    /// Fetches the users following the issue.
    pub async fn get_issue_followers(&self) -> ApiResult<Followers> {
        self.client.get(&format!("{}/followers", self.uri())).await
    }

    /// Deletes the issue.
    pub async fn delete_issue(&self) -> ApiResult<()> {
        self.client.delete(&self.uri()).await?;
        self.invalidate();
        Ok(())
    }

    /// Updates the issue from a request model. Unset fields are left alone.
    pub async fn update(&self, request: &IssueRequest) -> ApiResult<Issue> {
        let issue = self.client.put(&self.uri(), request).await?;
        self.invalidate();
        Ok(issue)
    }

    /// Updates the issue from raw form fields.
    pub async fn update_fields(&self, fields: &BTreeMap<String, String>) -> ApiResult<Issue> {
        let issue = self.client.put_fields(&self.uri(), fields).await?;
        self.invalidate();
        Ok(issue)
    }

    // Drops this issue (with its followers and comments) and every cached
    // listing page of the tracker.
    fn invalidate(&self) {
        let uri = self.uri();
        debug!(issue = self.id, "invalidating cached issue");
        self.client.invalidate_path(&uri);
        self.client
            .invalidate_cache(&format!("{}/issues/?", self.repository.uri()));
    }
}

impl Controller for IssueController<'_> {
    fn client(&self) -> &BitbucketClient {
        self.client
    }

    fn uri(&self) -> String {
        format!("{}/issues/{}", self.repository.uri(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_uri_extends_tracker_uri() {
        let client = BitbucketClient::new().unwrap();
        let issues = client.repository("jdoe", "tools").issues();
        assert_eq!(issues.uri(), "/repositories/jdoe/tools/issues");

        let issue = issues.issue(42);
        assert_eq!(issue.id(), 42);
        assert_eq!(issue.uri(), format!("{}/42", issues.uri()));
        assert_eq!(issue.repository().slug(), "tools");
    }
}
