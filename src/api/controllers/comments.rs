//
//  bitbucket-v1
//  api/controllers/comments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::collections::BTreeMap;

use super::{Controller, IssueController};
use crate::api::client::ApiResult;
use crate::api::models::{Comment, CommentRequest};
use crate::api::BitbucketClient;

/// The comments on an issue, `<issue>/comments`.
#[derive(Debug, Clone)]
pub struct CommentsController<'a> {
    client: &'a BitbucketClient,
    issue: IssueController<'a>,
}

impl<'a> CommentsController<'a> {
    pub fn new(client: &'a BitbucketClient, issue: IssueController<'a>) -> Self {
        Self { client, issue }
    }

    /// The issue these comments belong to.
    pub fn issue(&self) -> &IssueController<'a> {
        &self.issue
    }

    /// Access a specific comment by id.
    pub fn comment(&self, id: u64) -> CommentController<'a> {
        CommentController::new(self.client, self.clone(), id)
    }

    /// Fetches every comment on the issue.
    pub async fn get_comments(&self, force_cache_invalidation: bool) -> ApiResult<Vec<Comment>> {
        self.client
            .get_with_cache(&self.uri(), force_cache_invalidation)
            .await
    }

    /// Adds a comment to the issue.
    pub async fn create(&self, request: &CommentRequest) -> ApiResult<Comment> {
        let uri = self.uri();
        self.client.invalidate_cache(&uri);
        self.client.post(&uri, request).await
    }
}

impl Controller for CommentsController<'_> {
    fn client(&self) -> &BitbucketClient {
        self.client
    }

    fn uri(&self) -> String {
        format!("{}/comments", self.issue.uri())
    }
}

/// A single comment, `<issue>/comments/{id}`.
#[derive(Debug, Clone)]
pub struct CommentController<'a> {
    client: &'a BitbucketClient,
    comments: CommentsController<'a>,
    id: u64,
}

impl<'a> CommentController<'a> {
    pub fn new(client: &'a BitbucketClient, comments: CommentsController<'a>, id: u64) -> Self {
        Self {
            client,
            comments,
            id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The collection this comment belongs to.
    pub fn comments(&self) -> &CommentsController<'a> {
        &self.comments
    }

    /// Fetches the comment.
    pub async fn get_info(&self, force_cache_invalidation: bool) -> ApiResult<Comment> {
        self.client
            .get_with_cache(&self.uri(), force_cache_invalidation)
            .await
    }

    /// Deletes the comment.
    pub async fn delete_comment(&self) -> ApiResult<()> {
        self.invalidate();
        self.client.delete(&self.uri()).await
    }

    /// Replaces the comment text.
    pub async fn update(&self, request: &CommentRequest) -> ApiResult<Comment> {
        self.invalidate();
        self.client.put(&self.uri(), request).await
    }

    /// Updates the comment from raw form fields.
    pub async fn update_fields(&self, fields: &BTreeMap<String, String>) -> ApiResult<Comment> {
        self.invalidate();
        self.client.put_fields(&self.uri(), fields).await
    }

    // The listing embeds this comment, so it goes too.
    fn invalidate(&self) {
        self.client.invalidate_path(&self.uri());
        self.client.cache().remove(&self.comments.uri());
    }
}

impl Controller for CommentController<'_> {
    fn client(&self) -> &BitbucketClient {
        self.client
    }

    fn uri(&self) -> String {
        format!("{}/{}", self.comments.uri(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_uris_chain_through_issue() {
        let client = BitbucketClient::new().unwrap();
        let comments = client.repository("jdoe", "tools").issues().issue(3).comments();
        assert_eq!(comments.uri(), "/repositories/jdoe/tools/issues/3/comments");
        assert_eq!(comments.issue().id(), 3);

        let comment = comments.comment(99);
        assert_eq!(comment.uri(), "/repositories/jdoe/tools/issues/3/comments/99");
        assert_eq!(comment.comments().uri(), comments.uri());
    }
}
