//
//  bitbucket-v1
//  api/controllers/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Controllers
//!
//! Controllers mirror the v1 resource tree. Each one knows its parent and
//! its own path segment, and delegates every request to the shared
//! [`BitbucketClient`]:
//!
//! ```text
//! /users/{username}                              UserController
//! /repositories/{owner}/{slug}                   RepositoryController
//!     /issues                                    IssuesController
//!     /issues/{id}                               IssueController
//!         /followers
//!         /comments                              CommentsController
//!         /comments/{comment_id}                 CommentController
//! ```
//!
//! Controllers are cheap values that borrow the client; build them on the
//! fly instead of storing them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_v1::api::BitbucketClient;
//! use bitbucket_v1::api::controllers::Controller;
//! use bitbucket_v1::api::models::CommentRequest;
//!
//! # async fn example() -> Result<(), bitbucket_v1::api::ApiError> {
//! let client = BitbucketClient::new()?;
//! let comments = client.repository("jdoe", "tools").issues().issue(42).comments();
//! assert_eq!(comments.uri(), "/repositories/jdoe/tools/issues/42/comments");
//!
//! comments.create(&CommentRequest::new("Fixed in 1.3")).await?;
//! # Ok(())
//! # }
//! ```

mod comments;
mod issues;
mod repositories;
mod users;

pub use comments::{CommentController, CommentsController};
pub use issues::{IssueController, IssuesController, DEFAULT_LIMIT};
pub use repositories::RepositoryController;
pub use users::{UserController, UsersController};

use super::BitbucketClient;

/// A node in the resource tree.
pub trait Controller {
    /// The client requests are sent through.
    fn client(&self) -> &BitbucketClient;

    /// Path of this resource relative to the API root, starting with `/`.
    ///
    /// Always the parent's URI followed by this controller's own segment.
    fn uri(&self) -> String;
}

/// Percent-encodes a query value.
pub(crate) fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
