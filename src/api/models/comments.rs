//
//  bitbucket-v1
//  api/models/comments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue comment types.

use serde::{Deserialize, Serialize};

use super::User;

/// A comment on an issue.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_v1::api::models::Comment;
///
/// fn display_comment(comment: &Comment) {
///     let author = comment.author_info.as_ref().map(|u| u.label()).unwrap_or("anonymous");
///     println!("{} commented:", author);
///     println!("  {}", comment.content.as_deref().unwrap_or(""));
/// }
/// ```
///
/// # Notes
///
/// - Status changes made through the web UI show up as comments with no
///   `content`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: u64,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub author_info: Option<User>,

    #[serde(default)]
    pub utc_created_on: Option<String>,

    #[serde(default)]
    pub utc_updated_on: Option<String>,

    #[serde(default)]
    pub convert_markup: bool,

    #[serde(default)]
    pub is_spam: bool,
}

/// Form fields for creating or updating a comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl From<&Comment> for CommentRequest {
    fn from(comment: &Comment) -> Self {
        Self {
            content: comment.content.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_deserializes_v1_document() {
        let json = r#"{
            "content": "Reproduced on 1.2",
            "author_info": {"username": "jdoe", "display_name": "Jane Doe"},
            "comment_id": 4012,
            "utc_updated_on": "2013-08-22 08:00:00+00:00",
            "utc_created_on": "2013-08-22 07:59:12+00:00",
            "is_spam": false
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.comment_id, 4012);
        assert_eq!(comment.author_info.unwrap().label(), "Jane Doe");
        assert!(!comment.convert_markup);
    }

    #[test]
    fn test_status_change_comment_has_no_content() {
        let comment: Comment = serde_json::from_str(r#"{"comment_id": 1, "content": null}"#).unwrap();
        assert_eq!(CommentRequest::from(&comment), CommentRequest::new(""));
    }
}
