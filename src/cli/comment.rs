//
//  bitbucket-v1
//  cli/comment.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue comment commands

use std::fs;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::controllers::CommentsController;
use crate::api::models::{Comment, CommentRequest};
use crate::interactive::{prompt_editor, prompt_input};
use crate::output::TableOutput;
use crate::util::format_timestamp;

use super::issue::confirm_delete;
use super::{GlobalOptions, Session};

/// Manage issue comments
#[derive(Args, Debug)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentSubcommand {
    /// List the comments on an issue
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View a comment
    View(CommentRef),

    /// Comment on an issue
    Create(CreateArgs),

    /// Edit a comment
    Edit(EditArgs),

    /// Delete a comment
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Issue ID
    pub issue: u64,

    /// Fetch fresh comments even when a cached copy exists
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Args, Debug)]
pub struct CommentRef {
    /// Issue ID
    pub issue: u64,

    /// Comment ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Issue ID
    pub issue: u64,

    /// Comment body
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Read body from file
    #[arg(long, short = 'F')]
    pub body_file: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub target: CommentRef,

    /// New comment body; opens an editor when omitted
    #[arg(long, short = 'b')]
    pub body: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: CommentRef,

    /// Skip confirmation prompt
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct CommentDisplay {
    id: u64,
    author: String,
    content: String,
    created_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_on: Option<String>,
}

impl From<&Comment> for CommentDisplay {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.comment_id,
            author: comment
                .author_info
                .as_ref()
                .map(|u| u.label().to_string())
                .unwrap_or_else(|| "Anonymous".to_string()),
            content: comment.content.clone().unwrap_or_default(),
            created_on: format_timestamp(comment.utc_created_on.as_deref()),
            updated_on: comment
                .utc_updated_on
                .as_deref()
                .filter(|updated| Some(*updated) != comment.utc_created_on.as_deref())
                .map(|updated| format_timestamp(Some(updated))),
        }
    }
}

impl TableOutput for CommentDisplay {
    fn print_table(&self, color: bool) {
        let author = if color {
            style(&self.author).cyan().bold().to_string()
        } else {
            self.author.clone()
        };

        let edited = if self.updated_on.is_some() { " (edited)" } else { "" };
        println!("[{}] {} commented {}{}:", self.id, author, self.created_on, edited);
        println!();
        if self.content.is_empty() {
            println!("  (no text)");
        }
        for line in self.content.lines() {
            println!("  {}", line);
        }
        println!();
    }
}

impl CommentCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            CommentSubcommand::List(args) => self.list(args, global).await,
            CommentSubcommand::View(args) => self.view(args, global).await,
            CommentSubcommand::Create(args) => self.create(args, global).await,
            CommentSubcommand::Edit(args) => self.edit(args, global).await,
            CommentSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    /// List comments
    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let comments = comments_of(&session, global, args.issue)?
            .get_comments(args.refresh)
            .await?;

        let writer = global.writer();
        if comments.is_empty() && !global.json {
            println!("No comments on issue #{}.", args.issue);
            return Ok(());
        }

        let display: Vec<CommentDisplay> = comments.iter().map(CommentDisplay::from).collect();
        writer.write_list(&display)
    }

    /// View a comment
    async fn view(&self, args: &CommentRef, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let comment = comments_of(&session, global, args.issue)?
            .comment(args.id)
            .get_info(false)
            .await?;

        global.writer().write(&CommentDisplay::from(&comment))
    }

    /// Comment on an issue
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;

        let body = if let Some(file) = &args.body_file {
            fs::read_to_string(file)?
        } else if let Some(b) = &args.body {
            b.clone()
        } else if !global.no_prompt {
            prompt_input("Comment")?
        } else {
            bail!("Comment body is required. Use --body or run interactively.");
        };

        if body.trim().is_empty() {
            bail!("Comment body must not be empty.");
        }

        let comment = comments_of(&session, global, args.issue)?
            .create(&CommentRequest::new(body))
            .await?;

        let writer = global.writer();
        writer.write_success(&format!(
            "Added comment {} to issue #{}",
            comment.comment_id, args.issue
        ));
        if global.json {
            writer.write(&CommentDisplay::from(&comment))?;
        }
        Ok(())
    }

    /// Edit a comment
    async fn edit(&self, args: &EditArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let controller = comments_of(&session, global, args.target.issue)?.comment(args.target.id);

        let request = match &args.body {
            Some(body) => CommentRequest::new(body.as_str()),
            None if global.no_prompt => {
                bail!("Comment body is required. Use --body or run interactively.")
            }
            None => {
                let current = controller.get_info(true).await?;
                let mut request = CommentRequest::from(&current);
                match prompt_editor(Some(request.content.as_str()))? {
                    Some(edited) if edited.trim() != request.content.trim() => {
                        request.content = edited;
                        request
                    }
                    _ => {
                        println!("No changes made.");
                        return Ok(());
                    }
                }
            }
        };

        let comment = controller.update(&request).await?;

        let writer = global.writer();
        writer.write_success(&format!("Updated comment {}", comment.comment_id));
        if global.json {
            writer.write(&CommentDisplay::from(&comment))?;
        }
        Ok(())
    }

    /// Delete a comment
    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let target = &args.target;

        let what = format!("comment {} on issue #{}", target.id, target.issue);
        if !confirm_delete(&what, args.confirm, global)? {
            println!("Cancelled.");
            return Ok(());
        }

        comments_of(&session, global, target.issue)?
            .comment(target.id)
            .delete_comment()
            .await?;

        if global.json {
            let result = serde_json::json!({
                "issue_id": target.issue,
                "id": target.id,
                "deleted": true,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        global.writer().write_success(&format!("Deleted {}", what));
        Ok(())
    }
}

fn comments_of<'a>(
    session: &'a Session,
    global: &GlobalOptions,
    issue: u64,
) -> Result<CommentsController<'a>> {
    let (_, repository) = session.repository(global)?;
    Ok(repository.issues().issue(issue).comments())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::User;

    #[test]
    fn test_comment_display_marks_edits() {
        let mut comment = Comment {
            comment_id: 3,
            content: Some("Fixed in 1.2".to_string()),
            author_info: Some(User {
                username: "jdoe".to_string(),
                display_name: Some("Jane Doe".to_string()),
                ..Default::default()
            }),
            utc_created_on: Some("2013-08-21 19:31:37+00:00".to_string()),
            utc_updated_on: Some("2013-08-21 19:31:37+00:00".to_string()),
            ..Default::default()
        };

        let display = CommentDisplay::from(&comment);
        assert_eq!(display.author, "Jane Doe");
        assert!(display.updated_on.is_none());

        comment.utc_updated_on = Some("2013-08-22 08:00:00+00:00".to_string());
        assert!(CommentDisplay::from(&comment).updated_on.is_some());
    }

    #[test]
    fn test_comment_display_anonymous() {
        let display = CommentDisplay::from(&Comment::default());
        assert_eq!(display.author, "Anonymous");
        assert_eq!(display.content, "");
        assert_eq!(display.created_on, "-");
    }
}
