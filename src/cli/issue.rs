//
//  bitbucket-v1
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue commands
//!
//! Everything here goes through the controller chain
//! `repository -> issues -> issue`, so cached listings are dropped whenever
//! an issue is written.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{bail, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::controllers::DEFAULT_LIMIT;
use crate::api::common::to_form_fields;
use crate::api::models::{
    Comment, CommentRequest, Issue, IssueRequest, Issues, User, ISSUE_CLOSED_STATUSES, ISSUE_KINDS,
    ISSUE_PRIORITIES, ISSUE_STATUSES,
};
use crate::interactive::{prompt_confirm_with_default, prompt_input, prompt_input_optional};
use crate::output::{format_priority, format_status, TableBuilder, TableOutput};
use crate::util::{format_timestamp, issue_web_url, open_browser, truncate};

use super::comment::CommentDisplay;
use super::{GlobalOptions, Session};

/// Manage issues
#[derive(Args, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// List issues
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Search issues
    Search(SearchArgs),

    /// View an issue
    View(ViewArgs),

    /// List the users following an issue
    Followers(IdArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// Edit an issue
    Edit(EditArgs),

    /// Close an issue
    Close(CloseArgs),

    /// Reopen an issue
    Reopen(IdArgs),

    /// Delete an issue
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Offset of the first issue
    #[arg(long, default_value = "0")]
    pub start: u32,

    /// Maximum number of issues to list
    #[arg(long, short = 'l', default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for in titles and descriptions
    pub term: String,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Issue ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Issue ID
    pub id: u64,

    /// Open in browser
    #[arg(long, short = 'w')]
    pub web: bool,

    /// Include comments
    #[arg(long, short = 'c')]
    pub comments: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Issue title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Issue body/description
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Read body from file
    #[arg(long, short = 'F')]
    pub body_file: Option<String>,

    /// Assignee username
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Priority
    #[arg(long, short = 'p', value_parser = PossibleValuesParser::new(ISSUE_PRIORITIES.iter().copied()))]
    pub priority: Option<String>,

    /// Kind
    #[arg(long, short = 'k', value_parser = PossibleValuesParser::new(ISSUE_KINDS.iter().copied()))]
    pub kind: Option<String>,

    /// Component
    #[arg(long)]
    pub component: Option<String>,

    /// Milestone
    #[arg(long)]
    pub milestone: Option<String>,

    /// Version
    #[arg(long)]
    pub version: Option<String>,

    /// Open in browser after creation
    #[arg(long, short = 'w')]
    pub web: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Issue ID
    pub id: u64,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New body/description
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// New assignee
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// New status
    #[arg(long, short = 's', value_parser = PossibleValuesParser::new(ISSUE_STATUSES.iter().copied()))]
    pub status: Option<String>,

    /// New priority
    #[arg(long, short = 'p', value_parser = PossibleValuesParser::new(ISSUE_PRIORITIES.iter().copied()))]
    pub priority: Option<String>,

    /// New kind
    #[arg(long, short = 'k', value_parser = PossibleValuesParser::new(ISSUE_KINDS.iter().copied()))]
    pub kind: Option<String>,

    /// Raw form field to send, as KEY=VALUE (repeatable)
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Issue ID
    pub id: u64,

    /// Status to close with
    #[arg(long = "as", default_value = "resolved", value_parser = PossibleValuesParser::new(ISSUE_CLOSED_STATUSES.iter().copied()))]
    pub status: String,

    /// Comment to leave explaining the close
    #[arg(long, short = 'r')]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Issue ID
    pub id: u64,

    /// Skip confirmation prompt
    #[arg(long)]
    pub confirm: bool,
}

// Display types

#[derive(Debug, Serialize)]
struct IssueListItem {
    id: u64,
    title: String,
    status: String,
    priority: String,
    kind: String,
    assignee: Option<String>,
    comments: u32,
    updated: String,
}

impl From<&Issue> for IssueListItem {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.local_id,
            title: issue.title.clone(),
            status: issue.status.clone(),
            priority: issue.priority.clone(),
            kind: issue.metadata.kind.clone(),
            assignee: issue.responsible.as_ref().map(|u| u.username.clone()),
            comments: issue.comment_count,
            updated: format_timestamp(issue.utc_last_updated.as_deref()),
        }
    }
}

/// A page of issues, printed as one table.
#[derive(Debug, Serialize)]
struct IssuePage {
    count: u32,
    start: u32,
    issues: Vec<IssueListItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_start: Option<u32>,
}

impl IssuePage {
    fn new(page: &Issues, start: u32, limit: u32) -> Self {
        Self {
            count: page.count,
            start,
            issues: page.issues.iter().map(IssueListItem::from).collect(),
            next_start: page.next_start(start, limit),
        }
    }

    /// One-based positions of the first and last issue shown.
    fn shown_range(&self) -> (u32, u32) {
        let shown = u32::try_from(self.issues.len()).unwrap_or(u32::MAX);
        (self.start.saturating_add(1), self.start.saturating_add(shown))
    }
}

impl TableOutput for IssuePage {
    fn print_table(&self, color: bool) {
        if self.issues.is_empty() {
            println!("No issues found.");
            return;
        }

        let mut table = TableBuilder::new()
            .color(color)
            .headers(["ID", "STATUS", "PRIORITY", "KIND", "ASSIGNEE", "TITLE", "UPDATED"]);
        for item in &self.issues {
            table = table.row([
                format!("#{}", item.id),
                format_status(&item.status, color),
                format_priority(&item.priority, color),
                item.kind.clone(),
                item.assignee.clone().unwrap_or_else(|| "-".to_string()),
                truncate(&item.title, 50),
                item.updated.clone(),
            ]);
        }
        table.print();

        let (first, last) = self.shown_range();
        println!("Showing {}-{} of {} issue(s)", first, last, self.count);
        if let Some(next) = self.next_start {
            println!("Next page: --start {}", next);
        }
    }
}

#[derive(Debug, Serialize)]
struct IssueDetail {
    id: u64,
    title: String,
    content: Option<String>,
    status: String,
    priority: String,
    kind: String,
    component: Option<String>,
    milestone: Option<String>,
    version: Option<String>,
    reporter: Option<String>,
    assignee: Option<String>,
    comment_count: u32,
    follower_count: u32,
    created_on: String,
    updated_on: String,
    url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    comments: Vec<CommentDisplay>,
}

impl IssueDetail {
    fn new(issue: Issue, url: String, comments: &[Comment]) -> Self {
        Self {
            id: issue.local_id,
            reporter: issue.reported_by.as_ref().map(|u| u.label().to_string()),
            assignee: issue.responsible.as_ref().map(|u| u.label().to_string()),
            created_on: format_timestamp(issue.utc_created_on.as_deref()),
            updated_on: format_timestamp(issue.utc_last_updated.as_deref()),
            title: issue.title,
            content: issue.content.filter(|c| !c.trim().is_empty()),
            status: issue.status,
            priority: issue.priority,
            kind: issue.metadata.kind,
            component: issue.metadata.component,
            milestone: issue.metadata.milestone,
            version: issue.metadata.version,
            comment_count: issue.comment_count,
            follower_count: issue.follower_count,
            url,
            comments: comments.iter().map(CommentDisplay::from).collect(),
        }
    }
}

impl TableOutput for IssueDetail {
    fn print_table(&self, color: bool) {
        let heading = |text: &str| {
            if color {
                style(text).bold().to_string()
            } else {
                text.to_string()
            }
        };

        println!(
            "{} #{}",
            if color {
                style("Issue").cyan().bold().to_string()
            } else {
                "Issue".to_string()
            },
            self.id
        );
        println!();
        println!("  {}", heading(&self.title));
        println!();
        println!("  Status:    {}", format_status(&self.status, color));
        println!("  Priority:  {}", format_priority(&self.priority, color));
        println!("  Kind:      {}", self.kind);
        if let Some(component) = &self.component {
            println!("  Component: {}", component);
        }
        if let Some(milestone) = &self.milestone {
            println!("  Milestone: {}", milestone);
        }
        if let Some(version) = &self.version {
            println!("  Version:   {}", version);
        }
        println!("  Reporter:  {}", self.reporter.as_deref().unwrap_or("Anonymous"));
        println!("  Assignee:  {}", self.assignee.as_deref().unwrap_or("Unassigned"));
        println!("  Comments:  {}", self.comment_count);
        println!("  Followers: {}", self.follower_count);
        println!();
        println!("  Created:   {}", self.created_on);
        println!("  Updated:   {}", self.updated_on);

        if let Some(content) = &self.content {
            println!();
            println!("{}", heading("Description"));
            println!("{}", "-".repeat(60));
            println!("{}", content);
        }

        if !self.comments.is_empty() {
            println!();
            println!("{}", heading("Comments"));
            println!("{}", "-".repeat(60));
            for comment in &self.comments {
                comment.print_table(color);
            }
        }

        println!();
        println!("  URL: {}", self.url);
    }
}

#[derive(Debug, Serialize)]
struct FollowerList {
    issue: u64,
    count: u32,
    followers: Vec<User>,
}

impl TableOutput for FollowerList {
    fn print_table(&self, color: bool) {
        if self.followers.is_empty() {
            println!("Nobody is following issue #{}.", self.issue);
            return;
        }

        let mut table = TableBuilder::new()
            .color(color)
            .headers(["USERNAME", "NAME"]);
        for user in &self.followers {
            table = table.row([user.username.clone(), user.label().to_string()]);
        }
        table.print();
        println!("{} follower(s)", self.count);
    }
}

/// Short result printed after a write.
#[derive(Debug, Serialize)]
struct IssueChange {
    id: u64,
    title: String,
    status: String,
    url: String,
}

impl TableOutput for IssueChange {
    fn print_table(&self, _color: bool) {
        println!("  Title:  {}", self.title);
        println!("  Status: {}", self.status);
        println!("  URL:    {}", self.url);
    }
}

impl IssueCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            IssueSubcommand::List(args) => self.list(args, global).await,
            IssueSubcommand::Search(args) => self.search(args, global).await,
            IssueSubcommand::View(args) => self.view(args, global).await,
            IssueSubcommand::Followers(args) => self.followers(args, global).await,
            IssueSubcommand::Create(args) => self.create(args, global).await,
            IssueSubcommand::Edit(args) => self.edit(args, global).await,
            IssueSubcommand::Close(args) => self.close(args, global).await,
            IssueSubcommand::Reopen(args) => self.reopen(args, global).await,
            IssueSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    /// List issues one page at a time
    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (_, repository) = session.repository(global)?;

        let page = repository.issues().get_issues(args.start, args.limit).await?;

        global
            .writer()
            .write(&IssuePage::new(&page, args.start, args.limit))
    }

    /// Search issues
    async fn search(&self, args: &SearchArgs, global: &GlobalOptions) -> Result<()> {
        if args.term.trim().is_empty() {
            bail!("Search term must not be empty.");
        }

        let session = Session::open(global)?;
        let (_, repository) = session.repository(global)?;

        let page = repository.issues().search(&args.term).await?;

        let mut view = IssuePage::new(&page, 0, DEFAULT_LIMIT);
        view.next_start = None;
        global.writer().write(&view)
    }

    /// View an issue
    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (repo, repository) = session.repository(global)?;
        let url = issue_web_url(&session.config.api_host(), &repo.owner, &repo.slug, args.id);

        if args.web {
            println!("{} Opening issue #{} in browser...", style("→").cyan(), args.id);
            return open_browser(&url);
        }

        let issue = repository.issues().issue(args.id);
        let detail = issue.get_issue().await?;
        let comments = if args.comments {
            issue.comments().get_comments(false).await?
        } else {
            Vec::new()
        };

        global
            .writer()
            .write(&IssueDetail::new(detail, url, &comments))
    }

    /// List followers
    async fn followers(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (_, repository) = session.repository(global)?;

        let followers = repository
            .issues()
            .issue(args.id)
            .get_issue_followers()
            .await?;

        global.writer().write(&FollowerList {
            issue: args.id,
            count: followers.count,
            followers: followers.followers,
        })
    }

    /// Create an issue
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (repo, repository) = session.repository(global)?;

        let title = if let Some(t) = &args.title {
            t.clone()
        } else if !global.no_prompt {
            prompt_input("Issue title")?
        } else {
            bail!("Issue title is required. Use --title or run interactively.");
        };

        let body = if let Some(file) = &args.body_file {
            Some(fs::read_to_string(file)?)
        } else if let Some(b) = &args.body {
            Some(b.clone())
        } else if !global.no_prompt {
            prompt_input_optional("Issue description (optional)")?
        } else {
            None
        };

        let request = IssueRequest {
            title: Some(title),
            content: body,
            priority: args.priority.clone(),
            kind: args.kind.clone(),
            responsible: args.assignee.clone(),
            component: args.component.clone(),
            milestone: args.milestone.clone(),
            version: args.version.clone(),
            ..Default::default()
        };

        let issue = repository.issues().create(&request).await?;
        let url = issue_web_url(&session.config.api_host(), &repo.owner, &repo.slug, issue.local_id);

        let writer = global.writer();
        writer.write_success(&format!("Created issue #{}", issue.local_id));
        writer.write(&change(&issue, url.clone()))?;

        if args.web {
            open_browser(&url)?;
        }

        Ok(())
    }

    /// Edit an issue
    async fn edit(&self, args: &EditArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (repo, repository) = session.repository(global)?;
        let issue = repository.issues().issue(args.id);

        let mut fields = parse_fields(&args.fields)?;
        let request = IssueRequest {
            title: args.title.clone(),
            content: args.body.clone(),
            status: args.status.clone(),
            priority: args.priority.clone(),
            kind: args.kind.clone(),
            responsible: args.assignee.clone(),
            ..Default::default()
        };

        let updated = if fields.is_empty() {
            if request == IssueRequest::default() {
                bail!("Nothing to update. Pass at least one field to change.");
            }
            issue.update(&request).await?
        } else {
            // Explicit flags win over raw fields with the same name.
            fields.extend(to_form_fields(&request)?);
            issue.update_fields(&fields).await?
        };

        let url = issue_web_url(&session.config.api_host(), &repo.owner, &repo.slug, args.id);
        let writer = global.writer();
        writer.write_success(&format!("Updated issue #{}", updated.local_id));
        writer.write(&change(&updated, url))
    }

    /// Close an issue, optionally leaving a comment first
    async fn close(&self, args: &CloseArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (repo, repository) = session.repository(global)?;
        let issue = repository.issues().issue(args.id);

        if let Some(reason) = &args.reason {
            issue
                .comments()
                .create(&CommentRequest::new(reason.as_str()))
                .await?;
        }

        let request = IssueRequest {
            status: Some(args.status.clone()),
            ..Default::default()
        };
        let updated = issue.update(&request).await?;

        let url = issue_web_url(&session.config.api_host(), &repo.owner, &repo.slug, args.id);
        let writer = global.writer();
        writer.write_success(&format!("Closed issue #{} as {}", args.id, updated.status));
        writer.write(&change(&updated, url))
    }

    /// Reopen an issue
    async fn reopen(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (repo, repository) = session.repository(global)?;

        let request = IssueRequest {
            status: Some("open".to_string()),
            ..Default::default()
        };
        let updated = repository.issues().update(args.id, &request).await?;

        let url = issue_web_url(&session.config.api_host(), &repo.owner, &repo.slug, args.id);
        let writer = global.writer();
        writer.write_success(&format!("Reopened issue #{}", args.id));
        writer.write(&change(&updated, url))
    }

    /// Delete an issue
    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let (_, repository) = session.repository(global)?;

        if !confirm_delete(&format!("issue #{}", args.id), args.confirm, global)? {
            println!("Cancelled.");
            return Ok(());
        }

        repository.issues().issue(args.id).delete_issue().await?;

        if global.json {
            let result = serde_json::json!({ "id": args.id, "deleted": true });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        global
            .writer()
            .write_success(&format!("Deleted issue #{}", args.id));
        Ok(())
    }
}

fn change(issue: &Issue, url: String) -> IssueChange {
    IssueChange {
        id: issue.local_id,
        title: issue.title.clone(),
        status: issue.status.clone(),
        url,
    }
}

/// Asks before deleting unless `--confirm` was given.
///
/// With `--no-prompt` and no `--confirm` the delete is refused.
pub(super) fn confirm_delete(what: &str, confirmed: bool, global: &GlobalOptions) -> Result<bool> {
    if confirmed {
        return Ok(true);
    }
    if global.no_prompt {
        bail!("Refusing to delete {} without --confirm.", what);
    }
    prompt_confirm_with_default(&format!("Are you sure you want to delete {}?", what), false)
}

/// Parses repeated `KEY=VALUE` arguments into form fields.
fn parse_fields(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();
    for entry in raw {
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                fields.insert(key.trim().to_string(), value.to_string());
            }
            _ => bail!("Invalid field '{}'. Expected KEY=VALUE.", entry),
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields(&["status=on hold".to_string(), "milestone=".to_string()]).unwrap();
        assert_eq!(fields.get("status").map(String::as_str), Some("on hold"));
        assert_eq!(fields.get("milestone").map(String::as_str), Some(""));

        assert!(parse_fields(&["novalue".to_string()]).is_err());
        assert!(parse_fields(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_issue_page_reports_next_start() {
        let page = Issues {
            count: 20,
            issues: vec![Issue::default(); 15],
            ..Default::default()
        };
        let view = IssuePage::new(&page, 0, 15);
        assert_eq!(view.issues.len(), 15);
        assert_eq!(view.next_start, Some(15));

        let view = IssuePage::new(&page, 15, 15);
        assert_eq!(view.next_start, None);
    }

    #[test]
    fn test_issue_page_range_saturates() {
        let page = Issues {
            count: u32::MAX,
            issues: vec![Issue::default(); 2],
            ..Default::default()
        };
        assert_eq!(IssuePage::new(&page, 10, 15).shown_range(), (11, 12));
        assert_eq!(
            IssuePage::new(&page, u32::MAX, 15).shown_range(),
            (u32::MAX, u32::MAX)
        );
    }

    #[test]
    fn test_value_lists_come_from_models() {
        use clap::{CommandFactory, Parser};

        #[derive(Parser)]
        struct Wrapper {
            #[command(subcommand)]
            command: IssueSubcommand,
        }

        let parsed = Wrapper::try_parse_from(["bbv1", "edit", "3", "--status", "on hold"]);
        assert!(parsed.is_ok());
        assert!(Wrapper::try_parse_from(["bbv1", "edit", "3", "--kind", "chore"]).is_err());
        assert!(Wrapper::try_parse_from(["bbv1", "close", "3", "--as", "open"]).is_err());
        Wrapper::command().debug_assert();
    }

    #[test]
    fn test_confirm_delete_refuses_without_prompt() {
        let global = GlobalOptions {
            no_prompt: true,
            ..Default::default()
        };
        assert!(confirm_delete("issue #1", false, &global).is_err());
        assert!(confirm_delete("issue #1", true, &global).unwrap());
    }
}
