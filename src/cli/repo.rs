//
//  bitbucket-v1
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::models::Repository;
use crate::config::web_host;
use crate::output::TableOutput;
use crate::util::{format_size, format_timestamp, open_browser};

use super::{GlobalOptions, RepoRef, Session};

/// View repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// View repository details
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Repository in OWNER/REPO format (defaults to --repo or the config)
    pub repository: Option<String>,

    /// Open in browser
    #[arg(long, short = 'w')]
    pub web: bool,

    /// Fetch fresh data even when a cached copy exists
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
struct RepoDetail {
    full_name: String,
    name: String,
    description: Option<String>,
    scm: Option<String>,
    language: Option<String>,
    website: Option<String>,
    is_private: bool,
    is_fork: bool,
    has_issues: bool,
    has_wiki: bool,
    size: String,
    created_on: String,
    updated_on: String,
    url: String,
}

impl RepoDetail {
    fn new(repo: Repository, url: String) -> Self {
        Self {
            full_name: repo.full_name(),
            size: format_size(repo.size),
            created_on: format_timestamp(repo.utc_created_on.as_deref()),
            updated_on: format_timestamp(repo.utc_last_updated.as_deref()),
            name: repo.name,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            scm: repo.scm,
            language: repo.language.filter(|l| !l.is_empty()),
            website: repo.website.filter(|w| !w.is_empty()),
            is_private: repo.is_private,
            is_fork: repo.is_fork,
            has_issues: repo.has_issues,
            has_wiki: repo.has_wiki,
            url,
        }
    }
}

impl TableOutput for RepoDetail {
    fn print_table(&self, color: bool) {
        let name = if color {
            style(&self.full_name).bold().to_string()
        } else {
            self.full_name.clone()
        };

        let visibility = if self.is_private { "private" } else { "public" };
        println!("{} ({})", name, visibility);

        if let Some(desc) = &self.description {
            println!();
            println!("  {}", desc);
        }

        println!();
        println!("  SCM:      {}", self.scm.as_deref().unwrap_or("-"));
        println!("  Language: {}", self.language.as_deref().unwrap_or("-"));
        println!("  Size:     {}", self.size);
        println!("  Fork:     {}", if self.is_fork { "yes" } else { "no" });
        println!("  Issues:   {}", if self.has_issues { "enabled" } else { "disabled" });
        println!("  Wiki:     {}", if self.has_wiki { "enabled" } else { "disabled" });
        if let Some(website) = &self.website {
            println!("  Website:  {}", website);
        }
        println!();
        println!("  Created:  {}", self.created_on);
        println!("  Updated:  {}", self.updated_on);
        println!();
        println!("  URL: {}", self.url);
    }
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RepoSubcommand::View(args) => self.view(args, global).await,
        }
    }

    /// View repository details
    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let repo = match &args.repository {
            Some(value) => RepoRef::parse(value)?,
            None => global.resolve_repo(&session.config)?,
        };

        let url = format!(
            "https://{}/{}/{}",
            web_host(&session.config.api_host()),
            repo.owner,
            repo.slug
        );

        if args.web {
            println!("{} Opening {} in browser...", style("→").cyan(), repo);
            return open_browser(&url);
        }

        let info = session
            .client
            .repository(&repo.owner, &repo.slug)
            .get_info(args.refresh)
            .await?;

        global.writer().write(&RepoDetail::new(info, url))
    }
}
