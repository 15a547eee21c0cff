//
//  bitbucket-v1
//  cli/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User commands

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::models::UserInfo;
use crate::output::{TableBuilder, TableOutput};
use crate::util::{format_timestamp, truncate};

use super::{GlobalOptions, Session};

/// View user accounts
#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// View an account and its repositories
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Account name (defaults to the logged-in user)
    pub username: Option<String>,

    /// Fetch fresh data even when a cached copy exists
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
struct UserDetail {
    #[serde(flatten)]
    info: UserInfo,
}

impl TableOutput for UserDetail {
    fn print_table(&self, color: bool) {
        let user = &self.info.user;
        let name = if color {
            style(user.label()).bold().to_string()
        } else {
            user.label().to_string()
        };

        println!("{} ({})", name, user.username);
        if user.is_team {
            println!("  Team account");
        }
        println!();

        if self.info.repositories.is_empty() {
            println!("No visible repositories.");
            return;
        }

        let mut table = TableBuilder::new()
            .color(color)
            .headers(["REPOSITORY", "VISIBILITY", "DESCRIPTION", "UPDATED"]);
        for repo in &self.info.repositories {
            table = table.row([
                repo.full_name(),
                if repo.is_private { "private" } else { "public" }.to_string(),
                truncate(repo.description.as_deref().unwrap_or(""), 40),
                format_timestamp(repo.utc_last_updated.as_deref()),
            ]);
        }
        table.print();
    }
}

impl UserCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            UserSubcommand::View(args) => self.view(args, global).await,
        }
    }

    /// View an account
    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;

        let info = match &args.username {
            Some(name) => session.client.user(name).get_info(args.refresh).await?,
            None => match global.username(&session.config) {
                Some(name) => session.client.user(name).get_info(args.refresh).await?,
                None if session.client.is_authenticated() => session.client.users().current().await?,
                None => {
                    return Err(anyhow!(
                        "No account specified. Pass a username or run 'bbv1 auth login'."
                    ))
                }
            },
        };

        global.writer().write(&UserDetail { info })
    }
}
