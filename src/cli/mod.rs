//
//  bitbucket-v1
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod auth;
mod comment;
mod config;
mod issue;
mod repo;
mod user;

pub use auth::AuthCommand;
pub use comment::CommentCommand;
pub use config::ConfigCommand;
pub use issue::IssueCommand;
pub use repo::RepoCommand;
pub use user::UserCommand;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::api::controllers::RepositoryController;
use crate::api::BitbucketClient;
use crate::auth::{resolve_credential, KeyringStore, PASSWORD_ENV, TOKEN_ENV};
use crate::config::Config;
use crate::output::{OutputFormat, OutputWriter};

/// bbv1 - Work with the Bitbucket REST API v1 from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bbv1",
    version,
    about = "Work with Bitbucket issues and comments through the v1 REST API",
    propagate_version = true,
    after_help = "Use 'bbv1 <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Repository in OWNER/REPO format
    #[arg(long, short = 'R', global = true, env = "BBV1_REPO")]
    pub repo: Option<String>,

    /// Account to authenticate as
    #[arg(long, short = 'u', global = true, env = "BBV1_USERNAME")]
    pub user: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Bypass the response cache even when it is enabled in the config
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Never prompt; fail instead when input is missing
    #[arg(long, global = true, env = "BBV1_NO_PROMPT")]
    pub no_prompt: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store or remove credentials
    Auth(AuthCommand),

    /// View user accounts
    User(UserCommand),

    /// View repositories
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Manage issues
    Issue(IssueCommand),

    /// Manage issue comments
    Comment(CommentCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Print version information
    Version,
}

/// A repository named on the command line or in the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub slug: String,
}

impl RepoRef {
    /// Parses `OWNER/REPO`.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim().trim_matches('/');
        match value.split_once('/') {
            Some((owner, slug)) if !owner.is_empty() && !slug.is_empty() && !slug.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    slug: slug.to_string(),
                })
            }
            _ => anyhow::bail!("Invalid repository '{}'. Expected OWNER/REPO.", value),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

impl GlobalOptions {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }

    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(self.output_format())
    }

    /// Repository to operate on: `--repo`, else the config defaults.
    ///
    /// A default `repo` alone is paired with the default owner, falling back
    /// to the configured username.
    pub fn resolve_repo(&self, config: &Config) -> Result<RepoRef> {
        if let Some(repo) = &self.repo {
            return RepoRef::parse(repo);
        }

        let slug = config.defaults.repo.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "No repository specified. Pass --repo OWNER/REPO or run 'bbv1 config set repo <slug>'."
            )
        })?;

        if slug.contains('/') {
            return RepoRef::parse(slug);
        }

        let owner = config
            .defaults
            .owner
            .as_deref()
            .or(config.auth.username.as_deref())
            .ok_or_else(|| {
                anyhow::anyhow!("No repository owner configured. Run 'bbv1 config set owner <name>'.")
            })?;

        Ok(RepoRef {
            owner: owner.to_string(),
            slug: slug.to_string(),
        })
    }

    /// Username from `--user`, else the config.
    pub fn username<'a>(&'a self, config: &'a Config) -> Option<&'a str> {
        self.user.as_deref().or(config.auth.username.as_deref())
    }
}

/// Everything a command needs to talk to the API.
pub struct Session {
    pub config: Config,
    pub client: BitbucketClient,
}

impl Session {
    /// Loads the config and builds an authenticated client.
    ///
    /// Requests are sent anonymously when no credential is available; public
    /// repositories still work that way.
    pub fn open(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;
        let client = build_client(global, &config)?;
        Ok(Self { config, client })
    }

    /// Controller for the repository selected by `--repo` or the config.
    pub fn repository(&self, global: &GlobalOptions) -> Result<(RepoRef, RepositoryController<'_>)> {
        let repo = global.resolve_repo(&self.config)?;
        let controller = self.client.repository(&repo.owner, &repo.slug);
        Ok((repo, controller))
    }
}

/// Builds a client from the config, applying `--no-cache` and credentials
/// from the environment or the keyring.
pub fn build_client(global: &GlobalOptions, config: &Config) -> Result<BitbucketClient> {
    let mut client = BitbucketClient::from_config(config).context("Failed to create HTTP client")?;
    if global.no_cache {
        client = client.with_cache(false);
    }

    let username = global.username(config);
    let host = config.credential_host();

    let env_token = std::env::var(TOKEN_ENV).ok();
    let env_password = std::env::var(PASSWORD_ENV).ok();
    let stored = if env_token.is_some() || env_password.is_some() {
        None
    } else {
        match KeyringStore::new().get_account(username, &host) {
            Ok(secret) => secret,
            Err(e) => {
                debug!(error = %e, "keyring unavailable");
                None
            }
        }
    };

    match resolve_credential(config.auth.method, username, env_token, env_password, stored) {
        Some(credential) => {
            debug!(?credential, "using stored credentials");
            client = client.with_auth(credential);
        }
        None => debug!("no credentials found, sending anonymous requests"),
    }

    Ok(client)
}
