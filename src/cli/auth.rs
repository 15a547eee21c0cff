//
//  bitbucket-v1
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands.
//!
//! Secrets go to the system keyring; the account name and method go to the
//! config file.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use crate::api::BitbucketClient;
use crate::auth::{AuthCredential, AuthMethod, KeyringStore, PASSWORD_ENV, TOKEN_ENV};
use crate::config::Config;
use crate::interactive::{prompt_confirm_with_default, prompt_input, prompt_password};
use crate::output::print_field;

use super::{build_client, GlobalOptions};

/// Store or remove credentials
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store credentials
    Login(LoginArgs),

    /// Remove stored credentials
    Logout,

    /// View authentication status
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Authenticate with a bearer token instead of username and password
    #[arg(long)]
    pub token: bool,

    /// Read the password or token from standard input
    #[arg(long)]
    pub with_stdin: bool,

    /// Store the credentials without checking them against the API
    #[arg(long)]
    pub skip_verify: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show the stored secret (masked)
    #[arg(long, short = 't')]
    pub show_secret: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout => logout(global).await,
            AuthSubcommand::Status(args) => status(args, global).await,
        }
    }
}

/// Performs the login flow.
async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let writer = global.writer();
    let mut config = Config::load()?;
    let host = config.credential_host();
    let method = if args.token {
        AuthMethod::Token
    } else {
        AuthMethod::Basic
    };

    let mut username = global.username(&config).map(str::to_string);
    if method == AuthMethod::Basic && username.is_none() {
        if global.no_prompt {
            bail!("A username is required. Use --user or set BBV1_USERNAME.");
        }
        username = Some(prompt_input("Bitbucket username")?);
    }

    let keyring = KeyringStore::new();
    let existing = keyring.get_account(username.as_deref(), &host).ok().flatten();
    if existing.is_some() && !args.with_stdin {
        if global.no_prompt {
            bail!("Credentials already stored for {}. Use --with-stdin to replace them.", host);
        }
        if !prompt_confirm_with_default("Credentials already stored. Replace them?", false)? {
            return Ok(());
        }
    }

    let secret = if args.with_stdin {
        read_secret_from_stdin(method)?
    } else if global.no_prompt {
        bail!("No secret given. Use --with-stdin to pass it without prompting.");
    } else if method == AuthMethod::Token {
        prompt_password("Access token")?
    } else {
        prompt_password("Password or app password")?
    };

    validate_secret(&secret, method)?;

    let credential = match (method, username.as_deref()) {
        (AuthMethod::Basic, Some(user)) => AuthCredential::basic(user, &secret),
        _ => AuthCredential::token(&secret),
    };

    if !args.skip_verify {
        writer.write_info("Verifying credentials...");
        let client = BitbucketClient::from_config(&config)?.with_auth(credential);
        let info = client
            .users()
            .current()
            .await
            .context("Credentials were rejected")?;

        // Token logins learn the account name from the API.
        if username.is_none() {
            username = Some(info.user.username.clone());
        }
    }

    keyring.store(username.as_deref(), &host, &secret)?;
    config.auth.username = username.clone();
    config.auth.method = method;
    config.save()?;

    match username {
        Some(user) => writer.write_success(&format!("Logged in to {} as {}", host, user)),
        None => writer.write_success(&format!("Logged in to {}", host)),
    }
    Ok(())
}

/// Removes the stored secret and forgets the account name.
async fn logout(global: &GlobalOptions) -> Result<()> {
    let writer = global.writer();
    let mut config = Config::load()?;
    let host = config.credential_host();
    let username = global.username(&config).map(str::to_string);

    KeyringStore::new().delete(username.as_deref(), &host)?;
    if config.auth.username == username {
        config.auth.username = None;
        config.save()?;
    }

    writer.write_success(&format!("Logged out of {}", host));
    Ok(())
}

/// Shows which account is configured and whether the API accepts it.
async fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let writer = global.writer();
    let config = Config::load()?;
    let host = config.credential_host();
    let color = writer.color_enabled();
    let username = global.username(&config);

    print_field("Host", &host, color);
    print_field("Account", username.unwrap_or("-"), color);
    print_field("Method", &config.auth.method.to_string(), color);

    if std::env::var(TOKEN_ENV).is_ok() {
        print_field("Source", TOKEN_ENV, color);
    } else if std::env::var(PASSWORD_ENV).is_ok() {
        print_field("Source", PASSWORD_ENV, color);
    } else {
        let stored = KeyringStore::new()
            .get_account(username, &host)
            .unwrap_or(None);
        print_field("Source", if stored.is_some() { "keyring" } else { "none" }, color);
        if args.show_secret {
            if let Some(secret) = &stored {
                print_field("Secret", &mask_secret(secret), color);
            }
        }
    }

    let client = build_client(global, &config)?;
    if !client.is_authenticated() {
        writer.write_warning("Not logged in. Run 'bbv1 auth login' to authenticate.");
        return Ok(());
    }

    match client.users().current().await {
        Ok(info) => print_field("Status", &format!("Active ({})", info.user.label()), color),
        Err(e) if e.is_auth_error() => print_field("Status", "Rejected", color),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Reads the first line of standard input as a secret.
fn read_secret_from_stdin(method: AuthMethod) -> Result<String> {
    use std::io::{self, BufRead};

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(secret_from_line(&line, method))
}

/// Tokens are trimmed; passwords only lose the line terminator.
fn secret_from_line(line: &str, method: AuthMethod) -> String {
    match method {
        AuthMethod::Token => line.trim().to_string(),
        AuthMethod::Basic => line.trim_end_matches(['\r', '\n']).to_string(),
    }
}

/// Passwords may contain spaces; tokens may not.
fn validate_secret(secret: &str, method: AuthMethod) -> Result<()> {
    if secret.is_empty() {
        bail!("Invalid secret: it must not be empty");
    }
    if method == AuthMethod::Token && secret.chars().any(char::is_whitespace) {
        bail!("Invalid token: it must not contain whitespace");
    }
    Ok(())
}

/// Masks a secret for display (shows first and last 4 characters).
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("abcdefghijkl"), "abcd...ijkl");
    }

    #[test]
    fn test_password_keeps_inner_and_edge_spaces() {
        assert_eq!(
            secret_from_line(" correct horse \r\n", AuthMethod::Basic),
            " correct horse "
        );
        assert_eq!(secret_from_line("tok123\n", AuthMethod::Token), "tok123");
        assert_eq!(secret_from_line("  tok123  \n", AuthMethod::Token), "tok123");
    }

    #[test]
    fn test_validate_secret() {
        assert!(validate_secret("correct horse", AuthMethod::Basic).is_ok());
        assert!(validate_secret("correct horse", AuthMethod::Token).is_err());
        assert!(validate_secret("tok123", AuthMethod::Token).is_ok());
        assert!(validate_secret("", AuthMethod::Basic).is_err());
        assert!(validate_secret("", AuthMethod::Token).is_err());
    }
}
