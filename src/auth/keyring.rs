//
//  bitbucket-v1
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Secret storage in the operating system keyring.
//!
//! Secrets are stored under the service name `bitbucket-v1`, one entry per
//! account and API host (see [`account_key`]).

use anyhow::Result;
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "bitbucket-v1";

/// Keyring entry name for an account on a host: `user@host`, or just the
/// host when no username is known (token logins).
///
/// ```rust
/// use bitbucket_v1::auth::account_key;
///
/// assert_eq!(account_key(Some("jdoe"), "api.bitbucket.org"), "jdoe@api.bitbucket.org");
/// assert_eq!(account_key(None, "api.bitbucket.org"), "api.bitbucket.org");
/// ```
pub fn account_key(username: Option<&str>, host: &str) -> String {
    match username {
        Some(user) if !user.is_empty() => format!("{}@{}", user, host),
        _ => host.to_string(),
    }
}

/// Password and token storage backed by the system keyring.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Stores `secret` for the account, replacing any previous value.
    pub fn store(&self, username: Option<&str>, host: &str, secret: &str) -> Result<()> {
        let key = account_key(username, host);
        let entry = Entry::new(&self.service, &key)?;
        entry.set_password(secret)?;
        debug!(account = %key, "stored credential");
        Ok(())
    }

    /// Returns the stored secret, or `None` if nothing is stored.
    pub fn get(&self, username: &str, host: &str) -> Result<Option<String>> {
        self.get_account(Some(username), host)
    }

    /// Like [`get`](Self::get) but also serves token logins without a username.
    pub fn get_account(&self, username: Option<&str>, host: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, &account_key(username, host))?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the stored secret. Removing a missing entry is not an error.
    pub fn delete(&self, username: Option<&str>, host: &str) -> Result<()> {
        let entry = Entry::new(&self.service, &account_key(username, host))?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
