//
//  bitbucket-v1
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials for the v1 API and their storage.
//!
//! ## Supported Authentication Methods
//!
//! - **Basic**: Username with password or app password. The usual method for v1.
//! - **Token**: Bearer access token.
//!
//! ## Module Structure
//!
//! - [`keyring`]: Secure credential storage using the system keyring
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_v1::auth::{AuthCredential, KeyringStore};
//!
//! let store = KeyringStore::new();
//! let secret = store.get("jdoe", "api.bitbucket.org")?.unwrap_or_default();
//! let credential = AuthCredential::basic("jdoe", &secret);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod keyring;

pub use self::keyring::*;

use std::fmt;
use std::str::FromStr;

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

/// Environment variable holding a bearer token. Overrides everything else.
pub const TOKEN_ENV: &str = "BBV1_TOKEN";

/// Environment variable holding a password. Overrides the keyring.
pub const PASSWORD_ENV: &str = "BBV1_PASSWORD";

/// Credentials attached to every request.
///
/// `Debug` output never includes the secret.
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::auth::AuthCredential;
///
/// let basic = AuthCredential::basic("jdoe", "secret");
/// assert_eq!(basic.username(), Some("jdoe"));
/// assert!(!format!("{:?}", basic).contains("secret"));
///
/// let token = AuthCredential::token("abc123");
/// assert_eq!(token.username(), None);
/// ```
#[derive(Clone, PartialEq)]
pub enum AuthCredential {
    /// HTTP Basic authentication.
    Basic {
        /// The Bitbucket username.
        username: String,
        /// Account password or app password.
        password: String,
    },
    /// Bearer token authentication.
    Token {
        /// The access token.
        token: String,
    },
}

impl AuthCredential {
    pub fn basic(username: &str, password: &str) -> Self {
        Self::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn token(token: &str) -> Self {
        Self::Token {
            token: token.to_string(),
        }
    }

    /// Applies the credential to an HTTP request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Token { token } => request.bearer_auth(token),
        }
    }

    /// The account name, for Basic credentials.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Basic { username, .. } => Some(username),
            Self::Token { .. } => None,
        }
    }

    pub fn method(&self) -> AuthMethod {
        match self {
            Self::Basic { .. } => AuthMethod::Basic,
            Self::Token { .. } => AuthMethod::Token,
        }
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token { .. } => f
                .debug_struct("Token")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// How stored secrets are presented to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Basic,
    Token,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Token => write!(f, "token"),
        }
    }
}

impl FromStr for AuthMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "password" => Ok(Self::Basic),
            "token" | "bearer" => Ok(Self::Token),
            other => anyhow::bail!("Unknown auth method '{}'. Use 'basic' or 'token'.", other),
        }
    }
}

/// Picks the credential to use from every available source.
///
/// Precedence: an explicit token (from [`TOKEN_ENV`]), then an explicit
/// password (from [`PASSWORD_ENV`]), then the stored secret. Passwords need
/// a username; without one the stored secret is only usable as a token.
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::auth::{resolve_credential, AuthCredential, AuthMethod};
///
/// let credential = resolve_credential(AuthMethod::Basic, Some("jdoe"), None, None, Some("stored".to_string()));
/// assert_eq!(credential, Some(AuthCredential::basic("jdoe", "stored")));
/// ```
pub fn resolve_credential(
    method: AuthMethod,
    username: Option<&str>,
    env_token: Option<String>,
    env_password: Option<String>,
    stored: Option<String>,
) -> Option<AuthCredential> {
    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        return Some(AuthCredential::Token { token });
    }

    let secret = env_password.filter(|p| !p.is_empty()).or(stored)?;

    match (method, username) {
        (AuthMethod::Basic, Some(user)) => Some(AuthCredential::Basic {
            username: user.to_string(),
            password: secret,
        }),
        (AuthMethod::Basic, None) => None,
        (AuthMethod::Token, _) => Some(AuthCredential::Token { token: secret }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_token_wins() {
        let credential = resolve_credential(
            AuthMethod::Basic,
            Some("jdoe"),
            Some("tok".to_string()),
            Some("pw".to_string()),
            Some("stored".to_string()),
        );
        assert_eq!(credential, Some(AuthCredential::token("tok")));
    }

    #[test]
    fn test_env_password_beats_keyring() {
        let credential = resolve_credential(
            AuthMethod::Basic,
            Some("jdoe"),
            None,
            Some("pw".to_string()),
            Some("stored".to_string()),
        );
        assert_eq!(credential, Some(AuthCredential::basic("jdoe", "pw")));
    }

    #[test]
    fn test_basic_without_username_is_unusable() {
        assert_eq!(
            resolve_credential(AuthMethod::Basic, None, None, None, Some("stored".to_string())),
            None
        );
        assert_eq!(
            resolve_credential(AuthMethod::Token, None, None, None, Some("stored".to_string())),
            Some(AuthCredential::token("stored"))
        );
    }

    #[test]
    fn test_auth_method_parsing() {
        assert_eq!("Basic".parse::<AuthMethod>().unwrap(), AuthMethod::Basic);
        assert_eq!("bearer".parse::<AuthMethod>().unwrap(), AuthMethod::Token);
        assert!("oauth".parse::<AuthMethod>().is_err());
        assert_eq!(AuthMethod::Token.to_string(), "token");
    }
}
