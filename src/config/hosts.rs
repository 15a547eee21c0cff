//
//  bitbucket-v1
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! API host constants and helpers.

/// The public Bitbucket API host.
pub const DEFAULT_API_HOST: &str = "api.bitbucket.org";

/// Path prefix of the v1 API on any host.
pub const API_VERSION_PATH: &str = "1.0";

/// The web host issues are browsed on.
pub const BITBUCKET_WEB: &str = "bitbucket.org";

/// API root for a host: `https://<host>/1.0`.
///
/// ```rust
/// use bitbucket_v1::config::api_base_url;
///
/// assert_eq!(api_base_url("api.bitbucket.org"), "https://api.bitbucket.org/1.0");
/// assert_eq!(api_base_url("https://api.bitbucket.org/"), "https://api.bitbucket.org/1.0");
/// ```
pub fn api_base_url(host: &str) -> String {
    format!("https://{}/{}", normalize_host(host), API_VERSION_PATH)
}

/// Normalizes a host string.
///
/// Strips any scheme and trailing slash, trims whitespace and lower-cases.
///
/// ```rust
/// use bitbucket_v1::config::normalize_host;
///
/// assert_eq!(normalize_host("https://API.Bitbucket.org/"), "api.bitbucket.org");
/// assert_eq!(normalize_host("  api.bitbucket.org  "), "api.bitbucket.org");
/// ```
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.strip_suffix('/').unwrap_or(host);
    host.to_lowercase()
}

/// Web host matching an API host: `api.bitbucket.org` browses on
/// `bitbucket.org`; any other host is assumed to serve both.
pub fn web_host(api_host: &str) -> String {
    let host = normalize_host(api_host);
    if host == DEFAULT_API_HOST {
        BITBUCKET_WEB.to_string()
    } else {
        host
    }
}
