//
//  bitbucket-v1
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Helpers shared by the command implementations.
//!
//! ## Categories
//!
//! - **Time Utilities**: [`parse_timestamp`], [`format_timestamp`], [`format_relative_time`]
//! - **String Utilities**: [`truncate`], [`format_size`]
//! - **System Utilities**: [`open_browser`], [`issue_web_url`]
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_v1::util::{truncate, format_size};
//!
//! assert_eq!(truncate("Crash when saving large files", 10), "Crash w...");
//! assert_eq!(format_size(1536), "1.5 KB");
//! ```

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::config::web_host;

/// Parses a v1 timestamp.
///
/// Accepts the `utc_*` form (`2013-08-21 19:31:37+00:00`), RFC 3339, and the
/// zone-less `created_on` form (`2013-08-21T21:31:37.000`, read as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats an optional v1 timestamp as relative time.
///
/// Unparseable values are shown verbatim; missing values as `-`.
pub fn format_timestamp(value: Option<&str>) -> String {
    match value {
        None => "-".to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => format_relative_time(dt.timestamp()),
            None => raw.to_string(),
        },
    }
}

/// Formats a Unix timestamp relative to now (e.g. "3 days ago").
pub fn format_relative_time(timestamp: i64) -> String {
    let diff = Utc::now().timestamp() - timestamp;

    if diff < 0 {
        return "in the future".to_string();
    }

    let diff = diff as u64;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 604800 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let weeks = diff / 604800;
        format!("{} week{} ago", weeks, if weeks == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

/// Truncates to at most `max_len` characters, ending in `...` when cut.
///
/// Counts characters, not bytes, so multi-byte text is never split.
/// When `max_len` is 3 or less the string is simply cut (no room for the
/// ellipsis).
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Formats a byte count for humans.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Browser URL of an issue.
///
/// ```rust
/// use bitbucket_v1::util::issue_web_url;
///
/// assert_eq!(
///     issue_web_url("api.bitbucket.org", "jdoe", "tools", 7),
///     "https://bitbucket.org/jdoe/tools/issue/7"
/// );
/// ```
pub fn issue_web_url(api_host: &str, owner: &str, slug: &str, id: u64) -> String {
    format!("https://{}/{}/{}/issue/{}", web_host(api_host), owner, slug, id)
}

/// Opens `url` in the default browser.
pub fn open_browser(url: &str) -> Result<()> {
    webbrowser::open(url)
        .map_err(|e| anyhow::anyhow!("Failed to open browser for {}: {}", url, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2013, 8, 21, 19, 31, 37).unwrap();
        assert_eq!(parse_timestamp("2013-08-21 19:31:37+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2013-08-21T19:31:37Z"), Some(expected));
        assert_eq!(parse_timestamp("2013-08-21T19:31:37.000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_format_timestamp_fallbacks() {
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(format_timestamp(Some("garbled")), "garbled");
        assert!(format_timestamp(Some("2013-08-21 19:31:37+00:00")).ends_with("ago"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_issue_web_url_custom_host() {
        assert_eq!(
            issue_web_url("bitbucket.example.com", "team", "repo", 3),
            "https://bitbucket.example.com/team/repo/issue/3"
        );
    }
}
