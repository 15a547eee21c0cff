//
//  bitbucket-v1
//  api/models/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket REST API v1 data model.
//!
//! Type-safe bindings for the JSON documents returned by the v1 API, plus
//! the request types used for creates and updates.
//!
//! # Module Organization
//!
//! - [`users`] - User accounts and the `/users/{name}` document
//! - [`repositories`] - Repository metadata
//! - [`issues`] - Issues, issue listings, followers and issue requests
//! - [`comments`] - Issue comments and comment requests
//!
//! # Notes
//!
//! - v1 timestamps are strings such as `2013-08-21 19:31:37+00:00`; the
//!   `utc_*` variants are always in UTC
//! - Almost every field is optional in practice, so most fields default
//!   when absent

pub mod comments;
pub mod issues;
pub mod repositories;
pub mod users;

pub use comments::*;
pub use issues::*;
pub use repositories::*;
pub use users::*;
