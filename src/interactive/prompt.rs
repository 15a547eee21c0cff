//
//  bitbucket-v1
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive Prompts Module
//!
//! Thin wrappers over `dialoguer` for text input, password entry,
//! confirmations and editor integration.
//!
//! # Example
//!
//! ```no_run
//! use bitbucket_v1::interactive::{prompt_input, prompt_password, prompt_confirm_with_default};
//!
//! let username = prompt_input("Username").unwrap();
//! let password = prompt_password("App password").unwrap();
//! if prompt_confirm_with_default("Save credentials?", true).unwrap() {
//!     println!("Saved credentials for {}", username);
//! }
//! ```

use anyhow::Result;
use dialoguer::{Confirm, Editor, Input, Password};

/// Prompts for a single line of text.
pub fn prompt_input(message: &str) -> Result<String> {
    let input: String = Input::new().with_prompt(message).interact_text()?;
    Ok(input)
}

/// Prompts for a single line of text; an empty answer yields `None`.
pub fn prompt_input_optional(message: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(message)
        .allow_empty(true)
        .interact_text()?;
    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input))
    }
}

/// Prompts for a secret without echoing it.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Opens the user's editor seeded with `initial`.
///
/// Returns `None` if the editor was closed without saving.
pub fn prompt_editor(initial: Option<&str>) -> Result<Option<String>> {
    let mut editor = Editor::new();
    editor.executable(get_editor());
    let result = editor.edit(initial.unwrap_or(""))?;
    Ok(result)
}

/// Editor command: `BBV1_EDITOR`, then `EDITOR`, then `VISUAL`, else `nano`.
pub fn get_editor() -> String {
    std::env::var("BBV1_EDITOR")
        .or_else(|_| std::env::var("EDITOR"))
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string())
}
