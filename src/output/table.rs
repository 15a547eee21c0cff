//
//  bitbucket-v1
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Tabular terminal output built on `comfy_table`, plus color helpers for
//! issue statuses and priorities.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitbucket_v1::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["ID", "Status", "Title"])
//!     .row(["#1", "open", "Crash on save"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a table with the standard preset and dynamic column widths.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Builder for tables with optional colored headers.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(|s| s.into()).collect();
        if self.color {
            let header_cells: Vec<Cell> = headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect();
            self.table.set_header(header_cells);
        } else {
            self.table.set_header(headers);
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(|s| s.into()).collect();
        self.table.add_row(row);
        self
    }

    pub fn print(self) {
        println!("{}", self.table);
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors an issue status.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }

    use console::style;
    match status.to_lowercase().as_str() {
        "new" | "open" => style(status).green().to_string(),
        "resolved" | "closed" => style(status).dim().to_string(),
        "on hold" => style(status).yellow().to_string(),
        "invalid" | "duplicate" | "wontfix" => style(status).red().to_string(),
        _ => status.to_string(),
    }
}

/// Colors an issue priority.
pub fn format_priority(priority: &str, color: bool) -> String {
    if !color {
        return priority.to_string();
    }

    use console::style;
    match priority.to_lowercase().as_str() {
        "blocker" | "critical" => style(priority).red().bold().to_string(),
        "major" => style(priority).yellow().to_string(),
        "minor" | "trivial" => style(priority).dim().to_string(),
        _ => priority.to_string(),
    }
}
