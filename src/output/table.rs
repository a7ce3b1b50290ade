//
//  redmine-cli
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Utilities for tabular terminal output built on `comfy_table`.
//!
//! ## Example
//!
//! ```rust
//! use redmine_cli::output::TableBuilder;
//!
//! let table = TableBuilder::new()
//!     .color(false)
//!     .headers(["ID", "Tracker", "Subject"])
//!     .row(["42", "Bug", "Login fails"])
//!     .build();
//!
//! assert!(table.to_string().contains("Login fails"));
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a table with UTF-8 borders and dynamic column widths.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// A builder for tables with a fluent API.
///
/// Headers are colored cyan when color output is enabled. Color support is
/// detected on creation; [`TableBuilder::color`] overrides it.
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

    /// Overrides color detection.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            let cells: Vec<Cell> = headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect();
            self.table.set_header(cells);
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
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            self = self.row(row);
        }
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

/// Colors a Redmine status or priority name by meaning.
///
/// - **Green**: new, open, in progress, active
/// - **Blue**: resolved, feedback
/// - **Red**: urgent, immediate, rejected
/// - **Yellow**: high
/// - **Dim**: closed, low, locked, archived
///
/// Matching is case-insensitive; anything else is returned unchanged.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }

    use console::style;
    match status.to_lowercase().as_str() {
        "new" | "open" | "in progress" | "active" => style(status).green().to_string(),
        "resolved" | "feedback" => style(status).blue().to_string(),
        "urgent" | "immediate" | "rejected" => style(status).red().bold().to_string(),
        "high" => style(status).yellow().to_string(),
        "closed" | "low" | "locked" | "archived" => style(status).dim().to_string(),
        _ => status.to_string(),
    }
}

/// Formats a boolean as Yes/No.
pub fn format_bool(value: bool, color: bool) -> String {
    use console::style;
    match (value, color) {
        (true, true) => style("Yes").green().to_string(),
        (false, true) => style("No").dim().to_string(),
        (true, false) => "Yes".to_string(),
        (false, false) => "No".to_string(),
    }
}

/// Truncates a string to `max_len` characters, ending in "..." when cut.
///
/// Counts characters rather than bytes, so multi-byte subjects are never
/// split inside a code point.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
