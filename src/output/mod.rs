//
//  redmine-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Renders tool results for the command line in one of two formats:
//!
//! - **Table format**: Human-readable tables and key/value blocks
//! - **JSON format**: Redmine's response printed unchanged, for scripting
//!
//! ## Architecture
//!
//! - [`table`]: Table formatting utilities using `comfy_table`
//! - [`json`]: JSON printing and typed extraction of response fields
//!
//! ## Core Components
//!
//! - [`OutputFormat`]: The selected format
//! - [`OutputWriter`]: Writes responses and status messages
//! - [`TableOutput`]: Types rendered as a key/value block
//! - [`TableRow`]: Types rendered as one row of a list table
//!
//! ## Notes
//!
//! Status messages go to stderr except success confirmations, keeping stdout
//! parseable when `--json` is set.

mod json;
mod table;

pub use json::*;
pub use table::*;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::common::PageInfo;

/// The available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tables and key/value blocks, colored when the terminal supports it.
    #[default]
    Table,
    /// The raw JSON response, pretty-printed.
    Json,
}

/// Writes command results in the configured format.
///
/// # Example
///
/// ```rust,no_run
/// use redmine_cli::api::metadata::Tracker;
/// use redmine_cli::output::OutputWriter;
///
/// # fn example(response: serde_json::Value) -> anyhow::Result<()> {
/// let writer = OutputWriter::table();
/// writer.write_list::<Tracker>(&response, "trackers")?;
/// writer.write_success("Done");
/// # Ok(())
/// # }
/// ```
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer, detecting color support from the terminal.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    pub fn table() -> Self {
        Self::new(OutputFormat::Table)
    }

    /// Checks if color output is enabled.
    ///
    /// Colors are typically disabled when output is piped or `NO_COLOR` is
    /// set.
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes a single-resource response such as `{"issue": {...}}`.
    ///
    /// In table format the field `key` is rendered through [`TableOutput`].
    ///
    /// # Errors
    ///
    /// Returns an error if the response lacks `key` or it cannot be decoded.
    pub fn write<T: DeserializeOwned + TableOutput>(&self, response: &Value, key: &str) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(response),
            OutputFormat::Table => {
                let item: T = extract(response, key)?;
                item.print_table(self.color);
                Ok(())
            }
        }
    }

    /// Writes a list response such as `{"issues": [...], "total_count": n}`.
    ///
    /// In table format the array under `key` becomes a table, followed by a
    /// paging summary when the response carries `total_count`.
    pub fn write_list<T: DeserializeOwned + TableRow>(&self, response: &Value, key: &str) -> anyhow::Result<()> {
        if self.is_json() {
            return write_json(response);
        }

        let items: Vec<T> = extract(response, key)?;
        if items.is_empty() {
            println!("No {} found.", key.replace('_', " "));
            return Ok(());
        }

        TableBuilder::new()
            .color(self.color)
            .headers(T::headers().iter().copied())
            .rows(items.iter().map(|item| item.row(self.color)))
            .print();

        if response.get("total_count").is_some() {
            let info = PageInfo::from_response(response);
            println!(
                "Showing {}-{} of {}",
                info.offset + 1,
                info.offset + items.len() as u64,
                info.total_count
            );
            if info.limit > 0 && info.has_next() {
                self.write_info(&format!(
                    "Use --offset {} to see the next page",
                    info.offset + info.limit
                ));
            }
        }
        Ok(())
    }

    /// Writes a warning message to stderr.
    pub fn write_warning(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    /// Writes an informational message to stderr.
    pub fn write_info(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{}", style(msg).dim());
        } else {
            eprintln!("{}", msg);
        }
    }

    /// Writes a success message to stdout, prefixed with a checkmark.
    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// A type rendered as a key/value block.
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

/// A type rendered as one row of a list table.
pub trait TableRow {
    /// Column headers, in row order.
    fn headers() -> &'static [&'static str];

    fn row(&self, color: bool) -> Vec<String>;
}

/// Prints a bold header with a dashed underline.
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints a key-value pair, with the key dimmed when color is enabled.
pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

/// Prints a key-value pair only when the value is present and non-empty.
pub fn print_optional_field(key: &str, value: Option<&str>, color: bool) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        print_field(key, value, color);
    }
}
