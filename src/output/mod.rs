//
//  deployer-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Output formatting for the `deployer` CLI:
//!
//! - **Table format**: human-readable output for interactive terminal use
//! - **JSON format**: machine-readable output for scripting (`--json`)
//!
//! ## Core Components
//!
//! - [`OutputFormat`]: the available formats
//! - [`OutputWriter`]: writes values and status messages in the chosen format
//! - [`TableOutput`]: implemented by everything the CLI prints as a table
//! - [`table`]: table building on `comfy_table`
//!
//! ## Example
//!
//! ```rust
//! use deployer_client::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write_value(&serde_json::json!({ "id": 3 })).unwrap();
//! ```

pub mod table;

pub use table::*;

use serde::Serialize;
use serde_json::Value;

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tables and key/value listings, colored when the terminal allows.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Writes command results and status messages.
///
/// Data goes to stdout; errors and warnings go to stderr so JSON output stays
/// parseable.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer; color support is detected from the terminal.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Whether color output is enabled.
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// The configured format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes one value.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Table => value.print_table(self.color),
        }
        Ok(())
    }

    /// Writes a list as one table, or as a JSON array.
    pub fn write_list<T: Serialize + TableOutput>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(values)?),
            OutputFormat::Table if values.is_empty() => self.write_info("Nothing to show."),
            OutputFormat::Table => T::print_rows(values, self.color),
        }
        Ok(())
    }

    /// Writes a raw API payload.
    ///
    /// Objects are listed field by field in table mode; anything else is
    /// printed as JSON.
    pub fn write_value(&self, value: &Value) -> anyhow::Result<()> {
        match (self.format, value) {
            (OutputFormat::Table, Value::Object(map)) => {
                for (key, field) in map {
                    print_field(key, &display_value(field), self.color);
                }
            }
            _ => println!("{}", serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }

    /// Writes an error message to stderr.
    pub fn write_error(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
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

    /// Writes an informational message.
    ///
    /// Goes to stderr in JSON mode.
    pub fn write_info(&self, msg: &str) {
        match self.format {
            OutputFormat::Json => eprintln!("{}", msg),
            OutputFormat::Table => println!("{}", msg),
        }
    }

    /// Writes a success message, prefixed with a check mark.
    pub fn write_success(&self, msg: &str) {
        use console::style;
        let line = if self.color {
            format!("{} {}", style("✓").green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        };
        match self.format {
            OutputFormat::Json => eprintln!("{}", line),
            OutputFormat::Table => println!("{}", line),
        }
    }
}

/// Rendering of a type as a detail view and as table rows.
pub trait TableOutput: Sized {
    /// Prints one value as a detail view.
    fn print_table(&self, color: bool);

    /// Prints several values as a single table.
    ///
    /// Defaults to one detail view per value.
    fn print_rows(values: &[Self], color: bool) {
        for value in values {
            value.print_table(color);
            println!();
        }
    }
}

/// Prints a bold header with a dashed underline.
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints a `key: value` line, dimming the key when colored.
pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

/// Text for a JSON value in a table cell: strings bare, `null` empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("shop")), "shop");
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(["a"])), r#"["a"]"#);
    }

    #[test]
    fn test_default_format_is_table() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
