//! Output formatting utilities for topiclens

use crate::config::OutputFormat;
use colored::*;
use topiclens_deserializer::DecodedResult;

/// Renders decoded payloads for the terminal
pub struct Formatter {
    format: OutputFormat,
    colored: bool,
}

impl Formatter {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    /// Render the decoded value, pretty-printing JSON when asked to.
    ///
    /// Raw (non-Avro) values are returned untouched.
    pub fn render_value(&self, result: &DecodedResult) -> String {
        if self.format == OutputFormat::Compact || !result.is_avro() {
            return result.value.clone();
        }

        serde_json::from_str::<serde_json::Value>(&result.value)
            .and_then(|json| serde_json::to_string_pretty(&json))
            .unwrap_or_else(|_| result.value.clone())
    }

    /// Render the schema text, pretty-printed in pretty mode.
    pub fn render_schema(&self, result: &DecodedResult) -> String {
        if self.format == OutputFormat::Compact {
            return result.schema.clone();
        }

        serde_json::from_str::<serde_json::Value>(&result.schema)
            .and_then(|json| serde_json::to_string_pretty(&json))
            .unwrap_or_else(|_| result.schema.clone())
    }

    /// Print the decoded value, followed by the schema if requested
    pub fn print_decoded(&self, result: &DecodedResult, show_schema: bool) {
        println!("{}", self.render_value(result));

        if show_schema {
            if result.is_avro() {
                println!();
                println!("{}", self.label("Schema:"));
                println!("{}", self.render_schema(result));
            } else {
                self.print_info("payload is not Avro-encoded, no schema used");
            }
        }
    }

    /// Print a key-value line
    pub fn print_field(&self, key: &str, value: &str) {
        println!("  {}: {}", self.label(key), value);
    }

    /// Print an info message
    pub fn print_info(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "ℹ️".blue(), message);
        } else {
            eprintln!("ℹ️  {}", message);
        }
    }

    /// Print an error message
    pub fn print_error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "❌".red(), message);
        } else {
            eprintln!("❌ {}", message);
        }
    }

    fn label(&self, text: &str) -> String {
        if self.colored {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}
