//! Output formatting: YAML, JSON, table.
//!
//! Results are re-enveloped under the resource's key before rendering, so
//! `ip_block show` prints `ip_block: {...}` and `ip_block list` prints
//! `ip_blocks: [...]`.

use std::collections::BTreeSet;
use std::io::{self, Write};

use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render `value` under `key` in the chosen format
pub fn render(format: OutputFormat, key: &str, value: Value) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&envelope(key, value)).map_err(|e| CliError::Output(e.to_string()))
        }
        OutputFormat::Json => serde_json::to_string_pretty(&envelope(key, value))
            .map_err(|e| CliError::Output(e.to_string())),
        OutputFormat::Table => Ok(render_table(&value)),
    }
}

/// Print rendered output to stdout, skipping empty output
pub fn print_output(output: &str) -> Result<(), CliError> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end()).map_err(|e| CliError::Output(e.to_string()))
}

fn envelope(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn render_table(value: &Value) -> String {
    let mut builder = Builder::default();

    match value {
        Value::Array(items) => {
            let columns: BTreeSet<&str> = items
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|item| item.keys().map(String::as_str))
                .collect();
            if columns.is_empty() {
                return String::new();
            }
            builder.push_record(columns.iter().map(|column| (*column).to_string()));
            for item in items {
                builder.push_record(columns.iter().map(|column| cell(item.get(*column))));
            }
        }
        Value::Object(fields) => {
            builder.push_record(["field".to_string(), "value".to_string()]);
            for (name, field) in fields {
                builder.push_record([name.clone(), cell(Some(field))]);
            }
        }
        other => return cell(Some(other)),
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
