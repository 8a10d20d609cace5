use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dispatch::ResultSequence;
use crate::error::CliError;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON; aggregates are wrapped as `{"data": [...]}`.
    #[default]
    Json,
    /// One compact JSON document per line.
    Ndjson,
}

pub fn emit<W: Write>(out: &mut W, result: &ResultSequence, format: OutputFormat) -> Result<(), CliError> {
    match (format, result) {
        (OutputFormat::Json, ResultSequence::Single(value)) => print_json(out, value),
        (OutputFormat::Json, ResultSequence::Aggregated(items)) => {
            print_json(out, &json!({ "data": items }))
        }
        (OutputFormat::Ndjson, ResultSequence::Single(value)) => print_line(out, value),
        (OutputFormat::Ndjson, ResultSequence::Aggregated(items)) => {
            items.iter().try_for_each(|item| print_line(out, item))
        }
    }
}

pub fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Output(format!("failed to render output: {e}")))?;
    writeln!(out, "{rendered}").map_err(|e| CliError::Output(e.to_string()))
}

fn print_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string(value)
        .map_err(|e| CliError::Output(format!("failed to render output: {e}")))?;
    writeln!(out, "{rendered}").map_err(|e| CliError::Output(e.to_string()))
}

/// Tab-separated catalog listing for `--list-verbs`.
pub fn verbs<W: Write>(out: &mut W, registry: &Registry) -> Result<(), CliError> {
    for spec in registry.specs() {
        let mut line = format!("{}\t{}\t{}", spec.verb, spec.method, spec.template);
        if let Some(termination) = spec.pagination {
            line.push_str(&format!("\tpaged:{termination}"));
        }
        if !spec.filters.is_empty() {
            let ops: Vec<_> = spec.filters.iter().map(|op| op.as_str()).collect();
            line.push_str(&format!("\tfilters:{}", ops.join(",")));
        }
        writeln!(out, "{line}").map_err(|e| CliError::Output(e.to_string()))?;
    }
    Ok(())
}
