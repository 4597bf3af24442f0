//! One-row-per-step tables for spreadsheets (TSV) and files (CSV).

use super::duration::format_clock_opt;
use crate::model::{RunSummary, StepRecord};
use chrono::{DateTime, FixedOffset, Local, Utc};

pub const HEADER: [&str; 6] = [
    "Step Name",
    "Status",
    "Duration",
    "Started At",
    "Completed At",
    "External ID",
];

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field separator and quoting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Tab-separated, unquoted; pastes straight into a spreadsheet.
    Tab,
    /// Comma-separated with every field quoted.
    Comma,
}

/// Render one header row plus one row per step, in page order.
///
/// Timestamps are shown in `offset`; use [`local_offset`] for the machine's
/// own time zone.
pub fn render(run: &RunSummary, delimiter: Delimiter, offset: FixedOffset) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|h| h.to_string()), delimiter);
    for step in &run.steps {
        push_row(&mut out, row(step, offset), delimiter);
    }
    out
}

/// Offset of the local time zone right now.
pub fn local_offset() -> FixedOffset {
    *Local::now().offset()
}

fn row(step: &StepRecord, offset: FixedOffset) -> impl Iterator<Item = String> {
    [
        step.name.clone(),
        step.conclusion
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        format_clock_opt(step.duration_ms),
        format_timestamp(step.started_at, offset),
        format_timestamp(step.completed_at, offset),
        step.external_id.clone().unwrap_or_default(),
    ]
    .into_iter()
}

fn format_timestamp(ts: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    ts.map(|t| t.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>, delimiter: Delimiter) {
    let line = fields
        .map(|field| match delimiter {
            Delimiter::Tab => escape_tsv(&field),
            Delimiter::Comma => quote_csv(&field),
        })
        .collect::<Vec<_>>()
        .join(match delimiter {
            Delimiter::Tab => "\t",
            Delimiter::Comma => ",",
        });
    out.push_str(&line);
    out.push('\n');
}

fn quote_csv(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// TSV has no quoting; separators inside a field become spaces.
fn escape_tsv(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}
