//! Report rendering.
//!
//! Every renderer takes a finished [`RunSummary`] and returns text; none of
//! them touch the clipboard or the filesystem.

pub mod duration;
pub mod json;
pub mod narrative;
pub mod stats;
pub mod tabular;

pub use narrative::NarrativeMode;
pub use stats::{Partition, RunStats};
pub use tabular::Delimiter;

use crate::delivery::{ClipboardPayload, ContentKind};
use crate::model::RunSummary;
use chrono::{FixedOffset, Utc};

/// The report styles the tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Narrative report, plain text.
    Text,
    /// Narrative report, HTML fragment.
    Html,
    /// Narrative report, standalone HTML document.
    HtmlDocument,
    /// Tab-separated table.
    Tsv,
    /// Comma-separated table.
    Csv,
}

impl ReportFormat {
    pub fn content_kind(self) -> ContentKind {
        match self {
            ReportFormat::Html => ContentKind::Html,
            ReportFormat::HtmlDocument => ContentKind::RichDocument,
            ReportFormat::Text | ReportFormat::Tsv | ReportFormat::Csv => ContentKind::Plain,
        }
    }
}

/// Render `run` in `format`. Timestamps, including the narrative's analysis
/// date, are shown in `offset`.
pub fn render(run: &RunSummary, format: ReportFormat, offset: FixedOffset) -> String {
    let now = Utc::now().with_timezone(&offset);
    match format {
        ReportFormat::Text => narrative::render_at(run, NarrativeMode::PlainText, now),
        ReportFormat::Html => narrative::render_at(run, NarrativeMode::Html, now),
        ReportFormat::HtmlDocument => narrative::render_html_document(run, now),
        ReportFormat::Tsv => tabular::render(run, Delimiter::Tab, offset),
        ReportFormat::Csv => tabular::render(run, Delimiter::Comma, offset),
    }
}

/// Clipboard payload for `format`. Rich formats carry the plain-text
/// narrative as their fallback.
pub fn clipboard_payload(run: &RunSummary, format: ReportFormat, offset: FixedOffset) -> ClipboardPayload {
    let body = render(run, format, offset);
    match format.content_kind() {
        ContentKind::Plain => ClipboardPayload::plain(body),
        kind => ClipboardPayload::rich(kind, body, render(run, ReportFormat::Text, offset)),
    }
}
