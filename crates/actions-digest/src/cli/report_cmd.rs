//! `actions-digest report <page>` — narrative run report.

use crate::cli::{copy_or_print, load_run, print_delivery};
use crate::delivery::Sink;
use crate::report::{self, tabular, ReportFormat};
use anyhow::Result;
use std::path::Path;

/// Which narrative encoding to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrativeStyle {
    #[default]
    Text,
    Html,
    Document,
}

impl NarrativeStyle {
    fn format(self) -> ReportFormat {
        match self {
            NarrativeStyle::Text => ReportFormat::Text,
            NarrativeStyle::Html => ReportFormat::Html,
            NarrativeStyle::Document => ReportFormat::HtmlDocument,
        }
    }
}

/// Run the report command.
pub async fn run(
    page: &Path,
    url: Option<&str>,
    style: NarrativeStyle,
    to_stdout: bool,
    sink: &dyn Sink,
) -> Result<()> {
    let run = load_run(page, url).await?;
    let payload = report::clipboard_payload(&run, style.format(), tabular::local_offset());
    let delivery = copy_or_print(&payload, to_stdout, sink).await?;
    print_delivery("Run report", &run, delivery);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::memory::MemorySink;
    use crate::delivery::ContentKind;

    #[tokio::test]
    async fn test_report_copies_html_with_text_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("steps.json");
        std::fs::write(
            &page,
            r#"{"page": {"url": "https://github.com/o/r/actions/runs/1", "title": "CI", "heading": "Nightly"},
                "steps": [{"name": "Build", "conclusion": "success",
                           "startedAt": "2024-05-01T10:00:00Z", "completedAt": "2024-05-01T10:00:09Z"}]}"#,
        )
        .unwrap();

        let sink = MemorySink::new();
        run(&page, None, NarrativeStyle::Html, false, &sink).await.unwrap();

        let copied = sink.clipboard();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].kind, ContentKind::Html);
        assert!(copied[0].body.contains("<h2>\u{1f4ca} Nightly</h2>"));
        assert!(copied[0].plain.starts_with("\u{1f4ca} CI\n"));
    }
}
