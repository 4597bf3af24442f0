//! `actions-digest table <page>` — one row per step for spreadsheets.

use crate::cli::{copy_or_print, load_run, print_delivery};
use crate::delivery::Sink;
use crate::report::{self, tabular, ReportFormat};
use anyhow::Result;
use std::path::Path;

/// Run the table command. TSV pastes into spreadsheets as columns; `csv`
/// switches to quoted comma-separated rows.
pub async fn run(
    page: &Path,
    url: Option<&str>,
    csv: bool,
    to_stdout: bool,
    sink: &dyn Sink,
) -> Result<()> {
    let run = load_run(page, url).await?;
    let format = if csv { ReportFormat::Csv } else { ReportFormat::Tsv };
    let payload = report::clipboard_payload(&run, format, tabular::local_offset());
    let delivery = copy_or_print(&payload, to_stdout, sink).await?;
    print_delivery("Step table", &run, delivery);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::memory::MemorySink;

    #[tokio::test]
    async fn test_table_copies_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("run.html");
        std::fs::write(
            &page,
            r#"<html><body>
               <check-step data-name="Lint" data-conclusion="success" data-external-id="e1"></check-step>
               <check-step data-name="Test" data-conclusion="failure"></check-step>
               </body></html>"#,
        )
        .unwrap();

        let sink = MemorySink::new();
        run(&page, None, false, false, &sink).await.unwrap();

        let copied = sink.clipboard();
        let lines: Vec<&str> = copied[0].body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Lint\tsuccess\tN/A\t\t\te1");
        assert_eq!(lines[2], "Test\tfailure\tN/A\t\t\t");
    }
}
