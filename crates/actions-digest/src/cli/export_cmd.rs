//! `actions-digest export <page>` — save the step table as CSV.

use crate::cli::load_run;
use crate::cli::output::{self, Styled};
use crate::delivery::{Sink, CSV_FILENAME, CSV_MIME};
use crate::report::tabular::{self, Delimiter};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the export command.
pub async fn run(page: &Path, url: Option<&str>, sink: &dyn Sink) -> Result<()> {
    let run = load_run(page, url).await?;
    let csv = tabular::render(&run, Delimiter::Comma, tabular::local_offset());

    let path = sink
        .download_file(CSV_FILENAME, csv.as_bytes(), CSV_MIME)
        .await
        .context("failed to save CSV export")?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "mime": CSV_MIME,
            "steps": run.steps.len(),
            "bytes": csv.len(),
        }));
    } else if !output::is_quiet() {
        let s = Styled::new();
        eprintln!(
            "  {} Saved {} steps to {}",
            s.ok_sym(),
            run.steps.len(),
            path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::memory::MemorySink;

    #[tokio::test]
    async fn test_export_saves_fixed_filename() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("run.html");
        std::fs::write(
            &page,
            r#"<html><body><check-step data-name="Build" data-conclusion="success"></check-step></body></html>"#,
        )
        .unwrap();

        let sink = MemorySink::new();
        run(&page, None, &sink).await.unwrap();

        let files = sink.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "github-actions-data.csv");
        assert_eq!(files[0].mime, "text/csv");
        let body = String::from_utf8(files[0].bytes.clone()).unwrap();
        assert_eq!(
            body,
            "\"Step Name\",\"Status\",\"Duration\",\"Started At\",\"Completed At\",\"External ID\"\n\
             \"Build\",\"success\",\"N/A\",\"\",\"\",\"\"\n"
        );
    }
}
