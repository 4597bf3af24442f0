//! CLI subcommand implementations for the `actions-digest` binary.

pub mod export_cmd;
pub mod output;
pub mod report_cmd;
pub mod summary_cmd;
pub mod table_cmd;

use crate::delivery::{ClipboardPayload, Delivery, Sink};
use crate::extraction::{extract, load_source};
use crate::model::RunSummary;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read `page` and extract its run summary.
///
/// Parsing runs on the blocking pool: `scraper` documents are not `Send`.
pub async fn load_run(page: &Path, url: Option<&str>) -> Result<RunSummary> {
    let page: PathBuf = page.to_path_buf();
    let url = url.map(String::from);
    let shown = page.display().to_string();

    let run = tokio::task::spawn_blocking(move || -> crate::error::Result<RunSummary> {
        let source = load_source(&page, url.as_deref())?;
        Ok(extract(source.as_ref()))
    })
    .await
    .context("page parser task failed")?
    .with_context(|| format!("failed to load {shown}"))?;

    debug!("loaded {} steps from {shown}", run.steps.len());
    Ok(run)
}

/// Copy `payload` through `sink`, or print its body when `to_stdout` is set.
///
/// Returns the delivery path taken, or `None` when printed.
pub async fn copy_or_print(
    payload: &ClipboardPayload,
    to_stdout: bool,
    sink: &dyn Sink,
) -> Result<Option<Delivery>> {
    if to_stdout {
        print!("{}", payload.body);
        return Ok(None);
    }

    let delivery = sink
        .write_clipboard(payload)
        .await
        .context("clipboard delivery failed")?;
    Ok(Some(delivery))
}

/// Report the outcome of a clipboard command on stderr (or stdout as JSON).
///
/// Nothing is printed when the report itself went to stdout.
pub(crate) fn print_delivery(what: &str, run: &RunSummary, delivery: Option<Delivery>) {
    if output::is_json() {
        if let Some(status) = delivery_status(what, run, delivery) {
            output::print_json(&status);
        }
        return;
    }
    let Some(delivery) = delivery else {
        return;
    };
    if output::is_quiet() {
        return;
    }

    let s = output::Styled::new();
    let symbol = match delivery {
        Delivery::Rich | Delivery::PlainText | Delivery::Terminal => s.ok_sym(),
        Delivery::Manual => s.warn_sym(),
    };
    eprintln!(
        "  {symbol} {what} for {} steps {}",
        run.steps.len(),
        delivery.describe()
    );
}

/// JSON status for a copied report; `None` when the report was printed.
fn delivery_status(
    what: &str,
    run: &RunSummary,
    delivery: Option<Delivery>,
) -> Option<serde_json::Value> {
    let delivery = delivery?;
    Some(serde_json::json!({
        "report": what,
        "steps": run.steps.len(),
        "durationMs": run.duration_ms,
        "delivery": delivery,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::memory::MemorySink;
    use crate::report::stats::tests::{run_of, step};

    #[tokio::test]
    async fn test_load_run_from_html() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("run.html");
        std::fs::write(
            &page,
            r#"<html><head><title>CI</title></head><body>
               <check-step data-name="Build" data-conclusion="success"
                 data-started-at="2024-05-01T10:00:00Z" data-completed-at="2024-05-01T10:00:30Z"></check-step>
               </body></html>"#,
        )
        .unwrap();

        let run = load_run(&page, Some("https://github.com/o/r/actions/runs/3#top"))
            .await
            .unwrap();
        assert_eq!(run.duration_ms, 30_000);
        assert_eq!(run.steps[0].url, "https://github.com/o/r/actions/runs/3#step:1:1");
    }

    #[tokio::test]
    async fn test_load_run_missing_page() {
        let err = load_run(Path::new("/no/such/page.html"), None).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to load /no/such/page.html"));
    }

    #[test]
    fn test_delivery_status_only_for_copied_reports() {
        let run = run_of(vec![step("a", Some(1_500), "success")]);

        let status = delivery_status("Run report", &run, Some(Delivery::Rich));
        assert_eq!(
            status,
            Some(serde_json::json!({
                "report": "Run report",
                "steps": 1,
                "durationMs": 1500,
                "delivery": "rich",
            }))
        );

        // printed to stdout: the body is the whole output
        assert_eq!(delivery_status("Run report", &run, None), None);
    }

    #[tokio::test]
    async fn test_copy_goes_through_sink() {
        let sink = MemorySink::new();
        let payload = ClipboardPayload::plain("x".to_string());

        let delivery = copy_or_print(&payload, false, &sink).await.unwrap();
        assert_eq!(delivery, Some(Delivery::PlainText));
        assert_eq!(sink.clipboard(), vec![payload.clone()]);

        let delivery = copy_or_print(&payload, true, &sink).await.unwrap();
        assert_eq!(delivery, None);
        assert_eq!(sink.clipboard().len(), 1);
    }
}
