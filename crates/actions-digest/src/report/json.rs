//! Machine-readable run summary for `--json` output.

use super::stats::{Partition, RunStats};
use crate::model::{RunSummary, StepRecord};

/// The extracted run plus its derived statistics.
pub fn render(run: &RunSummary) -> serde_json::Value {
    let stats = RunStats::compute(run);
    let partition = Partition::compute(run);

    serde_json::json!({
        "run": run,
        "stats": stats,
        "timeConsuming": names(&partition.time_consuming),
        "papercuts": names(&partition.papercuts),
    })
}

fn names(steps: &[&StepRecord]) -> Vec<String> {
    steps.iter().map(|s| s.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::stats::tests::{run_of, step};
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    #[test]
    fn test_json_summary() {
        let run = run_of(vec![
            step("Build", Some(9_000), "success"),
            step("Cache", Some(100), "skipped"),
        ]);
        let value = render(&run);

        assert_json_include!(
            actual: value,
            expected: json!({
                "run": {
                    "title": "CI run",
                    "heading": "Release 1.2",
                    "durationMs": 9100,
                    "steps": [
                        {"name": "Build", "conclusion": "success", "durationMs": 9000},
                        {"name": "Cache", "conclusion": "skipped", "durationMs": 100},
                    ],
                },
                "stats": {
                    "totalSteps": 2,
                    "totalDurationMs": 9100,
                    "averageDurationMs": 4550.0,
                    "longest": {"name": "Build"},
                    "shortest": {"name": "Cache"},
                },
                "timeConsuming": ["Build"],
                "papercuts": ["Cache"],
            })
        );
    }

    #[test]
    fn test_json_empty_run() {
        let value = render(&run_of(Vec::new()));
        assert_eq!(value["stats"]["averageDurationMs"], serde_json::Value::Null);
        assert_eq!(value["timeConsuming"], json!([]));
    }
}
