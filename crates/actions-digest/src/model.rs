//! Step and run types produced by extraction.
//!
//! Both types are built once per invocation and never mutated afterwards.
//! Everything derived from them (counts, averages, partitions) lives in
//! [`crate::report::stats`] and is recomputed on demand.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Outcome of a single workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    Unknown,
}

impl Conclusion {
    /// All variants, in the order reports list them.
    pub const ALL: [Conclusion; 5] = [
        Conclusion::Success,
        Conclusion::Failure,
        Conclusion::Skipped,
        Conclusion::Cancelled,
        Conclusion::Unknown,
    ];

    /// Parse the raw conclusion text of a step element. Case-insensitive.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Conclusion::Unknown;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Conclusion::Success,
            "failure" => Conclusion::Failure,
            "cancelled" | "canceled" => Conclusion::Cancelled,
            "skipped" => Conclusion::Skipped,
            _ => Conclusion::Unknown,
        }
    }

    /// Emoji marker used in narrative reports.
    pub fn emoji(self) -> &'static str {
        match self {
            Conclusion::Success => "\u{2705}",
            Conclusion::Failure => "\u{274c}",
            Conclusion::Cancelled => "\u{23f9}\u{fe0f}",
            Conclusion::Skipped => "\u{23ed}\u{fe0f}",
            Conclusion::Unknown => "\u{2753}",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Conclusion::Success => "Success",
            Conclusion::Failure => "Failure",
            Conclusion::Cancelled => "Cancelled",
            Conclusion::Skipped => "Skipped",
            Conclusion::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One workflow step as it appeared on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub name: String,
    pub external_id: Option<String>,
    /// Conclusion text exactly as the page carried it.
    pub conclusion: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// `completed_at - started_at`. `None` when either end is missing or
    /// the step "finished" before it started.
    pub duration_ms: Option<u64>,
    /// Higher-resolution duration reported by the element itself.
    pub precise_duration_ms: Option<f64>,
    /// Deep link to the step on the run page.
    pub url: String,
}

impl StepRecord {
    pub fn outcome(&self) -> Conclusion {
        Conclusion::parse(self.conclusion.as_deref())
    }

    /// Duration used for ranking and partitioning; unknown counts as zero.
    pub fn duration_or_zero(&self) -> u64 {
        self.duration_ms.unwrap_or(0)
    }
}

/// Everything extracted from one run page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Document URI of the page the steps were read from.
    pub uri: String,
    /// Page URL, used as the base for step deep links.
    pub url: String,
    pub title: String,
    /// Display title from the page heading, when the page has one.
    pub heading: Option<String>,
    pub steps: Vec<StepRecord>,
    /// Sum of all known step durations.
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Title for reports that prefer the on-page heading.
    pub fn display_title(&self) -> &str {
        self.heading
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conclusion_parse_is_case_insensitive() {
        for raw in ["SUCCESS", "success", "Success"] {
            assert_eq!(Conclusion::parse(Some(raw)), Conclusion::Success);
            assert_eq!(Conclusion::parse(Some(raw)).emoji(), "\u{2705}");
        }
        assert_eq!(Conclusion::parse(Some("Canceled")), Conclusion::Cancelled);
        assert_eq!(Conclusion::parse(Some(" skipped ")), Conclusion::Skipped);
        assert_eq!(Conclusion::parse(Some("neutral")), Conclusion::Unknown);
        assert_eq!(Conclusion::parse(None), Conclusion::Unknown);
    }

    #[test]
    fn test_display_title_prefers_heading() {
        let mut run = RunSummary {
            uri: "file:///tmp/run.html".to_string(),
            url: "https://github.com/o/r/actions/runs/1".to_string(),
            title: "CI · o/r".to_string(),
            heading: Some("Fix the flaky test".to_string()),
            steps: Vec::new(),
            duration_ms: 0,
        };
        assert_eq!(run.display_title(), "Fix the flaky test");

        run.heading = Some(String::new());
        assert_eq!(run.display_title(), "CI · o/r");
    }
}
