//! Statistics derived from a [`RunSummary`].
//!
//! Nothing here is cached on the summary; every report recomputes what it
//! needs. All of it is linear in the number of steps.

use super::duration::percent_of;
use crate::model::{Conclusion, RunSummary, StepRecord};
use serde::Serialize;

/// Steps at or above this share of the total duration (in percent) are
/// "time-consuming"; the rest are papercuts.
pub const PAPERCUT_PERCENT: u64 = 5;

/// The longest step is called out when it exceeds this multiple of the
/// average step duration.
pub const LONG_STEP_FACTOR: f64 = 2.0;

/// Number of steps and share of all steps for one conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeCount {
    pub conclusion: Conclusion,
    pub count: usize,
    pub percent: f64,
}

/// Summary figures for one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats<'a> {
    pub total_steps: usize,
    pub total_duration_ms: u64,
    /// `None` when the run has no steps.
    pub average_duration_ms: Option<f64>,
    pub longest: Option<&'a StepRecord>,
    pub shortest: Option<&'a StepRecord>,
    pub outcomes: Vec<OutcomeCount>,
}

impl<'a> RunStats<'a> {
    pub fn compute(run: &'a RunSummary) -> Self {
        let total_steps = run.total_steps();
        let average_duration_ms =
            (total_steps > 0).then(|| run.duration_ms as f64 / total_steps as f64);

        let outcomes = Conclusion::ALL
            .iter()
            .map(|&conclusion| {
                let count = run
                    .steps
                    .iter()
                    .filter(|s| s.outcome() == conclusion)
                    .count();
                OutcomeCount {
                    conclusion,
                    count,
                    percent: percent_of(count as u64, total_steps as u64),
                }
            })
            .collect();

        Self {
            total_steps,
            total_duration_ms: run.duration_ms,
            average_duration_ms,
            longest: longest_step(&run.steps),
            shortest: shortest_step(&run.steps),
            outcomes,
        }
    }

    pub fn count(&self, conclusion: Conclusion) -> usize {
        self.outcomes
            .iter()
            .find(|o| o.conclusion == conclusion)
            .map_or(0, |o| o.count)
    }

    /// Whether the longest step runs more than [`LONG_STEP_FACTOR`] times the
    /// average.
    pub fn longest_is_outlier(&self) -> bool {
        match (self.longest.and_then(|s| s.duration_ms), self.average_duration_ms) {
            (Some(longest), Some(avg)) => longest as f64 > LONG_STEP_FACTOR * avg,
            _ => false,
        }
    }
}

/// First step with the greatest known duration.
fn longest_step(steps: &[StepRecord]) -> Option<&StepRecord> {
    steps
        .iter()
        .filter(|s| s.duration_ms.is_some())
        .fold(None, |best: Option<&StepRecord>, step| match best {
            Some(b) if b.duration_ms >= step.duration_ms => Some(b),
            _ => Some(step),
        })
}

/// First step with the smallest known duration.
fn shortest_step(steps: &[StepRecord]) -> Option<&StepRecord> {
    steps
        .iter()
        .filter(|s| s.duration_ms.is_some())
        .min_by_key(|s| s.duration_ms)
}

/// Steps split at [`PAPERCUT_PERCENT`] of the run's total duration, each half
/// sorted by descending duration (ties keep page order).
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    pub time_consuming: Vec<&'a StepRecord>,
    pub papercuts: Vec<&'a StepRecord>,
}

impl<'a> Partition<'a> {
    pub fn compute(run: &'a RunSummary) -> Self {
        let total = run.duration_ms;
        let (mut time_consuming, mut papercuts): (Vec<_>, Vec<_>) = run
            .steps
            .iter()
            .partition(|s| is_time_consuming(s.duration_or_zero(), total));

        let by_duration_desc =
            |a: &&StepRecord, b: &&StepRecord| b.duration_or_zero().cmp(&a.duration_or_zero());
        time_consuming.sort_by(by_duration_desc);
        papercuts.sort_by(by_duration_desc);

        Self {
            time_consuming,
            papercuts,
        }
    }
}

fn is_time_consuming(duration_ms: u64, total_ms: u64) -> bool {
    duration_ms * 100 >= total_ms * PAPERCUT_PERCENT
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn step(name: &str, ms: Option<u64>, conclusion: &str) -> StepRecord {
        StepRecord {
            name: name.to_string(),
            external_id: None,
            conclusion: Some(conclusion.to_string()),
            started_at: None,
            completed_at: None,
            duration_ms: ms,
            precise_duration_ms: None,
            url: format!("https://github.com/o/r/actions/runs/1#step:{name}:1"),
        }
    }

    pub(crate) fn run_of(steps: Vec<StepRecord>) -> RunSummary {
        let duration_ms = steps.iter().filter_map(|s| s.duration_ms).sum();
        RunSummary {
            uri: "https://github.com/o/r/actions/runs/1".to_string(),
            url: "https://github.com/o/r/actions/runs/1".to_string(),
            title: "CI run".to_string(),
            heading: Some("Release 1.2".to_string()),
            steps,
            duration_ms,
        }
    }

    #[test]
    fn test_stats_counts_and_extremes() {
        let run = run_of(vec![
            step("a", Some(4_000), "success"),
            step("b", Some(1_000), "FAILURE"),
            step("c", Some(4_000), "success"),
            step("d", None, "skipped"),
            step("e", Some(1_000), "cancelled"),
        ]);
        let stats = RunStats::compute(&run);

        assert_eq!(stats.total_steps, 5);
        assert_eq!(stats.total_duration_ms, 10_000);
        assert_eq!(stats.average_duration_ms, Some(2_000.0));
        assert_eq!(stats.longest.unwrap().name, "a");
        assert_eq!(stats.shortest.unwrap().name, "b");
        assert_eq!(stats.count(Conclusion::Success), 2);
        assert_eq!(stats.count(Conclusion::Failure), 1);
        assert_eq!(stats.count(Conclusion::Skipped), 1);
        assert_eq!(stats.count(Conclusion::Cancelled), 1);
        assert_eq!(stats.count(Conclusion::Unknown), 0);
        assert!(!stats.longest_is_outlier());
    }

    #[test]
    fn test_longest_outlier() {
        let run = run_of(vec![
            step("slow", Some(9_000), "success"),
            step("x", Some(500), "success"),
            step("y", Some(500), "success"),
        ]);
        assert!(RunStats::compute(&run).longest_is_outlier());
    }

    #[test]
    fn test_empty_run_has_no_average() {
        let run = run_of(Vec::new());
        let stats = RunStats::compute(&run);
        assert_eq!(stats.average_duration_ms, None);
        assert!(stats.longest.is_none());
        assert!(stats.outcomes.iter().all(|o| o.percent == 0.0));
        assert!(!stats.longest_is_outlier());
    }

    #[test]
    fn test_partition_is_disjoint_exhaustive_and_sorted() {
        let run = run_of(vec![
            step("tiny", Some(100), "success"),
            step("big", Some(50_000), "success"),
            step("edge", Some(3_000), "success"),
            step("small", Some(2_000), "success"),
            step("unknown", None, "success"),
            step("mid", Some(4_900), "success"),
        ]);
        // total 60_000, threshold 3_000
        let p = Partition::compute(&run);

        let tc: Vec<&str> = p.time_consuming.iter().map(|s| s.name.as_str()).collect();
        let pc: Vec<&str> = p.papercuts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(tc, ["big", "mid", "edge"]);
        assert_eq!(pc, ["small", "tiny", "unknown"]);
        assert_eq!(tc.len() + pc.len(), run.steps.len());
        assert!(tc.iter().all(|n| !pc.contains(n)));
    }

    #[test]
    fn test_partition_all_heavy_steps() {
        let run = run_of(vec![
            step("one", Some(10_000), "success"),
            step("two", Some(2_000), "success"),
            step("three", Some(1_000), "success"),
        ]);
        let p = Partition::compute(&run);
        assert_eq!(p.time_consuming.len(), 3);
        assert!(p.papercuts.is_empty());
    }
}
