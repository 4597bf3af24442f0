//! Turn raw step elements into a [`RunSummary`].

use super::source::{RawStep, StepSource};
use crate::model::{RunSummary, StepRecord};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Build the run summary for everything `source` exposes.
///
/// Malformed elements are not rejected: a step whose timestamps are missing
/// or unparsable simply has no duration and adds nothing to the total.
pub fn extract(source: &dyn StepSource) -> RunSummary {
    let page = source.page_context();
    let base = strip_fragment(&page.url);

    let steps: Vec<StepRecord> = source
        .list_steps()
        .into_iter()
        .enumerate()
        .map(|(i, raw)| to_record(raw, &base, i + 1))
        .collect();

    let duration_ms = steps.iter().filter_map(|s| s.duration_ms).sum();
    debug!(
        "extracted {} steps, {} with a duration, {duration_ms}ms total",
        steps.len(),
        steps.iter().filter(|s| s.duration_ms.is_some()).count()
    );

    RunSummary {
        uri: page.document_uri,
        url: page.url,
        title: page.title,
        heading: page.heading,
        steps,
        duration_ms,
    }
}

fn to_record(raw: RawStep, base: &str, number: usize) -> StepRecord {
    let started_at = raw.started_at.as_deref().and_then(parse_timestamp);
    let completed_at = raw.completed_at.as_deref().and_then(parse_timestamp);
    let duration_ms = match (started_at, completed_at) {
        (Some(start), Some(end)) => u64::try_from((end - start).num_milliseconds()).ok(),
        _ => None,
    };

    StepRecord {
        name: raw.name.unwrap_or_default(),
        external_id: raw.external_id,
        conclusion: raw.conclusion,
        started_at,
        completed_at,
        duration_ms,
        precise_duration_ms: raw.precise_duration,
        url: step_url(base, number),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Deep link to the 1-based step `number` of the page at `base`.
pub fn step_url(base: &str, number: usize) -> String {
    format!("{base}#step:{number}:1")
}

/// Page URL without its fragment.
fn strip_fragment(page_url: &str) -> String {
    match url::Url::parse(page_url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => page_url
            .split_once('#')
            .map_or(page_url, |(head, _)| head)
            .to_string(),
    }
}
