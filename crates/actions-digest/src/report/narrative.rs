//! Narrative run report: metrics, insights and the slow/papercut breakdown.
//!
//! The report is first assembled into a mode-independent list of sections and
//! then rendered either as plain text (for chat and issue comments) or as HTML
//! (for rich paste targets, with step names linked to their log anchors).

use super::duration::{
    format_human, format_human_opt, format_percent, format_whole_percent, percent_of,
};
use super::stats::{Partition, RunStats, LONG_STEP_FACTOR, PAPERCUT_PERCENT};
use super::tabular::TIMESTAMP_FORMAT;
use crate::model::{Conclusion, RunSummary, StepRecord};
use chrono::{DateTime, FixedOffset, Local};
use std::borrow::Cow;
use std::fmt::Write as _;

/// The "other steps" section lists every step up to this many...
pub const OTHER_STEPS_LIST_LIMIT: usize = 10;
/// ...and only this many, plus a remainder line, beyond it.
pub const OTHER_STEPS_PREVIEW: usize = 5;

const EMPTY_RUN_LINE: &str = "No workflow steps found on this page.";

/// Output encoding of the narrative report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrativeMode {
    #[default]
    PlainText,
    Html,
}

enum Span {
    Text(String),
    Link { text: String, href: String },
}

type Line = Vec<Span>;

struct Section {
    title: String,
    ordered: bool,
    /// Summary line printed above the list.
    lead: Option<String>,
    items: Vec<Line>,
    /// Closing remark printed after the list.
    trailer: Option<String>,
}

impl Section {
    fn bullets(title: impl Into<String>, items: Vec<Line>) -> Self {
        Self {
            title: title.into(),
            ordered: false,
            lead: None,
            items,
            trailer: None,
        }
    }
}

struct Report {
    title: String,
    uri: String,
    generated_at: String,
    sections: Vec<Section>,
    empty: bool,
}

/// Render the narrative report for `run`, dated now in local time.
pub fn render(run: &RunSummary, mode: NarrativeMode) -> String {
    render_at(run, mode, Local::now().fixed_offset())
}

/// Render the narrative report for `run` with `generated_at` as its analysis
/// date.
pub fn render_at(run: &RunSummary, mode: NarrativeMode, generated_at: DateTime<FixedOffset>) -> String {
    let report = build(run, mode, generated_at);
    match mode {
        NarrativeMode::PlainText => render_text(&report),
        NarrativeMode::Html => render_html(&report),
    }
}

/// HTML report wrapped in a standalone document, for paste targets that
/// expect a whole document rather than a fragment.
pub fn render_html_document(run: &RunSummary, generated_at: DateTime<FixedOffset>) -> String {
    let body = render_at(run, NarrativeMode::Html, generated_at);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(run.display_title())
    )
}

fn build(run: &RunSummary, mode: NarrativeMode, generated_at: DateTime<FixedOffset>) -> Report {
    let title = match mode {
        NarrativeMode::PlainText => run.title.clone(),
        NarrativeMode::Html => run.display_title().to_string(),
    };
    let generated_at = generated_at.format(TIMESTAMP_FORMAT).to_string();

    if run.is_empty() {
        return Report {
            title,
            uri: run.uri.clone(),
            generated_at,
            sections: Vec::new(),
            empty: true,
        };
    }

    let stats = RunStats::compute(run);
    let partition = Partition::compute(run);
    let total = run.duration_ms;

    let mut sections = vec![metrics_section(&stats), insights_section(&stats)];

    if !partition.time_consuming.is_empty() {
        sections.push(time_consuming_section(&partition.time_consuming, total));
    }

    if !partition.papercuts.is_empty() {
        sections.push(papercut_section(&partition.papercuts, total));
    }

    sections.push(Section::bullets(
        "\u{1f4dd} Notes",
        vec![
            text_line("Durations are measured from each step's start and completion timestamps."),
            text_line("Percentages are relative to the total duration of all steps."),
            text_line(format!(
                "Steps under {PAPERCUT_PERCENT}% of the total are grouped as papercuts."
            )),
            text_line(status_legend()),
        ],
    ));

    Report {
        title,
        uri: run.uri.clone(),
        generated_at,
        sections,
        empty: false,
    }
}

fn metrics_section(stats: &RunStats<'_>) -> Section {
    let mut items = vec![
        text_line(format!(
            "Total duration: {}",
            format_human(stats.total_duration_ms)
        )),
        text_line(format!(
            "Average step duration: {}",
            format_human_opt(stats.average_duration_ms.map(|avg| avg.round() as u64))
        )),
    ];

    if let Some(longest) = stats.longest {
        let after = format!(" ({})", format_human_opt(longest.duration_ms));
        items.push(named_line("Longest step: ", longest, after));
    }
    if let Some(shortest) = stats.shortest {
        let after = format!(" ({})", format_human_opt(shortest.duration_ms));
        items.push(named_line("Shortest step: ", shortest, after));
    }

    items.push(text_line(format!("Steps: {}", stats.total_steps)));
    for outcome in &stats.outcomes {
        if outcome.conclusion == Conclusion::Unknown && outcome.count == 0 {
            continue;
        }
        items.push(text_line(format!(
            "{} {}: {} ({})",
            outcome.conclusion.emoji(),
            outcome.conclusion.label(),
            outcome.count,
            format_whole_percent(outcome.percent)
        )));
    }

    Section::bullets("\u{23f1}\u{fe0f} Metrics", items)
}

fn insights_section(stats: &RunStats<'_>) -> Section {
    let mut items = Vec::new();

    if stats.longest_is_outlier() {
        if let Some(longest) = stats.longest {
            items.push(named_line(
                "",
                longest,
                format!(
                    " took {}, more than {LONG_STEP_FACTOR}\u{d7} the average step duration",
                    format_human_opt(longest.duration_ms)
                ),
            ));
        }
    }

    let failed = stats.count(Conclusion::Failure);
    if failed > 0 {
        items.push(text_line(format!(
            "{} {failed} {} failed",
            Conclusion::Failure.emoji(),
            plural(failed, "step", "steps")
        )));
    }

    let skipped = stats.count(Conclusion::Skipped);
    if skipped > 0 {
        items.push(text_line(format!(
            "{} {skipped} {} skipped",
            Conclusion::Skipped.emoji(),
            plural(skipped, "step was", "steps were")
        )));
    }

    Section::bullets("\u{1f4a1} Insights", items)
}

fn time_consuming_section(steps: &[&StepRecord], total: u64) -> Section {
    let pct = format_percent(percent_of(sum_durations(steps), total));
    let trailer = if steps.len() == 1 {
        format!("This step consumes {pct} of total workflow time")
    } else {
        format!("These {} steps consume {pct} of total workflow time", steps.len())
    };

    Section {
        title: format!("\u{1f422} Top time-consuming steps (\u{2265}{PAPERCUT_PERCENT}% of total)"),
        ordered: true,
        lead: None,
        items: steps.iter().map(|s| step_line(s, total)).collect(),
        trailer: Some(trailer),
    }
}

fn papercut_section(papercuts: &[&StepRecord], total: u64) -> Section {
    let spent = sum_durations(papercuts);
    let lead = format!(
        "{} {} totaling {} ({} of total time)",
        papercuts.len(),
        plural(papercuts.len(), "step", "steps"),
        format_human(spent),
        format_percent(percent_of(spent, total))
    );

    let (shown, trailer) = if papercuts.len() > OTHER_STEPS_LIST_LIMIT {
        (
            &papercuts[..OTHER_STEPS_PREVIEW],
            Some(format!("...and {} more", papercuts.len() - OTHER_STEPS_PREVIEW)),
        )
    } else {
        (papercuts, None)
    };

    Section {
        title: format!("\u{2702}\u{fe0f} Other steps (<{PAPERCUT_PERCENT}% of total)"),
        ordered: false,
        lead: Some(lead),
        items: shown.iter().map(|s| step_line(s, total)).collect(),
        trailer,
    }
}

fn sum_durations(steps: &[&StepRecord]) -> u64 {
    steps.iter().map(|s| s.duration_or_zero()).sum()
}

/// "Status emojis: ✅ Success, ❌ Failure, ..."
fn status_legend() -> String {
    let entries: Vec<String> = Conclusion::ALL
        .iter()
        .map(|c| format!("{} {}", c.emoji(), c.label()))
        .collect();
    format!("Status emojis: {}", entries.join(", "))
}

/// "✅ name: 1m 2s (12.3%)"
fn step_line(step: &StepRecord, total: u64) -> Line {
    named_line(
        &format!("{} ", step.outcome().emoji()),
        step,
        format!(
            ": {} ({})",
            format_human_opt(step.duration_ms),
            format_percent(percent_of(step.duration_or_zero(), total))
        ),
    )
}

fn named_line(before: &str, step: &StepRecord, after: String) -> Line {
    let mut line = Vec::with_capacity(3);
    if !before.is_empty() {
        line.push(Span::Text(before.to_string()));
    }
    line.push(Span::Link {
        text: step.name.clone(),
        href: step.url.clone(),
    });
    line.push(Span::Text(after));
    line
}

fn text_line(text: impl Into<String>) -> Line {
    vec![Span::Text(text.into())]
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

// ── Renderers ───────────────────────────────────────────────────────────────

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\u{1f4ca} {}", report.title);
    let _ = writeln!(out, "{}", report.uri);
    let _ = writeln!(out, "Analysis date: {}", report.generated_at);

    if report.empty {
        let _ = writeln!(out);
        let _ = writeln!(out, "{EMPTY_RUN_LINE}");
        return out;
    }

    for section in &report.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section.title);
        if let Some(lead) = &section.lead {
            let _ = writeln!(out, "{lead}");
        }
        for (i, item) in section.items.iter().enumerate() {
            let marker = if section.ordered {
                format!("{}.", i + 1)
            } else {
                "\u{2022}".to_string()
            };
            let text: String = item
                .iter()
                .map(|span| match span {
                    Span::Text(t) => t.as_str(),
                    Span::Link { text, .. } => text.as_str(),
                })
                .collect();
            let _ = writeln!(out, "{marker} {text}");
        }
        if let Some(trailer) = &section.trailer {
            let _ = writeln!(out, "{trailer}");
        }
    }

    out
}

fn render_html(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h2>\u{1f4ca} {}</h2>", escape_html(&report.title));
    let uri = escape_html(&report.uri);
    let _ = writeln!(out, "<p><a href=\"{uri}\">{uri}</a></p>");
    let _ = writeln!(out, "<p>Analysis date: {}</p>", report.generated_at);

    if report.empty {
        let _ = writeln!(out, "<p>{EMPTY_RUN_LINE}</p>");
        return out;
    }

    for section in &report.sections {
        let tag = if section.ordered { "ol" } else { "ul" };
        let _ = writeln!(out, "<h3>{}</h3>", escape_html(&section.title));
        if let Some(lead) = &section.lead {
            let _ = writeln!(out, "<p>{}</p>", escape_html(lead));
        }
        if section.items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "<{tag}>");
        for item in &section.items {
            out.push_str("<li>");
            for span in item {
                match span {
                    Span::Text(t) => out.push_str(&escape_html(t)),
                    Span::Link { text, href } => {
                        let _ = write!(
                            out,
                            "<a href=\"{}\">{}</a>",
                            escape_html(href),
                            escape_html(text)
                        );
                    }
                }
            }
            out.push_str("</li>\n");
        }
        let _ = writeln!(out, "</{tag}>");
        if let Some(trailer) = &section.trailer {
            let _ = writeln!(out, "<p>{}</p>", escape_html(trailer));
        }
    }

    out
}

pub(crate) fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
