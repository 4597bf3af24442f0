//! `actions-digest summary <page>` — run statistics in the terminal.

use crate::cli::load_run;
use crate::cli::output::{self, Styled};
use crate::model::{Conclusion, RunSummary, StepRecord};
use crate::report::duration::{
    format_human, format_human_opt, format_percent, format_whole_percent, percent_of,
};
use crate::report::{self, Partition, RunStats};
use anyhow::Result;
use std::path::Path;

/// Run the summary command.
pub async fn run(page: &Path, url: Option<&str>) -> Result<()> {
    let run = load_run(page, url).await?;

    if output::is_json() {
        output::print_json(&report::json::render(&run));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    print_summary(&run);
    Ok(())
}

fn print_summary(run: &RunSummary) {
    let s = Styled::new();
    let stats = RunStats::compute(run);
    let partition = Partition::compute(run);

    output::print_header(&s);
    eprintln!("  {}", s.bold(run.display_title()));
    eprintln!("  {}", s.dim(&run.uri));
    eprintln!();

    if run.is_empty() {
        eprintln!("  {} No workflow steps found on this page.", s.info_sym());
        return;
    }

    output::print_section(&s, "Timing");
    output::print_check(
        &s.info_sym(),
        "Total",
        &format!("{} across {} steps", format_human(stats.total_duration_ms), stats.total_steps),
    );
    output::print_check(
        &s.info_sym(),
        "Average",
        &format_human_opt(stats.average_duration_ms.map(|avg| avg.round() as u64)),
    );
    if let Some(longest) = stats.longest {
        let sym = if stats.longest_is_outlier() {
            s.warn_sym()
        } else {
            s.info_sym()
        };
        output::print_check(&sym, "Longest", &step_line(longest));
    }
    if let Some(shortest) = stats.shortest {
        output::print_check(&s.info_sym(), "Shortest", &step_line(shortest));
    }
    eprintln!();

    output::print_section(&s, "Outcomes");
    for outcome in stats.outcomes.iter().filter(|o| o.count > 0) {
        let label = format!("{} {}", outcome.conclusion.emoji(), outcome.conclusion.label());
        let value = format!("{} ({})", outcome.count, format_whole_percent(outcome.percent));
        output::print_check(&s.outcome_sym(outcome.conclusion), &label, &value);
    }
    eprintln!();

    output::print_section(&s, "Time-consuming steps");
    for step in &partition.time_consuming {
        let pct = percent_of(step.duration_or_zero(), stats.total_duration_ms);
        output::print_check(
            &s.warn_sym(),
            &format_percent(pct),
            &format!("{} {}", step.name, s.dim(&format_human_opt(step.duration_ms))),
        );
    }
    if output::is_verbose() && !partition.papercuts.is_empty() {
        eprintln!();
        output::print_section(&s, "Other steps");
        for step in &partition.papercuts {
            output::print_check(&s.info_sym(), &step.name, &s.dim(&format_human_opt(step.duration_ms)));
        }
    }

    let failures = stats.count(Conclusion::Failure);
    if failures > 0 {
        output::print_status(
            &s,
            &s.red("failed"),
            &format!("{failures} of {} steps failed", stats.total_steps),
        );
    } else if stats.count(Conclusion::Cancelled) > 0 {
        output::print_status(&s, &s.yellow("cancelled"), "run did not finish");
    } else {
        output::print_status(
            &s,
            &s.green("passed"),
            &format!("{} steps in {}", stats.total_steps, format_human(stats.total_duration_ms)),
        );
    }
}

fn step_line(step: &StepRecord) -> String {
    format!("{} ({})", step.name, format_human_opt(step.duration_ms))
}
