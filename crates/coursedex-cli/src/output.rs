//! Terminal rendering for search results and status boxes.

use coursedex_core::api::{AggregateResult, TypeaheadResponse};
use owo_colors::OwoColorize;

pub(crate) const INNER_WIDTH: usize = 53;

#[derive(Debug, Clone, Copy)]
pub(crate) enum ValueStyle {
    Good,
    Warn,
    Neutral,
}

pub(crate) fn print_box_top(title: &str) {
    println!(
        "{}",
        "╭───────────────────────────────────────────────────────╮".bright_blue()
    );
    println!(
        "{} {:<53} {}",
        "│".bright_blue(),
        title.bold().bright_white(),
        "│".bright_blue()
    );
    print_box_rule();
}

pub(crate) fn print_box_rule() {
    println!(
        "{}",
        "├───────────────────────────────────────────────────────┤".bright_blue()
    );
}

pub(crate) fn print_box_bottom() {
    println!(
        "{}",
        "╰───────────────────────────────────────────────────────╯".bright_blue()
    );
}

pub(crate) fn print_kv_line(label: &str, value: &str, style: ValueStyle) {
    let available = INNER_WIDTH.saturating_sub(label.len());
    let value_aligned = fit_value_right(value, available);

    let border = "│".bright_blue();
    let label = label.dimmed();
    match style {
        ValueStyle::Good => println!(
            "{border} {label}{} {border}",
            value_aligned.bright_green().bold()
        ),
        ValueStyle::Warn => println!(
            "{border} {label}{} {border}",
            value_aligned.bright_yellow().bold()
        ),
        ValueStyle::Neutral => {
            println!("{border} {label}{} {border}", value_aligned.bright_white())
        }
    };
}

/// Right-align `value` in `width` columns, keeping its tail when too long.
pub(crate) fn fit_value_right(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let value = value.trim();
    let len = value.chars().count();
    if len <= width {
        return format!("{value:>width$}");
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let tail: String = value.chars().skip(len - (width - 3)).collect();
    format!("...{tail}")
}

/// Identifier and title of an aggregate result.
pub(crate) fn describe(result: &AggregateResult) -> (&'static str, String, &str) {
    match result {
        AggregateResult::CourseRun(run) => ("courserun", run.key.clone(), run.title.as_str()),
        AggregateResult::Program(program) => {
            ("program", program.uuid.to_string(), program.title.as_str())
        }
        AggregateResult::Course(course) => ("course", course.key.clone(), course.title.as_str()),
    }
}

pub(crate) fn print_results_table(results: &[(f32, AggregateResult)]) {
    println!(
        "{:<5} {:<10} {:<6} {:<40} {}",
        "RANK".bold(),
        "TYPE".bold(),
        "SCORE".bold(),
        "ID".bold(),
        "TITLE".bold()
    );
    for (i, (score, result)) in results.iter().enumerate() {
        let (content_type, id, title) = describe(result);
        let content_type = format!("{content_type:<10}");
        let content_type = match result {
            AggregateResult::CourseRun(_) => content_type.bright_cyan().to_string(),
            AggregateResult::Program(_) => content_type.bright_magenta().to_string(),
            AggregateResult::Course(_) => content_type.bright_green().to_string(),
        };
        println!(
            "{:<5} {} {:<6.2} {:<40} {}",
            i + 1,
            content_type,
            score,
            id,
            title
        );
    }
}

pub(crate) fn print_typeahead(response: &TypeaheadResponse) {
    println!("{}", "Course runs".bold().bright_cyan());
    if response.course_runs.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for run in &response.course_runs {
        println!("  {:<40} {} {}", run.key, run.title, run.orgs.join(", ").dimmed());
    }

    println!("{}", "Programs".bold().bright_magenta());
    if response.programs.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for program in &response.programs {
        println!(
            "  {:<40} {} {}",
            program.uuid.to_string(),
            program.title,
            program.program_type.dimmed()
        );
    }
}
