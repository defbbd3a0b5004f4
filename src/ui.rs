//! Terminal rendering: spinners, colored status strips, issue tables.
//!
//! Uses `indicatif` for spinners and `console` for styling. Color tokens from
//! the stage table (`"<hue>-<shade>"`) are mapped onto terminal colors here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use console::{Color, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::achievements::AchievementReport;
use crate::api::{DashboardStats, Issue, IssueDetails};
use crate::dashboard::{AdvanceOutcome, Confirmer};
use crate::priority::Priority;
use crate::progression::{ConfirmationPrompt, Progression, STATUS_STAGES, StepState, stage};

/// Spinner shown while a request is in flight.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

/// Terminal style for a `"<hue>-<shade>"` token. Unknown hues render plain.
pub fn style_for_token(token: &str) -> Style {
    let hue = token.split('-').next().unwrap_or_default();
    let color = match hue {
        "blue" => Color::Blue,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "orange" => Color::Color256(208),
        "red" => Color::Red,
        "gray" => Color::Color256(245),
        _ => return Style::new(),
    };
    Style::new().fg(color)
}

/// Status name styled with its stage colors.
pub fn styled_status(status: &str) -> String {
    let colors = stage::color_of(status);
    let shown = stage::canonical_name(status).unwrap_or(status);
    style_for_token(colors.foreground)
        .bold()
        .apply_to(shown)
        .to_string()
}

fn styled_priority(priority: &Priority) -> String {
    style_for_token(priority.border_color())
        .apply_to(priority.label())
        .to_string()
}

/// One-line stage strip, e.g. `● Seen ─ ● Verified ─ ◉ In Progress ─ ○ On Hold ─ ○ Completed`.
///
/// Passed stages are filled, the current one is ringed, and the next one is
/// marked as clickable when the control is editable.
pub fn progression_strip(progression: &Progression) -> String {
    let dim = Style::new().dim();
    let parts: Vec<String> = progression
        .steps()
        .into_iter()
        .map(|(stage, step)| {
            let colors = style_for_token(stage.color.background);
            match step {
                StepState::Complete => format!("{} {}", colors.apply_to("●"), stage.name),
                StepState::Current => format!(
                    "{} {}",
                    colors.bold().apply_to("◉"),
                    Style::new().bold().apply_to(stage.name)
                ),
                StepState::Next if progression.is_editable() => {
                    format!("{} {}", dim.apply_to("○"), Style::new().underlined().apply_to(stage.name))
                }
                StepState::Next | StepState::Upcoming => {
                    format!("{} {}", dim.apply_to("○"), dim.apply_to(stage.name))
                }
            }
        })
        .collect();
    parts.join(&dim.apply_to(" ─ ").to_string())
}

/// Human friendly age, e.g. `3 days ago`, `1 hour ago`, `5 minutes ago`.
pub fn relative_time(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created);
    let (amount, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_seconds() > 3600 {
        (elapsed.num_hours(), "hour")
    } else {
        (elapsed.num_minutes().max(0), "minute")
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

pub fn print_stats(stats: &DashboardStats) {
    let heading = Style::new().bold();
    println!("{}", heading.apply_to("Dashboard"));
    let rows = [
        ("Pending issues", stats.pending_issues),
        ("Reported", stats.reported_issues),
        ("Verified", stats.verified),
        ("In Progress", stats.in_progress),
        ("On Hold", stats.on_hold),
        ("Achievements", stats.achievements),
    ];
    for (label, count) in rows {
        println!("  {label:<16} {count:>6}");
    }
    if let Some(total) = stats.total_issues {
        println!("  {:<16} {total:>6}", "Total");
    }
}

pub fn print_issue_list(issues: &[Issue], placeholders: &[String]) {
    if issues.is_empty() {
        println!("{}", Style::new().dim().apply_to("No issues found."));
        return;
    }
    let now = Utc::now();
    for (position, issue) in issues.iter().enumerate() {
        let age = issue
            .created_at()
            .map(|created| relative_time(created, now))
            .unwrap_or_default();
        println!(
            "{}  {}  [{}]  {}",
            Style::new().dim().apply_to(&issue.id),
            Style::new().bold().apply_to(&issue.title),
            styled_status(&issue.status),
            styled_priority(&issue.priority),
        );
        println!("    {}  {}", issue.location, Style::new().dim().apply_to(age));
        if let Some(image) = issue.preview_image(position, placeholders) {
            println!("    {}", Style::new().dim().apply_to(image));
        }
    }
}

pub fn print_issue_details(details: &IssueDetails, placeholders: &[String]) {
    let issue = &details.issue;
    let bold = Style::new().bold();
    println!("{}", bold.apply_to(&issue.title));
    println!("  ID:        {}", issue.id);
    println!("  Category:  {}", issue.category);
    println!("  Location:  {}", issue.location);
    println!("  Priority:  {}", styled_priority(&issue.priority));
    println!("  Posted:    {}", issue.posted_date());
    println!("  Reporter:  {} {}", issue.user_name, issue.user_mobile);
    if let Some(image) = issue.preview_image(0, placeholders) {
        println!("  Image:     {image}");
    }
    if let Some(summary) = issue.achievement_summary() {
        println!("  Achievement: {summary}");
    }
    println!();
    println!("  {}", issue.description);
    println!();
    println!("  {}", progression_strip(&Progression::read_only(issue.status.as_str())));
    println!("  Status: {}", styled_status(&issue.status));

    if !details.matching_issues.is_empty() {
        println!();
        println!("{}", bold.apply_to("Matching issues"));
        for other in &details.matching_issues {
            println!("  {}  {}  [{}]", other.id, other.title, styled_status(&other.status));
        }
    }
}

pub fn print_stages() {
    for stage in STATUS_STAGES {
        println!(
            "  {}  {}",
            stage.index,
            style_for_token(stage.color.foreground).apply_to(stage.name)
        );
    }
}

pub fn print_advance_outcome(outcome: &AdvanceOutcome) {
    let green = Style::new().green().bold();
    let yellow = Style::new().yellow();
    match outcome {
        AdvanceOutcome::Advanced { from, to, current } => {
            println!(
                "  {} {} → {}",
                green.apply_to("✓"),
                styled_status(from),
                styled_status(to)
            );
            if current != to {
                println!("  {} server reports status {}", yellow.apply_to("!"), styled_status(current));
            }
        }
        AdvanceOutcome::Cancelled { target } => {
            println!("  {} Kept current status, {target} not applied", yellow.apply_to("↺"));
        }
        AdvanceOutcome::Ignored { current } => {
            println!(
                "  {} Nothing to advance from {}",
                Style::new().dim().apply_to("·"),
                styled_status(current)
            );
        }
    }
}

pub fn print_report_written(report: &AchievementReport, path: &std::path::Path) {
    println!(
        "  {} Wrote {} achievements to {}",
        Style::new().green().bold().apply_to("✓"),
        report.rows.len(),
        path.display()
    );
}

/// Asks on the terminal; anything but `y`/`yes` declines.
pub struct TerminalConfirm {
    term: Term,
}

impl TerminalConfirm {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirmer for TerminalConfirm {
    fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        let question = format!("{prompt}? [y/N] ");
        if self.term.write_str(&question).is_err() {
            return false;
        }
        match self.term.read_line() {
            Ok(answer) => is_yes(&answer),
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
