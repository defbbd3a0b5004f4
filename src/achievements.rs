//! Summary report of resolved issues.
//!
//! Completed issues are listed as achievements in a fixed-width text table
//! with the same header and footer as the exported dashboard report.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::Issue;
use crate::progression::stage;

pub const REPORT_TITLE: &str = "VoiceUp - Achievements Report";

/// Text used for completed issues that have no recorded achievement yet.
pub const DEFAULT_ACHIEVEMENT: &str =
    "Road issue successfully resolved and repaired by local authorities.";

const FOOTER: [&str; 2] = [
    "This report contains completed road infrastructure achievements.",
    "Generated by VoiceUp - Community Issue Reporting Platform",
];

// (header, width) per column.
const COLUMNS: [(&str, usize); 5] = [
    ("#", 3),
    ("Issue Description", 40),
    ("Location", 20),
    ("Posted Date", 11),
    ("Achievement", 44),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub posted_date: String,
    pub achievement: String,
}

impl AchievementRow {
    pub fn from_issue(issue: &Issue) -> Self {
        let achievement = issue
            .achievement_summary()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_ACHIEVEMENT)
            .to_string();
        Self {
            id: issue.id.clone(),
            title: issue.title.clone(),
            description: issue.description.clone(),
            location: issue.location.clone(),
            posted_date: issue.posted_date(),
            achievement,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AchievementReport {
    pub generated_on: NaiveDate,
    pub rows: Vec<AchievementRow>,
}

impl AchievementReport {
    /// Builds the report from `issues`, keeping only completed ones.
    pub fn from_issues(issues: &[Issue], generated_on: NaiveDate) -> Self {
        let completed = stage::last_index();
        let rows = issues
            .iter()
            .filter(|issue| stage::find_stage(&issue.status).is_some_and(|s| s.index == completed))
            .map(AchievementRow::from_issue)
            .collect();
        Self { generated_on, rows }
    }

    pub fn file_name(&self) -> String {
        format!(
            "VoiceUp_Achievements_Report_{}.txt",
            self.generated_on.format("%Y-%m-%d")
        )
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{REPORT_TITLE}\n"));
        out.push_str(&format!(
            "Generated on: {}\n",
            self.generated_on.format("%Y-%m-%d")
        ));
        out.push_str(&format!("Total Achievements: {}\n", self.rows.len()));
        out.push('\n');

        let headers: Vec<&str> = COLUMNS.iter().map(|(h, _)| *h).collect();
        push_row(&mut out, &headers);
        let rule: Vec<String> = COLUMNS.iter().map(|(_, w)| "-".repeat(*w)).collect();
        push_row(&mut out, &rule.iter().map(String::as_str).collect::<Vec<_>>());

        for (i, row) in self.rows.iter().enumerate() {
            let number = (i + 1).to_string();
            push_row(
                &mut out,
                &[
                    number.as_str(),
                    row.description.as_str(),
                    row.location.as_str(),
                    row.posted_date.as_str(),
                    row.achievement.as_str(),
                ],
            );
        }

        out.push('\n');
        for line in FOOTER {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.render())
    }
}

fn push_row(out: &mut String, cells: &[&str]) {
    let line: Vec<String> = cells
        .iter()
        .zip(COLUMNS.iter())
        .map(|(cell, (_, width))| format!("{:<width$}", fit(cell, *width), width = *width))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

/// Collapses whitespace and truncates to `width` characters with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
