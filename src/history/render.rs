use serde::Serialize;

use crate::history::differ::Delta;
use crate::history::section::DocumentStats;

pub const ADDED_NOTE: &str = "New section added to the rules";
pub const ENHANCED_NOTE: &str = "Expanded with additional details and specifications";
pub const REMOVED_NOTE: &str = "Section removed from the rules";

/// One version in the changelog. `delta` is `None` for the current document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub label: String,
    pub date: String,
    pub title: Option<String>,
    pub stats: DocumentStats,
    pub delta: Option<Delta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogReport {
    pub heading: String,
    pub intro: String,
    /// Newest first.
    pub entries: Vec<ChangelogEntry>,
}

fn stats_line(stats: &DocumentStats) -> String {
    format!(
        "{} lines, {} words, {} sections",
        stats.lines, stats.words, stats.sections
    )
}

fn push_items(out: &mut String, heading: &str, names: &[String], note: &str) {
    if names.is_empty() {
        return;
    }
    out.push_str(&format!("### {heading}\n"));
    for name in names {
        out.push_str(&format!("- **{name}**: {note}\n"));
    }
    out.push('\n');
}

fn render_current(out: &mut String, entry: &ChangelogEntry) {
    out.push_str(&format!("## [{}] - {}\n\n", entry.label, entry.date));
    out.push_str("### Current Version\n");
    out.push_str(&format!(
        "- **Title**: {}\n",
        entry.title.as_deref().unwrap_or("Unknown")
    ));
    out.push_str(&format!("- **Statistics**: {}\n", stats_line(&entry.stats)));
    out.push_str("- **Status**: Active development version\n\n");
}

fn render_archived(out: &mut String, entry: &ChangelogEntry, delta: &Delta) {
    out.push_str(&format!("## [{}] - {}\n\n", entry.label, entry.date));
    if delta.is_empty() {
        out.push_str("### Updated\n");
        out.push_str(&format!("- **Statistics**: {}\n\n", stats_line(&entry.stats)));
        return;
    }
    push_items(out, "Added", &delta.added, ADDED_NOTE);
    push_items(out, "Enhanced", &delta.enhanced, ENHANCED_NOTE);
    push_items(out, "Removed", &delta.removed, REMOVED_NOTE);
}

/// Short description of an entry for the summary table.
pub fn focus(delta: Option<&Delta>) -> String {
    let Some(delta) = delta else {
        return "Current development".to_string();
    };
    let parts: Vec<String> = [
        (delta.added.len(), "added"),
        (delta.enhanced.len(), "enhanced"),
        (delta.removed.len(), "removed"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, what)| format!("{count} {what}"))
    .collect();

    if parts.is_empty() {
        "No structural changes".to_string()
    } else {
        parts.join(", ")
    }
}

fn render_summary(out: &mut String, entries: &[ChangelogEntry]) {
    out.push_str("---\n\n## Version Comparison Summary\n\n");
    out.push_str("| Version | Date | Lines | Words | Sections | Focus |\n");
    out.push_str("|---------|------|-------|-------|----------|-------|\n");
    for entry in entries {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            entry.label,
            entry.date,
            entry.stats.lines,
            entry.stats.words,
            entry.stats.sections,
            focus(entry.delta.as_ref()),
        ));
    }
}

/// Renders the report. Output depends only on `report`; the optional footer is
/// the single place for run-specific text such as a generation timestamp.
pub fn render_changelog(report: &ChangelogReport, footer: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", report.heading));
    if !report.intro.trim().is_empty() {
        out.push_str(report.intro.trim());
        out.push_str("\n\n");
    }

    for entry in &report.entries {
        match &entry.delta {
            None => render_current(&mut out, entry),
            Some(delta) => render_archived(&mut out, entry, delta),
        }
    }

    render_summary(&mut out, &report.entries);

    if let Some(footer) = footer {
        out.push_str(&format!("\n---\n\n*{}*\n", footer.trim()));
    }
    out
}
