use serde::{Deserialize, Serialize};

use crate::history::differ::{Delta, diff};
use crate::history::identifier::SnapshotIdentifier;
use crate::history::render::{ChangelogEntry, ChangelogReport, render_changelog};
use crate::history::section::{DocumentStats, SectionSet, extract_sections, extract_title};

pub const LATEST_LABEL: &str = "Latest";
pub const LATEST_DATE: &str = "Current";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `August 3, 2025`
    #[default]
    Long,
    /// `03/08/2025`
    Short,
}

impl DateStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "long" => Some(Self::Long),
            "short" => Some(Self::Short),
            _ => None,
        }
    }

    pub fn format(self, id: &SnapshotIdentifier) -> String {
        match self {
            Self::Long => id.display_date(),
            Self::Short => id.short_date(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    Latest,
    Archived(SnapshotIdentifier),
}

/// One parsed document with its sections extracted once.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: Version,
    pub text: String,
    pub sections: SectionSet,
}

impl Snapshot {
    pub fn new(version: Version, text: String) -> Self {
        let sections = extract_sections(&text);
        Self {
            version,
            text,
            sections,
        }
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats::with_sections(&self.text, &self.sections)
    }

    fn entry(&self, date_style: DateStyle, delta: Option<Delta>) -> ChangelogEntry {
        let (label, date) = match &self.version {
            Version::Latest => (LATEST_LABEL.to_string(), LATEST_DATE.to_string()),
            Version::Archived(id) => (id.as_str().to_string(), date_style.format(id)),
        };
        ChangelogEntry {
            label,
            date,
            title: extract_title(&self.text),
            stats: self.stats(),
            delta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSnapshot {
    pub name: String,
    pub code: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    /// Latest first, then archived snapshots newest first.
    pub entries: Vec<ChangelogEntry>,
    pub skipped: Vec<SkippedSnapshot>,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub heading: String,
    pub intro: String,
    pub date_style: DateStyle,
}

#[derive(Debug, Clone)]
pub struct GeneratedChangelog {
    pub text: String,
    pub history: History,
}

/// Parses identifiers and orders archived snapshots newest first.
///
/// Ties on the calendar date fall back to the identifier code, descending.
pub fn order_archived<T>(
    archived: Vec<(String, T)>,
) -> (Vec<(SnapshotIdentifier, T)>, Vec<SkippedSnapshot>) {
    let mut ordered = Vec::with_capacity(archived.len());
    let mut skipped = Vec::new();

    for (code, item) in archived {
        match SnapshotIdentifier::parse(&code) {
            Ok(id) => ordered.push((id, item)),
            Err(err) => skipped.push(SkippedSnapshot {
                name: code,
                code: err.code(),
                reason: err.to_string(),
            }),
        }
    }

    ordered.sort_by(|(a, _), (b, _)| b.cmp(a));
    (ordered, skipped)
}

/// Walks the chain from the current document back through the archive,
/// diffing each archived snapshot against the next newer one.
pub fn build_history(
    current_text: &str,
    archived: Vec<(String, String)>,
    date_style: DateStyle,
) -> History {
    let (ordered, skipped) = order_archived(archived);

    let current = Snapshot::new(Version::Latest, current_text.to_string());
    let mut entries = Vec::with_capacity(ordered.len() + 1);
    entries.push(current.entry(date_style, None));

    let mut newer = current;
    for (id, text) in ordered {
        let snapshot = Snapshot::new(Version::Archived(id), text);
        let delta = diff(&snapshot.sections, &newer.sections);
        entries.push(snapshot.entry(date_style, Some(delta)));
        newer = snapshot;
    }

    History { entries, skipped }
}

/// Builds the history and renders it. Pure: no file system, no clock.
pub fn generate(
    current_text: &str,
    archived: Vec<(String, String)>,
    options: &ReportOptions,
    footer: Option<&str>,
) -> GeneratedChangelog {
    let history = build_history(current_text, archived, options.date_style);
    let report = ChangelogReport {
        heading: options.heading.clone(),
        intro: options.intro.clone(),
        entries: history.entries.clone(),
    };
    GeneratedChangelog {
        text: render_changelog(&report, footer),
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(code: &str, text: &str) -> (String, String) {
        (code.to_string(), text.to_string())
    }

    fn options() -> ReportOptions {
        ReportOptions {
            heading: "Rules Changelog".to_string(),
            intro: String::new(),
            date_style: DateStyle::Long,
        }
    }

    #[test]
    fn orders_newest_first_with_code_tiebreak() {
        let (ordered, skipped) = order_archived(vec![
            pair("010125", ""),
            pair("030825", ""),
            pair("310625", ""),
            pair("010725", ""),
        ]);
        assert!(skipped.is_empty());
        let codes: Vec<&str> = ordered.iter().map(|(id, _)| id.as_str()).collect();
        // 310625 normalizes to July 1 and ties with 010725.
        assert_eq!(codes, vec!["030825", "310625", "010725", "010125"]);
    }

    #[test]
    fn each_archive_is_diffed_against_the_next_newer_snapshot() {
        let current = "# Rules\n## Usage\nRun.\n## Setup\nInstall and configure.\n## Workflow\nShip.\n";
        let history = build_history(
            current,
            vec![
                pair("010725", "## Usage\nRun.\n"),
                pair("030825", "## Usage\nRun.\n## Setup\nInstall.\n"),
            ],
            DateStyle::Long,
        );

        assert_eq!(history.entries.len(), 3);
        assert_eq!(history.entries[0].label, "Latest");
        assert!(history.entries[0].delta.is_none());
        assert_eq!(history.entries[0].title.as_deref(), Some("Rules"));

        let newest_archive = &history.entries[1];
        assert_eq!(newest_archive.label, "030825");
        assert_eq!(newest_archive.date, "August 3, 2025");
        let delta = newest_archive.delta.as_ref().unwrap();
        assert_eq!(delta.added, vec!["Workflow"]);
        assert_eq!(delta.enhanced, vec!["Setup"]);
        assert!(delta.removed.is_empty());

        let oldest = history.entries[2].delta.as_ref().unwrap();
        assert_eq!(oldest.added, vec!["Setup"]);
        assert!(oldest.enhanced.is_empty());
    }

    #[test]
    fn invalid_identifiers_are_skipped_not_fatal() {
        let history = build_history(
            "## A\n",
            vec![pair("badname", "## A\n"), pair("030825", "## A\n")],
            DateStyle::Short,
        );
        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.entries[1].date, "03/08/2025");
        assert_eq!(history.skipped.len(), 1);
        assert_eq!(history.skipped[0].name, "badname");
        assert_eq!(history.skipped[0].code, "E001_INVALID_IDENTIFIER");
    }

    #[test]
    fn empty_archive_still_reports_current_snapshot() {
        let generated = generate("# Rules\n## A\nbody\n", Vec::new(), &options(), None);
        assert_eq!(generated.history.entries.len(), 1);
        assert!(generated.text.contains("## [Latest] - Current"));
        assert!(generated.text.contains("| Latest | Current |"));
    }

    #[test]
    fn generate_is_repeatable() {
        let archived = vec![pair("030825", "## A\nx\n"), pair("010725", "## B\n")];
        let first = generate("## A\nxx\n", archived.clone(), &options(), None);
        let second = generate("## A\nxx\n", archived, &options(), None);
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn date_style_parses_case_insensitively() {
        assert_eq!(DateStyle::parse("Short"), Some(DateStyle::Short));
        assert_eq!(DateStyle::parse(" long "), Some(DateStyle::Long));
        assert_eq!(DateStyle::parse("iso"), None);
    }
}
