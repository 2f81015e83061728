use crate::error::HistoryError;
use crate::history::versions::splice_between_markers;

pub const DEFAULT_RULES_START_MARKER: &str = "## Complete Rules Content";
pub const DEFAULT_RULES_END_MARKER: &str = "<!-- END_DYNAMIC_RULES -->";
/// Heading of the older single-section layout, replaced by the marked region.
pub const LEGACY_LATEST_HEADING: &str = "## Latest Version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedReadme {
    pub text: String,
    pub removed_legacy: bool,
}

/// Drops the `heading` section: the heading line and everything up to the
/// next `## ` line or the end of `doc`.
pub fn remove_section(doc: &str, heading: &str) -> (String, bool) {
    let mut out = String::with_capacity(doc.len());
    let mut removed = false;
    let mut skipping = false;

    for line in doc.split_inclusive('\n') {
        let bare = line.trim_end();
        if bare == heading {
            skipping = true;
            removed = true;
            continue;
        }
        if skipping && bare.starts_with("## ") {
            skipping = false;
        }
        if !skipping {
            out.push_str(line);
        }
    }
    (out, removed)
}

/// Puts the whole current document between the rules markers. Both markers
/// must exist; a legacy `## Latest Version` section outside the marked region
/// is removed.
pub fn inject_rules(
    readme: &str,
    latest: &str,
    start: &str,
    end: &str,
) -> Result<InjectedReadme, HistoryError> {
    let spliced = splice_between_markers(readme, start, end, latest)?;

    let start_at = spliced
        .find(start)
        .ok_or_else(|| HistoryError::MarkerNotFound(start.to_string()))?;
    let end_at = spliced
        .rfind(end)
        .filter(|at| *at > start_at)
        .ok_or_else(|| HistoryError::MarkerNotFound(end.to_string()))?;

    let (head, head_removed) = remove_section(&spliced[..start_at], LEGACY_LATEST_HEADING);
    let (tail, tail_removed) = remove_section(&spliced[end_at..], LEGACY_LATEST_HEADING);

    let mut text = head;
    text.push_str(&spliced[start_at..end_at]);
    text.push_str(&tail);
    Ok(InjectedReadme {
        text,
        removed_legacy: head_removed || tail_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# Rules\n\nIntro.\n\n## Complete Rules Content\n\nold rules\n\n<!-- END_DYNAMIC_RULES -->\n\n## License\nMIT\n";

    #[test]
    fn replaces_the_marked_region_and_keeps_markers() {
        let out = inject_rules(
            README,
            "# Rules\n\n## Setup\nInstall.\n",
            DEFAULT_RULES_START_MARKER,
            DEFAULT_RULES_END_MARKER,
        )
        .expect("markers present");
        assert_eq!(
            out.text,
            "# Rules\n\nIntro.\n\n## Complete Rules Content\n\n# Rules\n\n## Setup\nInstall.\n\n<!-- END_DYNAMIC_RULES -->\n\n## License\nMIT\n"
        );
        assert!(!out.removed_legacy);
    }

    #[test]
    fn legacy_section_is_dropped_outside_the_region_only() {
        let readme = "# Rules\n\n## Latest Version\n\n*Last updated: x*\n\nstale copy\n\n## Complete Rules Content\n\n<!-- END_DYNAMIC_RULES -->\n";
        let latest = "## Latest Version\nkept inside\n";
        let out = inject_rules(
            readme,
            latest,
            DEFAULT_RULES_START_MARKER,
            DEFAULT_RULES_END_MARKER,
        )
        .expect("markers present");
        assert!(out.removed_legacy);
        assert!(!out.text.contains("stale copy"));
        assert!(out.text.contains("## Latest Version\nkept inside"));
        assert!(out.text.starts_with("# Rules\n\n## Complete Rules Content"));
    }

    #[test]
    fn missing_marker_is_an_error() {
        let err = inject_rules("# Rules\n", "x", DEFAULT_RULES_START_MARKER, DEFAULT_RULES_END_MARKER)
            .expect_err("no markers");
        assert_eq!(err.code(), "E004_MARKER_NOT_FOUND");
    }

    #[test]
    fn remove_section_stops_at_the_next_heading() {
        let (out, removed) = remove_section("a\n## Old\nx\n### sub\n## Next\ny\n", "## Old");
        assert!(removed);
        assert_eq!(out, "a\n## Next\ny\n");

        let (out, removed) = remove_section("a\n", "## Old");
        assert!(!removed);
        assert_eq!(out, "a\n");
    }
}
