use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::history::chain::{self, ReportOptions};
use crate::history::config::{HistoryConfig, load_config};
use crate::history::paths::resolve_paths;
use crate::history::source::load_sources;
use crate::history::util::{format_timestamp, write_atomic};
use crate::history::versions::format_size;

#[derive(Debug, Clone, Default)]
pub struct ChangelogOptions {
    pub root: Option<PathBuf>,
    pub to_stdout: bool,
}

fn footer_text(cfg: &HistoryConfig) -> Result<Option<String>> {
    if !cfg.changelog.footer {
        return Ok(None);
    }
    let stamp = format_timestamp(Utc::now(), cfg.timezone()?);
    Ok(Some(format!(
        "This changelog is automatically generated by comparing archived versions. Last updated: {stamp}"
    )))
}

pub fn run(opts: &ChangelogOptions) -> Result<CommandReport> {
    let paths = resolve_paths(opts.root.as_deref())?;
    let cfg = load_config(&paths.root)?.config;
    let mut report = CommandReport::new("changelog");

    // Both inputs are required; fail before anything is written.
    let sources = load_sources(&paths.latest_file, &paths.archive_dir)?;
    tracing::info!(
        latest = %sources.latest_path.display(),
        archive = %sources.archive_dir.display(),
        archived = sources.archived.len(),
        "generating changelog"
    );

    let options = ReportOptions {
        heading: cfg.changelog.heading.clone(),
        intro: cfg.changelog.intro.clone(),
        date_style: cfg.changelog.date_style,
    };
    let footer = footer_text(&cfg)?;
    let generated = chain::generate(
        &sources.latest_text,
        sources.archived_pairs(),
        &options,
        footer.as_deref(),
    );

    for entry in sources.unreadable.iter().chain(&generated.history.skipped) {
        report.skipped("changelog", entry);
    }

    let archived = generated.history.entries.len().saturating_sub(1);
    report.detail(format!("archived_versions={archived}"));
    report.detail(format!("entries={}", generated.history.entries.len()));
    if let Some(latest) = generated.history.entries.first() {
        report.detail(format!(
            "latest_stats={} lines, {} words, {} sections, {}",
            latest.stats.lines,
            latest.stats.words,
            latest.stats.sections,
            format_size(sources.latest_bytes)
        ));
    }

    if opts.to_stdout {
        report.output(generated.text);
    } else {
        write_atomic(&paths.changelog_file, &generated.text)?;
        tracing::info!(path = %paths.changelog_file.display(), "changelog written");
        report.detail(format!("changelog_file={}", paths.changelog_file.display()));
    }

    Ok(report)
}
