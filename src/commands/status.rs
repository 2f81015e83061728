use anyhow::Result;
use std::env;

use crate::commands::CommandReport;
use crate::history::chain::SkippedSnapshot;
use crate::history::config::load_config;
use crate::history::identifier::SnapshotIdentifier;
use crate::history::paths::resolve_paths;
use crate::history::section::DocumentStats;
use crate::history::source::{read_archive, read_current};
use crate::history::versions::format_size;

include!(concat!(env!("OUT_DIR"), "/env_allowlist.rs"));

#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    pub root: Option<std::path::PathBuf>,
}

pub fn run(opts: &StatusOptions) -> Result<CommandReport> {
    let paths = resolve_paths(opts.root.as_deref())?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build={}", env!("HISTORY_BUILD_ID")));
    report.detail(format!("root={}", paths.root.display()));
    report.detail(format!("latest_file={}", paths.latest_file.display()));
    report.detail(format!("archive_dir={}", paths.archive_dir.display()));
    report.detail(format!("changelog_file={}", paths.changelog_file.display()));
    report.detail(format!("readme_file={}", paths.readme_file.display()));
    report.detail(format!("token_log={}", paths.token_log.display()));

    match load_config(&paths.root) {
        Ok(loaded) => match loaded.source {
            Some(path) => report.detail(format!("config={}", path.display())),
            None => report.detail("config=defaults"),
        },
        Err(err) => report.issue(format!("{err:#}")),
    }

    for key in GENERATED_ENV_ALLOWLIST {
        if let Ok(value) = env::var(key) {
            report.detail(format!("env {key}={value}"));
        }
    }

    match read_current(&paths.latest_file) {
        Ok((text, bytes)) => {
            let stats = DocumentStats::of(&text);
            report.detail(format!(
                "latest={} ({} lines, {} words, {} sections, {})",
                paths.latest_file.display(),
                stats.lines,
                stats.words,
                stats.sections,
                format_size(bytes)
            ));
        }
        Err(_) => report.issue(format!(
            "missing current snapshot ({})",
            paths.latest_file.display()
        )),
    }

    match read_archive(&paths.archive_dir) {
        Ok((archived, unreadable)) => {
            let mut snapshots = Vec::with_capacity(archived.len());
            for file in &archived {
                match SnapshotIdentifier::from_file_name(&file.file_name) {
                    Ok(id) => snapshots.push(id),
                    Err(err) => report.skipped(
                        "status",
                        &SkippedSnapshot {
                            name: file.file_name.clone(),
                            code: err.code(),
                            reason: err.to_string(),
                        },
                    ),
                }
            }
            for entry in &unreadable {
                report.skipped("status", entry);
            }

            snapshots.sort_by(|a, b| b.cmp(a));
            report.detail(format!("archived_versions={}", snapshots.len()));
            if let Some(newest) = snapshots.first() {
                report.detail(format!("newest_archive={} ({})", newest, newest.display_date()));
            }
            for id in &snapshots {
                report.detail(format!(
                    "snapshot {id}: day={} month={} year={} date={}",
                    id.day(),
                    id.month(),
                    id.year(),
                    id.date()
                ));
            }
        }
        Err(err) => report.issue(err.to_string()),
    }

    Ok(report)
}
