use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::error::HistoryError;
use crate::history::chain::order_archived;
use crate::history::config::load_config;
use crate::history::paths::{relative_link, resolve_paths};
use crate::history::source::{read_archive, read_current};
use crate::history::util::write_atomic;
use crate::history::versions::{VersionRow, build_versions_table, splice_between_markers};

#[derive(Debug, Clone, Default)]
pub struct VersionsOptions {
    pub root: Option<PathBuf>,
    pub update_readme: bool,
}

pub fn run(opts: &VersionsOptions) -> Result<CommandReport> {
    let paths = resolve_paths(opts.root.as_deref())?;
    let cfg = load_config(&paths.root)?.config;
    let mut report = CommandReport::new("versions");

    let (archived, unreadable) = read_archive(&paths.archive_dir)?;
    for entry in &unreadable {
        report.skipped("versions", entry);
    }

    let mut rows = Vec::with_capacity(archived.len() + 1);
    match read_current(&paths.latest_file) {
        Ok((_, bytes)) => rows.push(VersionRow::latest(
            &relative_link(&paths.root, &paths.latest_file),
            bytes,
        )),
        Err(HistoryError::MissingCurrentSnapshot(path)) => {
            report.detail(format!("latest snapshot missing, row omitted: {}", path.display()));
        }
        Err(err) => return Err(err.into()),
    }

    let (ordered, invalid) = order_archived(
        archived
            .into_iter()
            .map(|file| (file.stem.clone(), file))
            .collect(),
    );
    for entry in &invalid {
        report.skipped("versions", entry);
    }
    for (id, file) in &ordered {
        let link = relative_link(&paths.root, &paths.archive_dir.join(&file.file_name));
        rows.push(VersionRow::archived(id, &link, file.bytes));
    }
    report.detail(format!("versions={}", rows.len()));

    let table = build_versions_table(&rows);
    if !opts.update_readme {
        report.output(table);
        return Ok(report);
    }

    let readme = fs::read_to_string(&paths.readme_file)
        .with_context(|| format!("failed to read {}", paths.readme_file.display()))?;
    let updated = splice_between_markers(
        &readme,
        &cfg.versions.start_marker,
        &cfg.versions.end_marker,
        &table,
    )?;
    write_atomic(&paths.readme_file, &updated)?;
    tracing::info!(path = %paths.readme_file.display(), rows = rows.len(), "versions table updated");
    report.detail(format!("readme_file={}", paths.readme_file.display()));

    Ok(report)
}
